use serde::{Deserialize, Serialize};

use super::{base_bag, default_partition_key, PropertyBag, Vertex};

/// A person in the organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub name: String,
    /// Job role, e.g. "Architect" or "Manager".
    pub role: String,
    #[serde(default = "default_partition_key")]
    pub partition_key: String,
}

impl Person {
    pub const LABEL: &'static str = "person";

    /// Create a person in the default partition.
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
            partition_key: default_partition_key(),
        }
    }

    pub fn with_partition_key(mut self, partition_key: impl Into<String>) -> Self {
        self.partition_key = partition_key.into();
        self
    }
}

impl Vertex for Person {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &'static str {
        Self::LABEL
    }

    fn partition_key(&self) -> &str {
        &self.partition_key
    }

    fn to_property_bag(&self) -> PropertyBag {
        let mut bag = base_bag(self);
        bag.insert("name".to_string(), self.name.as_str().into());
        bag.insert("role".to_string(), self.role.as_str().into());
        bag
    }
}
