use serde::{Deserialize, Serialize};

use super::{base_bag, default_partition_key, PropertyBag, Vertex};

/// A skill a person can hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: String,
    pub name: String,
    /// Proficiency level, e.g. "Intermediate" or "Expert".
    pub level: String,
    #[serde(default = "default_partition_key")]
    pub partition_key: String,
}

impl Skill {
    pub const LABEL: &'static str = "skill";

    pub fn new(id: impl Into<String>, name: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            level: level.into(),
            partition_key: default_partition_key(),
        }
    }

    pub fn with_partition_key(mut self, partition_key: impl Into<String>) -> Self {
        self.partition_key = partition_key.into();
        self
    }
}

impl Vertex for Skill {
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
        bag.insert("level".to_string(), self.level.as_str().into());
        bag
    }
}
