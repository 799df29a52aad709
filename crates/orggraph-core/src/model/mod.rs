//! Property-graph entity model.
//!
//! Vertices are anything implementing [`Vertex`]; the access layer only ever
//! calls the trait and never inspects the concrete type. Edges are plain
//! structs because the query protocol addresses them positionally
//! (source, label, target).

mod edge;
mod person;
mod skill;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use edge::{Edge, HAS_SKILL, REPORTS_TO};
pub use person::Person;
pub use skill::Skill;

/// Partition key assigned to vertices that do not specify one.
pub const DEFAULT_PARTITION_KEY: &str = "org";

/// Property name carrying the vertex id.
pub const ID_KEY: &str = "id";

/// Property name carrying the partition key.
pub const PARTITION_KEY: &str = "partitionKey";

/// A scalar property value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Boolean(bool),
}

impl PropertyValue {
    /// Borrow the value as a string slice, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// Flattened, named scalar attributes of a vertex, as persisted.
///
/// Keys are unique; iteration order is by key and carries no meaning.
pub type PropertyBag = BTreeMap<String, PropertyValue>;

/// A node in the organization graph.
pub trait Vertex: Send + Sync {
    /// Unique identifier within the vertex's partition.
    fn id(&self) -> &str;

    /// Kind discriminator. Fixed per implementing type and never empty.
    fn label(&self) -> &'static str;

    /// Distribution key required by the remote engine.
    fn partition_key(&self) -> &str;

    /// Serialize into the property bag sent to the engine.
    ///
    /// Implementations start from [`base_bag`] and add their own fields.
    /// The label is conveyed separately and must not appear here.
    fn to_property_bag(&self) -> PropertyBag;
}

/// The properties every vertex carries: `id` and `partitionKey`.
pub fn base_bag<V: Vertex + ?Sized>(vertex: &V) -> PropertyBag {
    let mut bag = PropertyBag::new();
    bag.insert(ID_KEY.to_string(), vertex.id().into());
    bag.insert(PARTITION_KEY.to_string(), vertex.partition_key().into());
    bag
}

fn default_partition_key() -> String {
    DEFAULT_PARTITION_KEY.to_string()
}
