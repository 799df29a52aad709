//! OrgGraph Core Library
//!
//! Entity model and configuration for the organization graph.

pub mod config;
pub mod error;
pub mod model;

pub use config::{BindingMode, CosmosSettings, ImportPaths, Settings};
pub use error::{ConfigError, ConfigResult};
pub use model::{
    base_bag, Edge, Person, PropertyBag, PropertyValue, Skill, Vertex, DEFAULT_PARTITION_KEY, HAS_SKILL, REPORTS_TO,
};
