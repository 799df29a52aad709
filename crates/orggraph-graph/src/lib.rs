//! # OrgGraph Graph
//!
//! Gremlin access layer for the organization graph.
//!
//! Turns typed entities into Gremlin statements, runs them over a single
//! WebSocket session against a Cosmos DB Gremlin endpoint, and shapes the
//! results. Also hosts the CSV bulk importer that drives it.

pub mod client;
pub mod error;
pub mod escape;
pub mod graphson;
pub mod import;
pub mod protocol;
pub mod queries;
pub mod statement;
pub mod transport;

pub use client::{normalize_hostname, ConnectionSettings, GraphClient, COSMOS_GREMLIN_PORT};
pub use error::{GraphError, GraphResult, ImportError, ImportResult, TransportError};
pub use import::{import_people, import_relationships, import_skills, run_full_import, ImportReport};
pub use queries::snapshot::{fetch_snapshot, GraphLink, GraphNode, GraphSnapshot};
pub use queries::traversal::{find_direct_reports, find_skills_by_person, traverse, Direction};
pub use statement::Statement;
pub use transport::{GremlinTransport, WsTransport};
