//! One-hop traversals projecting a single property.
//!
//! `g.V(<start>).out|in(<label>).values(<projection>)`

use std::fmt;
use std::str::FromStr;

use orggraph_core::{HAS_SKILL, REPORTS_TO};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GraphResult, Operation};
use crate::graphson;
use crate::GraphClient;

/// Which way to follow edges from the start vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Follow outgoing edges to their targets.
    Out,
    /// Follow incoming edges back to their sources.
    In,
}

impl Direction {
    fn step(self) -> &'static str {
        match self {
            Self::Out => "out",
            Self::In => "in",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.step())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "out" => Ok(Self::Out),
            "in" => Ok(Self::In),
            other => Err(format!("unknown direction '{other}', expected 'out' or 'in'")),
        }
    }
}

/// Project `projection` from every vertex one `edge_label` hop away from
/// `start_id` in `direction`.
///
/// Order is whatever the engine returns. No match is an empty list, not an
/// error.
pub async fn traverse(
    client: &GraphClient,
    start_id: &str,
    direction: Direction,
    edge_label: &str,
    projection: &str,
) -> GraphResult<Vec<String>> {
    let stmt = client
        .statement()
        .step("g.V(")
        .arg(start_id)
        .step(&format!(").{}(", direction.step()))
        .arg(edge_label)
        .step(").values(")
        .arg(projection)
        .step(")");

    let items = client.submit(Operation::Read, stmt).await?;
    let values: Vec<String> = items.iter().filter_map(graphson::as_plain_string).collect();

    debug!(start_id, %direction, edge_label, projection, found = values.len(), "Traversal complete");
    Ok(values)
}

/// Names of the skills a person holds.
pub async fn find_skills_by_person(client: &GraphClient, person_id: &str) -> GraphResult<Vec<String>> {
    traverse(client, person_id, Direction::Out, HAS_SKILL, "name").await
}

/// Names of the people reporting directly to `person_id`.
pub async fn find_direct_reports(client: &GraphClient, person_id: &str) -> GraphResult<Vec<String>> {
    traverse(client, person_id, Direction::In, REPORTS_TO, "name").await
}
