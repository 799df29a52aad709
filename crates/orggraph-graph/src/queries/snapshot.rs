//! Whole-graph snapshot for the browser renderer.
//!
//! Produces the `{nodes, links}` document a force-directed layout consumes.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::error::{GraphResult, Operation};
use crate::graphson;
use crate::statement::Statement;
use crate::GraphClient;

/// Keys that describe the element itself and never appear in `properties`.
const RESERVED_KEYS: &[&str] = &["id", "label", "type"];

/// A vertex as exposed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub properties: BTreeMap<String, Value>,
}

/// An edge as exposed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    pub label: String,
}

/// Every vertex and every edge of the graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSnapshot {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

/// List all vertices and all edges.
pub async fn fetch_snapshot(client: &GraphClient) -> GraphResult<GraphSnapshot> {
    let vertices = client.submit(Operation::Read, Statement::script("g.V()")).await?;
    let edges = client.submit(Operation::Read, Statement::script("g.E()")).await?;

    let snapshot = GraphSnapshot {
        nodes: vertices.iter().filter_map(node_from).collect(),
        links: edges.iter().filter_map(link_from).collect(),
    };

    info!(nodes = snapshot.nodes.len(), links = snapshot.links.len(), "Snapshot fetched");
    Ok(snapshot)
}

fn string_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key).and_then(graphson::as_plain_string).unwrap_or_default()
}

/// Build a node, flattening `properties` and unwrapping each value envelope.
pub fn node_from(vertex: &Value) -> Option<GraphNode> {
    let obj = graphson::peel(vertex).as_object()?;
    let mut properties = BTreeMap::new();

    for (key, value) in obj {
        if RESERVED_KEYS.contains(&key.as_str()) {
            continue;
        }
        match (key.as_str(), value) {
            ("properties", Value::Object(props)) => {
                for (name, prop) in props {
                    if !RESERVED_KEYS.contains(&name.as_str()) {
                        properties.insert(name.clone(), graphson::property_value(prop));
                    }
                }
            }
            _ => {
                properties.insert(key.clone(), graphson::property_value(value));
            }
        }
    }

    Some(GraphNode {
        id: string_field(obj, "id"),
        label: string_field(obj, "label"),
        properties,
    })
}

/// Build a link from an edge's `outV`/`inV` endpoints.
pub fn link_from(edge: &Value) -> Option<GraphLink> {
    let obj = graphson::peel(edge).as_object()?;
    Some(GraphLink {
        source: string_field(obj, "outV"),
        target: string_field(obj, "inV"),
        label: string_field(obj, "label"),
    })
}
