//! Whole-graph commands.

use anyhow::Result;
use colored::Colorize;
use orggraph_core::Settings;
use orggraph_graph::{fetch_snapshot, normalize_hostname, GraphClient};

/// Show endpoint and element counts.
pub async fn cmd_status(client: &GraphClient, settings: &Settings) -> Result<()> {
    println!("{}", "Organization Graph Status".bold());
    println!("{}", "─".repeat(40));

    let cosmos = &settings.cosmos;
    println!("  Host:      {}", normalize_hostname(&cosmos.hostname).cyan());
    println!("  Graph:     {}/{}", cosmos.database, cosmos.container);
    println!("  Bindings:  {:?}", client.binding_mode());

    let vertices = client.test_connection().await?;
    let edges = client.edge_count().await?;
    println!("  Vertices:  {}", vertices.to_string().cyan());
    println!("  Edges:     {}", edges.to_string().cyan());

    println!("{}", "─".repeat(40));
    Ok(())
}

/// Drop every vertex and edge.
pub async fn cmd_clear(client: &GraphClient) -> Result<()> {
    client.clear_graph().await?;
    println!("{}", "Graph cleared.".yellow());
    Ok(())
}

/// Print the `{nodes, links}` snapshot on stdout.
pub async fn cmd_snapshot(client: &GraphClient, pretty: bool) -> Result<()> {
    let snapshot = fetch_snapshot(client).await?;
    let json = if pretty {
        serde_json::to_string_pretty(&snapshot)?
    } else {
        serde_json::to_string(&snapshot)?
    };
    println!("{}", json);
    Ok(())
}
