//! Traversal and raw query commands.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use orggraph_graph::{find_direct_reports, find_skills_by_person, traverse, Direction, GraphClient};

use crate::output;

#[derive(Args)]
pub struct TraverseArgs {
    /// Start vertex id
    pub start_id: String,

    /// Edge direction (out, in)
    #[arg(long, default_value = "out")]
    pub direction: Direction,

    /// Edge label to follow
    #[arg(long)]
    pub label: String,

    /// Property to project from each reached vertex
    #[arg(long, default_value = "name")]
    pub project: String,
}

pub async fn cmd_skills(client: &GraphClient, person_id: &str) -> Result<()> {
    let skills = find_skills_by_person(client, person_id).await?;
    output::section(&format!("Skills of {}", person_id));
    output::print_names(&skills, "No skills found.");
    Ok(())
}

pub async fn cmd_reports(client: &GraphClient, person_id: &str) -> Result<()> {
    let reports = find_direct_reports(client, person_id).await?;
    output::section(&format!("Direct reports of {}", person_id));
    output::print_names(&reports, "No direct reports found.");
    Ok(())
}

pub async fn cmd_traverse(client: &GraphClient, args: &TraverseArgs) -> Result<()> {
    let values = traverse(client, &args.start_id, args.direction, &args.label, &args.project).await?;
    output::section(&format!(
        "{} -{}({})-> {}",
        args.start_id, args.direction, args.label, args.project
    ));
    output::print_names(&values, "No results.");
    Ok(())
}

/// Execute a raw Gremlin script.
pub async fn cmd_raw(client: &GraphClient, gremlin: &str) -> Result<()> {
    let results = client.submit_raw(gremlin).await?;

    if results.is_empty() {
        println!("{}", "No results.".dimmed());
    } else {
        for (i, result) in results.iter().enumerate() {
            println!("{}: {}", (i + 1).to_string().dimmed(), serde_json::to_string(result)?);
        }
    }

    Ok(())
}
