//! CSV import command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use orggraph_core::{ImportPaths, Settings};
use orggraph_graph::{run_full_import, GraphClient};
use std::path::PathBuf;

use crate::output;

#[derive(Args)]
pub struct ImportArgs {
    /// Clear the graph before importing
    #[arg(long)]
    pub clear: bool,

    /// People file (`id,name,role,partitionKey`)
    #[arg(long)]
    pub people: Option<PathBuf>,

    /// Skills file (`id,name,level,partitionKey`)
    #[arg(long)]
    pub skills: Option<PathBuf>,

    /// Relationships file (`fromId,toId,label`)
    #[arg(long)]
    pub relationships: Option<PathBuf>,
}

impl ImportArgs {
    /// Command-line paths win over configured ones.
    fn resolve(self, configured: &ImportPaths) -> ImportPaths {
        ImportPaths {
            people: self.people.unwrap_or_else(|| configured.people.clone()),
            skills: self.skills.unwrap_or_else(|| configured.skills.clone()),
            relationships: self.relationships.unwrap_or_else(|| configured.relationships.clone()),
        }
    }
}

pub async fn execute(client: &GraphClient, settings: &Settings, args: ImportArgs) -> Result<()> {
    if args.clear {
        output::step("Clearing existing graph data");
        client.clear_graph().await?;
        println!("{}", "DONE".yellow());
    }

    let paths = args.resolve(&settings.import);

    println!("{}", "Importing CSV sources".bold());
    println!("{}", "─".repeat(40));
    let report = run_full_import(client, &paths).await?;
    output::print_import_report(&report);

    Ok(())
}
