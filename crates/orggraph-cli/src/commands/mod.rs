//! CLI command definitions and handlers.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use orggraph_core::config::CONFIG_FILE;
use orggraph_core::Settings;
use orggraph_graph::{ConnectionSettings, GraphClient};
use std::path::PathBuf;
use tracing::warn;

pub mod graph;
pub mod import;
pub mod query;
pub mod run;

/// Organization graph importer and query tool for Cosmos DB (Gremlin API)
#[derive(Parser)]
#[command(name = "orggraph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Base configuration file; a `.development.toml` overlay next to it is
    /// applied when present
    #[arg(short, long, global = true, env = "ORGGRAPH_CONFIG", default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Defaults to `run`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe, clear, import every source, verify and run sample traversals
    Run(run::RunArgs),

    /// Show endpoint and element counts
    Status,

    /// Remove every vertex and edge
    Clear {
        /// Required: clearing cannot be undone
        #[arg(long)]
        confirm: bool,
    },

    /// Import the CSV sources
    Import(import::ImportArgs),

    /// List the skills of a person
    Skills {
        /// Person id
        person_id: String,
    },

    /// List the people reporting directly to a person
    Reports {
        /// Person id
        person_id: String,
    },

    /// Follow one edge hop from a vertex and project a property
    Traverse(query::TraverseArgs),

    /// Print every vertex and edge as `{nodes, links}` JSON
    Snapshot {
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Run a raw Gremlin script and print each result
    Query {
        /// Gremlin script
        gremlin: String,
    },
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let command = self.command.unwrap_or_else(|| Commands::Run(run::RunArgs::default()));

        if let Commands::Clear { confirm: false } = command {
            bail!("Refusing to clear the graph without --confirm");
        }

        let settings = Settings::load(&self.config)?;
        let client = GraphClient::connect(&ConnectionSettings::from_cosmos(&settings.cosmos)).await?;

        let result = match command {
            Commands::Run(args) => run::execute(&client, &settings, &args).await,
            Commands::Status => graph::cmd_status(&client, &settings).await,
            Commands::Clear { .. } => graph::cmd_clear(&client).await,
            Commands::Import(args) => import::execute(&client, &settings, args).await,
            Commands::Skills { person_id } => query::cmd_skills(&client, &person_id).await,
            Commands::Reports { person_id } => query::cmd_reports(&client, &person_id).await,
            Commands::Traverse(args) => query::cmd_traverse(&client, &args).await,
            Commands::Snapshot { pretty } => graph::cmd_snapshot(&client, pretty).await,
            Commands::Query { gremlin } => query::cmd_raw(&client, &gremlin).await,
        };

        if let Err(e) = client.close().await {
            warn!(error = %e, "Failed to close the Gremlin session");
        }

        result
    }
}
