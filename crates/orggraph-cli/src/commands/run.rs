//! The default end-to-end sequence.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use orggraph_core::Settings;
use orggraph_graph::{find_direct_reports, find_skills_by_person, run_full_import, GraphClient};

use crate::output;

const SAMPLE_SKILL_HOLDERS: [&str; 2] = ["Janos", "Peter"];
const SAMPLE_MANAGERS: [&str; 1] = ["Bela"];

#[derive(Args)]
pub struct RunArgs {
    /// Person ids whose skills are listed after the import
    #[arg(long = "skills-of", value_name = "ID", default_values = SAMPLE_SKILL_HOLDERS)]
    pub skills_of: Vec<String>,

    /// Person ids whose direct reports are listed after the import
    #[arg(long = "reports-of", value_name = "ID", default_values = SAMPLE_MANAGERS)]
    pub reports_of: Vec<String>,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            skills_of: SAMPLE_SKILL_HOLDERS.iter().map(|s| s.to_string()).collect(),
            reports_of: SAMPLE_MANAGERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

pub async fn execute(client: &GraphClient, settings: &Settings, args: &RunArgs) -> Result<()> {
    output::banner("Smart Organization Chart");

    output::step("Testing connection");
    let initial = client.test_connection().await?;
    println!("{} (current vertices: {})", "OK".green().bold(), initial);

    output::step("Clearing existing graph data");
    client.clear_graph().await?;
    println!("{}", "DONE".yellow());

    println!();
    println!("{}", "Importing CSV sources".bold());
    println!("{}", "─".repeat(40));
    let report = run_full_import(client, &settings.import).await?;
    output::print_import_report(&report);

    let total = client.vertex_count().await?;
    println!();
    println!("{} {}", "Total vertices in graph:".green(), total.to_string().bold());

    output::banner("Sample Traversals");

    for person_id in &args.skills_of {
        let skills = find_skills_by_person(client, person_id).await?;
        output::section(&format!("Skills of {}", person_id));
        output::print_names(&skills, "No skills found.");
    }

    for person_id in &args.reports_of {
        let reports = find_direct_reports(client, person_id).await?;
        output::section(&format!("Direct reports of {}", person_id));
        output::print_names(&reports, "No direct reports found.");
    }

    println!("{}", "All operations completed successfully.".green().bold());
    Ok(())
}
