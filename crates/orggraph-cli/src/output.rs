//! Terminal output formatting.

use std::io::Write;

use colored::Colorize;
use orggraph_core::ConfigError;
use orggraph_graph::{GraphError, ImportError, ImportReport};

const RULE_WIDTH: usize = 50;

/// Print a framed title.
pub fn banner(title: &str) {
    println!();
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("    {}", title.bold());
    println!("{}", "=".repeat(RULE_WIDTH));
    println!();
}

/// Print a titled section header.
pub fn section(title: &str) {
    println!("{}", title.bold());
    println!("{}", "─".repeat(40));
}

/// Start a progress line; the caller finishes it.
pub fn step(label: &str) {
    print!("{}... ", label);
    let _ = std::io::stdout().flush();
}

/// Print a list of names, or `empty` when there are none.
pub fn print_names(names: &[String], empty: &str) {
    if names.is_empty() {
        println!("  {}", empty.dimmed());
    } else {
        for name in names {
            println!("  {} {}", "✓".green(), name);
        }
    }
    println!();
}

pub fn print_import_report(report: &ImportReport) {
    println!("  People:        {}", report.people.to_string().cyan());
    println!("  Skills:        {}", report.skills.to_string().cyan());
    println!("  Relationships: {}", report.relationships.to_string().cyan());
    println!(
        "  {}",
        format!(
            "started {} · {} ms",
            report.started_at.with_timezone(&chrono::Local).format("%H:%M:%S"),
            report.elapsed.as_millis()
        )
        .dimmed()
    );
}

/// Error kind headline and remote status code, when the error carries one.
fn classify(err: &anyhow::Error) -> (&'static str, Option<u16>) {
    if let Some(e) = err.downcast_ref::<ImportError>() {
        return match e {
            ImportError::SourceNotFound(_) => ("FILE NOT FOUND ERROR", None),
            ImportError::Io { .. } => ("FILE READ ERROR", None),
            ImportError::Graph(g) => classify_graph(g),
        };
    }
    if let Some(e) = err.downcast_ref::<GraphError>() {
        return classify_graph(e);
    }
    if err.downcast_ref::<ConfigError>().is_some() {
        return ("CONFIGURATION ERROR", None);
    }
    ("GENERAL ERROR", None)
}

fn classify_graph(err: &GraphError) -> (&'static str, Option<u16>) {
    let kind = match err {
        GraphError::Connection { .. } => "CONNECTION ERROR",
        GraphError::Write { .. } => "GREMLIN WRITE ERROR",
        GraphError::Query { .. } => "GREMLIN QUERY ERROR",
        GraphError::InvalidEntity(_) => "INVALID ENTITY",
        GraphError::Protocol(_) => "PROTOCOL ERROR",
    };
    (kind, err.status_code())
}

/// Print the failure summary block on stderr.
pub fn print_error(err: &anyhow::Error) {
    let (kind, status) = classify(err);

    eprintln!();
    eprintln!("{}", "=".repeat(RULE_WIDTH).red());
    eprintln!("    {}", kind.red().bold());
    eprintln!("{}", "=".repeat(RULE_WIDTH).red());
    eprintln!("{} {}", "Message:".bold(), err);
    for cause in err.chain().skip(1) {
        eprintln!("{} {}", "Caused by:".dimmed(), cause);
    }
    if let Some(code) = status {
        eprintln!("{} {}", "Status Code:".bold(), code);
    }
    if matches!(err.downcast_ref::<ImportError>(), Some(ImportError::SourceNotFound(_))) {
        eprintln!();
        eprintln!("Make sure the CSV files exist, or set their paths under [import] in the configuration.");
    }
}
