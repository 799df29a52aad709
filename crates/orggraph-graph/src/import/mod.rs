//! CSV to graph bulk import.
//!
//! Reads people, skills and relationships from delimited files and writes
//! them through [`GraphClient`], one row at a time. Each function returns
//! how many rows were written; the first rejected write aborts the call.

pub mod rows;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use orggraph_core::ImportPaths;
use tracing::{debug, info};

use crate::error::{ImportError, ImportResult};
use crate::GraphClient;
use rows::{data_rows, edge_from, person_from, skill_from, EDGE_FIELDS, VERTEX_FIELDS};

/// Outcome of [`run_full_import`].
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub people: usize,
    pub skills: usize,
    pub relationships: usize,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
}

impl ImportReport {
    pub fn vertices(&self) -> usize {
        self.people + self.skills
    }
}

/// Read a whole source file, mapping "not there" and "not a file" to
/// [`ImportError::SourceNotFound`].
async fn read_source(path: &Path) -> ImportResult<String> {
    let not_found = || ImportError::SourceNotFound(path.to_path_buf());

    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Err(not_found()),
        Err(e) if is_missing(&e) => return Err(not_found()),
        Err(source) => return Err(io_error(path, source)),
    }

    tokio::fs::read_to_string(path).await.map_err(|e| {
        if is_missing(&e) {
            not_found()
        } else {
            io_error(path, e)
        }
    })
}

fn is_missing(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied
    )
}

fn io_error(path: &Path, source: std::io::Error) -> ImportError {
    ImportError::Io {
        path: PathBuf::from(path),
        source,
    }
}

/// Import `id,name,role,partitionKey` rows as person vertices.
pub async fn import_people(client: &GraphClient, path: &Path) -> ImportResult<usize> {
    let text = read_source(path).await?;
    let mut count = 0;

    for row in data_rows(&text, VERTEX_FIELDS) {
        let person = person_from(&row);
        client.add_vertex(&person).await?;
        count += 1;
        debug!(line = row.line, id = %person.id, "Imported person");
    }

    info!(path = %path.display(), count, "People imported");
    Ok(count)
}

/// Import `id,name,level,partitionKey` rows as skill vertices.
pub async fn import_skills(client: &GraphClient, path: &Path) -> ImportResult<usize> {
    let text = read_source(path).await?;
    let mut count = 0;

    for row in data_rows(&text, VERTEX_FIELDS) {
        let skill = skill_from(&row);
        client.add_vertex(&skill).await?;
        count += 1;
        debug!(line = row.line, id = %skill.id, "Imported skill");
    }

    info!(path = %path.display(), count, "Skills imported");
    Ok(count)
}

/// Import `fromId,toId,label` rows as edges. Endpoints must already exist.
pub async fn import_relationships(client: &GraphClient, path: &Path) -> ImportResult<usize> {
    let text = read_source(path).await?;
    let mut count = 0;

    for row in data_rows(&text, EDGE_FIELDS) {
        let edge = edge_from(&row);
        client.add_edge(&edge).await?;
        count += 1;
        debug!(line = row.line, from = %edge.from_id, to = %edge.to_id, "Imported relationship");
    }

    info!(path = %path.display(), count, "Relationships imported");
    Ok(count)
}

/// Import people, then skills, then relationships.
pub async fn run_full_import(client: &GraphClient, paths: &ImportPaths) -> ImportResult<ImportReport> {
    let started_at = Utc::now();
    let timer = Instant::now();
    info!("Starting full import");

    let people = import_people(client, &paths.people).await?;
    let skills = import_skills(client, &paths.skills).await?;
    let relationships = import_relationships(client, &paths.relationships).await?;

    let report = ImportReport {
        people,
        skills,
        relationships,
        started_at,
        elapsed: timer.elapsed(),
    };

    info!(
        people = report.people,
        skills = report.skills,
        relationships = report.relationships,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "Full import complete"
    );

    Ok(report)
}
