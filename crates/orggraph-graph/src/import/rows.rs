//! Tolerant CSV row extraction.
//!
//! The first line is always a header. Blank lines and lines with too few
//! comma-separated fields are dropped without error; they are only visible
//! on the `debug` log. Extra trailing fields are ignored. There is no
//! quoting: a comma always separates fields.

use orggraph_core::{Edge, Person, Skill};
use tracing::debug;

/// Fields required for a person or skill row: id, name, attribute, partition.
pub const VERTEX_FIELDS: usize = 4;

/// Fields required for a relationship row: from, to, label.
pub const EDGE_FIELDS: usize = 3;

/// A data line that passed the field-count check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRow<'a> {
    /// 1-based line number in the source.
    pub line: usize,
    pub fields: Vec<&'a str>,
}

/// Iterate the usable data rows of `text`.
pub fn data_rows(text: &str, min_fields: usize) -> impl Iterator<Item = DataRow<'_>> {
    text.lines().enumerate().skip(1).filter_map(move |(idx, raw)| {
        let line = raw.trim();
        if line.is_empty() {
            return None;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < min_fields {
            debug!(line = idx + 1, fields = fields.len(), required = min_fields, "Skipping short row");
            return None;
        }

        Some(DataRow { line: idx + 1, fields })
    })
}

/// `id,name,role,partitionKey`
pub fn person_from(row: &DataRow<'_>) -> Person {
    let f = &row.fields;
    Person::new(f[0], f[1], f[2]).with_partition_key(f[3])
}

/// `id,name,level,partitionKey`
pub fn skill_from(row: &DataRow<'_>) -> Skill {
    let f = &row.fields;
    Skill::new(f[0], f[1], f[2]).with_partition_key(f[3])
}

/// `fromId,toId,label`
pub fn edge_from(row: &DataRow<'_>) -> Edge {
    let f = &row.fields;
    Edge::new(f[0], f[1], f[2])
}
