use serde::{Deserialize, Serialize};

/// Edge label: the source person reports to the target person.
pub const REPORTS_TO: &str = "reportsTo";

/// Edge label: the source person holds the target skill.
pub const HAS_SKILL: &str = "hasSkill";

/// A directed, labeled relationship from `from_id` to `to_id`.
///
/// Both endpoints must already exist in the remote graph when the edge is
/// written. That is not checked locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub from_id: String,
    pub to_id: String,
    pub label: String,
}

impl Edge {
    pub fn new(from_id: impl Into<String>, to_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            from_id: from_id.into(),
            to_id: to_id.into(),
            label: label.into(),
        }
    }

    pub fn reports_to(from_id: impl Into<String>, to_id: impl Into<String>) -> Self {
        Self::new(from_id, to_id, REPORTS_TO)
    }

    pub fn has_skill(person_id: impl Into<String>, skill_id: impl Into<String>) -> Self {
        Self::new(person_id, skill_id, HAS_SKILL)
    }
}
