use serde::{Deserialize, Serialize};

use crate::domain::{ProjectId, UserId};

/// Creation request for the project service.
///
/// The milestone name key is capitalized in the service contract while every
/// other key is camelCase; serialization must preserve that asymmetry exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectPayload {
    pub name: String,
    #[serde(rename = "ownerId")]
    pub owner_id: UserId,
    pub milestones: Vec<MilestonePayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestonePayload {
    #[serde(rename = "Name")]
    pub name: String,
    pub todos: Vec<TodoPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoPayload {
    pub name: String,
    #[serde(rename = "isComplete")]
    pub is_complete: bool,
}

/// One row of the service's project listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: ProjectId,
    pub name: String,
    pub status: String,
    #[serde(rename = "percentComplete")]
    pub percent_complete: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<ProjectOwner>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectOwner {
    pub name: String,
}

/// Listing row flattened for table rendering. Records without an owner keep
/// an absent owner name rather than an empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub name: String,
    pub status: String,
    pub percent_complete: f64,
    pub owner_name: Option<String>,
}

impl From<ProjectRecord> for ProjectSummary {
    fn from(record: ProjectRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            status: record.status,
            percent_complete: record.percent_complete,
            owner_name: record.owner.map(|owner| owner.name),
        }
    }
}

/// Column layout hosts use to render the listing; `field` names refer to
/// `ProjectSummary` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    pub label: &'static str,
    pub field: &'static str,
    pub kind: ColumnKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Text,
    Percent,
    /// Renders a row action instead of a field value.
    Action,
}

pub const PROJECT_TABLE_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec {
        label: "Name",
        field: "name",
        kind: ColumnKind::Text,
    },
    ColumnSpec {
        label: "Status",
        field: "status",
        kind: ColumnKind::Text,
    },
    ColumnSpec {
        label: "% Complete",
        field: "percent_complete",
        kind: ColumnKind::Percent,
    },
    ColumnSpec {
        label: "Owner",
        field: "owner_name",
        kind: ColumnKind::Text,
    },
    ColumnSpec {
        label: "View",
        field: "id",
        kind: ColumnKind::Action,
    },
];
