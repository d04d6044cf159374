//! Project domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A build project: one user request flowing through the pipeline.
///
/// Structure shared between the orchestrator (persists) and clients (read).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    /// Free-text request description the pipeline workers act on.
    pub description: String,
    pub status: ProjectStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Project lifecycle status
///
/// Derived from task statuses everywhere except creation (Pending) and
/// pipeline start (InProgress).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl ProjectStatus {
    /// Wire/storage string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Pending => "pending",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Failed => "failed",
        }
    }
}

impl Project {
    pub fn new(owner_id: String, name: String, description: String) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name,
            description,
            status: ProjectStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}
