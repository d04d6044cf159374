//! Pipeline notification events

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Best-effort state-change event fanned out to subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineEvent {
    pub project_id: Uuid,
    pub kind: EventKind,
    pub task_id: Option<Uuid>,
    pub worker: Option<String>,
    /// Status the entity moved to, as its wire string.
    pub status: String,
    pub error: Option<String>,
    pub occurred_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    TaskUpdate,
    ProjectUpdate,
}

impl PipelineEvent {
    pub fn task_update(
        project_id: Uuid,
        task_id: Uuid,
        worker: &str,
        status: &str,
        error: Option<String>,
    ) -> Self {
        Self {
            project_id,
            kind: EventKind::TaskUpdate,
            task_id: Some(task_id),
            worker: Some(worker.to_string()),
            status: status.to_string(),
            error,
            occurred_at: chrono::Utc::now(),
        }
    }

    pub fn project_update(project_id: Uuid, status: &str, error: Option<String>) -> Self {
        Self {
            project_id,
            kind: EventKind::ProjectUpdate,
            task_id: None,
            worker: None,
            status: status.to_string(),
            error,
            occurred_at: chrono::Utc::now(),
        }
    }
}
