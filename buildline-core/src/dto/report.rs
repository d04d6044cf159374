//! Computed status report returned to read-path clients

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::project::ProjectStatus;

/// Normalized status/progress view over a project's task records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub project_id: Uuid,
    pub status: ProjectStatus,
    /// Overall completion, 0-100.
    pub progress: u8,
    /// The active task, or the failed one when the pipeline has failed.
    pub current_task: Option<TaskBrief>,
    /// Rough heuristic, not a committed SLA.
    pub estimated_completion: Option<chrono::DateTime<chrono::Utc>>,
    pub task_summary: TaskSummary,
}

/// Slim task view for client display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskBrief {
    pub task_id: Uuid,
    pub worker: String,
    pub progress: Option<u8>,
    pub error: Option<String>,
}

/// Counts of tasks by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub total: usize,
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
    pub failed: usize,
    pub pending_approval: usize,
}
