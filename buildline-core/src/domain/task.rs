//! Task domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One pipeline stage's unit of work for a project.
///
/// Exactly one task exists per worker per project; all tasks for a project
/// are seeded as a batch before the first stage is dispatched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    /// Name of the worker this task is assigned to.
    pub worker: String,
    pub status: TaskStatus,
    /// Upstream task ids. Empty in the fixed linear chain; modeled for
    /// future branching pipelines.
    pub depends_on: Vec<Uuid>,
    pub output_artifact_id: Option<Uuid>,
    /// Worker-reported sub-progress, 0-100.
    pub progress: Option<u8>,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub error: Option<String>,
}

/// Task execution status
///
/// Transitions: Todo -> InProgress -> {Done | Failed}. PendingApproval is a
/// pause state reachable from InProgress, resumed by an external approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
    Failed,
    PendingApproval,
}

impl TaskStatus {
    /// Wire/storage string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
            TaskStatus::Failed => "failed",
            TaskStatus::PendingApproval => "pending_approval",
        }
    }
}

impl Task {
    /// A fresh Todo task for a worker, as seeded by the pipeline entry point.
    pub fn seed(project_id: Uuid, worker: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            worker: worker.to_string(),
            status: TaskStatus::Todo,
            depends_on: Vec::new(),
            output_artifact_id: None,
            progress: None,
            started_at: None,
            completed_at: None,
            error: None,
        }
    }
}
