//! Dispatch message: the queue payload that triggers one stage

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One stage's trigger on the queue transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchMessage {
    pub project_id: Uuid,
    pub worker: String,
}

impl DispatchMessage {
    pub fn new(project_id: Uuid, worker: &str) -> Self {
        Self {
            project_id,
            worker: worker.to_string(),
        }
    }

    /// Partition key preserving per-project ordering on the transport.
    pub fn partition_key(&self) -> String {
        self.project_id.to_string()
    }

    /// Deduplication key. Derived purely from (project, worker) so retries
    /// of the same logical dispatch collapse; no timestamp component.
    pub fn dedup_key(&self) -> String {
        format!("{}:{}", self.project_id, self.worker)
    }
}
