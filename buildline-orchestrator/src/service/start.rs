//! Pipeline entry point
//!
//! Seeds the task batch for a pending project and dispatches the first stage.

use uuid::Uuid;

use buildline_core::domain::project::ProjectStatus;
use buildline_core::domain::task::Task;
use buildline_core::dto::dispatch::DispatchMessage;

use crate::queue::QueueTransport;
use crate::store::StateStore;

use super::{OrchestrateError, Services};

impl Services {
    /// Start a pipeline run for a pending project.
    ///
    /// Creates one Todo task per chain worker as an atomic batch (together
    /// with the Pending -> InProgress flip), then enqueues the first stage.
    /// A project that is missing or not Pending is rejected with no mutation.
    pub async fn start_pipeline(&self, project_id: Uuid) -> Result<Vec<Task>, OrchestrateError> {
        let project = self
            .store
            .get_project(project_id)
            .await?
            .ok_or(OrchestrateError::ProjectNotFound(project_id))?;

        if project.status != ProjectStatus::Pending {
            return Err(OrchestrateError::InvalidState(format!(
                "Project {} is not in pending state (current: {:?})",
                project_id, project.status
            )));
        }

        let first = self
            .chain
            .first()
            .ok_or_else(|| OrchestrateError::InvalidState("Stage chain is empty".to_string()))?;

        let tasks: Vec<Task> = self
            .chain
            .workers()
            .iter()
            .map(|worker| Task::seed(project_id, worker))
            .collect();

        // The store rejects the batch if the project slipped out of Pending
        // between the check above and the write.
        if !self.store.seed_tasks(project_id, &tasks).await? {
            return Err(OrchestrateError::InvalidState(format!(
                "Project {} was started concurrently",
                project_id
            )));
        }

        self.queue
            .send(&DispatchMessage::new(project_id, first))
            .await?;

        tracing::info!(
            "Pipeline started for project {}: {} stages, first worker {}",
            project_id,
            self.chain.len(),
            first
        );

        Ok(tasks)
    }
}
