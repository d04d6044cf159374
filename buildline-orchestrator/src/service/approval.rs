//! Approval handling
//!
//! A stage paused in PendingApproval resumes only through an explicit
//! external approval, which completes the task and advances the chain.

use uuid::Uuid;

use buildline_core::domain::task::{Task, TaskStatus};
use buildline_core::dto::event::PipelineEvent;

use crate::store::StateStore;

use super::{OrchestrateError, Services};

impl Services {
    /// Approve a paused stage, completing its task and advancing the chain.
    pub async fn approve_task(
        &self,
        project_id: Uuid,
        task_id: Uuid,
    ) -> Result<Task, OrchestrateError> {
        let project = self
            .store
            .get_project(project_id)
            .await?
            .ok_or(OrchestrateError::ProjectNotFound(project_id))?;

        let tasks = self.store.list_tasks(project_id).await?;
        let task = tasks
            .into_iter()
            .find(|t| t.id == task_id)
            .ok_or(OrchestrateError::TaskNotFound(task_id))?;

        if task.status != TaskStatus::PendingApproval {
            return Err(OrchestrateError::InvalidState(format!(
                "Task {} is not awaiting approval (current: {:?})",
                task_id, task.status
            )));
        }

        let mut task = task;
        task.status = TaskStatus::Done;
        task.progress = Some(100);
        task.completed_at = Some(chrono::Utc::now());
        self.store.update_task(&task).await?;

        self.publish(PipelineEvent::task_update(
            project_id,
            task.id,
            &task.worker,
            TaskStatus::Done.as_str(),
            None,
        ))
        .await;

        tracing::info!(
            "Stage {} for project {} approved",
            task.worker,
            project_id
        );

        self.advance_pipeline(&project, &task).await?;

        Ok(task)
    }
}
