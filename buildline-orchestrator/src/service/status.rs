//! Status aggregation service
//!
//! Wraps the pure status math from `buildline_core::status` and performs lazy
//! reconciliation: at most one corrective status write per read, only when the
//! derived status disagrees with the stored one.

use uuid::Uuid;

use buildline_core::dto::report::StatusReport;
use buildline_core::status;

use crate::store::StateStore;

use super::{OrchestrateError, Services};

impl Services {
    /// Compute the normalized status/progress view for a project.
    pub async fn project_status(
        &self,
        project_id: Uuid,
    ) -> Result<StatusReport, OrchestrateError> {
        let project = self
            .store
            .get_project(project_id)
            .await?
            .ok_or(OrchestrateError::ProjectNotFound(project_id))?;

        let tasks = self.store.list_tasks(project_id).await?;

        let report = status::compute(&project, &tasks, chrono::Utc::now(), self.per_task_minutes);

        // Lazy reconciliation. Never triggered for a project with no tasks,
        // and never more than once per read.
        if !tasks.is_empty() && report.status != project.status {
            tracing::debug!(
                "Reconciling project {} status: {:?} -> {:?}",
                project_id,
                project.status,
                report.status
            );
            self.store
                .update_project_status(project_id, report.status)
                .await?;
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use buildline_core::domain::project::ProjectStatus;
    use buildline_core::domain::task::{Task, TaskStatus};
    use uuid::Uuid;

    use crate::invoker::scripted::{Outcome, ScriptedInvoker};
    use crate::service::OrchestrateError;
    use crate::service::testkit::{artifact_for, drain, fixture, pending_project};
    use crate::store::StateStore;

    #[tokio::test]
    async fn test_status_for_missing_project_is_not_found() {
        let fx = fixture(ScriptedInvoker::new());
        let result = fx.services.project_status(Uuid::new_v4()).await;
        assert!(matches!(
            result,
            Err(OrchestrateError::ProjectNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_completed_pipeline_reports_full_progress() {
        let mut invoker = ScriptedInvoker::new();
        for worker in ["requirements", "backend", "frontend", "deployment"] {
            invoker = invoker.with_outcome(worker, Outcome::Succeed(vec![artifact_for(worker)]));
        }
        let fx = fixture(invoker);
        let project = pending_project(&fx.store).await;
        fx.services.start_pipeline(project.id).await.unwrap();
        drain(&fx).await;

        let report = fx.services.project_status(project.id).await.unwrap();
        assert_eq!(report.status, ProjectStatus::Completed);
        assert_eq!(report.progress, 100);
        assert_eq!(report.task_summary.done, 4);
    }

    #[tokio::test]
    async fn test_status_read_is_idempotent() {
        let fx = fixture(ScriptedInvoker::new());
        let project = pending_project(&fx.store).await;
        fx.services.start_pipeline(project.id).await.unwrap();

        let first = fx.services.project_status(project.id).await.unwrap();
        let second = fx.services.project_status(project.id).await.unwrap();
        assert_eq!(first.status, second.status);
        assert_eq!(first.progress, second.progress);
        assert_eq!(first.task_summary, second.task_summary);
    }

    #[tokio::test]
    async fn test_read_reconciles_stale_stored_status() {
        let fx = fixture(ScriptedInvoker::new());
        let project = pending_project(&fx.store).await;
        fx.services.start_pipeline(project.id).await.unwrap();

        // Force task state ahead of the stored project status.
        let tasks = fx.store.list_tasks(project.id).await.unwrap();
        for task in &tasks {
            let mut done: Task = task.clone();
            done.status = TaskStatus::Done;
            done.progress = Some(100);
            fx.store.update_task(&done).await.unwrap();
        }

        let report = fx.services.project_status(project.id).await.unwrap();
        assert_eq!(report.status, ProjectStatus::Completed);

        let stored = fx.store.get_project(project.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ProjectStatus::Completed);
    }
}
