//! Pipeline coordinator
//!
//! Handles one dispatch message: loads and validates project/task state,
//! invokes the stage worker, records the outcome, and advances the chain or
//! terminates the run.

use buildline_core::domain::artifact::Artifact;
use buildline_core::domain::project::{Project, ProjectStatus};
use buildline_core::domain::task::{Task, TaskStatus};
use buildline_core::dto::dispatch::DispatchMessage;
use buildline_core::dto::event::PipelineEvent;
use buildline_core::dto::worker::{WorkerRequest, WorkerResponse};

use crate::invoker::WorkerInvoker;
use crate::queue::QueueTransport;
use crate::store::StateStore;

use super::{OrchestrateError, Services};

impl Services {
    /// Handle one delivered dispatch message.
    ///
    /// Returns Ok for every handled outcome, including dropped messages and
    /// terminal worker failures; only store/queue errors propagate so the
    /// consumer leaves the message unacked for redelivery.
    pub async fn handle_dispatch(
        &self,
        message: &DispatchMessage,
    ) -> Result<(), OrchestrateError> {
        if !self.chain.contains(&message.worker) {
            tracing::warn!(
                "Dropping dispatch for worker {} not in the stage chain (project {})",
                message.worker,
                message.project_id
            );
            return Ok(());
        }

        let Some(project) = self.store.get_project(message.project_id).await? else {
            tracing::warn!(
                "Dropping dispatch for missing project {} (worker {})",
                message.project_id,
                message.worker
            );
            return Ok(());
        };

        let tasks = self.store.list_tasks(project.id).await?;
        let Some(task) = tasks.iter().find(|t| t.worker == message.worker) else {
            tracing::warn!(
                "Dropping misrouted dispatch: project {} has no task for worker {}",
                project.id,
                message.worker
            );
            return Ok(());
        };

        // Only a Todo task may run. Anything else means duplicate or
        // out-of-order delivery; the effect of redelivery is bounded to this
        // log line.
        if task.status != TaskStatus::Todo {
            tracing::info!(
                "Dropping dispatch for task {} (worker {}): already {:?}",
                task.id,
                task.worker,
                task.status
            );
            return Ok(());
        }

        // Written before invocation so a crash mid-invocation is observable
        // as a stage stuck in progress, not silently retried from Todo.
        let mut task = task.clone();
        task.status = TaskStatus::InProgress;
        task.started_at = Some(chrono::Utc::now());
        task.progress = Some(0);
        self.store.update_task(&task).await?;

        let previous_artifacts = self.prior_artifacts(project.id, &task.worker).await?;
        let request = WorkerRequest {
            project_id: project.id,
            project: project.clone(),
            task_id: task.id,
            previous_artifacts,
        };

        tracing::info!("Invoking worker {} for project {}", task.worker, project.id);

        match self
            .invoker
            .invoke(&task.worker, &request, self.worker_timeout)
            .await
        {
            Ok(response) if response.success => {
                self.complete_stage(&project, task, response).await
            }
            Ok(response) => {
                let message = response
                    .error_message
                    .unwrap_or_else(|| "worker reported failure".to_string());
                self.fail_stage(&project, task, message).await
            }
            Err(err) => {
                self.fail_stage(&project, task, format!("worker invocation failed: {:?}", err))
                    .await
            }
        }
    }

    /// Artifacts produced by stages strictly before `worker`, in chain order.
    async fn prior_artifacts(
        &self,
        project_id: uuid::Uuid,
        worker: &str,
    ) -> Result<Vec<Artifact>, OrchestrateError> {
        let position = self.chain.position(worker).unwrap_or(0);
        let mut artifacts: Vec<(usize, Artifact)> = Vec::new();
        for artifact in self.store.list_artifacts(project_id).await? {
            if let Some(p) = self.chain.position(&artifact.produced_by) {
                if p < position {
                    artifacts.push((p, artifact));
                }
            }
        }
        artifacts.sort_by_key(|(p, _)| *p);
        Ok(artifacts.into_iter().map(|(_, a)| a).collect())
    }

    async fn complete_stage(
        &self,
        project: &Project,
        mut task: Task,
        response: WorkerResponse,
    ) -> Result<(), OrchestrateError> {
        let now = chrono::Utc::now();

        for produced in &response.artifacts {
            let artifact = Artifact {
                id: uuid::Uuid::new_v4(),
                project_id: project.id,
                kind: produced.kind,
                location: produced.location.clone(),
                version: produced.version,
                produced_by: task.worker.clone(),
                metadata: produced.metadata.clone(),
                created_at: now,
            };
            self.store.insert_artifact(&artifact).await?;
            if task.output_artifact_id.is_none() {
                task.output_artifact_id = Some(artifact.id);
            }
        }

        if response.needs_approval {
            task.status = TaskStatus::PendingApproval;
            self.store.update_task(&task).await?;
            self.publish(PipelineEvent::task_update(
                project.id,
                task.id,
                &task.worker,
                TaskStatus::PendingApproval.as_str(),
                None,
            ))
            .await;
            tracing::info!(
                "Stage {} for project {} paused pending approval",
                task.worker,
                project.id
            );
            return Ok(());
        }

        task.status = TaskStatus::Done;
        task.progress = Some(100);
        task.completed_at = Some(now);
        self.store.update_task(&task).await?;

        self.publish(PipelineEvent::task_update(
            project.id,
            task.id,
            &task.worker,
            TaskStatus::Done.as_str(),
            None,
        ))
        .await;

        self.advance_pipeline(project, &task).await
    }

    /// Enqueue the next stage, or mark the project completed after the last.
    ///
    /// The next stage's message is only ever created here, after the current
    /// task and its artifacts are durably written, so later stages only see
    /// fully completed earlier stages.
    pub(crate) async fn advance_pipeline(
        &self,
        project: &Project,
        task: &Task,
    ) -> Result<(), OrchestrateError> {
        if let Some(next) = self.chain.next_after(&task.worker) {
            self.queue
                .send(&DispatchMessage::new(project.id, next))
                .await?;
            tracing::info!(
                "Project {} advanced: {} done, dispatching {}",
                project.id,
                task.worker,
                next
            );
        } else {
            self.store
                .update_project_status(project.id, ProjectStatus::Completed)
                .await?;
            self.publish(PipelineEvent::project_update(
                project.id,
                ProjectStatus::Completed.as_str(),
                None,
            ))
            .await;
            tracing::info!("Project {} completed", project.id);
        }
        Ok(())
    }

    /// Terminal failure: the stage and the whole project are marked failed.
    async fn fail_stage(
        &self,
        project: &Project,
        mut task: Task,
        message: String,
    ) -> Result<(), OrchestrateError> {
        tracing::error!(
            "Worker {} failed for project {}: {}",
            task.worker,
            project.id,
            message
        );

        task.status = TaskStatus::Failed;
        task.completed_at = Some(chrono::Utc::now());
        task.error = Some(message.clone());
        self.store.update_task(&task).await?;

        self.store
            .update_project_status(project.id, ProjectStatus::Failed)
            .await?;

        self.publish(PipelineEvent::task_update(
            project.id,
            task.id,
            &task.worker,
            TaskStatus::Failed.as_str(),
            Some(message.clone()),
        ))
        .await;
        self.publish(PipelineEvent::project_update(
            project.id,
            ProjectStatus::Failed.as_str(),
            Some(message),
        ))
        .await;

        Ok(())
    }
}
