//! State store port
//!
//! Narrow interface over the durable project/task/artifact store. The
//! coordinator, entry point, and aggregator only ever see this trait, so
//! tests substitute the in-memory implementation.

use async_trait::async_trait;
use uuid::Uuid;

use buildline_core::domain::artifact::Artifact;
use buildline_core::domain::project::{Project, ProjectStatus};
use buildline_core::domain::task::Task;

#[cfg(test)]
pub mod memory;
pub mod postgres;

/// Store error type
#[derive(Debug)]
pub enum StoreError {
    Database(sqlx::Error),
    Corrupt(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err)
    }
}

#[async_trait]
pub trait StateStore: Send + Sync {
    async fn insert_project(&self, project: &Project) -> Result<(), StoreError>;

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, StoreError>;

    async fn update_project_status(
        &self,
        id: Uuid,
        status: ProjectStatus,
    ) -> Result<(), StoreError>;

    /// Atomically insert the task batch and flip the project from Pending to
    /// InProgress. Returns false, with no mutation at all, if the project was
    /// not Pending at write time.
    async fn seed_tasks(&self, project_id: Uuid, tasks: &[Task]) -> Result<bool, StoreError>;

    async fn list_tasks(&self, project_id: Uuid) -> Result<Vec<Task>, StoreError>;

    async fn update_task(&self, task: &Task) -> Result<(), StoreError>;

    async fn insert_artifact(&self, artifact: &Artifact) -> Result<(), StoreError>;

    async fn list_artifacts(&self, project_id: Uuid) -> Result<Vec<Artifact>, StoreError>;
}
