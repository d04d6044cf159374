//! In-memory state store used by the service-layer tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use buildline_core::domain::artifact::Artifact;
use buildline_core::domain::project::{Project, ProjectStatus};
use buildline_core::domain::task::Task;

use super::{StateStore, StoreError};

#[derive(Default)]
struct Inner {
    projects: HashMap<Uuid, Project>,
    tasks: HashMap<Uuid, Task>,
    artifacts: Vec<Artifact>,
    fail_task_updates: bool,
}

#[derive(Default)]
pub struct MemoryStateStore {
    inner: Mutex<Inner>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make task writes fail, simulating a database outage mid-dispatch.
    pub fn fail_task_updates(&self, fail: bool) {
        self.inner.lock().unwrap().fail_task_updates = fail;
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn insert_project(&self, project: &Project) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.projects.insert(project.id, project.clone());
        Ok(())
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.projects.get(&id).cloned())
    }

    async fn update_project_status(
        &self,
        id: Uuid,
        status: ProjectStatus,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(project) = inner.projects.get_mut(&id) {
            project.status = status;
            project.updated_at = chrono::Utc::now();
        }
        Ok(())
    }

    async fn seed_tasks(&self, project_id: Uuid, tasks: &[Task]) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.projects.get_mut(&project_id) {
            Some(project) if project.status == ProjectStatus::Pending => {
                project.status = ProjectStatus::InProgress;
                project.updated_at = chrono::Utc::now();
            }
            _ => return Ok(false),
        }
        for task in tasks {
            inner.tasks.insert(task.id, task.clone());
        }
        Ok(true)
    }

    async fn list_tasks(&self, project_id: Uuid) -> Result<Vec<Task>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .tasks
            .values()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn update_task(&self, task: &Task) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_task_updates {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        inner.tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn insert_artifact(&self, artifact: &Artifact) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.artifacts.push(artifact.clone());
        Ok(())
    }

    async fn list_artifacts(&self, project_id: Uuid) -> Result<Vec<Artifact>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .artifacts
            .iter()
            .filter(|a| a.project_id == project_id)
            .cloned()
            .collect())
    }
}
