//! Postgres state store
//!
//! Handles all database operations for projects, tasks, and artifacts.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use buildline_core::domain::artifact::{Artifact, ArtifactKind};
use buildline_core::domain::project::{Project, ProjectStatus};
use buildline_core::domain::task::{Task, TaskStatus};

use super::{StateStore, StoreError};

pub struct PgStateStore {
    pool: PgPool,
}

impl PgStateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StateStore for PgStateStore {
    async fn insert_project(&self, project: &Project) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO projects (id, owner_id, name, description, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(project.id)
        .bind(&project.owner_id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.status.as_str())
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT id, owner_id, name, description, status, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Project::try_from).transpose()
    }

    async fn update_project_status(
        &self,
        id: Uuid,
        status: ProjectStatus,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE projects
            SET status = $1, updated_at = $2
            WHERE id = $3
            "#,
        )
        .bind(status.as_str())
        .bind(chrono::Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn seed_tasks(&self, project_id: Uuid, tasks: &[Task]) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Conditional flip guards against a concurrent start of the same
        // project; losing the race leaves the store untouched.
        let flipped = sqlx::query(
            r#"
            UPDATE projects
            SET status = $1, updated_at = $2
            WHERE id = $3 AND status = $4
            "#,
        )
        .bind(ProjectStatus::InProgress.as_str())
        .bind(chrono::Utc::now())
        .bind(project_id)
        .bind(ProjectStatus::Pending.as_str())
        .execute(&mut *tx)
        .await?;

        if flipped.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        for task in tasks {
            sqlx::query(
                r#"
                INSERT INTO tasks (id, project_id, worker, status, depends_on, output_artifact_id,
                                   progress, started_at, completed_at, error)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(task.id)
            .bind(task.project_id)
            .bind(&task.worker)
            .bind(task.status.as_str())
            .bind(serde_json::to_value(&task.depends_on).unwrap_or_default())
            .bind(task.output_artifact_id)
            .bind(task.progress.map(i16::from))
            .bind(task.started_at)
            .bind(task.completed_at)
            .bind(&task.error)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn list_tasks(&self, project_id: Uuid) -> Result<Vec<Task>, StoreError> {
        let rows = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, project_id, worker, status, depends_on, output_artifact_id,
                   progress, started_at, completed_at, error
            FROM tasks
            WHERE project_id = $1
            ORDER BY id
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Task::try_from).collect()
    }

    async fn update_task(&self, task: &Task) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE tasks
            SET status = $1, output_artifact_id = $2, progress = $3,
                started_at = $4, completed_at = $5, error = $6
            WHERE id = $7
            "#,
        )
        .bind(task.status.as_str())
        .bind(task.output_artifact_id)
        .bind(task.progress.map(i16::from))
        .bind(task.started_at)
        .bind(task.completed_at)
        .bind(&task.error)
        .bind(task.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_artifact(&self, artifact: &Artifact) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO artifacts (id, project_id, kind, location, version, produced_by,
                                   metadata, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(artifact.id)
        .bind(artifact.project_id)
        .bind(kind_to_string(artifact.kind))
        .bind(&artifact.location)
        .bind(artifact.version)
        .bind(&artifact.produced_by)
        .bind(&artifact.metadata)
        .bind(artifact.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_artifacts(&self, project_id: Uuid) -> Result<Vec<Artifact>, StoreError> {
        let rows = sqlx::query_as::<_, ArtifactRow>(
            r#"
            SELECT id, project_id, kind, location, version, produced_by, metadata, created_at
            FROM artifacts
            WHERE project_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Artifact::try_from).collect()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn string_to_project_status(s: &str) -> Result<ProjectStatus, StoreError> {
    match s {
        "pending" => Ok(ProjectStatus::Pending),
        "in_progress" => Ok(ProjectStatus::InProgress),
        "completed" => Ok(ProjectStatus::Completed),
        "failed" => Ok(ProjectStatus::Failed),
        other => Err(StoreError::Corrupt(format!(
            "unknown project status: {other}"
        ))),
    }
}

fn string_to_task_status(s: &str) -> Result<TaskStatus, StoreError> {
    match s {
        "todo" => Ok(TaskStatus::Todo),
        "in_progress" => Ok(TaskStatus::InProgress),
        "done" => Ok(TaskStatus::Done),
        "failed" => Ok(TaskStatus::Failed),
        "pending_approval" => Ok(TaskStatus::PendingApproval),
        other => Err(StoreError::Corrupt(format!("unknown task status: {other}"))),
    }
}

fn kind_to_string(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::RequirementsDoc => "requirements_doc",
        ArtifactKind::BackendCode => "backend_code",
        ArtifactKind::FrontendCode => "frontend_code",
        ArtifactKind::DeploymentConfig => "deployment_config",
    }
}

fn string_to_kind(s: &str) -> Result<ArtifactKind, StoreError> {
    match s {
        "requirements_doc" => Ok(ArtifactKind::RequirementsDoc),
        "backend_code" => Ok(ArtifactKind::BackendCode),
        "frontend_code" => Ok(ArtifactKind::FrontendCode),
        "deployment_config" => Ok(ArtifactKind::DeploymentConfig),
        other => Err(StoreError::Corrupt(format!(
            "unknown artifact kind: {other}"
        ))),
    }
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: Uuid,
    owner_id: String,
    name: String,
    description: String,
    status: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = StoreError;

    fn try_from(row: ProjectRow) -> Result<Self, StoreError> {
        Ok(Project {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            description: row.description,
            status: string_to_project_status(&row.status)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: Uuid,
    project_id: Uuid,
    worker: String,
    status: String,
    depends_on: serde_json::Value,
    output_artifact_id: Option<Uuid>,
    progress: Option<i16>,
    started_at: Option<chrono::DateTime<chrono::Utc>>,
    completed_at: Option<chrono::DateTime<chrono::Utc>>,
    error: Option<String>,
}

impl TryFrom<TaskRow> for Task {
    type Error = StoreError;

    fn try_from(row: TaskRow) -> Result<Self, StoreError> {
        Ok(Task {
            id: row.id,
            project_id: row.project_id,
            worker: row.worker,
            status: string_to_task_status(&row.status)?,
            depends_on: serde_json::from_value(row.depends_on).unwrap_or_default(),
            output_artifact_id: row.output_artifact_id,
            progress: row.progress.map(|p| p.clamp(0, 100) as u8),
            started_at: row.started_at,
            completed_at: row.completed_at,
            error: row.error,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ArtifactRow {
    id: Uuid,
    project_id: Uuid,
    kind: String,
    location: String,
    version: i32,
    produced_by: String,
    metadata: Option<serde_json::Value>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<ArtifactRow> for Artifact {
    type Error = StoreError;

    fn try_from(row: ArtifactRow) -> Result<Self, StoreError> {
        Ok(Artifact {
            id: row.id,
            project_id: row.project_id,
            kind: string_to_kind(&row.kind)?,
            location: row.location,
            version: row.version,
            produced_by: row.produced_by,
            metadata: row.metadata,
            created_at: row.created_at,
        })
    }
}
