//! Project API Handlers
//!
//! HTTP endpoints for project registration and pipeline control.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use buildline_core::domain::artifact::Artifact;
use buildline_core::domain::project::Project;
use buildline_core::domain::task::Task;
use buildline_core::dto::project::CreateProject;

use crate::api::error::{ApiError, ApiResult};
use crate::service::Services;
use crate::store::StateStore;

/// POST /project
/// Register a new project in pending state
pub async fn create_project(
    State(services): State<Services>,
    Json(req): Json<CreateProject>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    validate_create_project(&req)?;

    let project = Project::new(req.owner_id, req.name, req.description);
    services.store.insert_project(&project).await?;

    tracing::info!("Project created: {} ({})", project.name, project.id);

    Ok((StatusCode::CREATED, Json(project)))
}

/// POST /project/{id}/start
/// Start the pipeline for a pending project
pub async fn start_pipeline(
    State(services): State<Services>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Task>>> {
    tracing::info!("Starting pipeline for project: {}", id);

    let tasks = services.start_pipeline(id).await?;

    Ok(Json(tasks))
}

/// GET /project/{id}
/// Get project details by ID
pub async fn get_project(
    State(services): State<Services>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    tracing::debug!("Getting project: {}", id);

    let project = services
        .store
        .get_project(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Project {} not found", id)))?;

    Ok(Json(project))
}

/// GET /project/{id}/tasks
/// List a project's tasks in chain order
pub async fn list_project_tasks(
    State(services): State<Services>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Task>>> {
    tracing::debug!("Listing tasks for project: {}", id);

    services
        .store
        .get_project(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Project {} not found", id)))?;

    let mut tasks = services.store.list_tasks(id).await?;
    tasks.sort_by_key(|t| services.chain.position(&t.worker).unwrap_or(usize::MAX));

    Ok(Json(tasks))
}

/// GET /project/{id}/artifacts
/// List a project's artifacts
pub async fn list_project_artifacts(
    State(services): State<Services>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Artifact>>> {
    tracing::debug!("Listing artifacts for project: {}", id);

    services
        .store
        .get_project(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Project {} not found", id)))?;

    let artifacts = services.store.list_artifacts(id).await?;

    Ok(Json(artifacts))
}

/// POST /project/{id}/task/{task_id}/approve
/// Approve a stage paused in pending_approval
pub async fn approve_task(
    State(services): State<Services>,
    Path((id, task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Task>> {
    tracing::info!("Approving task {} for project {}", task_id, id);

    let task = services.approve_task(id, task_id).await?;

    Ok(Json(task))
}

// =============================================================================
// Validation
// =============================================================================

fn validate_create_project(req: &CreateProject) -> Result<(), ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Project name cannot be empty".to_string(),
        ));
    }

    if req.name.len() > 255 {
        return Err(ApiError::BadRequest(
            "Project name is too long (max 255 characters)".to_string(),
        ));
    }

    if req.description.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Project description cannot be empty".to_string(),
        ));
    }

    Ok(())
}
