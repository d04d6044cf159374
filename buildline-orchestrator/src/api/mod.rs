//! API Module
//!
//! HTTP API layer for the orchestrator.
//! Each submodule handles endpoints for a specific domain.

pub mod error;
pub mod health;
pub mod project;
pub mod status;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::service::Services;

/// Create the main API router with all endpoints
pub fn create_router(services: Services) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Project endpoints
        .route("/project", post(project::create_project))
        .route("/project/{id}", get(project::get_project))
        .route("/project/{id}/start", post(project::start_pipeline))
        .route("/project/{id}/tasks", get(project::list_project_tasks))
        .route(
            "/project/{id}/artifacts",
            get(project::list_project_artifacts),
        )
        .route("/project/{id}/status", get(status::get_project_status))
        .route(
            "/project/{id}/task/{task_id}/approve",
            post(project::approve_task),
        )
        // Add state and middleware
        .with_state(services)
        .layer(TraceLayer::new_for_http())
}
