//! Status API Handler
//!
//! Read-path endpoint for the computed status/progress view.

use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use buildline_core::dto::report::StatusReport;

use crate::api::error::ApiResult;
use crate::service::Services;

/// GET /project/{id}/status
/// Get the computed status report for a project
pub async fn get_project_status(
    State(services): State<Services>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<StatusReport>> {
    tracing::debug!("Computing status for project: {}", id);

    let report = services.project_status(id).await?;

    Ok(Json(report))
}
