//! API Error Handling
//!
//! Unified error types and conversion for API responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::service::OrchestrateError;
use crate::store::StoreError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    StoreError(StoreError),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::StoreError(err) => {
                tracing::error!("Store error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::StoreError(err)
    }
}

impl From<OrchestrateError> for ApiError {
    fn from(err: OrchestrateError) -> Self {
        match err {
            OrchestrateError::ProjectNotFound(id) => {
                ApiError::NotFound(format!("Project {} not found", id))
            }
            OrchestrateError::TaskNotFound(id) => {
                ApiError::NotFound(format!("Task {} not found", id))
            }
            OrchestrateError::InvalidState(msg) => ApiError::BadRequest(msg),
            OrchestrateError::Store(err) => ApiError::StoreError(err),
            OrchestrateError::Queue(err) => {
                tracing::error!("Queue error: {:?}", err);
                ApiError::InternalError("Failed to enqueue dispatch".to_string())
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
