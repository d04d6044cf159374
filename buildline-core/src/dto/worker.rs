//! Worker invocation DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::artifact::{Artifact, ArtifactKind};
use crate::domain::project::Project;

/// Payload handed to a worker for one stage.
///
/// `previous_artifacts` holds everything produced by strictly earlier chain
/// stages, in chain order; workers never see downstream output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerRequest {
    pub project_id: Uuid,
    pub project: Project,
    pub task_id: Uuid,
    pub previous_artifacts: Vec<Artifact>,
}

/// What a worker hands back after one stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerResponse {
    pub success: bool,
    /// Set when the produced output requires an external sign-off before the
    /// pipeline may advance.
    #[serde(default)]
    pub needs_approval: bool,
    #[serde(default)]
    pub artifacts: Vec<ProducedArtifact>,
    pub error_message: Option<String>,
}

/// A not-yet-persisted artifact as reported by a worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProducedArtifact {
    pub kind: ArtifactKind,
    pub location: String,
    pub version: i32,
    pub metadata: Option<serde_json::Value>,
}
