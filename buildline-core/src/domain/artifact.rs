//! Artifact domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An immutable deliverable produced by a worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub id: Uuid,
    pub project_id: Uuid,
    pub kind: ArtifactKind,
    /// Reference into external storage (object key, repo path, ...).
    pub location: String,
    pub version: i32,
    /// Worker that produced this artifact. Used to order artifacts by
    /// chain position when assembling a later stage's inputs.
    pub produced_by: String,
    pub metadata: Option<serde_json::Value>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// The fixed enumeration of deliverable kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    RequirementsDoc,
    BackendCode,
    FrontendCode,
    DeploymentConfig,
}
