//! Project DTOs

use serde::{Deserialize, Serialize};

/// Request to register a new project for the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    pub owner_id: String,
    pub name: String,
    pub description: String,
}
