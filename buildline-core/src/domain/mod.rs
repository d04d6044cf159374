//! Domain types shared between the orchestrator and its clients

pub mod artifact;
pub mod project;
pub mod task;
