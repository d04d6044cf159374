//! Buildline Core
//!
//! Core types and abstractions for the Buildline pipeline system.
//!
//! This crate contains:
//! - Domain types: Core business entities (Project, Task, Artifact)
//! - DTOs: Data transfer objects for inter-service communication
//! - The stage chain: the fixed ordered list of pipeline workers
//! - Status aggregation: pure progress/status math over task records

pub mod chain;
pub mod domain;
pub mod dto;
pub mod status;
