//! DTOs for inter-service communication

pub mod dispatch;
pub mod event;
pub mod project;
pub mod report;
pub mod worker;
