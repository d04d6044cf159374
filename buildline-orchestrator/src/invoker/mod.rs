//! Worker invoker port
//!
//! Synchronous-call wrapper around the external stage workers. Every
//! invocation carries an explicit deadline so a stuck worker cannot pin a
//! queue consumer indefinitely.

use std::time::Duration;

use async_trait::async_trait;

use buildline_core::dto::worker::{WorkerRequest, WorkerResponse};

pub mod http;
#[cfg(test)]
pub mod scripted;

/// Invocation error type
#[derive(Debug)]
pub enum InvokeError {
    Timeout,
    Transport(reqwest::Error),
    BadResponse(String),
}

#[async_trait]
pub trait WorkerInvoker: Send + Sync {
    async fn invoke(
        &self,
        worker: &str,
        request: &WorkerRequest,
        deadline: Duration,
    ) -> Result<WorkerResponse, InvokeError>;
}
