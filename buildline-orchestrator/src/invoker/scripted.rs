//! Scripted worker invoker used by the service-layer tests.
//!
//! Each worker name maps to a fixed outcome; every request is recorded so
//! tests can assert on what a stage was given.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use buildline_core::dto::worker::{ProducedArtifact, WorkerRequest, WorkerResponse};

use super::{InvokeError, WorkerInvoker};

/// What the scripted invoker should do for one worker.
#[derive(Clone)]
pub enum Outcome {
    Succeed(Vec<ProducedArtifact>),
    SucceedNeedingApproval(Vec<ProducedArtifact>),
    Fail(String),
    Break,
}

#[derive(Default)]
pub struct ScriptedInvoker {
    outcomes: HashMap<String, Outcome>,
    requests: Mutex<Vec<(String, WorkerRequest)>>,
}

impl ScriptedInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcome(mut self, worker: &str, outcome: Outcome) -> Self {
        self.outcomes.insert(worker.to_string(), outcome);
        self
    }

    /// Every (worker, request) pair seen, in invocation order.
    pub fn requests(&self) -> Vec<(String, WorkerRequest)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl WorkerInvoker for ScriptedInvoker {
    async fn invoke(
        &self,
        worker: &str,
        request: &WorkerRequest,
        _deadline: Duration,
    ) -> Result<WorkerResponse, InvokeError> {
        self.requests
            .lock()
            .unwrap()
            .push((worker.to_string(), request.clone()));

        match self.outcomes.get(worker).cloned() {
            Some(Outcome::Succeed(artifacts)) => Ok(WorkerResponse {
                success: true,
                needs_approval: false,
                artifacts,
                error_message: None,
            }),
            Some(Outcome::SucceedNeedingApproval(artifacts)) => Ok(WorkerResponse {
                success: true,
                needs_approval: true,
                artifacts,
                error_message: None,
            }),
            Some(Outcome::Fail(message)) => Ok(WorkerResponse {
                success: false,
                needs_approval: false,
                artifacts: Vec::new(),
                error_message: Some(message),
            }),
            Some(Outcome::Break) | None => Err(InvokeError::Timeout),
        }
    }
}
