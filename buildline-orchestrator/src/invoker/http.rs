//! HTTP worker invoker
//!
//! Posts the stage payload to `{base}/workers/{name}/invoke` and decodes the
//! worker's response. The deadline becomes the per-request timeout.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use buildline_core::dto::worker::{WorkerRequest, WorkerResponse};

use super::{InvokeError, WorkerInvoker};

pub struct HttpWorkerInvoker {
    base_url: String,
    client: Client,
}

impl HttpWorkerInvoker {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl WorkerInvoker for HttpWorkerInvoker {
    async fn invoke(
        &self,
        worker: &str,
        request: &WorkerRequest,
        deadline: Duration,
    ) -> Result<WorkerResponse, InvokeError> {
        let url = format!("{}/workers/{}/invoke", self.base_url, worker);

        let response = self
            .client
            .post(&url)
            .timeout(deadline)
            .json(request)
            .send()
            .await
            .map_err(classify)?;

        let response = response.error_for_status().map_err(classify)?;

        response
            .json::<WorkerResponse>()
            .await
            .map_err(|e| InvokeError::BadResponse(format!("undecodable worker response: {e}")))
    }
}

fn classify(err: reqwest::Error) -> InvokeError {
    if err.is_timeout() {
        InvokeError::Timeout
    } else {
        InvokeError::Transport(err)
    }
}
