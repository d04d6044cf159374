//! Webhook notifier
//!
//! POSTs each pipeline event as JSON to a configured endpoint.

use async_trait::async_trait;
use reqwest::Client;

use buildline_core::dto::event::PipelineEvent;

use super::{Notifier, NotifyError};

pub struct WebhookNotifier {
    url: String,
    client: Client,
}

impl WebhookNotifier {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn publish(&self, event: &PipelineEvent) -> Result<(), NotifyError> {
        self.client
            .post(&self.url)
            .json(event)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
