//! Notification fan-out port
//!
//! Best-effort pub/sub of pipeline events. Publish failures are never allowed
//! to fail a state transition; the service layer logs and swallows them.

use async_trait::async_trait;

use buildline_core::dto::event::PipelineEvent;

pub mod log;
#[cfg(test)]
pub mod memory;
pub mod webhook;

/// Notification error type
#[derive(Debug)]
pub enum NotifyError {
    Http(reqwest::Error),
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        NotifyError::Http(err)
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(&self, event: &PipelineEvent) -> Result<(), NotifyError>;
}
