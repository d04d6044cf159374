//! Queue transport port
//!
//! At-least-once dispatch delivery with per-project ordering (partition key =
//! project id) and consumer-side deduplication over the messages currently
//! queued. A received delivery must be acked; unacked deliveries become
//! visible again after the visibility timeout.

use async_trait::async_trait;

use buildline_core::dto::dispatch::DispatchMessage;

#[cfg(test)]
pub mod memory;
pub mod postgres;

/// Queue error type
#[derive(Debug)]
pub enum QueueError {
    Database(sqlx::Error),
    Corrupt(String),
}

impl From<sqlx::Error> for QueueError {
    fn from(err: sqlx::Error) -> Self {
        QueueError::Database(err)
    }
}

/// One received message plus the receipt needed to ack it.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub receipt: String,
    pub message: DispatchMessage,
}

#[async_trait]
pub trait QueueTransport: Send + Sync {
    /// Enqueue a dispatch. A message whose dedup key is already queued is
    /// silently collapsed into the existing one.
    async fn send(&self, message: &DispatchMessage) -> Result<(), QueueError>;

    /// Receive up to `max` messages, at most one in flight per partition so
    /// per-project ordering holds.
    async fn receive(&self, max: usize) -> Result<Vec<Delivery>, QueueError>;

    async fn ack(&self, receipt: &str) -> Result<(), QueueError>;
}
