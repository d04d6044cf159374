//! In-memory dispatch queue used by the service-layer tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use buildline_core::dto::dispatch::DispatchMessage;

use super::{Delivery, QueueError, QueueTransport};

#[derive(Default)]
struct Inner {
    queued: VecDeque<DispatchMessage>,
    dedup: HashSet<String>,
    in_flight: HashMap<String, DispatchMessage>,
}

#[derive(Default)]
pub struct MemoryQueue {
    inner: Mutex<Inner>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages waiting for delivery (assertion helper).
    pub fn queued_len(&self) -> usize {
        self.inner.lock().unwrap().queued.len()
    }

    /// Delivered but not yet acked (assertion helper).
    pub fn in_flight_len(&self) -> usize {
        self.inner.lock().unwrap().in_flight.len()
    }

    /// Lapse the visibility timeout: every unacked delivery goes back to the
    /// queue and will be delivered again with a fresh receipt.
    pub fn redeliver_in_flight(&self) {
        let mut inner = self.inner.lock().unwrap();
        let messages: Vec<DispatchMessage> = inner.in_flight.drain().map(|(_, m)| m).collect();
        for message in messages {
            if inner.dedup.insert(message.dedup_key()) {
                inner.queued.push_back(message);
            }
        }
    }
}

#[async_trait]
impl QueueTransport for MemoryQueue {
    async fn send(&self, message: &DispatchMessage) -> Result<(), QueueError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.dedup.insert(message.dedup_key()) {
            inner.queued.push_back(message.clone());
        }
        Ok(())
    }

    async fn receive(&self, max: usize) -> Result<Vec<Delivery>, QueueError> {
        let mut inner = self.inner.lock().unwrap();
        let mut deliveries = Vec::new();
        while deliveries.len() < max {
            let Some(message) = inner.queued.pop_front() else {
                break;
            };
            // Dedup only covers messages still waiting for delivery.
            inner.dedup.remove(&message.dedup_key());
            let receipt = Uuid::new_v4().to_string();
            inner.in_flight.insert(receipt.clone(), message.clone());
            deliveries.push(Delivery { receipt, message });
        }
        Ok(deliveries)
    }

    async fn ack(&self, receipt: &str) -> Result<(), QueueError> {
        let mut inner = self.inner.lock().unwrap();
        inner.in_flight.remove(receipt);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dedup_collapses_queued_duplicates() {
        let queue = MemoryQueue::new();
        let message = DispatchMessage::new(Uuid::new_v4(), "backend");

        queue.send(&message).await.unwrap();
        queue.send(&message).await.unwrap();
        assert_eq!(queue.queued_len(), 1);

        // Once delivered, the same logical dispatch may be queued again.
        let batch = queue.receive(10).await.unwrap();
        assert_eq!(batch.len(), 1);
        queue.send(&message).await.unwrap();
        assert_eq!(queue.queued_len(), 1);
    }

    #[tokio::test]
    async fn test_fifo_delivery_and_ack() {
        let queue = MemoryQueue::new();
        let project = Uuid::new_v4();
        queue
            .send(&DispatchMessage::new(project, "requirements"))
            .await
            .unwrap();
        queue
            .send(&DispatchMessage::new(project, "backend"))
            .await
            .unwrap();

        let batch = queue.receive(10).await.unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].message.worker, "requirements");
        assert_eq!(batch[1].message.worker, "backend");
        assert_eq!(queue.in_flight_len(), 2);

        for delivery in &batch {
            queue.ack(&delivery.receipt).await.unwrap();
        }
        assert_eq!(queue.in_flight_len(), 0);
    }

    #[tokio::test]
    async fn test_unacked_delivery_surfaces_after_visibility_lapse() {
        let queue = MemoryQueue::new();
        let message = DispatchMessage::new(Uuid::new_v4(), "backend");
        queue.send(&message).await.unwrap();

        // Delivered but never acked: invisible until the timeout lapses.
        let batch = queue.receive(10).await.unwrap();
        assert_eq!(batch.len(), 1);
        assert!(queue.receive(10).await.unwrap().is_empty());
        assert_eq!(queue.in_flight_len(), 1);

        queue.redeliver_in_flight();
        let batch = queue.receive(10).await.unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].message.worker, "backend");
    }
}
