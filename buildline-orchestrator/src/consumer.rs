//! Dispatch consumer
//!
//! Polls the queue transport and feeds deliveries to the coordinator. A
//! handled delivery is acked; a failed one is left unacked so the transport
//! redelivers it after the visibility timeout.

use std::time::Duration;

use crate::queue::QueueTransport;
use crate::service::Services;

const RECEIVE_BATCH: usize = 10;

pub async fn run(services: Services, poll_interval: Duration) {
    tracing::info!("Starting dispatch consumer");

    loop {
        let batch = match services.queue.receive(RECEIVE_BATCH).await {
            Ok(batch) => batch,
            Err(err) => {
                tracing::error!("Failed to receive dispatches: {:?}", err);
                tokio::time::sleep(poll_interval).await;
                continue;
            }
        };

        if batch.is_empty() {
            tokio::time::sleep(poll_interval).await;
            continue;
        }

        for delivery in batch {
            match services.handle_dispatch(&delivery.message).await {
                Ok(()) => {
                    if let Err(err) = services.queue.ack(&delivery.receipt).await {
                        tracing::warn!(
                            "Failed to ack dispatch for project {}: {:?}",
                            delivery.message.project_id,
                            err
                        );
                    }
                }
                Err(err) => {
                    // Left unacked on purpose: the transport redelivers.
                    tracing::error!(
                        "Dispatch handling failed for project {} (worker {}): {:?}",
                        delivery.message.project_id,
                        delivery.message.worker,
                        err
                    );
                }
            }
        }
    }
}
