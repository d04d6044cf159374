//! Postgres-backed dispatch queue
//!
//! One row per queued dispatch. Delivery hides the row behind `visible_at`
//! for the visibility timeout; ack deletes it; a crashed consumer's rows
//! surface again once the timeout lapses. The unique dedup key collapses
//! retries of the same logical dispatch while it is queued.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use buildline_core::dto::dispatch::DispatchMessage;

use super::{Delivery, QueueError, QueueTransport};

pub struct PgQueue {
    pool: PgPool,
    visibility_timeout: Duration,
}

impl PgQueue {
    pub fn new(pool: PgPool, visibility_timeout: Duration) -> Self {
        Self {
            pool,
            visibility_timeout,
        }
    }
}

#[async_trait]
impl QueueTransport for PgQueue {
    async fn send(&self, message: &DispatchMessage) -> Result<(), QueueError> {
        let body = serde_json::to_value(message)
            .map_err(|e| QueueError::Corrupt(format!("unencodable dispatch: {e}")))?;
        let now = chrono::Utc::now();

        sqlx::query(
            r#"
            INSERT INTO dispatch_queue (partition_key, dedup_key, body, enqueued_at, visible_at)
            VALUES ($1, $2, $3, $4, $4)
            ON CONFLICT (dedup_key) DO NOTHING
            "#,
        )
        .bind(message.partition_key())
        .bind(message.dedup_key())
        .bind(body)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn receive(&self, max: usize) -> Result<Vec<Delivery>, QueueError> {
        let now = chrono::Utc::now();
        let invisible_until = now
            + chrono::Duration::from_std(self.visibility_timeout)
                .unwrap_or_else(|_| chrono::Duration::seconds(600));

        // Oldest visible row per partition, skipping partitions that still
        // have a message in flight. Claimed rows are locked so concurrent
        // consumers cannot deliver the same row twice.
        let rows = sqlx::query_as::<_, QueueRow>(
            r#"
            UPDATE dispatch_queue
            SET visible_at = $1, receipt = gen_random_uuid()
            WHERE id IN (
                SELECT q.id
                FROM dispatch_queue q
                WHERE q.visible_at <= $2
                  AND NOT EXISTS (
                      SELECT 1 FROM dispatch_queue f
                      WHERE f.partition_key = q.partition_key AND f.visible_at > $2
                  )
                  AND q.id = (
                      SELECT min(s.id) FROM dispatch_queue s
                      WHERE s.partition_key = q.partition_key AND s.visible_at <= $2
                  )
                ORDER BY q.id
                LIMIT $3
                FOR UPDATE SKIP LOCKED
            )
            RETURNING receipt, body
            "#,
        )
        .bind(invisible_until)
        .bind(now)
        .bind(max as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let message = serde_json::from_value(row.body)
                    .map_err(|e| QueueError::Corrupt(format!("undecodable dispatch: {e}")))?;
                Ok(Delivery {
                    receipt: row
                        .receipt
                        .map(|r| r.to_string())
                        .unwrap_or_default(),
                    message,
                })
            })
            .collect()
    }

    async fn ack(&self, receipt: &str) -> Result<(), QueueError> {
        let receipt: Uuid = receipt
            .parse()
            .map_err(|_| QueueError::Corrupt(format!("malformed receipt: {receipt}")))?;

        sqlx::query("DELETE FROM dispatch_queue WHERE receipt = $1")
            .bind(receipt)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct QueueRow {
    receipt: Option<Uuid>,
    body: serde_json::Value,
}
