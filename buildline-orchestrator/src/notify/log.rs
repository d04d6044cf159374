//! Log-only notifier, the default when no webhook is configured.

use async_trait::async_trait;

use buildline_core::dto::event::PipelineEvent;

use super::{Notifier, NotifyError};

pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn publish(&self, event: &PipelineEvent) -> Result<(), NotifyError> {
        tracing::info!(
            "Pipeline event: {:?} project={} status={}",
            event.kind,
            event.project_id,
            event.status
        );
        Ok(())
    }
}
