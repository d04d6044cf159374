//! Recording notifier used by the service-layer tests.

use std::sync::Mutex;

use async_trait::async_trait;

use buildline_core::dto::event::PipelineEvent;

use super::{Notifier, NotifyError};

#[derive(Default)]
pub struct MemoryNotifier {
    events: Mutex<Vec<PipelineEvent>>,
    fail: Mutex<bool>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Make publishes fail, simulating an unreachable webhook endpoint.
    pub fn fail_publishes(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn publish(&self, event: &PipelineEvent) -> Result<(), NotifyError> {
        if *self.fail.lock().unwrap() {
            // reqwest has no public error constructor; an invalid URL
            // produces one synchronously.
            let err = reqwest::Client::new().get("not a url").build().unwrap_err();
            return Err(NotifyError::Http(err));
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}
