//! Service layer
//!
//! Business logic for the pipeline: the entry point that seeds a run, the
//! coordinator that handles dispatches, the status aggregator, and approval
//! handling. All collaborators are injected as ports so tests run against
//! in-memory implementations.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use buildline_core::chain::StageChain;
use buildline_core::dto::event::PipelineEvent;

use crate::invoker::WorkerInvoker;
use crate::notify::Notifier;
use crate::queue::{QueueError, QueueTransport};
use crate::store::{StateStore, StoreError};

pub mod approval;
pub mod coordinator;
pub mod start;
pub mod status;

/// Service error type
#[derive(Debug)]
pub enum OrchestrateError {
    ProjectNotFound(Uuid),
    TaskNotFound(Uuid),
    InvalidState(String),
    Store(StoreError),
    Queue(QueueError),
}

impl From<StoreError> for OrchestrateError {
    fn from(err: StoreError) -> Self {
        OrchestrateError::Store(err)
    }
}

impl From<QueueError> for OrchestrateError {
    fn from(err: QueueError) -> Self {
        OrchestrateError::Queue(err)
    }
}

/// Shared handle to the orchestration services and their collaborators.
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn StateStore>,
    pub queue: Arc<dyn QueueTransport>,
    pub notifier: Arc<dyn Notifier>,
    pub invoker: Arc<dyn WorkerInvoker>,
    pub chain: StageChain,
    pub per_task_minutes: i64,
    pub worker_timeout: Duration,
}

impl Services {
    pub fn new(
        store: Arc<dyn StateStore>,
        queue: Arc<dyn QueueTransport>,
        notifier: Arc<dyn Notifier>,
        invoker: Arc<dyn WorkerInvoker>,
        chain: StageChain,
        per_task_minutes: i64,
        worker_timeout: Duration,
    ) -> Self {
        Self {
            store,
            queue,
            notifier,
            invoker,
            chain,
            per_task_minutes,
            worker_timeout,
        }
    }

    /// Best-effort fan-out. A publish failure is logged and swallowed so it
    /// can never fail the caller's state transition.
    pub(crate) async fn publish(&self, event: PipelineEvent) {
        if let Err(err) = self.notifier.publish(&event).await {
            tracing::warn!(
                "Dropping {:?} notification for project {}: {:?}",
                event.kind,
                event.project_id,
                err
            );
        }
    }
}

#[cfg(test)]
pub(crate) mod testkit {
    //! Shared fixture wiring for service tests.

    use std::sync::Arc;
    use std::time::Duration;

    use buildline_core::chain::StageChain;
    use buildline_core::domain::artifact::ArtifactKind;
    use buildline_core::domain::project::Project;
    use buildline_core::dto::worker::ProducedArtifact;

    use crate::invoker::scripted::ScriptedInvoker;
    use crate::notify::memory::MemoryNotifier;
    use crate::queue::QueueTransport;
    use crate::queue::memory::MemoryQueue;
    use crate::store::StateStore;
    use crate::store::memory::MemoryStateStore;

    use super::Services;

    pub struct Fixture {
        pub services: Services,
        pub store: Arc<MemoryStateStore>,
        pub queue: Arc<MemoryQueue>,
        pub notifier: Arc<MemoryNotifier>,
        pub invoker: Arc<ScriptedInvoker>,
    }

    pub fn fixture(invoker: ScriptedInvoker) -> Fixture {
        let store = Arc::new(MemoryStateStore::new());
        let queue = Arc::new(MemoryQueue::new());
        let notifier = Arc::new(MemoryNotifier::new());
        let invoker = Arc::new(invoker);
        let services = Services::new(
            store.clone(),
            queue.clone(),
            notifier.clone(),
            invoker.clone(),
            StageChain::default(),
            5,
            Duration::from_secs(30),
        );
        Fixture {
            services,
            store,
            queue,
            notifier,
            invoker,
        }
    }

    /// Process queued dispatches until the queue drains.
    pub async fn drain(fx: &Fixture) {
        loop {
            let batch = fx.services.queue.receive(10).await.unwrap();
            if batch.is_empty() {
                break;
            }
            for delivery in batch {
                fx.services.handle_dispatch(&delivery.message).await.unwrap();
                fx.services.queue.ack(&delivery.receipt).await.unwrap();
            }
        }
    }

    pub async fn pending_project(store: &MemoryStateStore) -> Project {
        let project = Project::new(
            "owner-1".into(),
            "shop".into(),
            "online shop with checkout".into(),
        );
        store.insert_project(&project).await.unwrap();
        project
    }

    pub fn artifact_for(worker: &str) -> ProducedArtifact {
        let kind = match worker {
            "requirements" => ArtifactKind::RequirementsDoc,
            "backend" => ArtifactKind::BackendCode,
            "frontend" => ArtifactKind::FrontendCode,
            _ => ArtifactKind::DeploymentConfig,
        };
        ProducedArtifact {
            kind,
            location: format!("s3://artifacts/{worker}"),
            version: 1,
            metadata: None,
        }
    }
}
