//! The stage chain: the fixed ordered list of pipeline workers
//!
//! The chain is plain data held in configuration; which worker runs next is a
//! pure lookup, never a branch on worker names.

/// Ordered list of worker names a project passes through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageChain {
    workers: Vec<String>,
}

/// Default chain for generated application projects.
pub const DEFAULT_WORKERS: [&str; 4] = ["requirements", "backend", "frontend", "deployment"];

impl Default for StageChain {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS.iter().map(|w| w.to_string()).collect())
    }
}

impl StageChain {
    pub fn new(workers: Vec<String>) -> Self {
        Self { workers }
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    pub fn workers(&self) -> &[String] {
        &self.workers
    }

    /// First worker in the chain, dispatched by the pipeline entry point.
    pub fn first(&self) -> Option<&str> {
        self.workers.first().map(String::as_str)
    }

    /// Zero-based chain position of a worker.
    pub fn position(&self, worker: &str) -> Option<usize> {
        self.workers.iter().position(|w| w == worker)
    }

    pub fn contains(&self, worker: &str) -> bool {
        self.position(worker).is_some()
    }

    /// The worker that runs after `worker`, or None at the end of the chain.
    pub fn next_after(&self, worker: &str) -> Option<&str> {
        let pos = self.position(worker)?;
        self.workers.get(pos + 1).map(String::as_str)
    }
}
