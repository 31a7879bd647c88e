//! Backend registry, live pool state, and round-robin selection.
//!
//! The [`ServerPool`] is the only process-wide mutable state: the health
//! monitor publishes a fresh [`PoolSnapshot`] every probe cycle and every
//! proxied request picks a backend from whichever snapshot is current.
//!
//! Snapshots are immutable and swapped behind a `tokio::sync::RwLock`.
//! Readers clone the `Arc` under the read lock and release it straight away,
//! so a selection never holds up the writer for longer than a refcount bump,
//! and the size and contents used for one selection always come from the
//! same snapshot.

pub mod backend;
pub mod registry;
pub mod selector;

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::RwLock;

pub use backend::Backend;
pub use registry::Registry;
pub use selector::RoundRobin;

/// The healthy subset of the registry as of one probe cycle.
#[derive(Debug)]
pub struct PoolSnapshot {
    pub backends: Vec<Backend>,
    /// Probe cycle that produced this snapshot; 0 before the first cycle.
    pub generation: u64,
    pub published_at: Option<Instant>,
}

impl PoolSnapshot {
    fn empty() -> Self {
        Self {
            backends: Vec::new(),
            generation: 0,
            published_at: None,
        }
    }

    #[must_use]
    pub fn contains(&self, backend: &Backend) -> bool {
        self.backends.contains(backend)
    }
}

#[derive(Debug)]
pub struct ServerPool {
    registry: Registry,
    snapshot: RwLock<Arc<PoolSnapshot>>,
    selector: RoundRobin,
}

impl ServerPool {
    /// A pool over `registry` with no healthy backends yet.
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            snapshot: RwLock::new(Arc::new(PoolSnapshot::empty())),
            selector: RoundRobin::new(),
        }
    }

    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Current snapshot. Holds the read lock only long enough to clone the `Arc`.
    pub async fn snapshot(&self) -> Arc<PoolSnapshot> {
        Arc::clone(&*self.snapshot.read().await)
    }

    /// Pick the next backend, or `None` when nothing is healthy.
    pub async fn pick(&self) -> Option<Backend> {
        let snapshot = self.snapshot().await;
        self.selector.pick(&snapshot.backends)
    }

    /// Replace the snapshot with the outcome of a probe cycle.
    ///
    /// Backends that are not part of the registry are dropped, and the
    /// published list keeps registry order regardless of the order given.
    pub async fn publish(&self, healthy: &[Backend]) -> Arc<PoolSnapshot> {
        let backends: Vec<Backend> = self
            .registry
            .backends()
            .iter()
            .filter(|b| healthy.contains(b))
            .cloned()
            .collect();

        let mut current = self.snapshot.write().await;
        let next = Arc::new(PoolSnapshot {
            backends,
            generation: current.generation + 1,
            published_at: Some(Instant::now()),
        });
        *current = Arc::clone(&next);
        drop(current);

        next
    }

    /// Number of selections handed out so far.
    #[must_use]
    pub fn selections(&self) -> usize {
        self.selector.cursor()
    }
}
