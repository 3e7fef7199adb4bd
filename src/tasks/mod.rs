//! Background task coordination.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Coordinator::start_all → each subsystem spawns its own task,
//!     returns immediately (no steady-state wait)
//!
//! Shutdown (after the listener has stopped accepting):
//!     Coordinator::drain_all → each subsystem's drain future, in turn,
//!     bounded by the configured drain timeout
//! ```
//!
//! # Design Decisions
//! - Subsystems are mutually oblivious; drain order is irrelevant
//! - Drain must be safe before start and after nothing ran
//! - A drain that returns is success; the coordinator never retries
//! - Timeout per subsystem, not global: one stuck subsystem cannot starve
//!   the others' cleanup

pub mod acme;
pub mod cron;

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;

pub use acme::{CertProvisioner, ProvisionHandle};
pub use cron::{Job, JobRunner};

/// A long-running subsystem with independent execution and a bounded
/// wind-down.
pub trait BackgroundSubsystem: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &'static str;

    /// Begin independent execution. Idempotent and non-blocking.
    fn start(&self);

    /// Resolve once all outstanding work has completed or been safely
    /// abandoned. Must be safe to call even if `start` never ran.
    fn drain(&self) -> BoxFuture<'_, ()>;
}

/// Starts subsystems at process start and drains them at shutdown.
pub struct Coordinator {
    subsystems: Vec<Arc<dyn BackgroundSubsystem>>,
    /// Zero means wait without bound.
    drain_timeout: Duration,
}

impl Coordinator {
    pub fn new(drain_timeout: Duration) -> Self {
        Self {
            subsystems: Vec::new(),
            drain_timeout,
        }
    }

    pub fn register(&mut self, subsystem: Arc<dyn BackgroundSubsystem>) {
        self.subsystems.push(subsystem);
    }

    /// Launch every subsystem. Returns without waiting for any of them to
    /// reach steady state.
    pub fn start_all(&self) {
        for subsystem in &self.subsystems {
            tracing::debug!(subsystem = subsystem.name(), "starting background subsystem");
            subsystem.start();
        }
    }

    /// Drain every subsystem in turn, returning only once each has
    /// signaled completion (or exhausted its drain timeout).
    pub async fn drain_all(&self) {
        for subsystem in &self.subsystems {
            tracing::info!(subsystem = subsystem.name(), "draining background subsystem");
            if self.drain_timeout.is_zero() {
                subsystem.drain().await;
            } else if tokio::time::timeout(self.drain_timeout, subsystem.drain())
                .await
                .is_err()
            {
                tracing::error!(
                    subsystem = subsystem.name(),
                    timeout_secs = self.drain_timeout.as_secs(),
                    "drain timed out; abandoning subsystem"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Recording {
        started: AtomicUsize,
        drained: AtomicUsize,
    }

    impl Recording {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                started: AtomicUsize::new(0),
                drained: AtomicUsize::new(0),
            })
        }
    }

    impl BackgroundSubsystem for Recording {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn start(&self) {
            self.started.fetch_add(1, Ordering::SeqCst);
        }

        fn drain(&self) -> BoxFuture<'_, ()> {
            Box::pin(async move {
                self.drained.fetch_add(1, Ordering::SeqCst);
            })
        }
    }

    struct Stuck;

    impl BackgroundSubsystem for Stuck {
        fn name(&self) -> &'static str {
            "stuck"
        }

        fn start(&self) {}

        fn drain(&self) -> BoxFuture<'_, ()> {
            Box::pin(std::future::pending::<()>())
        }
    }

    #[tokio::test]
    async fn starts_and_drains_each_subsystem_once() {
        let a = Recording::new();
        let b = Recording::new();

        let mut coordinator = Coordinator::new(Duration::from_secs(1));
        coordinator.register(a.clone());
        coordinator.register(b.clone());

        coordinator.start_all();
        coordinator.drain_all().await;

        assert_eq!(a.started.load(Ordering::SeqCst), 1);
        assert_eq!(a.drained.load(Ordering::SeqCst), 1);
        assert_eq!(b.drained.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn drain_is_safe_without_start() {
        let a = Recording::new();
        let mut coordinator = Coordinator::new(Duration::from_secs(1));
        coordinator.register(a.clone());

        coordinator.drain_all().await;
        assert_eq!(a.started.load(Ordering::SeqCst), 0);
        assert_eq!(a.drained.load(Ordering::SeqCst), 1);
    }

    struct Slow {
        drained: AtomicUsize,
    }

    impl BackgroundSubsystem for Slow {
        fn name(&self) -> &'static str {
            "slow"
        }

        fn start(&self) {}

        fn drain(&self) -> BoxFuture<'_, ()> {
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                self.drained.fetch_add(1, Ordering::SeqCst);
            })
        }
    }

    #[tokio::test]
    async fn zero_timeout_means_wait_without_bound() {
        // A zero timeout must wait out a slow drain, not expire instantly.
        let slow = Arc::new(Slow {
            drained: AtomicUsize::new(0),
        });
        let mut coordinator = Coordinator::new(Duration::ZERO);
        coordinator.register(slow.clone());

        coordinator.drain_all().await;
        assert_eq!(slow.drained.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stuck_subsystem_does_not_starve_the_rest() {
        let behind = Recording::new();
        let mut coordinator = Coordinator::new(Duration::from_millis(50));
        coordinator.register(Arc::new(Stuck));
        coordinator.register(behind.clone());

        coordinator.drain_all().await;
        assert_eq!(behind.drained.load(Ordering::SeqCst), 1);
    }
}
