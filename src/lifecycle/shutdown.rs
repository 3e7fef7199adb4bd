//! Shutdown coordination.

use tokio::sync::broadcast;

/// Broadcast-based shutdown signal.
///
/// Cloned handles share one channel: any clone can trigger, every
/// subscriber observes the signal once. Triggering twice is harmless.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal. Must happen before `trigger` for
    /// the subscriber to observe it.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Request shutdown. Returns immediately; draining happens in the
    /// orchestrator.
    pub fn trigger(&self) {
        // Send fails only when no subscriber exists yet, which means
        // nothing is serving and there is nothing to stop.
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
