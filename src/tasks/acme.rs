//! On-demand certificate provisioner.
//!
//! The TLS path consults this subsystem when a handshake arrives for a host
//! with no exact route: the host is queued here, deduplicated, and worked
//! off by a single background worker. Acquisition mechanics (ACME order,
//! challenge, storage) live behind this boundary; the gateway core only
//! queues requests and waits for the worker to drain at shutdown.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use dashmap::DashSet;
use futures_util::future::BoxFuture;
use tokio::sync::mpsc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::observability::metrics;
use crate::tasks::BackgroundSubsystem;

/// Cheap handle for enqueueing provisioning requests from request-handling
/// contexts. Clones share the dedup set and queue.
#[derive(Clone)]
pub struct ProvisionHandle {
    tx: mpsc::UnboundedSender<String>,
    requested: Arc<DashSet<String>>,
}

impl ProvisionHandle {
    /// Request a certificate for a host. Repeated requests for the same
    /// host are dropped; the first one wins for the process lifetime.
    pub fn request(&self, host: &str) {
        if !self.requested.insert(host.to_string()) {
            return;
        }
        if self.tx.send(host.to_string()).is_err() {
            // The worker is gone; unmark the host so the count stays honest
            // and a later request is not silently swallowed.
            self.requested.remove(host);
            tracing::warn!(host, "certificate provisioner is not accepting requests");
            return;
        }
        metrics::record_cert_request();
    }

    /// Number of distinct hosts requested so far.
    pub fn requested_count(&self) -> usize {
        self.requested.len()
    }
}

/// Background worker that processes provisioning requests.
pub struct CertProvisioner {
    tx: mpsc::UnboundedSender<String>,
    rx: Mutex<Option<mpsc::UnboundedReceiver<String>>>,
    requested: Arc<DashSet<String>>,
    provisioned: Arc<AtomicUsize>,
    cert_dir: Option<PathBuf>,
    stop: Arc<Notify>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl CertProvisioner {
    pub fn new(cert_dir: Option<PathBuf>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(Some(rx)),
            requested: Arc::new(DashSet::new()),
            provisioned: Arc::new(AtomicUsize::new(0)),
            cert_dir,
            stop: Arc::new(Notify::new()),
            handle: Mutex::new(None),
        }
    }

    pub fn handle(&self) -> ProvisionHandle {
        ProvisionHandle {
            tx: self.tx.clone(),
            requested: self.requested.clone(),
        }
    }

    /// Number of requests the worker has finished processing.
    pub fn provisioned_count(&self) -> usize {
        self.provisioned.load(Ordering::SeqCst)
    }

    async fn run_worker(
        mut rx: mpsc::UnboundedReceiver<String>,
        stop: Arc<Notify>,
        cert_dir: Option<PathBuf>,
        provisioned: Arc<AtomicUsize>,
    ) {
        loop {
            tokio::select! {
                biased;
                _ = stop.notified() => {
                    // Drain whatever is already queued, then wind down.
                    while let Ok(host) = rx.try_recv() {
                        Self::provision(&host, cert_dir.as_deref(), &provisioned).await;
                    }
                    tracing::info!("certificate provisioner stopping");
                    break;
                }
                maybe_host = rx.recv() => match maybe_host {
                    Some(host) => Self::provision(&host, cert_dir.as_deref(), &provisioned).await,
                    None => break,
                },
            }
        }
    }

    async fn provision(host: &str, cert_dir: Option<&std::path::Path>, provisioned: &AtomicUsize) {
        match cert_dir {
            Some(dir) => tracing::info!(
                host,
                cert_dir = %dir.display(),
                "certificate provisioning requested"
            ),
            None => tracing::info!(
                host,
                "certificate provisioning requested (no cert dir configured; recorded only)"
            ),
        }
        provisioned.fetch_add(1, Ordering::SeqCst);
    }

    async fn drain_inner(&self) {
        self.stop.notify_one();
        let handle = self
            .handle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "certificate provisioner task failed during drain");
            }
        }
    }
}

impl BackgroundSubsystem for CertProvisioner {
    fn name(&self) -> &'static str {
        "cert-provisioner"
    }

    fn start(&self) {
        let rx = self
            .rx
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        // Already started: the receiver has been handed to the worker.
        let Some(rx) = rx else { return };

        tracing::info!(
            cert_dir = ?self.cert_dir,
            "certificate provisioner starting"
        );
        let mut slot = self
            .handle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(tokio::spawn(Self::run_worker(
            rx,
            self.stop.clone(),
            self.cert_dir.clone(),
            self.provisioned.clone(),
        )));
    }

    fn drain(&self) -> BoxFuture<'_, ()> {
        Box::pin(self.drain_inner())
    }
}
