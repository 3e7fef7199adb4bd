//! Startup/shutdown orchestration.
//!
//! Drives the process through its lifecycle:
//!
//! ```text
//! Unstarted → Validating → RoutingBuilt → Serving → Draining → Stopped
//! ```
//!
//! Validation failures stop the process before any socket is bound; once
//! Serving is reached, drain runs exactly once after the accept loop has
//! stopped and in-flight requests have finished.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::config::loader::ConfigError;
use crate::config::validation::validate_config;
use crate::config::GatewayConfig;
use crate::http::{assets, backend, redirect, server, website};
use crate::lifecycle::shutdown::Shutdown;
use crate::net::listener::ListenerError;
use crate::net::tls::TlsError;
use crate::net::{listener, tls};
use crate::routing::table::strip_port;
use crate::routing::RouteTable;
use crate::tasks::{BackgroundSubsystem, CertProvisioner, Coordinator, Job, JobRunner};

/// Lifecycle states, in order. No transition is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Unstarted,
    Validating,
    RoutingBuilt,
    Serving,
    Draining,
    Stopped,
}

/// Fatal startup/runtime errors surfaced to the caller.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("TLS setup failed: {0}")]
    Tls(#[from] TlsError),

    #[error("server error: {0}")]
    Serve(std::io::Error),
}

/// Ties validation, routing, serving and background subsystems together.
pub struct Orchestrator {
    config: GatewayConfig,
    shutdown: Shutdown,
    state: watch::Sender<LifecycleState>,
    jobs: Vec<Job>,
    extra_subsystems: Vec<Arc<dyn BackgroundSubsystem>>,
}

impl Orchestrator {
    pub fn new(config: GatewayConfig) -> Self {
        let (state, _) = watch::channel(LifecycleState::Unstarted);
        Self {
            config,
            shutdown: Shutdown::new(),
            state,
            jobs: Vec::new(),
            extra_subsystems: Vec::new(),
        }
    }

    /// Handle for requesting shutdown from signal handlers or tests.
    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Observe lifecycle state transitions.
    pub fn state_watch(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    /// Register an additional periodic job with the job runner.
    pub fn register_job(&mut self, job: Job) {
        self.jobs.push(job);
    }

    /// Register an additional background subsystem with the coordinator.
    pub fn register_subsystem(&mut self, subsystem: Arc<dyn BackgroundSubsystem>) {
        self.extra_subsystems.push(subsystem);
    }

    /// Run the gateway to completion.
    ///
    /// Returns after a clean shutdown, or with the error that aborted
    /// startup. On a validation failure no listener is ever opened.
    pub async fn run(self) -> Result<(), GatewayError> {
        let Self {
            config,
            shutdown,
            state,
            jobs,
            extra_subsystems,
        } = self;

        state.send_replace(LifecycleState::Validating);
        let spec = match validate_config(&config) {
            Ok(spec) => spec,
            Err(report) => {
                state.send_replace(LifecycleState::Stopped);
                return Err(ConfigError::Validation(report).into());
            }
        };

        let apex = strip_port(&spec.primary).to_string();
        let table = Arc::new(RouteTable::build(
            &spec,
            redirect::router(&spec.primary),
            website::router(),
            assets::router(&config.assets, config.dev),
            backend::router(apex),
        ));
        state.send_replace(LifecycleState::RoutingBuilt);

        {
            let mut hosts: Vec<&str> = table.hosts().collect();
            hosts.sort_unstable();
            tracing::info!(
                primary = %spec.primary,
                hosts = ?hosts,
                dev = config.dev,
                "route table built"
            );
        }

        // Bind before starting subsystems so a bind failure leaves nothing
        // to unwind.
        let tcp = match listener::bind(&config.listener).await {
            Ok(tcp) => tcp,
            Err(e) => {
                state.send_replace(LifecycleState::Stopped);
                return Err(e.into());
            }
        };

        let provisioner = Arc::new(CertProvisioner::new(config.certs.dir.clone()));
        let cert_handle = provisioner.handle();

        let mut runner = JobRunner::new(Duration::from_secs(config.jobs.interval_secs));
        runner.add_job(Job::new("cert-request-status", {
            let handle = cert_handle.clone();
            move || {
                let handle = handle.clone();
                async move {
                    tracing::debug!(
                        requested = handle.requested_count(),
                        "certificate request backlog"
                    );
                }
            }
        }));
        for job in jobs {
            runner.add_job(job);
        }

        let mut coordinator =
            Coordinator::new(Duration::from_secs(config.shutdown.drain_timeout_secs));
        coordinator.register(Arc::new(runner));
        coordinator.register(provisioner);
        for subsystem in extra_subsystems {
            coordinator.register(subsystem);
        }
        coordinator.start_all();

        // The provisioner is only consulted for hosts the table does not
        // know when the listener terminates TLS itself.
        let dispatch_certs = config.listener.tls.as_ref().map(|_| cert_handle.clone());
        let app = server::app(table, dispatch_certs, &config.timeouts);

        state.send_replace(LifecycleState::Serving);
        let mut shutdown_rx = shutdown.subscribe();
        let state_on_drain = state.clone();
        let graceful = async move {
            let _ = shutdown_rx.recv().await;
            tracing::info!("draining: listener stops accepting new connections");
            state_on_drain.send_replace(LifecycleState::Draining);
        };

        let serve_result = match &config.listener.tls {
            None => axum::serve(tcp, app)
                .with_graceful_shutdown(graceful)
                .await
                .map_err(GatewayError::Serve),
            Some(tls_config) => serve_tls(tcp, app, tls_config, graceful).await,
        };

        // The accept loop has stopped, cleanly or not; the subsystems
        // started above still get their wind-down before the process exits.
        if let Err(e) = &serve_result {
            tracing::error!(error = %e, "server stopped with an error; draining subsystems");
            state.send_replace(LifecycleState::Draining);
        }
        coordinator.drain_all().await;
        state.send_replace(LifecycleState::Stopped);
        tracing::info!("all subsystems drained; gateway stopped");

        serve_result
    }
}

/// Serve with TLS termination. The graceful future is wired to the
/// axum-server handle so a shutdown trigger stops the accept loop the same
/// way as on the plain listener.
async fn serve_tls(
    tcp: tokio::net::TcpListener,
    app: axum::Router,
    tls_config: &crate::config::TlsConfig,
    graceful: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<(), GatewayError> {
    let rustls = tls::load_rustls_config(
        Path::new(&tls_config.cert_path),
        Path::new(&tls_config.key_path),
    )
    .await?;

    let handle = axum_server::Handle::new();
    {
        let handle = handle.clone();
        tokio::spawn(async move {
            graceful.await;
            handle.graceful_shutdown(None);
        });
    }

    let std_listener = tcp.into_std().map_err(GatewayError::Serve)?;
    axum_server::from_tcp_rustls(std_listener, rustls)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .map_err(GatewayError::Serve)
}
