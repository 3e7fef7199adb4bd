//! tenant-gateway binary: parse flags, load config, run the orchestrator.

use std::path::PathBuf;

use clap::Parser;

use tenant_gateway::config::loader::load_config;
use tenant_gateway::lifecycle::signals;
use tenant_gateway::observability::{logging, metrics};
use tenant_gateway::{GatewayConfig, Orchestrator};

/// Multi-tenant host-based HTTP(S) gateway.
#[derive(Debug, Parser)]
#[command(name = "tenant-gateway", version, about)]
struct Cli {
    /// Path to a TOML configuration file. Flags override file values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. "127.0.0.1:8081".
    #[arg(long)]
    listen: Option<String>,

    /// Primary domain followed by comma-separated static domains, e.g.
    /// "example.com, cdn.example.com". A single domain fills both roles.
    #[arg(long)]
    domain: Option<String>,

    /// Directory served on the static domains.
    #[arg(long)]
    public_root: Option<PathBuf>,

    /// Directory for on-demand provisioned certificates.
    #[arg(long)]
    cert_dir: Option<PathBuf>,

    /// Dev mode: pretty logs, no asset caching.
    #[arg(long)]
    dev: bool,
}

impl Cli {
    fn into_config(self) -> Result<GatewayConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => GatewayConfig::default(),
        };

        if let Some(listen) = self.listen {
            config.listener.bind_address = listen;
        }
        if let Some(domain) = self.domain {
            config.domains.spec = domain;
        }
        if let Some(public_root) = self.public_root {
            config.assets.public_root = public_root;
        }
        if let Some(cert_dir) = self.cert_dir {
            config.certs.dir = Some(cert_dir);
        }
        if self.dev {
            config.dev = true;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init(&config.observability.log_level, config.dev);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        listen = %config.listener.bind_address,
        domains = %config.domains.spec,
        dev = config.dev,
        "tenant-gateway starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "failed to parse metrics address"
            ),
        }
    }

    let orchestrator = Orchestrator::new(config);
    let shutdown = orchestrator.shutdown_handle();
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        shutdown.trigger();
    });

    orchestrator.run().await?;

    tracing::info!("shutdown complete");
    Ok(())
}
