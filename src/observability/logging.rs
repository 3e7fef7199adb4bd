//! Structured logging.
//!
//! # Design Decisions
//! - tracing for structured key-value logs throughout
//! - Pretty format in dev mode, compact single-line format otherwise
//! - Level via RUST_LOG, falling back to the configured default

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber. Call once, before any other
/// subsystem logs.
pub fn init(default_level: &str, dev: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tenant_gateway={default_level},tower_http=info")));

    if dev {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().compact())
            .init();
    }
}
