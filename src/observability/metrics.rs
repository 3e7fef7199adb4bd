//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): dispatched requests by surface
//! - `gateway_cert_requests_total` (counter): on-demand certificate
//!   provisioning requests
//!
//! # Design Decisions
//! - Prometheus-compatible endpoint on its own bind address
//! - Recording is fire-and-forget; a missing recorder is a no-op, so unit
//!   tests need no metrics setup

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter. Must run inside the Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "failed to install metrics exporter"),
    }
}

/// Count a dispatched request by the surface it resolved to.
pub fn record_dispatch(surface: &'static str) {
    metrics::counter!("gateway_requests_total", "surface" => surface).increment(1);
}

/// Count an on-demand certificate provisioning request.
pub fn record_cert_request() {
    metrics::counter!("gateway_cert_requests_total").increment(1);
}
