//! The dispatching HTTP server.
//!
//! # Responsibilities
//! - One axum service for the whole listener: every request falls through
//!   to `dispatch`, which resolves the Host against the immutable route
//!   table and hands the request to the matched surface unmodified
//! - Middleware: request timeout, request ID, trace layer
//! - Consult the certificate provisioner for wildcard-matched hosts when
//!   the listener terminates TLS

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::header;
use axum::response::Response;
use axum::Router;
use tower::ServiceExt;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::schema::TimeoutConfig;
use crate::http::request::RequestIdLayer;
use crate::observability::metrics;
use crate::routing::{normalize_host, RouteTable};
use crate::tasks::acme::ProvisionHandle;

/// State shared across all request-handling invocations. The table is
/// read-only; no locking on the dispatch path.
#[derive(Clone)]
struct AppState {
    table: Arc<RouteTable>,
    /// Present only when the listener terminates TLS; wildcard-matched
    /// hosts are fed to the provisioner for on-demand certificates.
    certs: Option<ProvisionHandle>,
}

/// Build the gateway's axum service around an immutable route table.
pub fn app(
    table: Arc<RouteTable>,
    certs: Option<ProvisionHandle>,
    timeouts: &TimeoutConfig,
) -> Router {
    Router::new()
        .fallback(dispatch)
        .with_state(AppState { table, certs })
        .layer(TimeoutLayer::new(Duration::from_secs(timeouts.request_secs)))
        .layer(RequestIdLayer)
        .layer(TraceLayer::new_for_http())
}

/// Per-request dispatch: normalize the host, look it up, forward.
/// Routing never fails; the wildcard guarantees a handler.
async fn dispatch(State(state): State<AppState>, req: Request) -> Response {
    let host = normalize_host(request_host(&req));
    let (handler, exact) = state.table.resolve(&host);

    tracing::debug!(
        host = %host,
        surface = handler.kind().as_str(),
        "dispatching request"
    );
    metrics::record_dispatch(handler.kind().as_str());

    if !exact && !host.is_empty() {
        if let Some(certs) = &state.certs {
            certs.request(&host);
        }
    }

    match handler.service().clone().oneshot(req).await {
        Ok(response) => response,
        Err(infallible) => match infallible {},
    }
}

/// Pull the request's target host from the Host header, falling back to
/// the URI authority (HTTP/2 requests carry `:authority` instead).
fn request_host(req: &Request) -> &str {
    req.headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| req.uri().host())
        .unwrap_or_default()
}
