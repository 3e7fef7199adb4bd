//! Canonical-host redirect surface.
//!
//! Requests hitting the apex domain are permanently redirected to the
//! `www.` host, preserving path and query. The target keeps the configured
//! port so local setups redirect within themselves.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Router;

/// Build the redirect surface for the given primary domain (which may
/// include a `:port` suffix).
pub fn router(primary: &str) -> Router {
    let target = Arc::new(format!("www.{primary}"));
    Router::new().fallback(to_canonical).with_state(target)
}

async fn to_canonical(State(target): State<Arc<String>>, req: Request) -> Response {
    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    Redirect::permanent(&format!("//{target}{path_and_query}")).into_response()
}
