//! Wildcard tenant backend surface.
//!
//! Every host without an exact route lands here: tenant subdomains of the
//! primary domain and custom domains alike. The gateway's job ends at
//! identifying the tenant code from the host; the tenant application
//! consumes the request unmodified from there.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Router;

use crate::routing::normalize_host;

struct BackendState {
    /// Port-stripped apex the tenant subdomains hang off.
    apex: String,
}

/// Build the tenant backend surface. `apex` is the primary domain without
/// its port suffix.
pub fn router(apex: String) -> Router {
    Router::new()
        .fallback(tenant)
        .with_state(Arc::new(BackendState { apex }))
}

async fn tenant(State(state): State<Arc<BackendState>>, req: Request) -> Response {
    let host = req
        .headers()
        .get(axum::http::header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(normalize_host)
        .unwrap_or_default();

    match tenant_code(&host, &state.apex) {
        Some(code) => Html(format!(
            "<!doctype html><html><body><h1>{code}</h1>\
             <p>Tenant dashboard for {host}.</p></body></html>"
        ))
        .into_response(),
        // Custom domains need provisioned certificates and a registered
        // tenant before they resolve; until then this is an unknown site.
        None => (StatusCode::NOT_FOUND, "no such site").into_response(),
    }
}

/// Extract the tenant code from a host under the apex:
/// `tenant1.example.com` with apex `example.com` → `tenant1`.
fn tenant_code(host: &str, apex: &str) -> Option<String> {
    host.strip_suffix(apex)
        .and_then(|prefix| prefix.strip_suffix('.'))
        .filter(|code| !code.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    #[test]
    fn tenant_code_extraction() {
        assert_eq!(
            tenant_code("tenant1.example.com", "example.com"),
            Some("tenant1".to_string())
        );
        assert_eq!(
            tenant_code("a.b.example.com", "example.com"),
            Some("a.b".to_string())
        );
        assert_eq!(tenant_code("example.com", "example.com"), None);
        assert_eq!(tenant_code("other.org", "example.com"), None);
    }

    #[tokio::test]
    async fn subdomain_resolves_to_tenant_page() {
        let app = router("example.com".to_string());
        let res = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::HOST, "tenant1.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = axum::body::to_bytes(res.into_body(), 4096).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("tenant1"));
    }

    #[tokio::test]
    async fn unknown_custom_domain_is_not_found() {
        let app = router("example.com".to_string());
        let res = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::HOST, "unregistered.org")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
