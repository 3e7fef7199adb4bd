//! Request ID middleware.
//!
//! # Responsibilities
//! - Attach a UUID v4 `x-request-id` to every request that lacks one
//! - Run as early as possible so all downstream tracing carries the ID
//!
//! # Design Decisions
//! - Incoming IDs are preserved (callers behind other proxies keep theirs)
//! - Pass-through service: no response mapping, no allocation on the hot
//!   path beyond the header value itself

use axum::http::{HeaderValue, Request};
use tower::{Layer, Service};
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Layer that wraps a service with request-ID injection.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestId<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestId { inner }
    }
}

/// Service that ensures an `x-request-id` header is present.
#[derive(Debug, Clone)]
pub struct RequestId<S> {
    inner: S,
}

impl<S, B> Service<Request<B>> for RequestId<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        if !req.headers().contains_key(X_REQUEST_ID) {
            let id = Uuid::new_v4().to_string();
            if let Ok(value) = HeaderValue::from_str(&id) {
                req.headers_mut().insert(X_REQUEST_ID, value);
            }
        }
        self.inner.call(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    async fn echo_id(req: Request<Body>) -> String {
        req.headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("missing")
            .to_string()
    }

    #[tokio::test]
    async fn generates_id_when_absent() {
        let app = Router::new().route("/", get(echo_id)).layer(RequestIdLayer);

        let res = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = axum::body::to_bytes(res.into_body(), 1024).await.unwrap();
        let id = String::from_utf8(body.to_vec()).unwrap();
        assert!(Uuid::parse_str(&id).is_ok(), "got {id:?}");
    }

    #[tokio::test]
    async fn preserves_existing_id() {
        let app = Router::new().route("/", get(echo_id)).layer(RequestIdLayer);

        let res = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(X_REQUEST_ID, "upstream-id")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = axum::body::to_bytes(res.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"upstream-id");
    }
}
