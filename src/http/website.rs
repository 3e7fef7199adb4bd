//! Public website surface, served on `www.<primary>`.
//!
//! This is the marketing/registration side of the gateway. The real pages
//! live in the tenant application; the gateway owns only the surface
//! wiring and a status endpoint.

use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

pub fn router() -> Router {
    Router::new()
        .route("/", get(landing))
        .route("/status", get(status))
}

async fn landing() -> Html<&'static str> {
    Html(
        "<!doctype html><html><body>\
         <h1>tenant-gateway</h1>\
         <p>Sign up here to get your own subdomain.</p>\
         </body></html>",
    )
}

async fn status() -> Json<serde_json::Value> {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "surface": "website",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn landing_page_is_served() {
        let res = router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn status_reports_the_surface() {
        let res = router()
            .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = axum::body::to_bytes(res.into_body(), 4096).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["surface"], "website");
    }
}
