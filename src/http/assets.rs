//! Static-asset surface, served on each static domain.
//!
//! Serves files from the configured public root. Cache-control strictness
//! follows dev mode: `no-store` while developing, long-lived public caching
//! in production.

use axum::http::{header, HeaderValue};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::AssetsConfig;

pub fn router(config: &AssetsConfig, dev: bool) -> Router {
    let cache_control = if dev {
        HeaderValue::from_static("no-store")
    } else {
        HeaderValue::from_str(&format!("public, max-age={}", config.cache_max_age_secs))
            .unwrap_or_else(|_| HeaderValue::from_static("no-store"))
    };

    Router::new()
        .fallback_service(ServeDir::new(&config.public_root))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            cache_control,
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::fs;
    use std::path::PathBuf;
    use tower::ServiceExt;

    fn temp_public_root(tag: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!("gateway-assets-{}-{}", tag, std::process::id()));
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("app.css"), "body { color: red }").unwrap();
        root
    }

    #[tokio::test]
    async fn serves_files_with_strict_caching_in_dev() {
        let root = temp_public_root("dev");
        let config = AssetsConfig {
            public_root: root.clone(),
            cache_max_age_secs: 3600,
        };

        let res = router(&config, true)
            .oneshot(Request::builder().uri("/app.css").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers().get(header::CACHE_CONTROL).unwrap(), "no-store");

        fs::remove_dir_all(&root).ok();
    }

    #[tokio::test]
    async fn long_lived_caching_outside_dev() {
        let root = temp_public_root("prod");
        let config = AssetsConfig {
            public_root: root.clone(),
            cache_max_age_secs: 3600,
        };

        let res = router(&config, false)
            .oneshot(Request::builder().uri("/app.css").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(
            res.headers().get(header::CACHE_CONTROL).unwrap(),
            "public, max-age=3600"
        );

        fs::remove_dir_all(&root).ok();
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let root = temp_public_root("missing");
        let config = AssetsConfig {
            public_root: root.clone(),
            cache_max_age_secs: 3600,
        };

        let res = router(&config, true)
            .oneshot(Request::builder().uri("/nope.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        fs::remove_dir_all(&root).ok();
    }
}
