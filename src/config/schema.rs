//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Domain configuration (which hosts the gateway answers for).
    pub domains: DomainsConfig,

    /// Static asset serving.
    pub assets: AssetsConfig,

    /// Periodic job runner settings.
    pub jobs: JobsConfig,

    /// Certificate provisioner settings.
    pub certs: CertsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Shutdown behavior.
    pub shutdown: ShutdownConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Dev mode: relaxed caching, pretty logs.
    pub dev: bool,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8081").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8081".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Domain configuration.
///
/// `spec` is a comma-separated list: the first entry is the primary domain,
/// every following entry serves static assets. A single entry is used for
/// both roles. Entries may carry a `:port` suffix.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DomainsConfig {
    /// Raw domain spec, e.g. "example.com, static.example.com".
    pub spec: String,
}

impl Default for DomainsConfig {
    fn default() -> Self {
        Self {
            spec: "gateway.localhost:8081, static.gateway.localhost:8081".to_string(),
        }
    }
}

/// Static asset serving configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory served on the static domains.
    pub public_root: PathBuf,

    /// Cache-Control max-age for asset responses outside dev mode.
    pub cache_max_age_secs: u64,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            public_root: PathBuf::from("./public"),
            cache_max_age_secs: 86_400,
        }
    }
}

/// Periodic job runner configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct JobsConfig {
    /// Interval between job ticks in seconds.
    pub interval_secs: u64,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self { interval_secs: 60 }
    }
}

/// Certificate provisioner configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CertsConfig {
    /// Directory for provisioned certificates. None disables on-demand
    /// provisioning for custom domains.
    pub dir: Option<PathBuf>,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Shutdown configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Upper bound for each background subsystem's drain, in seconds.
    /// 0 means wait without bound.
    pub drain_timeout_secs: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            drain_timeout_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let config = GatewayConfig::default();
        assert!(!config.domains.spec.is_empty());
        assert!(config
            .listener
            .bind_address
            .parse::<std::net::SocketAddr>()
            .is_ok());
        assert!(config.listener.tls.is_none());
        assert_eq!(config.shutdown.drain_timeout_secs, 30);
    }

    #[test]
    fn minimal_toml_round_trips() {
        let config: GatewayConfig = toml::from_str(
            r#"
            dev = true

            [domains]
            spec = "example.com, cdn.example.com"

            [listener]
            bind_address = "0.0.0.0:443"
            "#,
        )
        .unwrap();
        assert!(config.dev);
        assert_eq!(config.domains.spec, "example.com, cdn.example.com");
        assert_eq!(config.listener.bind_address, "0.0.0.0:443");
        // Untouched sections keep their defaults.
        assert_eq!(config.jobs.interval_secs, 60);
    }
}
