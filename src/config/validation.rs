//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Accumulate field-scoped errors so one pass reports every problem
//! - Runs before any socket is bound or subsystem started
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: GatewayConfig → Result<DomainSpec, ValidationReport>
//! - The report is inspected once by the caller, never thrown per field

use std::fmt;
use std::net::SocketAddr;

use crate::config::domain::DomainSpec;
use crate::config::schema::GatewayConfig;

/// A single field-scoped validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Configuration field the error applies to, e.g. "domains.spec".
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

/// Accumulates field-scoped errors during configuration validation.
///
/// A non-empty report aborts startup before any network resource is acquired.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error against a configuration field.
    pub fn append(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Fold another report's errors into this one.
    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

/// Validate the full configuration, returning the parsed domain spec on
/// success and every violation at once on failure.
pub fn validate_config(config: &GatewayConfig) -> Result<DomainSpec, ValidationReport> {
    let (spec, mut report) = DomainSpec::parse(&config.domains.spec);

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        report.append(
            "listener.bind_address",
            format!("{:?} is not a valid socket address", config.listener.bind_address),
        );
    }

    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.is_empty() {
            report.append("listener.tls.cert_path", "cannot be blank");
        }
        if tls.key_path.is_empty() {
            report.append("listener.tls.key_path", "cannot be blank");
        }
    }

    if config.assets.public_root.as_os_str().is_empty() {
        report.append("assets.public_root", "cannot be blank");
    }

    if config.jobs.interval_secs == 0 {
        report.append("jobs.interval_secs", "must be greater than zero");
    }

    if config.timeouts.request_secs == 0 {
        report.append("timeouts.request_secs", "must be greater than zero");
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        report.append(
            "observability.metrics_address",
            format!(
                "{:?} is not a valid socket address",
                config.observability.metrics_address
            ),
        );
    }

    if report.has_errors() {
        Err(report)
    } else {
        Ok(spec)
    }
}
