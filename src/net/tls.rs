//! TLS configuration and certificate loading.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use axum_server::tls_rustls::RustlsConfig;

/// Error type for TLS material loading.
#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("certificate file not found: {0}")]
    CertNotFound(String),

    #[error("private key file not found: {0}")]
    KeyNotFound(String),

    #[error("{0} contains no certificates")]
    EmptyCertChain(String),

    #[error("failed to read TLS material: {0}")]
    Io(#[from] std::io::Error),
}

/// Load TLS configuration from PEM certificate and key files.
///
/// The certificate chain is pre-parsed so an empty or mangled PEM fails at
/// startup instead of on the first handshake.
pub async fn load_rustls_config(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig, TlsError> {
    if !cert_path.exists() {
        return Err(TlsError::CertNotFound(cert_path.display().to_string()));
    }
    if !key_path.exists() {
        return Err(TlsError::KeyNotFound(key_path.display().to_string()));
    }

    let mut reader = BufReader::new(File::open(cert_path)?);
    let certs = rustls_pemfile::certs(&mut reader).collect::<Result<Vec<_>, _>>()?;
    if certs.is_empty() {
        return Err(TlsError::EmptyCertChain(cert_path.display().to_string()));
    }

    let config = RustlsConfig::from_pem_file(cert_path, key_path).await?;
    Ok(config)
}
