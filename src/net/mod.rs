//! Network foundation: listener binding and TLS material loading.
//!
//! # Design Decisions
//! - The listener socket is owned by the lifecycle orchestrator; this
//!   module only binds and hands it over
//! - TLS termination uses axum-server's rustls integration; certificate
//!   acquisition itself is the provisioner subsystem's business

pub mod listener;
pub mod tls;
