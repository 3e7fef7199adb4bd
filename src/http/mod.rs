//! HTTP subsystem: the dispatching server and the per-surface handlers.
//!
//! # Responsibilities
//! - Build one axum service whose fallback dispatches by Host through the
//!   immutable route table
//! - Wire up middleware (tracing, timeout, request ID)
//! - Provide the three surface handlers the table points at: canonical
//!   redirect, public website, tenant backend, plus the static-asset server

pub mod assets;
pub mod backend;
pub mod redirect;
pub mod request;
pub mod server;
pub mod website;

pub use server::app;
