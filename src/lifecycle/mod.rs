//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (orchestrator.rs):
//!     Validate config → Build route table → Bind listener →
//!     Start background subsystems → Serve
//!
//! Shutdown (shutdown.rs / signals.rs):
//!     SIGTERM/SIGINT or explicit trigger → stop accepting →
//!     in-flight requests finish → drain subsystems → exit
//! ```
//!
//! # Design Decisions
//! - Strict state order: no listener before validation passes, no drain
//!   before the accept loop has stopped
//! - Drain runs exactly once whenever Serving was reached
//! - Each subsystem's drain is bounded by a configurable timeout

pub mod orchestrator;
pub mod shutdown;
pub mod signals;

pub use orchestrator::{GatewayError, LifecycleState, Orchestrator};
pub use shutdown::Shutdown;
