//! Host-based routing subsystem.
//!
//! # Data Flow
//! ```text
//! Table construction (at startup, after validation):
//!     DomainSpec
//!     → strip ports, insert in precedence order
//!     → Freeze as immutable RouteTable
//!
//! Incoming request:
//!     Host header (or :authority)
//!     → normalize (lowercase, strip port)
//!     → exact lookup, wildcard fallback
//!     → Return: matched surface handler (never fails)
//! ```
//!
//! # Design Decisions
//! - Table built once, immutable at runtime (thread-safe without locks)
//! - O(1) exact host lookup via HashMap, single wildcard fallback
//! - No suffix matching: overlapping static and tenant domains cannot
//!   shadow each other ambiguously
//! - First insert wins on key conflicts, in precedence order

pub mod table;

pub use table::{normalize_host, Handler, HandlerKind, RouteTable};
