//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! CLI flags + optional TOML file
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, all errors at once)
//!     → domain.rs (domain spec → DomainSpec)
//!     → GatewayConfig + DomainSpec (validated, immutable)
//!     → shared by reference with every subsystem
//! ```
//!
//! # Design Decisions
//! - Config is immutable once validated; there is no reload path because the
//!   route table is fixed for the process lifetime
//! - All fields have defaults to allow minimal configs
//! - Validation is a pure function with no side effects on shared state;
//!   assignment happens only after the report comes back empty

pub mod domain;
pub mod loader;
pub mod schema;
pub mod validation;

pub use domain::DomainSpec;
pub use schema::AssetsConfig;
pub use schema::GatewayConfig;
pub use schema::ListenerConfig;
pub use schema::TlsConfig;
pub use validation::{ValidationError, ValidationReport};
