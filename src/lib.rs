//! Multi-tenant host-based HTTP(S) gateway.
//!
//! One listener, several logically distinct surfaces: the apex domain
//! redirects to the canonical `www.` host, the `www.` host serves the
//! public website, static domains serve shared assets, and every other
//! host falls through to the wildcard tenant backend. The domain set is
//! validated once at startup into an immutable route table, and process
//! exit waits for the background subsystems (periodic job runner,
//! certificate provisioner) to drain.
//!
//! ```text
//!                     ┌──────────────────────────────────────────────┐
//!                     │                tenant-gateway                │
//!   Client Request    │  ┌─────────┐   ┌─────────┐   ┌────────────┐  │
//!   ──────────────────┼─▶│   net   │──▶│  http   │──▶│  routing   │  │
//!                     │  │listener │   │ server  │   │   table    │  │
//!                     │  └─────────┘   └─────────┘   └─────┬──────┘  │
//!                     │                                    │         │
//!                     │          ┌─────────────────────────┼──────┐  │
//!                     │          ▼             ▼           ▼      ▼  │
//!                     │      redirect       website      assets  backend
//!                     │                                             │
//!                     │  ┌─────────────────────────────────────────┐│
//!                     │  │            Cross-Cutting Concerns       ││
//!                     │  │  config   tasks (cron, acme)            ││
//!                     │  │  lifecycle   observability              ││
//!                     │  └─────────────────────────────────────────┘│
//!                     └──────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod net;
pub mod routing;

// Background work
pub mod tasks;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::{DomainSpec, GatewayConfig, ValidationReport};
pub use lifecycle::{GatewayError, Orchestrator, Shutdown};
pub use routing::{HandlerKind, RouteTable};
pub use tasks::BackgroundSubsystem;
