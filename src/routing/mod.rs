//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request path
//!     → table.rs (longest-prefix match → Route)
//!     → registry.rs (logical service name → base URL)
//!     → forwarder issues the outbound request
//! ```
//!
//! # Design Decisions
//! - Both structures are built once at startup and never mutated
//! - Route miss and registry miss are distinct failures: the first is a
//!   client-visible 404, the second a configuration error

pub mod registry;
pub mod table;

pub use registry::{RegistryError, ServiceRegistry};
pub use table::{Route, RouteTable};
