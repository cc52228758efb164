//! Request forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! handler builds ForwardedRequest (method, path+query, header subset, body)
//!     → forwarder.rs resolves service via ServiceRegistry
//!     → one outbound hyper call
//!     → ForwardedResponse (backend status + JSON body)
//!     → handler relays status and body unchanged
//! ```
//!
//! # Design Decisions
//! - The forwarder never remaps backend status codes
//! - No retries, no caching, no idempotency tracking
//! - Body validation happens in the HTTP layer, never here

pub mod error;
pub mod forwarder;

pub use error::ForwardError;
pub use forwarder::{ForwardedRequest, ForwardedResponse, Forwarder};
