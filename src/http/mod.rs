//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, catch-all handler)
//!     → request.rs (request ID injection)
//!     → validation.rs (body checks for mutating methods)
//!     → [forward layer issues the backend call]
//!     → response.rs (error envelope) or verbatim backend relay
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod validation;

pub use request::{RequestIdLayer, X_REQUEST_ID};
pub use server::HttpServer;
