//! Edge gateway for the food-delivery platform.
//!
//! Receives client-facing JSON requests, matches them against an immutable
//! route table, and forwards them to the backend microservice resolved from
//! the service registry. Backend status codes and bodies are relayed
//! unchanged; gateway-produced errors use one canonical envelope.
//!
//! ```text
//!                        ┌──────────────────────────────────────────┐
//!                        │               EDGE GATEWAY               │
//!     Client Request     │  ┌────────┐   ┌─────────┐   ┌─────────┐  │
//!     ───────────────────┼─▶│  http  │──▶│ routing │──▶│ forward │──┼──▶ Backend
//!                        │  │ server │   │  table  │   │         │  │    Service
//!     Client Response    │  └────────┘   └─────────┘   └────┬────┘  │
//!     ◀──────────────────┼───────────────────────────────────┘      │
//!                        │                                          │
//!                        │  config · observability · lifecycle      │
//!                        └──────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod forward;
pub mod http;
pub mod routing;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::GatewayConfig;
pub use forward::{ForwardError, ForwardedRequest, ForwardedResponse, Forwarder};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{RouteTable, ServiceRegistry};
