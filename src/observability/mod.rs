//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! handler + forwarder produce:
//!     → logging.rs (structured log events, request id on every line)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
