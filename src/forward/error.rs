//! Forwarder error types.

use thiserror::Error;

/// Failures the forwarder itself can produce.
///
/// A backend replying with a non-2xx status is NOT an error here: the
/// response is relayed to the caller verbatim. Only a broken configuration
/// or a failed network round trip surface as `ForwardError`.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The registry has no entry for the service, or the configured base
    /// URL and request path do not combine into a valid URI.
    #[error("service configuration error: {0}")]
    Configuration(String),

    /// Network-level failure talking to the backend (connect, send, or
    /// reading the response body). Not retried.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ForwardError {
    /// Generic client-facing message; details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            ForwardError::Configuration(_) => "service is not configured",
            ForwardError::UpstreamUnavailable(_) => "upstream service unavailable",
        }
    }
}
