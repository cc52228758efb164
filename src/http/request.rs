//! Inbound request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) as early as possible
//! - Preserve a caller-supplied `x-request-id` untouched
//!
//! # Design Decisions
//! - Plain tower middleware so the layer composes with axum's stack
//! - The same ID is propagated to the backend for correlation

use std::task::{Context, Poll};

use axum::http::{HeaderValue, Request};
use tower::{Layer, Service};
use uuid::Uuid;

/// Header carrying the correlation ID across services.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Layer that injects an `x-request-id` header when absent.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

/// Service produced by [`RequestIdLayer`].
#[derive(Clone, Debug)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S, B> Service<Request<B>> for RequestIdService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        if !req.headers().contains_key(X_REQUEST_ID) {
            let id = Uuid::new_v4().to_string();
            if let Ok(value) = HeaderValue::from_str(&id) {
                req.headers_mut().insert(X_REQUEST_ID, value);
            }
        }
        self.inner.call(req)
    }
}
