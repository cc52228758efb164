//! The request forwarder.
//!
//! # Responsibilities
//! - Resolve the logical service name to a base URL
//! - Build the outbound URI (base URL + path, query passed through)
//! - Issue exactly one HTTP request per invocation
//! - Parse the backend body as JSON, falling back to an empty object
//! - Relay the backend status code unchanged
//!
//! # Design Decisions
//! - Stateless request/response transform; no retries, no caching
//! - Non-2xx backend responses are results, not errors
//! - Network and body-read failures both map to UpstreamUnavailable

use std::str::FromStr;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode, Uri};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use serde_json::Value;
use url::Url;

use crate::forward::error::ForwardError;
use crate::routing::ServiceRegistry;

/// Cap on buffered backend response bodies.
const MAX_RESPONSE_BYTES: usize = 16 * 1024 * 1024;

/// Outbound request, constructed per inbound request and discarded after
/// the round trip.
#[derive(Debug, Clone)]
pub struct ForwardedRequest {
    pub method: Method,
    /// Path plus query string, exactly as received (e.g. `/api/orders?page=2`).
    pub path_and_query: String,
    /// Header subset carried to the backend (authorization, request id).
    pub headers: HeaderMap,
    /// Serialized JSON body, if the inbound request carried one.
    pub body: Option<Bytes>,
}

impl ForwardedRequest {
    pub fn new(method: Method, path_and_query: impl Into<String>) -> Self {
        Self {
            method,
            path_and_query: path_and_query.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn json_body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }
}

/// Backend reply: status relayed verbatim, body parsed as JSON.
#[derive(Debug, Clone)]
pub struct ForwardedResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Stateless forwarder over a shared hyper client.
pub struct Forwarder {
    registry: Arc<ServiceRegistry>,
    client: Client<HttpConnector, Body>,
}

impl Forwarder {
    pub fn new(registry: Arc<ServiceRegistry>) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { registry, client }
    }

    /// Forward a request to the named service and return its reply.
    ///
    /// One outbound call per invocation. The backend's status code passes
    /// through unchanged; a body that is not valid JSON becomes `{}`.
    pub async fn forward(
        &self,
        service: &str,
        request: ForwardedRequest,
    ) -> Result<ForwardedResponse, ForwardError> {
        let base = self.registry.resolve(service).ok_or_else(|| {
            ForwardError::Configuration(format!("no base url configured for service `{service}`"))
        })?;
        let uri = outbound_uri(base, &request.path_and_query)?;

        tracing::debug!(
            service = %service,
            method = %request.method,
            uri = %uri,
            "Forwarding to backend"
        );

        let mut builder = Request::builder().method(request.method.clone()).uri(uri);
        if let Some(headers) = builder.headers_mut() {
            for (name, value) in request.headers.iter() {
                headers.insert(name.clone(), value.clone());
            }
            if request.body.is_some() {
                headers.insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                );
            }
        }
        let outbound = builder
            .body(match request.body {
                Some(bytes) => Body::from(bytes),
                None => Body::empty(),
            })
            .map_err(|e| ForwardError::Configuration(e.to_string()))?;

        let response = self
            .client
            .request(outbound)
            .await
            .map_err(|e| ForwardError::UpstreamUnavailable(Box::new(e)))?;

        let status = response.status();
        let bytes = axum::body::to_bytes(Body::new(response.into_body()), MAX_RESPONSE_BYTES)
            .await
            .map_err(|e| ForwardError::UpstreamUnavailable(Box::new(e)))?;

        Ok(ForwardedResponse {
            status,
            body: parse_json_body(&bytes),
        })
    }
}

/// Concatenate base URL and path-and-query. The query string is carried
/// through untouched.
fn outbound_uri(base: &Url, path_and_query: &str) -> Result<Uri, ForwardError> {
    let joined = format!("{}{}", base.as_str().trim_end_matches('/'), path_and_query);
    Uri::from_str(&joined).map_err(|_| {
        ForwardError::Configuration(format!("invalid upstream uri `{joined}`"))
    })
}

/// Backend bodies that are empty or not valid JSON become `{}`.
fn parse_json_body(bytes: &Bytes) -> Value {
    if bytes.is_empty() {
        return Value::Object(serde_json::Map::new());
    }
    serde_json::from_slice(bytes).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}
