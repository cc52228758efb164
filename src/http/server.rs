//! HTTP server setup and the gateway handler.
//!
//! # Responsibilities
//! - Create the Axum Router with the catch-all gateway handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Dispatch requests to the route table
//! - Hand matched requests to the forwarder and relay its result
//! - Translate forwarder errors into the canonical error envelope
//! - Observability (metrics, correlation IDs)

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderName, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GatewayConfig;
use crate::forward::{ForwardedRequest, Forwarder};
use crate::http::request::{RequestIdLayer, X_REQUEST_ID};
use crate::http::response::{error_response, validation_error_response};
use crate::http::validation::validate_body;
use crate::observability::metrics;
use crate::routing::{RouteTable, ServiceRegistry};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub registry: Arc<ServiceRegistry>,
    pub forwarder: Arc<Forwarder>,
    pub max_body_size: usize,
}

/// HTTP server for the edge gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server from validated configuration and the
    /// registry built at startup.
    pub fn new(config: &GatewayConfig, registry: Arc<ServiceRegistry>) -> Self {
        let routes = Arc::new(RouteTable::from_config(&config.routes));
        let forwarder = Arc::new(Forwarder::new(registry.clone()));

        let state = AppState {
            routes,
            registry,
            forwarder,
            max_body_size: config.listener.max_body_size,
        };

        let router = Self::build_router(config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/healthz", get(health_handler))
            .route("/{*path}", any(gateway_handler))
            .route("/", any(gateway_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Gateway self-health: reports the registered service names.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "services": state.registry.service_names(),
    }))
}

fn is_supported_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Main gateway handler.
/// Matches the route, validates the body, and forwards the request.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let (parts, body) = request.into_parts();

    let request_id = parts
        .headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let method = parts.method.clone();
    let path = parts.uri.path().to_string();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| path.clone());

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Handling request"
    );

    if !is_supported_method(&method) {
        metrics::record_request(method.as_str(), 405, "none", start);
        return error_response(
            StatusCode::METHOD_NOT_ALLOWED,
            format!("method {} is not supported", method),
        );
    }

    // 1. Match route
    let route = match state.routes.match_path(&path) {
        Some(r) => r.clone(),
        None => {
            tracing::warn!(request_id = %request_id, path = %path, "No route matched");
            metrics::record_request(method.as_str(), 404, "none", start);
            return error_response(StatusCode::NOT_FOUND, "no route for path");
        }
    };

    // 2. Read body (bounded). Over-limit and a broken inbound stream are
    // distinct failures: only the former is a 413.
    let body_bytes = match Limited::new(body, state.max_body_size).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
            metrics::record_request(method.as_str(), 413, &route.service, start);
            return error_response(StatusCode::PAYLOAD_TOO_LARGE, "request body too large");
        }
        Err(err) => {
            tracing::debug!(request_id = %request_id, error = %err, "Inbound body read failed");
            metrics::record_request(method.as_str(), 400, &route.service, start);
            return error_response(StatusCode::BAD_REQUEST, "unreadable request body");
        }
    };

    // 3. Body checks for mutating methods; the forwarder never validates
    if matches!(method, Method::POST | Method::PUT | Method::PATCH) {
        if let Err(rejection) = validate_body(&route.required_fields, &body_bytes) {
            tracing::debug!(
                request_id = %request_id,
                route = %route.name,
                reason = %rejection.message(),
                "Request body rejected"
            );
            metrics::record_request(method.as_str(), 400, &route.service, start);
            return validation_error_response(rejection.message(), rejection.field_errors());
        }
    }

    // 4. Build the outbound request: header subset + body
    let mut forwarded = ForwardedRequest::new(method.clone(), path_and_query);
    if let Some(auth) = parts.headers.get(header::AUTHORIZATION) {
        forwarded = forwarded.header(header::AUTHORIZATION, auth.clone());
    }
    if let Some(id) = parts.headers.get(X_REQUEST_ID) {
        forwarded = forwarded.header(HeaderName::from_static(X_REQUEST_ID), id.clone());
    }
    if !body_bytes.is_empty() {
        forwarded = forwarded.json_body(body_bytes);
    }

    // 5. Forward and relay
    match state.forwarder.forward(&route.service, forwarded).await {
        Ok(reply) => {
            metrics::record_request(method.as_str(), reply.status.as_u16(), &route.service, start);
            (reply.status, Json(reply.body)).into_response()
        }
        Err(err) => {
            tracing::error!(
                request_id = %request_id,
                service = %route.service,
                error = %err,
                "Forwarding failed"
            );
            metrics::record_request(method.as_str(), 500, &route.service, start);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, err.public_message())
        }
    }
}
