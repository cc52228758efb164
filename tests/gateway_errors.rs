//! Gateway-level error handling: routing misses, method gate, and the
//! body-validation collaborator in front of the forwarder.

use std::sync::atomic::Ordering;

use reqwest::Method;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use edge_gateway::config::{GatewayConfig, RouteConfig, ServiceConfig};

mod common;

#[tokio::test]
async fn unknown_path_is_404_with_envelope() {
    let (backend, _rx, calls) = common::start_json_backend(200, "{}").await;
    let (gateway, _shutdown) = common::spawn_gateway("auth", "/api/auth", backend, &[]).await;

    let res = common::test_client()
        .get(format!("http://{}/api/cart", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 404);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "no route for path");
    assert_eq!(calls.load(Ordering::SeqCst), 0, "nothing goes upstream");
}

#[tokio::test]
async fn unsupported_method_is_405_with_envelope() {
    let (backend, _rx, calls) = common::start_json_backend(200, "{}").await;
    let (gateway, _shutdown) = common::spawn_gateway("auth", "/api/auth", backend, &[]).await;

    let res = common::test_client()
        .request(
            Method::from_bytes(b"TRACE").unwrap(),
            format!("http://{}/api/auth/login", gateway),
        )
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 405);
    let body: Value = res.json().await.unwrap();
    assert!(body.get("error").is_some());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn invalid_json_body_is_rejected_before_forwarding() {
    let (backend, _rx, calls) = common::start_json_backend(201, "{}").await;
    let (gateway, _shutdown) = common::spawn_gateway("order", "/api/orders", backend, &[]).await;

    let res = common::test_client()
        .post(format!("http://{}/api/orders", gateway))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "request body is not valid JSON");
    assert_eq!(calls.load(Ordering::SeqCst), 0, "nothing goes upstream");
}

#[tokio::test]
async fn missing_required_fields_yield_structured_errors() {
    let (backend, _rx, calls) = common::start_json_backend(201, "{}").await;
    let (gateway, _shutdown) =
        common::spawn_gateway("order", "/api/orders", backend, &["items", "address"]).await;

    let res = common::test_client()
        .post(format!("http://{}/api/orders", gateway))
        .json(&serde_json::json!({"items": []}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "request body is missing required fields");
    assert_eq!(body["fields"]["address"], "required");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn valid_body_with_required_fields_is_forwarded() {
    let (backend, _rx, calls) = common::start_json_backend(201, r#"{"id":"ord_2"}"#).await;
    let (gateway, _shutdown) =
        common::spawn_gateway("order", "/api/orders", backend, &["items", "address"]).await;

    let res = common::test_client()
        .post(format!("http://{}/api/orders", gateway))
        .json(&serde_json::json!({"items": [], "address": "12 Rue de la Soupe"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 201);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn oversized_body_is_413_with_envelope() {
    let (backend, _rx, calls) = common::start_json_backend(201, "{}").await;

    let mut config = GatewayConfig::default();
    config.listener.max_body_size = 64;
    config.services = vec![ServiceConfig {
        name: "order".into(),
        url: format!("http://{}", backend),
    }];
    config.routes = vec![RouteConfig {
        name: "order".into(),
        path_prefix: "/api/orders".into(),
        service: "order".into(),
        required_fields: Vec::new(),
    }];
    let (gateway, _shutdown) = common::spawn_gateway_with_config(config).await;

    let res = common::test_client()
        .post(format!("http://{}/api/orders", gateway))
        .json(&serde_json::json!({"note": "x".repeat(1024)}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 413);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "request body too large");
    assert_eq!(calls.load(Ordering::SeqCst), 0, "nothing goes upstream");
}

#[tokio::test]
async fn truncated_body_is_400_not_413() {
    let (backend, _rx, calls) = common::start_json_backend(201, "{}").await;
    let (gateway, _shutdown) = common::spawn_gateway("order", "/api/orders", backend, &[]).await;

    // Announce 100 bytes, send a fragment, then half-close the write side so
    // the inbound body ends early while the response stays readable.
    let mut stream = TcpStream::connect(gateway).await.unwrap();
    let head = "POST /api/orders HTTP/1.1\r\n\
                Host: gateway\r\n\
                Content-Type: application/json\r\n\
                Content-Length: 100\r\n\r\n\
                {\"items\":";
    stream.write_all(head.as_bytes()).await.unwrap();
    stream.shutdown().await.unwrap();

    let mut response = String::new();
    let _ = stream.read_to_string(&mut response).await;
    assert!(
        response.starts_with("HTTP/1.1 400"),
        "expected 400 for a broken inbound stream, got: {response}"
    );
    assert!(response.contains("unreadable request body"));
    assert_eq!(calls.load(Ordering::SeqCst), 0, "nothing goes upstream");
}

#[tokio::test]
async fn healthz_reports_registered_services() {
    let (backend, _rx, _calls) = common::start_json_backend(200, "{}").await;
    let (gateway, _shutdown) = common::spawn_gateway("auth", "/api/auth", backend, &[]).await;

    let res = common::test_client()
        .get(format!("http://{}/healthz", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["services"], serde_json::json!(["auth"]));
}
