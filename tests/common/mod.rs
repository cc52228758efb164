//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use edge_gateway::config::{GatewayConfig, RouteConfig, ServiceConfig};
use edge_gateway::http::HttpServer;
use edge_gateway::lifecycle::Shutdown;
use edge_gateway::routing::ServiceRegistry;

/// What a mock backend saw for one request.
#[derive(Debug)]
#[allow(dead_code)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub head: String,
    pub body: Vec<u8>,
}

/// Start a mock backend that answers every request with a fixed status and
/// JSON body. Returns its address, a receiver of recorded requests, and a
/// counter of handled calls.
pub async fn start_json_backend(
    status: u16,
    body: &'static str,
) -> (
    SocketAddr,
    mpsc::UnboundedReceiver<RecordedRequest>,
    Arc<AtomicU32>,
) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    let calls = Arc::new(AtomicU32::new(0));
    let call_counter = calls.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let tx = tx.clone();
                    let calls = calls.clone();
                    tokio::spawn(async move {
                        if let Some(recorded) = read_request(&mut socket).await {
                            calls.fetch_add(1, Ordering::SeqCst);
                            let _ = tx.send(recorded);
                            let response = format!(
                                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                                status_line(status),
                                body.len(),
                                body
                            );
                            let _ = socket.write_all(response.as_bytes()).await;
                        }
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, rx, call_counter)
}

/// Bind a port and immediately release it, leaving nothing listening there.
#[allow(dead_code)]
pub async fn unreachable_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Spawn a gateway with one service and one route pointing at `backend`.
/// The returned `Shutdown` must be kept alive for the gateway's lifetime.
pub async fn spawn_gateway(
    service: &str,
    path_prefix: &str,
    backend: SocketAddr,
    required_fields: &[&str],
) -> (SocketAddr, Shutdown) {
    let mut config = GatewayConfig::default();
    config.services = vec![ServiceConfig {
        name: service.to_string(),
        url: format!("http://{}", backend),
    }];
    config.routes = vec![RouteConfig {
        name: service.to_string(),
        path_prefix: path_prefix.to_string(),
        service: service.to_string(),
        required_fields: required_fields.iter().map(|s| s.to_string()).collect(),
    }];
    spawn_gateway_with_config(config).await
}

/// Spawn a gateway from a full config on an ephemeral port.
pub async fn spawn_gateway_with_config(config: GatewayConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let registry = Arc::new(ServiceRegistry::from_config(&config.services).unwrap());
    let server = HttpServer::new(&config, registry);

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    // Give the acceptor a moment to come up.
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    (addr, shutdown)
}

/// Fresh client without pooling, so every test request opens its own
/// connection.
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Read one HTTP/1.1 request off the socket: request line, headers, and a
/// Content-Length body if present.
async fn read_request(socket: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut tmp = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut tmp).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&tmp[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        if buf.len() > 64 * 1024 {
            return None;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let request_line = head.lines().next()?.to_string();
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?.to_string();

    let mut content_length = 0usize;
    for line in head.lines().skip(1) {
        let lower = line.to_ascii_lowercase();
        if let Some(value) = lower.strip_prefix("content-length:") {
            content_length = value.trim().parse().ok()?;
        }
    }

    let mut body = buf[header_end..].to_vec();
    while body.len() < content_length {
        let n = socket.read(&mut tmp).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&tmp[..n]);
    }

    Some(RecordedRequest {
        method,
        target,
        head,
        body,
    })
}

fn status_line(status: u16) -> &'static str {
    match status {
        200 => "200 OK",
        201 => "201 Created",
        204 => "204 No Content",
        400 => "400 Bad Request",
        401 => "401 Unauthorized",
        404 => "404 Not Found",
        409 => "409 Conflict",
        500 => "500 Internal Server Error",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    }
}
