use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use edge_gateway::config::{self, GatewayConfig};
use edge_gateway::http::HttpServer;
use edge_gateway::lifecycle::{signals, Shutdown};
use edge_gateway::observability::{logging, metrics};
use edge_gateway::routing::ServiceRegistry;

#[derive(Parser)]
#[command(name = "edge-gateway")]
#[command(about = "HTTP edge gateway for the food-delivery platform", long_about = None)]
struct Args {
    /// Path to a TOML config file. Without it, defaults plus
    /// {NAME}_SERVICE_URL environment overrides apply.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Fail fast: a broken config never reaches the serving path.
    let config: GatewayConfig = match &args.config {
        Some(path) => config::load_config(path)?,
        None => config::config_from_env()?,
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!("edge-gateway v0.1.0 starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        services = config.services.len(),
        routes = config.routes.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let registry = Arc::new(ServiceRegistry::from_config(&config.services)?);
    tracing::info!(services = ?registry.service_names(), "Service registry built");

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    signals::spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(&config, registry);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
