//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the edge gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, body limits).
    pub listener: ListenerConfig,

    /// Backend service definitions (logical name -> base URL).
    pub services: Vec<ServiceConfig>,

    /// Route definitions mapping path prefixes to services.
    pub routes: Vec<RouteConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            services: default_services(),
            routes: default_routes(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            max_body_size: 2 * 1024 * 1024,
        }
    }
}

/// Backend service definition.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Logical service name (e.g., "restaurant").
    pub name: String,

    /// Base URL (e.g., "http://localhost:3002").
    pub url: String,
}

/// Route configuration mapping a path prefix to a service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route identifier for logging/metrics.
    pub name: String,

    /// Path prefix to match (longest prefix wins).
    pub path_prefix: String,

    /// Logical service name to forward to.
    pub service: String,

    /// Top-level JSON keys a mutating request body must contain.
    #[serde(default)]
    pub required_fields: Vec<String>,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Inbound request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Default service map: the six platform services on localhost.
fn default_services() -> Vec<ServiceConfig> {
    [
        ("auth", 3001),
        ("restaurant", 3002),
        ("order", 3003),
        ("user", 3004),
        ("delivery", 3005),
        ("payment", 3006),
    ]
    .into_iter()
    .map(|(name, port)| ServiceConfig {
        name: name.to_string(),
        url: format!("http://localhost:{}", port),
    })
    .collect()
}

/// Default routes: one `/api` prefix per platform service.
fn default_routes() -> Vec<RouteConfig> {
    [
        ("auth", "/api/auth"),
        ("restaurant", "/api/restaurants"),
        ("order", "/api/orders"),
        ("user", "/api/users"),
        ("delivery", "/api/delivery"),
        ("payment", "/api/payments"),
    ]
    .into_iter()
    .map(|(service, prefix)| RouteConfig {
        name: service.to_string(),
        path_prefix: prefix.to_string(),
        service: service.to_string(),
        required_fields: Vec::new(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_maps_restaurant_to_3002() {
        let config = GatewayConfig::default();
        let restaurant = config
            .services
            .iter()
            .find(|s| s.name == "restaurant")
            .expect("restaurant service present");
        assert_eq!(restaurant.url, "http://localhost:3002");
    }

    #[test]
    fn default_config_routes_every_service() {
        let config = GatewayConfig::default();
        for route in &config.routes {
            assert!(
                config.services.iter().any(|s| s.name == route.service),
                "route {} references undefined service {}",
                route.name,
                route.service
            );
        }
    }

    #[test]
    fn minimal_toml_parses_with_defaults() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
        assert_eq!(config.services.len(), 6);
        assert_eq!(config.routes.len(), 6);
    }
}
