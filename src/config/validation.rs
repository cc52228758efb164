//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (routes reference existing services)
//! - Validate service URLs parse and carry an http(s) scheme
//! - Detect duplicate service names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: GatewayConfig -> Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("service `{0}` has an empty url")]
    EmptyServiceUrl(String),

    #[error("service `{name}` has an invalid url `{url}`")]
    InvalidServiceUrl { name: String, url: String },

    #[error("service `{name}` url `{url}` must use http or https")]
    UnsupportedScheme { name: String, url: String },

    #[error("duplicate service name `{0}`")]
    DuplicateService(String),

    #[error("route `{route}` references undefined service `{service}`")]
    UnknownService { route: String, service: String },

    #[error("route `{0}` has a path prefix that does not start with `/`")]
    BadPathPrefix(String),

    #[error("listener bind address `{0}` is not a valid socket address")]
    BadBindAddress(String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ValidationError::BadBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let mut seen = HashSet::new();
    for service in &config.services {
        if !seen.insert(service.name.as_str()) {
            errors.push(ValidationError::DuplicateService(service.name.clone()));
        }
        if service.url.trim().is_empty() {
            errors.push(ValidationError::EmptyServiceUrl(service.name.clone()));
            continue;
        }
        match Url::parse(&service.url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(_) => errors.push(ValidationError::UnsupportedScheme {
                name: service.name.clone(),
                url: service.url.clone(),
            }),
            Err(_) => errors.push(ValidationError::InvalidServiceUrl {
                name: service.name.clone(),
                url: service.url.clone(),
            }),
        }
    }

    for route in &config.routes {
        if !route.path_prefix.starts_with('/') {
            errors.push(ValidationError::BadPathPrefix(route.name.clone()));
        }
        if !config.services.iter().any(|s| s.name == route.service) {
            errors.push(ValidationError::UnknownService {
                route: route.name.clone(),
                service: route.service.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
