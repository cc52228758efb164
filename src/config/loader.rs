//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load a configuration from a TOML file, apply environment overrides,
/// and validate the result.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: GatewayConfig = toml::from_str(&content)?;

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build the default configuration with environment overrides applied.
/// Used when the gateway is started without a config file.
pub fn config_from_env() -> Result<GatewayConfig, ConfigError> {
    let mut config = GatewayConfig::default();
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Override service base URLs from `{NAME}_SERVICE_URL` variables
/// (e.g. `RESTAURANT_SERVICE_URL`). The lookup is injected so tests do not
/// have to mutate the process environment.
fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for service in &mut config.services {
        let key = format!("{}_SERVICE_URL", service.name.to_uppercase());
        if let Some(url) = lookup(&key) {
            service.url = url;
        }
    }
}
