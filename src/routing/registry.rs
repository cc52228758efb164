//! Service registry: logical service name -> base URL.
//!
//! # Design Decisions
//! - Built once at startup from validated config, immutable afterward
//! - Construction fails fast on an empty or unparsable URL
//! - Shared via Arc; read-only lookups need no locking

use std::collections::HashMap;

use thiserror::Error;
use url::Url;

use crate::config::ServiceConfig;

/// Error raised while building the registry at startup.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("service `{0}` has an empty base url")]
    EmptyUrl(String),

    #[error("service `{name}` base url `{url}` does not parse: {source}")]
    InvalidUrl {
        name: String,
        url: String,
        source: url::ParseError,
    },
}

/// Immutable mapping from logical service name to base URL.
#[derive(Debug)]
pub struct ServiceRegistry {
    services: HashMap<String, Url>,
}

impl ServiceRegistry {
    /// Build the registry from service definitions.
    ///
    /// Every entry must carry a non-empty, parsable URL; any violation
    /// aborts startup rather than surfacing per-request.
    pub fn from_config(services: &[ServiceConfig]) -> Result<Self, RegistryError> {
        let mut map = HashMap::with_capacity(services.len());
        for service in services {
            if service.url.trim().is_empty() {
                return Err(RegistryError::EmptyUrl(service.name.clone()));
            }
            let url = Url::parse(&service.url).map_err(|source| RegistryError::InvalidUrl {
                name: service.name.clone(),
                url: service.url.clone(),
                source,
            })?;
            map.insert(service.name.clone(), url);
        }
        Ok(Self { services: map })
    }

    /// Resolve a logical service name to its base URL.
    pub fn resolve(&self, name: &str) -> Option<&Url> {
        self.services.get(name)
    }

    /// Names of all registered services, for the health endpoint.
    pub fn service_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.services.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
