//! Route lookup.
//!
//! # Responsibilities
//! - Store compiled routes
//! - Look up the matching route for a request path
//! - Return the matched route or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Longest path prefix wins; O(n) scan, no regex
//! - Explicit None rather than a silent default route

use crate::config::RouteConfig;

/// A compiled route: path prefix -> target service.
#[derive(Debug, Clone)]
pub struct Route {
    pub name: String,
    pub path_prefix: String,
    pub service: String,
    pub required_fields: Vec<String>,
}

/// Immutable table of routes, matched by path prefix.
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Compile routes from config. Longer prefixes are ordered first so the
    /// scan naturally prefers the most specific match.
    pub fn from_config(routes: &[RouteConfig]) -> Self {
        let mut compiled: Vec<Route> = routes
            .iter()
            .map(|r| Route {
                name: r.name.clone(),
                path_prefix: r.path_prefix.clone(),
                service: r.service.clone(),
                required_fields: r.required_fields.clone(),
            })
            .collect();
        compiled.sort_by(|a, b| b.path_prefix.len().cmp(&a.path_prefix.len()));
        Self { routes: compiled }
    }

    /// Find the route whose prefix matches the request path.
    pub fn match_path(&self, path: &str) -> Option<&Route> {
        self.routes
            .iter()
            .find(|route| prefix_matches(path, &route.path_prefix))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// A prefix only matches at a path-segment boundary: the path is the prefix
/// itself, or the next byte is `/`. Prefixes ending in `/` match anything
/// underneath them.
fn prefix_matches(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/'),
        None => false,
    }
}
