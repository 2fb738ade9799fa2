//! Tenant-to-cluster endpoint registry.
//!
//! Static, process-lifetime mapping from tenant identifier to the base
//! address of that tenant's search cluster, loaded once at cold start.
//! Initialization fails soft: unreadable configuration yields an empty
//! registry and per-record failures downstream, never a startup abort.

use std::collections::HashMap;
use tracing::{error, info, warn};

/// Environment variable holding the tenant endpoint map as a JSON object
pub const ENDPOINTS_ENV: &str = "ES_ENDPOINTS";

/// Reserved key used when a tenant has no explicit mapping
pub const DEFAULT_TENANT: &str = "default";

/// Immutable tenant endpoint table
#[derive(Debug, Clone, Default)]
pub struct EndpointRegistry {
    endpoints: HashMap<String, String>,
}

impl EndpointRegistry {
    pub fn new(endpoints: HashMap<String, String>) -> Self {
        let endpoints = endpoints
            .into_iter()
            .map(|(tenant, base)| (tenant, base.trim_end_matches('/').to_string()))
            .collect();
        Self { endpoints }
    }

    /// Parse the registry from a JSON object of `tenant -> base address`.
    ///
    /// Parse failures log and yield an empty registry.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<HashMap<String, String>>(raw) {
            Ok(endpoints) => {
                let registry = Self::new(endpoints);
                info!(tenants = ?registry.tenants(), "Loaded tenant endpoints");
                registry
            }
            Err(e) => {
                error!(error = %e, "Failed to parse endpoint configuration, starting empty");
                Self::default()
            }
        }
    }

    /// Load the registry from the `ES_ENDPOINTS` environment variable
    pub fn from_env() -> Self {
        match std::env::var(ENDPOINTS_ENV) {
            Ok(raw) => Self::from_json(&raw),
            Err(_) => {
                warn!(var = ENDPOINTS_ENV, "Endpoint configuration not set, starting empty");
                Self::default()
            }
        }
    }

    /// Resolve a tenant to its cluster base address.
    ///
    /// Falls back to the `default` entry when the tenant has no explicit
    /// mapping; absence of both is `None`, not an error.
    pub fn resolve(&self, tenant: &str) -> Option<&str> {
        self.endpoints
            .get(tenant)
            .or_else(|| self.endpoints.get(DEFAULT_TENANT))
            .map(String::as_str)
    }

    /// Configured tenant identifiers, sorted for stable logging
    pub fn tenants(&self) -> Vec<&str> {
        let mut tenants: Vec<&str> = self.endpoints.keys().map(String::as_str).collect();
        tenants.sort_unstable();
        tenants
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
