//! Configuration types for the stream projector.
//!
//! Uses the `config` crate for layered configuration from files and
//! environment. The tenant endpoint map is deliberately not part of this
//! tree: it lives in its own `ES_ENDPOINTS` environment variable and is
//! parsed fail-soft at cold start.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ProjectorError, Result};

/// Root configuration for the projector service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectorConfig {
    /// Trigger API configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Destination cluster client configuration
    #[serde(default)]
    pub elasticsearch: ElasticsearchConfig,

    /// Write retry configuration
    #[serde(default)]
    pub retry: RetryConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Trigger API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address for the trigger API
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

/// Destination cluster client configuration
///
/// Base addresses are resolved per tenant at dispatch time; this only
/// carries what is common to every destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElasticsearchConfig {
    /// Logical index written by every operation
    #[serde(default = "default_index")]
    pub index: String,

    /// Optional username for authentication
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Optional password for authentication
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Optional API key for authentication
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Connection timeout
    #[serde(with = "humantime_serde", default = "default_connect_timeout")]
    pub connect_timeout: Duration,

    /// Per-write request timeout
    #[serde(with = "humantime_serde", default = "default_request_timeout")]
    pub request_timeout: Duration,

    /// Liveness probe timeout; kept short so degraded clusters fail fast
    #[serde(with = "humantime_serde", default = "default_health_timeout")]
    pub health_timeout: Duration,
}

fn default_index() -> String {
    "productos".to_string()
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_health_timeout() -> Duration {
    Duration::from_secs(10)
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        Self {
            index: default_index(),
            username: None,
            password: None,
            api_key: None,
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
            health_timeout: default_health_timeout(),
        }
    }
}

/// Write retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum total attempts per write
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial backoff delay
    #[serde(with = "humantime_serde", default = "default_initial_backoff")]
    pub initial_backoff: Duration,

    /// Maximum backoff delay
    #[serde(with = "humantime_serde", default = "default_max_backoff")]
    pub max_backoff: Duration,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub multiplier: f64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_backoff() -> Duration {
    Duration::from_millis(100)
}

fn default_max_backoff() -> Duration {
    Duration::from_secs(10)
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff: default_initial_backoff(),
            max_backoff: default_max_backoff(),
            multiplier: default_backoff_multiplier(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: "json" or "pretty"
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl ProjectorConfig {
    /// Load configuration from file and environment.
    ///
    /// Layering order: built-in defaults, then the optional file, then
    /// environment variables with prefix `ES_PROJECTOR__`.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(
            config::Config::try_from(&Self::default())
                .map_err(|e| ProjectorError::config(e.to_string()))?,
        );

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("ES_PROJECTOR")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ProjectorError::config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_write_contract() {
        let config = ProjectorConfig::default();
        assert_eq!(config.elasticsearch.index, "productos");
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.initial_backoff, Duration::from_millis(100));
        assert_eq!(config.elasticsearch.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn loads_without_a_file() {
        let config = ProjectorConfig::load(None).unwrap();
        assert_eq!(config.server.listen, "0.0.0.0:8080");
    }
}
