//! Destination liveness probe.
//!
//! Write-admission gate: a destination that fails the probe gets no
//! writes and burns no retry budget, and the record fails with a cause
//! distinct from a rejected write.

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Bounded-timeout liveness probe against a cluster's health endpoint
#[derive(Clone)]
pub struct ClusterHealthProbe {
    client: Client,
    timeout: Duration,
}

impl ClusterHealthProbe {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// `GET {base}/_cluster/health`; any non-2xx status, timeout, or
    /// connection error is unhealthy.
    pub async fn is_healthy(&self, base: &str) -> bool {
        let url = format!("{}/_cluster/health", base);
        match self.client.get(&url).timeout(self.timeout).send().await {
            Ok(resp) if resp.status().is_success() => {
                debug!(address = base, "Destination healthy");
                true
            }
            Ok(resp) => {
                warn!(address = base, status = %resp.status(), "Health probe returned non-success");
                false
            }
            Err(e) => {
                warn!(address = base, error = %e, "Health probe failed");
                false
            }
        }
    }
}
