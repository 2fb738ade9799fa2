//! Metrics for the stream projector.
//!
//! Prometheus-compatible metrics via the `metrics` facade.

use metrics::{counter, histogram};
use std::time::Duration;

/// Metric names as constants for consistency
pub mod names {
    pub const RECORDS_TOTAL: &str = "projector_records_total";
    pub const RECORD_FAILURES_TOTAL: &str = "projector_record_failures_total";
    pub const BATCHES_TOTAL: &str = "projector_batches_total";
    pub const WRITE_LATENCY: &str = "projector_write_latency_seconds";
    pub const WRITE_RETRIES_TOTAL: &str = "projector_write_retries_total";
}

/// Labels for metrics
pub mod labels {
    pub const COMPONENT: &str = "component";
    pub const OPERATION: &str = "operation";
    pub const RESULT: &str = "result";
    pub const ERROR_TYPE: &str = "error_type";
}

/// Projector metrics
#[derive(Clone)]
pub struct ProjectorMetrics {
    component: String,
}

impl ProjectorMetrics {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
        }
    }

    /// Record one processed record with its outcome
    pub fn record_record(&self, operation: &str, result: &str) {
        counter!(
            names::RECORDS_TOTAL,
            labels::COMPONENT => self.component.clone(),
            labels::OPERATION => operation.to_string(),
            labels::RESULT => result.to_string(),
        )
        .increment(1);
    }

    /// Record a failed record by its terminal cause
    pub fn record_failure(&self, error_type: &str) {
        counter!(
            names::RECORD_FAILURES_TOTAL,
            labels::COMPONENT => self.component.clone(),
            labels::ERROR_TYPE => error_type.to_string(),
        )
        .increment(1);
    }

    /// Record a completed batch
    pub fn record_batch(&self) {
        counter!(
            names::BATCHES_TOTAL,
            labels::COMPONENT => self.component.clone(),
        )
        .increment(1);
    }

    /// Record end-to-end latency of one record's write path
    pub fn record_write_latency(&self, duration: Duration) {
        histogram!(
            names::WRITE_LATENCY,
            labels::COMPONENT => self.component.clone(),
        )
        .record(duration.as_secs_f64());
    }

    /// Record one retried write attempt
    pub fn record_retry(&self) {
        counter!(
            names::WRITE_RETRIES_TOTAL,
            labels::COMPONENT => self.component.clone(),
        )
        .increment(1);
    }
}
