//! Batch processing: per-record isolation and outcome tallying.
//!
//! The unit of success is the record, not the batch. Processing is a
//! strict in-order fold where every failure becomes a tally entry and a
//! log line; nothing aborts or skips the records that follow.

use projector_core::metrics::ProjectorMetrics;
use projector_core::prelude::*;
use serde::Serialize;
use std::time::Instant;
use tracing::{error, info};

use crate::dispatcher::{ChangeDispatcher, DispatchOutcome};

/// Aggregate outcome for one batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub processed: usize,
    pub successful: usize,
    pub failed: usize,
}

pub struct BatchCoordinator {
    dispatcher: ChangeDispatcher,
    metrics: ProjectorMetrics,
}

impl BatchCoordinator {
    pub fn new(dispatcher: ChangeDispatcher) -> Self {
        Self {
            dispatcher,
            metrics: ProjectorMetrics::new("batch_coordinator"),
        }
    }

    /// Process records strictly in the order received
    pub async fn process(&self, batch: &RecordBatch) -> BatchSummary {
        info!(records = batch.len(), "Processing change batch");

        let mut summary = BatchSummary::default();
        for record in &batch.records {
            summary.processed += 1;
            let start = Instant::now();

            match self.dispatcher.dispatch(record).await {
                Ok(outcome) => {
                    summary.successful += 1;
                    self.metrics.record_record(record.operation.as_str(), "success");
                    if outcome != DispatchOutcome::Ignored {
                        self.metrics.record_write_latency(start.elapsed());
                    }
                }
                Err(e) => {
                    summary.failed += 1;
                    self.metrics.record_record(record.operation.as_str(), "failure");
                    self.metrics.record_failure(e.kind());
                    error!(
                        operation = %record.operation,
                        kind = e.kind(),
                        error = %e,
                        "Record processing failed"
                    );
                }
            }
        }

        self.metrics.record_batch();
        info!(
            processed = summary.processed,
            successful = summary.successful,
            failed = summary.failed,
            "Batch complete"
        );
        summary
    }
}
