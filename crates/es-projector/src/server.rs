//! HTTP trigger surface.
//!
//! The batch endpoint always replies 200: partial or even total record
//! failure is communicated only through the embedded counts, because the
//! unit of success is the record, not the batch.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use projector_core::prelude::*;
use serde::Serialize;
use std::sync::Arc;

use crate::coordinator::BatchCoordinator;

/// Shared trigger API state
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<BatchCoordinator>,
}

/// Health response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Batch response
#[derive(Serialize)]
pub struct IngestResponse {
    pub message: &'static str,
    pub successful_records: usize,
    pub failed_records: usize,
    pub total_records: usize,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn ready() -> &'static str {
    "OK"
}

async fn ingest(
    State(state): State<AppState>,
    Json(batch): Json<RecordBatch>,
) -> Json<IngestResponse> {
    let summary = state.coordinator.process(&batch).await;
    Json(IngestResponse {
        message: "Batch processed",
        successful_records: summary.successful,
        failed_records: summary.failed,
        total_records: summary.processed,
    })
}

/// Build the trigger API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ingest", post(ingest))
        .route("/health", get(health))
        .route("/health/live", get(ready))
        .route("/health/ready", get(ready))
        .with_state(state)
}
