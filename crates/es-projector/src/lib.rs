//! # ES Projector
//!
//! Projects ordered change-capture batches into tenant-scoped
//! Elasticsearch indices, keeping each index eventually consistent with
//! the source-of-truth table under at-least-once delivery.
//!
//! ## Pipeline
//!
//! ```text
//! batch ──► coordinator ──► per record:
//!            decode row ──► resolve endpoint ──► health gate ──► write
//!                                 │                  │
//!                           default fallback    fail fast, no
//!                                               retry budget spent
//! ```
//!
//! Every write is idempotent (full put, upsert update, delete tolerant
//! of 404), so redelivery of the same event never corrupts the index.

pub mod coordinator;
pub mod dispatcher;
pub mod endpoints;
pub mod es_client;
pub mod health;
pub mod retry;
pub mod server;

pub use coordinator::{BatchCoordinator, BatchSummary};
pub use dispatcher::{ChangeDispatcher, DispatchOutcome};
pub use endpoints::EndpointRegistry;
pub use es_client::EsClient;
pub use health::ClusterHealthProbe;
pub use retry::RetryPolicy;
