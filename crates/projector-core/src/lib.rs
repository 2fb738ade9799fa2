//! # Projector Core
//!
//! Core types for the ES stream projector: the change-record wire model
//! and tag decoder, the flattened document projection, configuration,
//! the error taxonomy, and the metrics facade.
//!
//! ## Data flow
//!
//! ```text
//! ┌──────────────┐     ┌───────────────┐     ┌─────────────────┐
//! │ ChangeRecord │────►│  decode_row   │────►│ ProductDocument │
//! │ (tagged row) │     │ (native JSON) │     │ (fixed fields)  │
//! └──────────────┘     └───────────────┘     └─────────────────┘
//! ```
//!
//! Everything that touches the network lives in the `es-projector`
//! service crate; this crate is pure data and policy.

pub mod config;
pub mod document;
pub mod error;
pub mod metrics;
pub mod record;

pub use config::*;
pub use document::*;
pub use error::*;
pub use metrics::*;
pub use record::*;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::ProjectorConfig;
    pub use crate::document::ProductDocument;
    pub use crate::error::{ProjectorError, Result};
    pub use crate::record::{
        decode_row, AttrValue, ChangeRecord, DecodedRow, RecordBatch, StreamOperation, TypedRow,
    };
}
