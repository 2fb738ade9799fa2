//! Error types for the stream projector.
//!
//! Uses `thiserror` for ergonomic error handling with full context
//! preservation. Every variant maps to one terminal cause for a single
//! record; the batch coordinator converts them into failure tallies
//! rather than letting them propagate to the batch caller.

use thiserror::Error;

/// Result type alias for projector operations
pub type Result<T> = std::result::Result<T, ProjectorError>;

/// Primary error type for all projector operations
#[derive(Error, Debug)]
pub enum ProjectorError {
    /// A change record image is missing or structurally unusable
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// The projected document carries no usable identifier
    #[error("Document has no usable identifier")]
    MissingIdentifier,

    /// Tenant has no endpoint mapping and no default is configured
    #[error("No endpoint configured for tenant '{tenant}'")]
    EndpointNotFound { tenant: String },

    /// The destination cluster failed the liveness probe
    #[error("Destination unhealthy: {address}")]
    DestinationUnhealthy { address: String },

    /// Connection-level failure talking to a destination
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A write was rejected with a non-retryable status
    #[error("Write rejected with status {status}: {body}")]
    WriteRejected { status: u16, body: String },

    /// Retry budget exhausted on a transient failure
    #[error("Retry exhausted after {attempts} attempts: {message}")]
    RetryExhausted { attempts: u32, message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ProjectorError {
    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an endpoint-resolution error
    pub fn endpoint_not_found(tenant: impl Into<String>) -> Self {
        Self::EndpointNotFound {
            tenant: tenant.into(),
        }
    }

    /// Create a failed-probe error
    pub fn unhealthy(address: impl Into<String>) -> Self {
        Self::DestinationUnhealthy {
            address: address.into(),
        }
    }

    /// Create a transport error without an underlying source
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Create a transport error with source
    pub fn transport_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a rejected-write error
    pub fn write_rejected(status: u16, body: impl Into<String>) -> Self {
        Self::WriteRejected {
            status,
            body: body.into(),
        }
    }

    /// Create a retry-exhausted error
    pub fn retry_exhausted(attempts: u32, message: impl Into<String>) -> Self {
        Self::RetryExhausted {
            attempts,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Stable label for metrics and structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Decode { .. } => "decode",
            Self::MissingIdentifier => "missing_identifier",
            Self::EndpointNotFound { .. } => "endpoint_not_found",
            Self::DestinationUnhealthy { .. } => "destination_unhealthy",
            Self::Transport { .. } => "transport",
            Self::WriteRejected { .. } => "write_rejected",
            Self::RetryExhausted { .. } => "retry_exhausted",
            Self::Configuration { .. } => "configuration",
        }
    }

    /// Whether the record failed before any write was attempted
    pub fn is_pre_write(&self) -> bool {
        matches!(
            self,
            Self::Decode { .. }
                | Self::MissingIdentifier
                | Self::EndpointNotFound { .. }
                | Self::DestinationUnhealthy { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_labels_are_stable() {
        assert_eq!(ProjectorError::MissingIdentifier.kind(), "missing_identifier");
        assert_eq!(
            ProjectorError::endpoint_not_found("t9").kind(),
            "endpoint_not_found"
        );
        assert_eq!(
            ProjectorError::write_rejected(400, "mapping conflict").kind(),
            "write_rejected"
        );
    }

    #[test]
    fn pre_write_failures_never_reach_the_destination() {
        assert!(ProjectorError::unhealthy("http://es-1:9200").is_pre_write());
        assert!(ProjectorError::decode("no after image").is_pre_write());
        assert!(!ProjectorError::retry_exhausted(3, "index returned 503").is_pre_write());
    }
}
