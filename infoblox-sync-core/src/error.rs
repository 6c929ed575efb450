//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use infoblox_sync_provider::ProviderError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Record-store call failed outside of a mutation (zone listing, record reads)
    #[error("{0}")]
    Provider(#[from] ProviderError),

    /// A create or delete was rejected by the authority; the batch stops here
    #[error("Failed to {operation} {record_type} record '{name}': {source}")]
    Apply {
        operation: &'static str,
        record_type: String,
        name: String,
        source: ProviderError,
    },

    /// A target that must be an IP literal is not one
    #[error("Invalid IP address: {0}")]
    InvalidAddress(String),

    /// A record reference does not have the `type/b64:disc/default` shape
    #[error("Invalid record reference: {0}")]
    InvalidReference(String),

    /// The record type has no writable encoding
    #[error("Unsupported record type: {0}")]
    UnsupportedRecordType(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl CoreError {
    /// Whether it is expected behavior (bad input, missing object, ...), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::InvalidAddress(_)
            | Self::InvalidReference(_)
            | Self::UnsupportedRecordType(_)
            | Self::ConfigError(_) => true,
            Self::Provider(e) | Self::Apply { source: e, .. } => e.is_expected(),
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
