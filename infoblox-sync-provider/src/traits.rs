use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{QueryParams, WapiObject};

/// Raw API error (internal)
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// Error code, e.g. `Client.Ibap.Data.NotFound`
    pub code: Option<String>,
    /// Original error message
    pub message: String,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// Context attached while mapping an error (internal)
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// Object name (for `RecordExists`)
    pub record_name: Option<String>,
    /// Object reference (for `RecordNotFound`)
    pub reference: Option<String>,
    /// HTTP status of the failed call
    pub status: Option<u16>,
}

/// Maps raw API errors onto [`ProviderError`] (internal)
pub(crate) trait ProviderErrorMapper {
    /// Backend identifier
    fn provider_name(&self) -> &'static str;

    /// Map a raw API error to the unified error type
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// Shortcut: unknown error (fallback)
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// Record-management capability of the authority.
///
/// Every call is one round-trip; implementations do not retry. References are
/// opaque strings owned by the authority.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Store a new object and return its reference.
    async fn create_object(&self, object: &WapiObject) -> Result<String>;

    /// Read objects of the template's type.
    ///
    /// A non-empty `reference` addresses one object directly; otherwise
    /// `query` scopes the search (`zone`, `view`, `name`, ...).
    async fn get_objects(
        &self,
        template: &WapiObject,
        reference: &str,
        query: &QueryParams,
    ) -> Result<Vec<WapiObject>>;

    /// Replace the fields of the referenced object, returning its (possibly new) reference.
    async fn update_object(&self, object: &WapiObject, reference: &str) -> Result<String>;

    /// Remove the referenced object.
    ///
    /// Fails with [`ProviderError::RecordNotFound`] when nothing is stored under `reference`.
    async fn delete_object(&self, reference: &str) -> Result<String>;
}
