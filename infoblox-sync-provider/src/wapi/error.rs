//! WAPI error mapping
//!
//! Failed calls answer with `{"Error": "...", "code": "...", "text": "..."}`.
//!
//! - **Authentication**: HTTP 401
//! - **Permission denied**: HTTP 403
//! - **Object not found**: `Client.Ibap.Data.NotFound`, HTTP 404
//! - **Conflict**: `Client.Ibap.Data.Conflict`
//! - **Invalid request**: `Client.Ibap.Proto`, `Client.Ibap.Data`, HTTP 400
//! - everything else falls back to `Unknown`

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::{PROVIDER_NAME, WapiClient};

impl ProviderErrorMapper for WapiClient {
    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match (context.status, raw.code.as_deref()) {
            (Some(401), _) => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            (Some(403), _) => ProviderError::PermissionDenied {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            (_, Some("Client.Ibap.Data.NotFound")) | (Some(404), _) => {
                ProviderError::RecordNotFound {
                    provider: self.provider_name().to_string(),
                    reference: context.reference.unwrap_or_default(),
                    raw_message: Some(raw.message),
                }
            }

            (_, Some("Client.Ibap.Data.Conflict")) => ProviderError::RecordExists {
                provider: self.provider_name().to_string(),
                record_name: context.record_name.unwrap_or_default(),
                raw_message: Some(raw.message),
            },

            (_, Some("Client.Ibap.Proto" | "Client.Ibap.Data")) | (Some(400), _) => {
                ProviderError::InvalidParameter {
                    provider: self.provider_name().to_string(),
                    param: "request".to_string(),
                    detail: raw.message,
                }
            }

            _ => self.unknown_error(raw),
        }
    }
}
