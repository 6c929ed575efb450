//! WAPI HTTP request methods

use serde::Deserialize;

use crate::error::Result;
use crate::http_client::{HttpUtils, truncate_for_log};
use crate::request_builder::WapiRequest;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::WapiClient;

/// Error body returned by WAPI on failed calls
#[derive(Debug, Deserialize)]
struct WapiErrorBody {
    #[serde(rename = "Error")]
    error: Option<String>,
    code: Option<String>,
    text: Option<String>,
}

impl WapiClient {
    /// Map a non-2xx response to a `ProviderError`
    fn handle_response_error(
        &self,
        status: u16,
        response_text: &str,
        mut ctx: ErrorContext,
    ) -> Result<()> {
        if (200..300).contains(&status) {
            return Ok(());
        }
        ctx.status = Some(status);

        // Structured error first
        if let Ok(body) = serde_json::from_str::<WapiErrorBody>(response_text) {
            let message = body
                .text
                .or(body.error)
                .unwrap_or_else(|| format!("HTTP {status}"));
            let raw = match body.code {
                Some(code) => RawApiError::with_code(code, message),
                None => RawApiError::new(message),
            };
            return Err(self.map_error(raw, ctx));
        }

        // Plain-text body, e.g. the 401 page
        Err(self.map_error(
            RawApiError::new(format!("HTTP {status}: {}", truncate_for_log(response_text))),
            ctx,
        ))
    }

    /// Send a built request and return the successful response body
    pub(crate) async fn send(&self, request: WapiRequest, ctx: ErrorContext) -> Result<String> {
        let method = request.method.clone();
        let url = request.url.to_string();

        let mut builder = self.client.request(request.method, request.url);
        if let Some(body) = &request.body {
            log::debug!("[{}] Request Body: {body}", self.provider_name());
            builder = builder.json(body);
        }

        let (status, response_text) =
            HttpUtils::execute_request(builder, self.provider_name(), method.as_str(), &url)
                .await?;

        self.handle_response_error(status, &response_text, ctx)?;
        Ok(response_text)
    }
}
