//! Infoblox WAPI record store

mod error;
mod http;
mod provider;

use reqwest::Client;

use crate::error::{ProviderError, Result};
use crate::request_builder::WapiRequestBuilder;
use crate::types::WapiConfig;

pub(crate) const PROVIDER_NAME: &str = "infoblox";

/// [`RecordStore`](crate::RecordStore) backed by a grid manager's WAPI.
///
/// Authentication and TLS are configured by the caller on the `reqwest::Client`.
pub struct WapiClient {
    pub(crate) client: Client,
    pub(crate) requests: WapiRequestBuilder,
}

impl WapiClient {
    pub fn new(config: WapiConfig, client: Client) -> Self {
        Self {
            client,
            requests: WapiRequestBuilder::new(config),
        }
    }

    /// Client with the configured timeouts and no credentials, for servers
    /// that authenticate by other means (or tests).
    pub fn with_default_client(config: WapiConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ProviderError::InvalidParameter {
                provider: PROVIDER_NAME.to_string(),
                param: "http_client".to_string(),
                detail: e.to_string(),
            })?;
        Ok(Self::new(config, client))
    }

    pub fn config(&self) -> &WapiConfig {
        self.requests.config()
    }
}
