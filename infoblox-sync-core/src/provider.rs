//! Infoblox provider facade
//!
//! Wires the reader and applier to one record store and one configuration.

use std::sync::Arc;

use infoblox_sync_provider::{RecordStore, WapiClient, WapiConfig, WapiObject};

use crate::config::ProviderConfig;
use crate::error::{CoreError, CoreResult};
use crate::services::{ApplySummary, ChangeApplier, RecordReader, ServiceContext};
use crate::types::{Changes, Endpoint, RecordType, Zone, PTR_RECORD_EXISTS};

pub struct InfobloxProvider {
    ctx: Arc<ServiceContext>,
    reader: RecordReader,
    applier: ChangeApplier,
}

impl InfobloxProvider {
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, config: ProviderConfig) -> Self {
        let ctx = Arc::new(ServiceContext::new(store, config));
        Self {
            reader: RecordReader::new(ctx.clone()),
            applier: ChangeApplier::new(ctx.clone()),
            ctx,
        }
    }

    /// Provider talking to a grid manager over WAPI with a default HTTP client.
    pub fn connect(wapi: WapiConfig, config: ProviderConfig) -> CoreResult<Self> {
        if wapi.host.trim().is_empty() {
            return Err(CoreError::ConfigError("grid host is empty".to_string()));
        }
        log::info!(
            "[infoblox] Using grid manager {}:{} (WAPI v{}, view: {})",
            wapi.host,
            wapi.port,
            wapi.version,
            config.view().unwrap_or("default")
        );
        let client = WapiClient::with_default_client(wapi)?;
        Ok(Self::new(Arc::new(client), config))
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.ctx.config
    }

    /// Managed zones after filtering.
    pub async fn zones(&self) -> CoreResult<Vec<Zone>> {
        self.reader.zones().await
    }

    /// Every logical record in the managed zones.
    pub async fn records(&self) -> CoreResult<Vec<Endpoint>> {
        let zones = self.reader.zones().await?;
        self.reader.records(&zones).await
    }

    /// Stored objects backing one logical record.
    pub async fn lookup(&self, endpoint: &Endpoint) -> CoreResult<Vec<WapiObject>> {
        let zones = self.reader.zones().await?;
        self.reader.lookup(&zones, endpoint).await
    }

    /// Apply one batch against the current zone list.
    pub async fn apply_changes(&self, changes: &Changes) -> CoreResult<ApplySummary> {
        if changes.is_empty() {
            log::debug!("[infoblox] No changes to apply");
            return Ok(ApplySummary::default());
        }
        let zones = self.reader.zones().await?;
        self.applier.apply(&zones, changes).await
    }

    /// With PTR mirroring on, claim a PTR on every A record so desired and
    /// observed state agree on the property. Otherwise a no-op.
    pub fn adjust_endpoints(&self, mut endpoints: Vec<Endpoint>) -> Vec<Endpoint> {
        if !self.ctx.config.create_ptr {
            return endpoints;
        }
        for endpoint in endpoints
            .iter_mut()
            .filter(|e| e.record_type == RecordType::A)
        {
            endpoint.set_provider_specific(PTR_RECORD_EXISTS, "true");
        }
        endpoints
    }
}
