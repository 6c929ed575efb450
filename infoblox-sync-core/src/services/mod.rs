//! Service layer

mod change_applier;
mod record_reader;

pub use change_applier::{ApplySummary, ChangeApplier};
pub use record_reader::RecordReader;

use std::sync::Arc;

use infoblox_sync_provider::{QueryParams, RecordStore};

use crate::config::ProviderConfig;

/// Shared dependencies of the services.
///
/// Built once by the facade around a record store (usually `WapiClient`).
pub struct ServiceContext {
    /// Record store
    pub store: Arc<dyn RecordStore>,
    /// Immutable configuration
    pub config: ProviderConfig,
}

impl ServiceContext {
    /// Create a context
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, config: ProviderConfig) -> Self {
        Self { store, config }
    }

    /// Read query: `zone` when given, plus the configured `view`
    pub(crate) fn scoped_query(&self, zone: Option<&str>) -> QueryParams {
        let mut query = QueryParams::new();
        if let Some(zone) = zone {
            query.insert("zone", zone);
        }
        if let Some(view) = self.config.view() {
            query.insert("view", view);
        }
        query
    }
}
