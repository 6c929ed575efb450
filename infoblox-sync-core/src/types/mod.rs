//! Record model types

mod changes;
mod endpoint;
mod zone;

pub use changes::Changes;
pub use endpoint::{
    same_endpoints, Endpoint, ProviderSpecificProperty, RecordType, PTR_RECORD_EXISTS,
};
pub use zone::{NotInScope, Zone};

// provider types surfaced by the core API
pub use infoblox_sync_provider::{ObjectType, QueryParams, WapiConfig, WapiObject, ZoneAuth};
