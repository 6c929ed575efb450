//! # infoblox-sync-provider
//!
//! Typed access to the record-management API of an Infoblox grid manager (WAPI).
//!
//! The crate exposes the [`RecordStore`] capability consumed by the sync engine
//! (`create_object`, `get_objects`, `update_object`, `delete_object`), the typed
//! objects it exchanges ([`WapiObject`] and its record structs), and an HTTP
//! implementation, [`WapiClient`].
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: Use the platform's native TLS implementation.
//! - **`rustls`**: Use rustls.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use infoblox_sync_provider::{
//!     ObjectType, QueryParams, RecordStore, WapiClient, WapiConfig, WapiObject,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credentials live on the HTTP client
//!     let http = reqwest::Client::builder().build()?;
//!     let store = WapiClient::new(
//!         WapiConfig::new("gm.example.org", 443).with_max_results(1000),
//!         http,
//!     );
//!
//!     let zones = store
//!         .get_objects(
//!             &WapiObject::template(ObjectType::ZoneAuth),
//!             "",
//!             &QueryParams::new().with("view", "default"),
//!         )
//!         .await?;
//!     for zone in &zones {
//!         println!("{}", zone.zone());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError).
//! [`ProviderError::RecordNotFound`] is returned for unknown references, which
//! callers treating deletes as idempotent can match on. Nothing is retried.

mod error;
mod http_client;
mod request_builder;
mod traits;
mod types;
mod wapi;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export the capability trait (internal mapping traits are not exported)
pub use traits::RecordStore;

// Re-export request construction
pub use request_builder::{RequestKind, WapiRequest, WapiRequestBuilder};

// Re-export types
pub use types::{
    HostRecord, HostRecordIpv4Addr, ObjectType, QueryParams, RecordA, RecordCname, RecordPtr,
    RecordTxt, WapiConfig, WapiObject, ZoneAuth,
};

pub use wapi::WapiClient;
