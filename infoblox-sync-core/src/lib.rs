//! Infoblox Sync Core Library
//!
//! Reconciles logical DNS records against an Infoblox authority:
//! - zone resolution (forward zones by suffix, reverse zones by CIDR)
//! - record codec (logical records to stored objects and back)
//! - record reader and change applier services
//!
//! The authority is reached through the [`RecordStore`] trait, so the engine
//! runs the same against the WAPI client and an in-memory store.

pub mod codec;
pub mod config;
pub mod error;
pub mod provider;
pub mod resolver;
pub mod services;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use config::{DomainFilter, ProviderConfig, ZoneIdFilter};
pub use error::{CoreError, CoreResult};
pub use infoblox_sync_provider::RecordStore;
pub use provider::InfobloxProvider;
pub use resolver::{find_reverse_zone, find_zone};
pub use services::{ApplySummary, ServiceContext};
pub use types::{Changes, Endpoint, NotInScope, RecordType, Zone};
