use serde::{Deserialize, Serialize};
use thiserror::Error;

use infoblox_sync_provider::ZoneAuth;

use crate::utils::IpNetwork;

/// An authoritative zone as listed by the authority.
///
/// `fqdn` is either a domain (`example.com`) or a CIDR block (`10.0.0.0/8`)
/// for reverse zones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub fqdn: String,
    #[serde(default)]
    pub reference: String,
}

impl Zone {
    pub fn new(fqdn: impl Into<String>) -> Self {
        Self {
            fqdn: fqdn.into(),
            reference: String::new(),
        }
    }

    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    /// The address block of a reverse zone, `None` for forward zones.
    pub fn network(&self) -> Option<IpNetwork> {
        self.fqdn.parse().ok()
    }

    pub fn is_reverse(&self) -> bool {
        self.network().is_some()
    }
}

impl From<ZoneAuth> for Zone {
    fn from(zone: ZoneAuth) -> Self {
        Self {
            fqdn: zone.fqdn,
            reference: zone.reference,
        }
    }
}

/// No managed zone covers the name; the record is out of scope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{name}' is not in any managed zone")]
pub struct NotInScope {
    pub name: String,
}

impl NotInScope {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
