use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Provider-specific property telling whether an A record has a matching PTR.
pub const PTR_RECORD_EXISTS: &str = "infoblox-ptr-record-exists";

/// DNS record type of a logical record.
///
/// Only `A`, `CNAME`, `TXT` and `PTR` can be written; anything else is carried
/// through as `Other` and skipped by the applier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    A,
    Cname,
    Txt,
    Ptr,
    Other(String),
}

impl RecordType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::A => "A",
            Self::Cname => "CNAME",
            Self::Txt => "TXT",
            Self::Ptr => "PTR",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for RecordType {
    fn from(s: String) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "A" => Self::A,
            "CNAME" => Self::Cname,
            "TXT" => Self::Txt,
            "PTR" => Self::Ptr,
            _ => Self::Other(s),
        }
    }
}

impl From<RecordType> for String {
    fn from(t: RecordType) -> Self {
        t.as_str().to_string()
    }
}

impl FromStr for RecordType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-form key/value attached to an endpoint by the provider.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSpecificProperty {
    pub name: String,
    pub value: String,
}

/// A logical DNS record: one name, one type, one or more values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub dns_name: String,
    pub record_type: RecordType,
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provider_specific: Vec<ProviderSpecificProperty>,
}

impl Endpoint {
    pub fn new<I, T>(dns_name: impl Into<String>, record_type: RecordType, targets: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            dns_name: dns_name.into(),
            record_type,
            targets: targets.into_iter().map(Into::into).collect(),
            provider_specific: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_provider_specific(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_provider_specific(name, value);
        self
    }

    /// Set a property, replacing any existing value under the same name.
    pub fn set_provider_specific(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.provider_specific.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.value = value,
            None => self.provider_specific.push(ProviderSpecificProperty {
                name: name.to_string(),
                value,
            }),
        }
    }

    pub fn get_provider_specific(&self, name: &str) -> Option<&str> {
        self.provider_specific
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Name, type and target set are equal; order and duplicates of targets are ignored.
    pub fn same_record(&self, other: &Endpoint) -> bool {
        normalize_name(&self.dns_name) == normalize_name(&other.dns_name)
            && self.record_type == other.record_type
            && self.target_set() == other.target_set()
    }

    pub(crate) fn target_set(&self) -> BTreeSet<&str> {
        self.targets.iter().map(String::as_str).collect()
    }
}

fn normalize_name(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}

type Key<'a> = (String, &'a RecordType, BTreeSet<&'a str>, BTreeSet<&'a ProviderSpecificProperty>);

fn key(ep: &Endpoint) -> Key<'_> {
    (
        normalize_name(&ep.dns_name),
        &ep.record_type,
        ep.target_set(),
        ep.provider_specific.iter().collect(),
    )
}

/// Compare two endpoint lists ignoring order (of endpoints, targets and properties).
pub fn same_endpoints(a: &[Endpoint], b: &[Endpoint]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut left: Vec<Key<'_>> = a.iter().map(key).collect();
    let mut right: Vec<Key<'_>> = b.iter().map(key).collect();
    left.sort();
    right.sort();
    left == right
}
