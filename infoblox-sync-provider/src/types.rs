use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProviderError;

// ============ Connection ============

/// Connection settings for a grid manager's WAPI endpoint.
///
/// Authentication and TLS are not part of this struct: they live on the
/// `reqwest::Client` handed to [`WapiClient`](crate::WapiClient).
///
/// # Default
///
/// `https://localhost:443/wapi/v2.3.1`, no result cap, no regex refinement,
/// 10s connect timeout and 30s request timeout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct WapiConfig {
    /// URL scheme, `https` unless a test server is used.
    pub scheme: String,
    /// Grid manager host name or address.
    pub host: String,
    /// Grid manager port.
    pub port: u16,
    /// WAPI version, without the leading `v`.
    pub version: String,
    /// `_max_results` sent on every read; `0` leaves it to the server.
    pub max_results: u32,
    /// `fqdn~` refinement applied to zone listings.
    pub fqdn_regex: Option<String>,
    /// `name~` refinement applied to A, CNAME and TXT listings.
    pub name_regex: Option<String>,
    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for WapiConfig {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            host: "localhost".to_string(),
            port: 443,
            version: "2.3.1".to_string(),
            max_results: 0,
            fqdn_regex: None,
            name_regex: None,
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
        }
    }
}

impl WapiConfig {
    /// Settings for `host:port`, everything else defaulted.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_fqdn_regex(mut self, regex: impl Into<String>) -> Self {
        self.fqdn_regex = Some(regex.into()).filter(|r: &String| !r.is_empty());
        self
    }

    pub fn with_name_regex(mut self, regex: impl Into<String>) -> Self {
        self.name_regex = Some(regex.into()).filter(|r: &String| !r.is_empty());
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// ============ Object Types ============

/// WAPI object type of a stored object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectType {
    RecordA,
    RecordHost,
    RecordCname,
    RecordTxt,
    RecordPtr,
    ZoneAuth,
}

impl ObjectType {
    /// Object type as it appears in WAPI paths and references.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RecordA => "record:a",
            Self::RecordHost => "record:host",
            Self::RecordCname => "record:cname",
            Self::RecordTxt => "record:txt",
            Self::RecordPtr => "record:ptr",
            Self::ZoneAuth => "zone_auth",
        }
    }

    /// Fields requested through `_return_fields` on reads.
    pub fn return_fields(self) -> &'static [&'static str] {
        match self {
            Self::RecordA => &["name", "ipv4addr", "zone", "view"],
            Self::RecordHost => &["name", "ipv4addrs", "zone", "view"],
            Self::RecordCname => &["name", "canonical", "zone", "view"],
            Self::RecordTxt => &["name", "text", "zone", "view"],
            Self::RecordPtr => &["name", "ptrdname", "ipv4addr", "ipv6addr", "zone", "view"],
            Self::ZoneAuth => &["fqdn", "view"],
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "record:a" => Ok(Self::RecordA),
            "record:host" => Ok(Self::RecordHost),
            "record:cname" => Ok(Self::RecordCname),
            "record:txt" => Ok(Self::RecordTxt),
            "record:ptr" => Ok(Self::RecordPtr),
            "zone_auth" => Ok(Self::ZoneAuth),
            other => Err(ProviderError::InvalidParameter {
                provider: "infoblox".to_string(),
                param: "object_type".to_string(),
                detail: format!("unsupported object type: {other}"),
            }),
        }
    }
}

// ============ Stored Objects ============

/// `record:a`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordA {
    #[serde(rename = "_ref", default, skip_serializing)]
    pub reference: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ipv4addr: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    /// Owning zone, read-only on the server side.
    #[serde(default, skip_serializing)]
    pub zone: String,
}

/// One address entry of a `record:host`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRecordIpv4Addr {
    #[serde(rename = "_ref", default, skip_serializing)]
    pub reference: String,
    #[serde(default)]
    pub ipv4addr: String,
}

/// `record:host`, a single object carrying several addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRecord {
    #[serde(rename = "_ref", default, skip_serializing)]
    pub reference: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ipv4addrs: Vec<HostRecordIpv4Addr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(default, skip_serializing)]
    pub zone: String,
}

/// `record:cname`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCname {
    #[serde(rename = "_ref", default, skip_serializing)]
    pub reference: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub canonical: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(default, skip_serializing)]
    pub zone: String,
}

/// `record:txt`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordTxt {
    #[serde(rename = "_ref", default, skip_serializing)]
    pub reference: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(default, skip_serializing)]
    pub zone: String,
}

/// `record:ptr`
///
/// `name` is the reverse-lookup name (`4.3.2.1.in-addr.arpa`), `ptrdname` the
/// forward name it points at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPtr {
    #[serde(rename = "_ref", default, skip_serializing)]
    pub reference: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub ptrdname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4addr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6addr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(default, skip_serializing)]
    pub zone: String,
}

impl RecordPtr {
    /// Address the record maps back from, IPv4 preferred.
    pub fn address(&self) -> Option<&str> {
        self.ipv4addr
            .as_deref()
            .or(self.ipv6addr.as_deref())
            .filter(|a| !a.is_empty())
    }
}

/// `zone_auth`, an authoritative forward zone or a reverse zone in CIDR form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneAuth {
    #[serde(rename = "_ref", default, skip_serializing)]
    pub reference: String,
    #[serde(default)]
    pub fqdn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
}

/// Any object the engine reads or writes, tagged by its WAPI type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WapiObject {
    A(RecordA),
    Host(HostRecord),
    Cname(RecordCname),
    Txt(RecordTxt),
    Ptr(RecordPtr),
    Zone(ZoneAuth),
}

impl WapiObject {
    /// An empty object of `object_type`, used as a read template.
    pub fn template(object_type: ObjectType) -> Self {
        match object_type {
            ObjectType::RecordA => Self::A(RecordA::default()),
            ObjectType::RecordHost => Self::Host(HostRecord::default()),
            ObjectType::RecordCname => Self::Cname(RecordCname::default()),
            ObjectType::RecordTxt => Self::Txt(RecordTxt::default()),
            ObjectType::RecordPtr => Self::Ptr(RecordPtr::default()),
            ObjectType::ZoneAuth => Self::Zone(ZoneAuth::default()),
        }
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            Self::A(_) => ObjectType::RecordA,
            Self::Host(_) => ObjectType::RecordHost,
            Self::Cname(_) => ObjectType::RecordCname,
            Self::Txt(_) => ObjectType::RecordTxt,
            Self::Ptr(_) => ObjectType::RecordPtr,
            Self::Zone(_) => ObjectType::ZoneAuth,
        }
    }

    /// Server-assigned reference, empty for objects not yet stored.
    pub fn reference(&self) -> &str {
        match self {
            Self::A(r) => &r.reference,
            Self::Host(r) => &r.reference,
            Self::Cname(r) => &r.reference,
            Self::Txt(r) => &r.reference,
            Self::Ptr(r) => &r.reference,
            Self::Zone(z) => &z.reference,
        }
    }

    pub fn set_reference(&mut self, reference: impl Into<String>) {
        let reference = reference.into();
        match self {
            Self::A(r) => r.reference = reference,
            Self::Host(r) => r.reference = reference,
            Self::Cname(r) => r.reference = reference,
            Self::Txt(r) => r.reference = reference,
            Self::Ptr(r) => r.reference = reference,
            Self::Zone(z) => z.reference = reference,
        }
    }

    /// Owning zone as reported by the server (the fqdn for zones themselves).
    pub fn zone(&self) -> &str {
        match self {
            Self::A(r) => &r.zone,
            Self::Host(r) => &r.zone,
            Self::Cname(r) => &r.zone,
            Self::Txt(r) => &r.zone,
            Self::Ptr(r) => &r.zone,
            Self::Zone(z) => &z.fqdn,
        }
    }

    /// JSON request body for create and update calls.
    pub fn to_body(&self) -> serde_json::Result<Value> {
        match self {
            Self::A(r) => serde_json::to_value(r),
            Self::Host(r) => serde_json::to_value(r),
            Self::Cname(r) => serde_json::to_value(r),
            Self::Txt(r) => serde_json::to_value(r),
            Self::Ptr(r) => serde_json::to_value(r),
            Self::Zone(z) => serde_json::to_value(z),
        }
    }

    /// Decode one object of `object_type`.
    pub fn from_value(object_type: ObjectType, value: Value) -> serde_json::Result<Self> {
        Ok(match object_type {
            ObjectType::RecordA => Self::A(serde_json::from_value(value)?),
            ObjectType::RecordHost => Self::Host(serde_json::from_value(value)?),
            ObjectType::RecordCname => Self::Cname(serde_json::from_value(value)?),
            ObjectType::RecordTxt => Self::Txt(serde_json::from_value(value)?),
            ObjectType::RecordPtr => Self::Ptr(serde_json::from_value(value)?),
            ObjectType::ZoneAuth => Self::Zone(serde_json::from_value(value)?),
        })
    }

    /// Decode a read response.
    ///
    /// Searches answer with a JSON array, reads by reference with a single object.
    pub fn parse_list(object_type: ObjectType, text: &str) -> serde_json::Result<Vec<Self>> {
        match serde_json::from_str::<Value>(text)? {
            Value::Array(items) => items
                .into_iter()
                .map(|item| Self::from_value(object_type, item))
                .collect(),
            single => Ok(vec![Self::from_value(object_type, single)?]),
        }
    }
}

impl From<RecordA> for WapiObject {
    fn from(r: RecordA) -> Self {
        Self::A(r)
    }
}

impl From<HostRecord> for WapiObject {
    fn from(r: HostRecord) -> Self {
        Self::Host(r)
    }
}

impl From<RecordCname> for WapiObject {
    fn from(r: RecordCname) -> Self {
        Self::Cname(r)
    }
}

impl From<RecordTxt> for WapiObject {
    fn from(r: RecordTxt) -> Self {
        Self::Txt(r)
    }
}

impl From<RecordPtr> for WapiObject {
    fn from(r: RecordPtr) -> Self {
        Self::Ptr(r)
    }
}

impl From<ZoneAuth> for WapiObject {
    fn from(z: ZoneAuth) -> Self {
        Self::Zone(z)
    }
}

// ============ Query Parameters ============

/// Search fields for a read, e.g. `zone=example.com&view=Inside`.
///
/// Kept sorted by key so request URLs are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: BTreeMap<String, String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}
