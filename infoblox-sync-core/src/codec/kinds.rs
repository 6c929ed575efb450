use std::net::{IpAddr, Ipv4Addr};

use infoblox_sync_provider::{
    ObjectType, RecordA, RecordCname, RecordPtr, RecordTxt, WapiObject,
};

use super::reference::RecordReference;
use super::reverse::reverse_name;
use crate::error::{CoreError, CoreResult};
use crate::types::{Endpoint, RecordType, Zone};

/// Targets in first-seen order, without duplicates or empty strings.
pub(crate) fn unique_targets(endpoint: &Endpoint) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::with_capacity(endpoint.targets.len());
    for target in &endpoint.targets {
        let target = target.trim();
        if !target.is_empty() && !out.contains(&target) {
            out.push(target);
        }
    }
    out
}

fn parse_ip(target: &str) -> CoreResult<IpAddr> {
    target
        .parse()
        .map_err(|_| CoreError::InvalidAddress(target.to_string()))
}

fn parse_ipv4(target: &str) -> CoreResult<Ipv4Addr> {
    target
        .parse()
        .map_err(|_| CoreError::InvalidAddress(target.to_string()))
}

fn owned_view(view: Option<&str>) -> Option<String> {
    view.map(str::to_string)
}

/// Encoding rules for one stored object type.
pub trait RecordKind: Send + Sync {
    /// Object type queried and written for this kind
    fn object_type(&self) -> ObjectType;

    /// Logical type the kind decodes to
    fn record_type(&self) -> RecordType;

    /// Logical record carried by one stored object, `None` for other object types.
    fn decode(&self, object: &WapiObject) -> Option<Endpoint>;

    /// Objects to store for `endpoint` in `zone`.
    ///
    /// Validates every target before returning, so either the whole record
    /// encodes or none of it does.
    fn encode(
        &self,
        endpoint: &Endpoint,
        _zone: &Zone,
        _view: Option<&str>,
    ) -> CoreResult<Vec<WapiObject>> {
        Err(CoreError::UnsupportedRecordType(format!(
            "{} ({} is read-only)",
            endpoint.record_type,
            self.object_type()
        )))
    }

    /// Deterministic references of the objects stored for `endpoint`.
    fn references(&self, endpoint: &Endpoint) -> CoreResult<Vec<RecordReference>>;

    /// Search fields selecting the object that stores `target` for `endpoint`.
    fn search_fields(&self, endpoint: &Endpoint, target: &str) -> Vec<(&'static str, String)> {
        let _ = target;
        vec![("name", endpoint.dns_name.clone())]
    }
}

/// `record:a`, one object per address.
#[derive(Debug, Clone, Copy)]
pub struct AKind;

impl RecordKind for AKind {
    fn object_type(&self) -> ObjectType {
        ObjectType::RecordA
    }

    fn record_type(&self) -> RecordType {
        RecordType::A
    }

    fn decode(&self, object: &WapiObject) -> Option<Endpoint> {
        match object {
            WapiObject::A(a) => Some(Endpoint::new(&a.name, RecordType::A, [&a.ipv4addr])),
            _ => None,
        }
    }

    fn encode(
        &self,
        endpoint: &Endpoint,
        zone: &Zone,
        view: Option<&str>,
    ) -> CoreResult<Vec<WapiObject>> {
        unique_targets(endpoint)
            .into_iter()
            .map(|target| {
                let ip = parse_ipv4(target)?;
                Ok(WapiObject::A(RecordA {
                    name: endpoint.dns_name.clone(),
                    ipv4addr: ip.to_string(),
                    view: owned_view(view),
                    zone: zone.fqdn.clone(),
                    ..RecordA::default()
                }))
            })
            .collect()
    }

    fn references(&self, endpoint: &Endpoint) -> CoreResult<Vec<RecordReference>> {
        Ok(vec![RecordReference::forward(
            ObjectType::RecordA,
            &endpoint.dns_name,
        )])
    }

    fn search_fields(&self, endpoint: &Endpoint, target: &str) -> Vec<(&'static str, String)> {
        vec![
            ("name", endpoint.dns_name.clone()),
            ("ipv4addr", target.to_string()),
        ]
    }
}

/// `record:host`. Read-only; its addresses fold into the A record of the same name.
#[derive(Debug, Clone, Copy)]
pub struct HostKind;

impl RecordKind for HostKind {
    fn object_type(&self) -> ObjectType {
        ObjectType::RecordHost
    }

    fn record_type(&self) -> RecordType {
        RecordType::A
    }

    fn decode(&self, object: &WapiObject) -> Option<Endpoint> {
        match object {
            WapiObject::Host(host) => Some(Endpoint::new(
                &host.name,
                RecordType::A,
                host.ipv4addrs.iter().map(|a| a.ipv4addr.as_str()),
            )),
            _ => None,
        }
    }

    fn references(&self, endpoint: &Endpoint) -> CoreResult<Vec<RecordReference>> {
        Ok(vec![RecordReference::forward(
            ObjectType::RecordHost,
            &endpoint.dns_name,
        )])
    }
}

/// `record:cname`, exactly one canonical name.
#[derive(Debug, Clone, Copy)]
pub struct CnameKind;

impl RecordKind for CnameKind {
    fn object_type(&self) -> ObjectType {
        ObjectType::RecordCname
    }

    fn record_type(&self) -> RecordType {
        RecordType::Cname
    }

    fn decode(&self, object: &WapiObject) -> Option<Endpoint> {
        match object {
            WapiObject::Cname(c) => Some(Endpoint::new(&c.name, RecordType::Cname, [&c.canonical])),
            _ => None,
        }
    }

    fn encode(
        &self,
        endpoint: &Endpoint,
        zone: &Zone,
        view: Option<&str>,
    ) -> CoreResult<Vec<WapiObject>> {
        Ok(unique_targets(endpoint)
            .first()
            .map(|canonical| {
                WapiObject::Cname(RecordCname {
                    name: endpoint.dns_name.clone(),
                    canonical: (*canonical).to_string(),
                    view: owned_view(view),
                    zone: zone.fqdn.clone(),
                    ..RecordCname::default()
                })
            })
            .into_iter()
            .collect())
    }

    fn references(&self, endpoint: &Endpoint) -> CoreResult<Vec<RecordReference>> {
        Ok(vec![RecordReference::forward(
            ObjectType::RecordCname,
            &endpoint.dns_name,
        )])
    }

    fn search_fields(&self, endpoint: &Endpoint, target: &str) -> Vec<(&'static str, String)> {
        vec![
            ("name", endpoint.dns_name.clone()),
            ("canonical", target.to_string()),
        ]
    }
}

/// `record:txt`, exactly one text value.
#[derive(Debug, Clone, Copy)]
pub struct TxtKind;

impl RecordKind for TxtKind {
    fn object_type(&self) -> ObjectType {
        ObjectType::RecordTxt
    }

    fn record_type(&self) -> RecordType {
        RecordType::Txt
    }

    fn decode(&self, object: &WapiObject) -> Option<Endpoint> {
        match object {
            WapiObject::Txt(t) => Some(Endpoint::new(&t.name, RecordType::Txt, [&t.text])),
            _ => None,
        }
    }

    fn encode(
        &self,
        endpoint: &Endpoint,
        zone: &Zone,
        view: Option<&str>,
    ) -> CoreResult<Vec<WapiObject>> {
        // TXT values are not trimmed; only the first one is stored
        Ok(endpoint
            .targets
            .iter()
            .find(|t| !t.is_empty())
            .map(|text| {
                WapiObject::Txt(RecordTxt {
                    name: endpoint.dns_name.clone(),
                    text: text.clone(),
                    view: owned_view(view),
                    zone: zone.fqdn.clone(),
                    ..RecordTxt::default()
                })
            })
            .into_iter()
            .collect())
    }

    fn references(&self, endpoint: &Endpoint) -> CoreResult<Vec<RecordReference>> {
        Ok(vec![RecordReference::forward(
            ObjectType::RecordTxt,
            &endpoint.dns_name,
        )])
    }

    fn search_fields(&self, endpoint: &Endpoint, target: &str) -> Vec<(&'static str, String)> {
        vec![
            ("name", endpoint.dns_name.clone()),
            ("text", target.to_string()),
        ]
    }
}

/// `record:ptr`. The logical record is named by the forward name (`ptrdname`)
/// and targets the address; the stored name is the reverse-lookup name.
#[derive(Debug, Clone, Copy)]
pub struct PtrKind;

impl RecordKind for PtrKind {
    fn object_type(&self) -> ObjectType {
        ObjectType::RecordPtr
    }

    fn record_type(&self) -> RecordType {
        RecordType::Ptr
    }

    fn decode(&self, object: &WapiObject) -> Option<Endpoint> {
        match object {
            WapiObject::Ptr(p) => Some(Endpoint::new(&p.ptrdname, RecordType::Ptr, p.address())),
            _ => None,
        }
    }

    fn encode(
        &self,
        endpoint: &Endpoint,
        zone: &Zone,
        view: Option<&str>,
    ) -> CoreResult<Vec<WapiObject>> {
        unique_targets(endpoint)
            .into_iter()
            .map(|target| {
                let ip = parse_ip(target)?;
                let (ipv4addr, ipv6addr) = match ip {
                    IpAddr::V4(v4) => (Some(v4.to_string()), None),
                    IpAddr::V6(v6) => (None, Some(v6.to_string())),
                };
                Ok(WapiObject::Ptr(RecordPtr {
                    name: reverse_name(ip),
                    ptrdname: endpoint.dns_name.clone(),
                    ipv4addr,
                    ipv6addr,
                    view: owned_view(view),
                    zone: zone.fqdn.clone(),
                    ..RecordPtr::default()
                }))
            })
            .collect()
    }

    fn references(&self, endpoint: &Endpoint) -> CoreResult<Vec<RecordReference>> {
        unique_targets(endpoint)
            .into_iter()
            .map(|target| {
                let ip = parse_ip(target)?;
                Ok(RecordReference::ptr(&endpoint.dns_name, &reverse_name(ip)))
            })
            .collect()
    }

    fn search_fields(&self, endpoint: &Endpoint, target: &str) -> Vec<(&'static str, String)> {
        let address_field = match target.parse::<IpAddr>() {
            Ok(IpAddr::V6(_)) => "ipv6addr",
            _ => "ipv4addr",
        };
        vec![
            ("ptrdname", endpoint.dns_name.clone()),
            (address_field, target.to_string()),
        ]
    }
}
