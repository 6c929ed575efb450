//! Test helpers
//!
//! An in-memory record store and factories for stored objects.

#![allow(clippy::panic)]

use async_trait::async_trait;
use tokio::sync::RwLock;

use infoblox_sync_provider::{
    HostRecord, HostRecordIpv4Addr, ObjectType, ProviderError, QueryParams, RecordA, RecordCname,
    RecordPtr, RecordStore, RecordTxt, RequestKind, WapiConfig, WapiObject, WapiRequest,
    WapiRequestBuilder, ZoneAuth,
};

use crate::codec::{reverse_name, RecordReference};

// ===== Object factories =====

pub fn zone_auth(fqdn: &str) -> WapiObject {
    WapiObject::Zone(ZoneAuth {
        fqdn: fqdn.to_string(),
        ..ZoneAuth::default()
    })
}

pub fn a(name: &str, ipv4addr: &str, zone: &str) -> WapiObject {
    WapiObject::A(RecordA {
        name: name.to_string(),
        ipv4addr: ipv4addr.to_string(),
        zone: zone.to_string(),
        ..RecordA::default()
    })
}

pub fn host(name: &str, ipv4addrs: &[&str], zone: &str) -> WapiObject {
    WapiObject::Host(HostRecord {
        name: name.to_string(),
        ipv4addrs: ipv4addrs
            .iter()
            .map(|ip| HostRecordIpv4Addr {
                ipv4addr: (*ip).to_string(),
                ..HostRecordIpv4Addr::default()
            })
            .collect(),
        zone: zone.to_string(),
        ..HostRecord::default()
    })
}

pub fn cname(name: &str, canonical: &str, zone: &str) -> WapiObject {
    WapiObject::Cname(RecordCname {
        name: name.to_string(),
        canonical: canonical.to_string(),
        zone: zone.to_string(),
        ..RecordCname::default()
    })
}

pub fn txt(name: &str, text: &str, zone: &str) -> WapiObject {
    WapiObject::Txt(RecordTxt {
        name: name.to_string(),
        text: text.to_string(),
        zone: zone.to_string(),
        ..RecordTxt::default()
    })
}

pub fn ptr(ptrdname: &str, ip: &str, zone: &str) -> WapiObject {
    let addr: std::net::IpAddr = ip.parse().unwrap_or(std::net::IpAddr::from([0, 0, 0, 0]));
    WapiObject::Ptr(RecordPtr {
        name: reverse_name(addr),
        ptrdname: ptrdname.to_string(),
        ipv4addr: addr.is_ipv4().then(|| ip.to_string()),
        ipv6addr: addr.is_ipv6().then(|| ip.to_string()),
        zone: zone.to_string(),
        ..RecordPtr::default()
    })
}

pub fn network_error() -> ProviderError {
    ProviderError::NetworkError {
        provider: "infoblox".to_string(),
        detail: "connection reset by peer".to_string(),
    }
}

/// Deterministic reference, the same scheme the engine uses for deletes.
fn reference_for(object: &WapiObject) -> String {
    let reference = match object {
        WapiObject::A(r) => RecordReference::forward(ObjectType::RecordA, &r.name),
        WapiObject::Host(r) => RecordReference::forward(ObjectType::RecordHost, &r.name),
        WapiObject::Cname(r) => RecordReference::forward(ObjectType::RecordCname, &r.name),
        WapiObject::Txt(r) => RecordReference::forward(ObjectType::RecordTxt, &r.name),
        WapiObject::Ptr(r) => RecordReference::ptr(&r.ptrdname, &r.name),
        WapiObject::Zone(z) => RecordReference::forward(ObjectType::ZoneAuth, &z.fqdn),
    };
    reference.to_string()
}

fn name_of(object: &WapiObject) -> &str {
    match object {
        WapiObject::A(r) => &r.name,
        WapiObject::Host(r) => &r.name,
        WapiObject::Cname(r) => &r.name,
        WapiObject::Txt(r) => &r.name,
        WapiObject::Ptr(r) => &r.name,
        WapiObject::Zone(z) => &z.fqdn,
    }
}

// ===== MockRecordStore =====

/// A recorded read, with the request the real client would have sent.
#[derive(Debug, Clone)]
pub struct GetRequest {
    pub object_type: ObjectType,
    pub reference: String,
    pub query: QueryParams,
    pub request: Option<WapiRequest>,
    verified: bool,
}

impl GetRequest {
    pub fn query_param(&self, key: &str) -> Option<String> {
        self.request.as_ref().and_then(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.into_owned())
        })
    }
}

pub struct MockRecordStore {
    objects: RwLock<Vec<WapiObject>>,
    get_requests: RwLock<Vec<GetRequest>>,
    created: RwLock<Vec<WapiObject>>,
    deleted: RwLock<Vec<String>>,
    /// Returned by every read when set
    read_error: RwLock<Option<ProviderError>>,
    /// Returned by every write when set
    write_error: RwLock<Option<ProviderError>>,
    requests: WapiRequestBuilder,
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(Vec::new()),
            get_requests: RwLock::new(Vec::new()),
            created: RwLock::new(Vec::new()),
            deleted: RwLock::new(Vec::new()),
            read_error: RwLock::new(None),
            write_error: RwLock::new(None),
            requests: WapiRequestBuilder::new(WapiConfig::default()),
        }
    }

    /// Seed the store; references are assigned as on create.
    pub async fn with_objects(objects: impl IntoIterator<Item = WapiObject>) -> Self {
        let store = Self::new();
        for object in objects {
            store.insert(object).await;
        }
        store
    }

    pub async fn insert(&self, mut object: WapiObject) -> String {
        let reference = reference_for(&object);
        object.set_reference(reference.clone());
        self.objects.write().await.push(object);
        reference
    }

    pub async fn objects(&self) -> Vec<WapiObject> {
        self.objects.read().await.clone()
    }

    /// Objects created through the trait, in call order.
    pub async fn created(&self) -> Vec<WapiObject> {
        self.created.read().await.clone()
    }

    /// References successfully deleted through the trait, in call order.
    pub async fn deleted(&self) -> Vec<String> {
        self.deleted.read().await.clone()
    }

    pub async fn fail_reads_with(&self, err: ProviderError) {
        *self.read_error.write().await = Some(err);
    }

    pub async fn fail_writes_with(&self, err: ProviderError) {
        *self.write_error.write().await = Some(err);
    }

    /// Assert that a read of `object_type` with exactly `query` happened and
    /// has not been verified yet; marks it verified.
    pub async fn verify_get_request(&self, object_type: ObjectType, query: &QueryParams) -> GetRequest {
        let mut requests = self.get_requests.write().await;
        let index = requests
            .iter()
            .position(|r| !r.verified && r.object_type == object_type && r.query == *query);
        let Some(index) = index else {
            panic!(
                "no unverified {object_type} read with {query:?}; reads: {:#?}",
                *requests
            );
        };
        requests[index].verified = true;
        requests[index].clone()
    }

    pub async fn verify_no_more_get_requests(&self) {
        let requests = self.get_requests.read().await;
        let pending: Vec<&GetRequest> = requests.iter().filter(|r| !r.verified).collect();
        assert!(pending.is_empty(), "unexpected reads: {pending:#?}");
    }

    async fn check_write(&self) -> Result<(), ProviderError> {
        match self.write_error.read().await.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn not_found(reference: &str) -> ProviderError {
    ProviderError::RecordNotFound {
        provider: "infoblox".to_string(),
        reference: reference.to_string(),
        raw_message: None,
    }
}

/// Value search fields (`ipv4addr`, `text`, ...) against the serialized object.
fn matches_fields(object: &WapiObject, query: &QueryParams) -> bool {
    let Ok(body) = object.to_body() else {
        return false;
    };
    query
        .iter()
        .filter(|(key, _)| !matches!(*key, "zone" | "view" | "name"))
        .all(|(key, value)| body.get(key).and_then(|v| v.as_str()) == Some(value))
}

#[async_trait]
impl RecordStore for MockRecordStore {
    async fn create_object(&self, object: &WapiObject) -> Result<String, ProviderError> {
        self.check_write().await?;
        let mut stored = object.clone();
        let reference = reference_for(&stored);
        stored.set_reference(reference.clone());
        self.created.write().await.push(stored.clone());
        self.objects.write().await.push(stored);
        Ok(reference)
    }

    async fn get_objects(
        &self,
        template: &WapiObject,
        reference: &str,
        query: &QueryParams,
    ) -> Result<Vec<WapiObject>, ProviderError> {
        let object_type = template.object_type();
        let request = self
            .requests
            .build(RequestKind::Get, Some(template), reference, Some(query))
            .ok();
        self.get_requests.write().await.push(GetRequest {
            object_type,
            reference: reference.to_string(),
            query: query.clone(),
            request,
            verified: false,
        });

        if let Some(err) = self.read_error.read().await.clone() {
            return Err(err);
        }

        let objects = self.objects.read().await;
        Ok(objects
            .iter()
            .filter(|o| o.object_type() == object_type)
            .filter(|o| {
                if reference.is_empty() {
                    query.get("zone").is_none_or(|zone| o.zone() == zone)
                        && query.get("name").is_none_or(|name| name_of(o) == name)
                        && matches_fields(o, query)
                } else {
                    o.reference() == reference
                }
            })
            .cloned()
            .collect())
    }

    async fn update_object(&self, object: &WapiObject, reference: &str) -> Result<String, ProviderError> {
        self.check_write().await?;
        let mut objects = self.objects.write().await;
        let slot = objects
            .iter_mut()
            .find(|o| o.reference() == reference)
            .ok_or_else(|| not_found(reference))?;
        let mut replacement = object.clone();
        replacement.set_reference(reference);
        *slot = replacement;
        Ok(reference.to_string())
    }

    async fn delete_object(&self, reference: &str) -> Result<String, ProviderError> {
        self.check_write().await?;
        let mut objects = self.objects.write().await;
        let before = objects.len();
        objects.retain(|o| o.reference() != reference);
        if objects.len() == before {
            return Err(not_found(reference));
        }
        self.deleted.write().await.push(reference.to_string());
        Ok(reference.to_string())
    }
}

#[tokio::test]
async fn mock_delete_is_by_reference() {
    let store = MockRecordStore::with_objects([
        a("multiple.example.com", "1.2.3.4", "example.com"),
        a("multiple.example.com", "3.4.5.6", "example.com"),
        txt("multiple.example.com", "tag", "example.com"),
    ])
    .await;

    let reference = RecordReference::forward(ObjectType::RecordA, "multiple.example.com").to_string();
    let deleted = store.delete_object(&reference).await;
    assert!(matches!(&deleted, Ok(r) if *r == reference), "{deleted:?}");
    assert_eq!(store.objects().await.len(), 1);

    let again = store.delete_object(&reference).await;
    assert!(matches!(again, Err(e) if e.is_not_found()));
}
