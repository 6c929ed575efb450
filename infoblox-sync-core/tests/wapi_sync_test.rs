//! Provider against a mock grid manager, through the real WAPI client

#![allow(clippy::panic)]

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use infoblox_sync_core::codec::RecordReference;
use infoblox_sync_core::types::{ObjectType, WapiConfig};
use infoblox_sync_core::{Changes, CoreError, Endpoint, InfobloxProvider, ProviderConfig, RecordType};

const WAPI_VERSION: &str = "2.3.1";

fn wapi_path(rest: &str) -> String {
    format!("/wapi/v{WAPI_VERSION}/{rest}")
}

async fn setup(config: ProviderConfig) -> (MockServer, InfobloxProvider) {
    let server = MockServer::start().await;
    let address = server.address();
    let wapi = WapiConfig::new(address.ip().to_string(), address.port())
        .with_scheme("http")
        .with_version(WAPI_VERSION);
    let provider = InfobloxProvider::connect(wapi, config);
    assert!(provider.is_ok(), "connect failed");
    let Ok(provider) = provider else {
        unreachable!()
    };
    (server, provider)
}

async fn mount_zones(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(wapi_path("zone_auth")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_ref": "zone_auth/ZG5zLnpvbmUkLl9kZWZhdWx0LmNvbS5leGFtcGxl:example.com/default", "fqdn": "example.com", "view": "default" }
        ])))
        .mount(server)
        .await;
}

async fn mount_empty(server: &MockServer, object_type: &str) {
    Mock::given(method("GET"))
        .and(path(wapi_path(object_type)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn records_fold_a_and_host() {
    let (server, provider) = setup(ProviderConfig::new()).await;
    mount_zones(&server).await;

    Mock::given(method("GET"))
        .and(path(wapi_path("record:a")))
        .and(query_param("zone", "example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_ref": "record:a/x:web.example.com/default", "name": "web.example.com", "ipv4addr": "10.0.0.1", "zone": "example.com" }
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(wapi_path("record:host")))
        .and(query_param("zone", "example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "_ref": "record:host/y:web.example.com/default",
                "name": "web.example.com",
                "ipv4addrs": [{ "_ref": "record:host_ipv4addr/z:10.0.0.2/web.example.com/default", "ipv4addr": "10.0.0.2" }],
                "zone": "example.com"
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;
    mount_empty(&server, "record:cname").await;
    mount_empty(&server, "record:txt").await;

    let records = provider.records().await;
    assert!(
        matches!(
            &records,
            Ok(r) if *r == vec![Endpoint::new("web.example.com", RecordType::A, ["10.0.0.1", "10.0.0.2"])]
        ),
        "unexpected records: {records:?}"
    );
}

#[tokio::test]
async fn apply_creates_and_tolerates_missing_deletes() {
    let (server, provider) = setup(ProviderConfig::new()).await;
    mount_zones(&server).await;

    let gone = RecordReference::forward(ObjectType::RecordCname, "old.example.com").to_string();
    Mock::given(method("DELETE"))
        .and(path(wapi_path(&gone)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "Error": "AdmConDataNotFoundError: Reference not found",
            "code": "Client.Ibap.Data.NotFound",
            "text": "Reference not found"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(wapi_path("record:a")))
        .and(body_json(json!({ "name": "new.example.com", "ipv4addr": "1.2.3.4" })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!("record:a/bmV3:new.example.com/default")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let changes = Changes {
        create: vec![Endpoint::new("new.example.com", RecordType::A, ["1.2.3.4"])],
        delete: vec![Endpoint::new("old.example.com", RecordType::Cname, ["other.com"])],
        ..Changes::default()
    };
    let summary = provider.apply_changes(&changes).await;

    assert!(
        matches!(&summary, Ok(s) if s.created == 1 && s.deleted == 0),
        "unexpected summary: {summary:?}"
    );
}

#[tokio::test]
async fn rejected_create_stops_the_batch() {
    let (server, provider) = setup(ProviderConfig::new()).await;
    mount_zones(&server).await;

    Mock::given(method("POST"))
        .and(path(wapi_path("record:txt")))
        .respond_with(ResponseTemplate::new(401).set_body_string("Authorization Required"))
        .expect(1)
        .mount(&server)
        .await;

    let changes = Changes {
        create: vec![
            Endpoint::new("example.com", RecordType::Txt, ["tag"]),
            Endpoint::new("other.example.com", RecordType::Txt, ["tag"]),
        ],
        ..Changes::default()
    };
    let result = provider.apply_changes(&changes).await;

    let err = match result {
        Err(err) => err,
        Ok(summary) => panic!("expected failure, got {summary:?}"),
    };
    assert!(
        matches!(&err, CoreError::Apply { name, .. } if name == "example.com"),
        "unexpected error: {err:?}"
    );
    assert!(err.is_expected());
}
