//! WAPI request construction
//!
//! Turns an object, a reference and search fields into method + URL + body.
//! Read requests are refined with `_return_fields`, `_max_results` and the
//! configured regex filters; writes never carry them.

use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::error::{ProviderError, Result};
use crate::types::{ObjectType, QueryParams, WapiConfig, WapiObject};

/// Kind of call being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Create,
    Get,
    Update,
    Delete,
}

impl RequestKind {
    pub fn method(self) -> Method {
        match self {
            Self::Create => Method::POST,
            Self::Get => Method::GET,
            Self::Update => Method::PUT,
            Self::Delete => Method::DELETE,
        }
    }
}

/// A fully built request, ready to hand to the HTTP client.
#[derive(Debug, Clone)]
pub struct WapiRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<Value>,
}

/// Builds WAPI requests for one grid manager.
#[derive(Debug, Clone)]
pub struct WapiRequestBuilder {
    config: WapiConfig,
}

impl WapiRequestBuilder {
    pub fn new(config: WapiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WapiConfig {
        &self.config
    }

    fn base_url(&self) -> String {
        format!(
            "{}://{}:{}/wapi/v{}/",
            self.config.scheme, self.config.host, self.config.port, self.config.version
        )
    }

    /// Build a request.
    ///
    /// The path is `reference` when non-empty, otherwise the object's type.
    /// `query` is only honoured for reads.
    pub fn build(
        &self,
        kind: RequestKind,
        object: Option<&WapiObject>,
        reference: &str,
        query: Option<&QueryParams>,
    ) -> Result<WapiRequest> {
        let object_type = object.map(WapiObject::object_type);
        let path = match (reference, object_type) {
            ("", Some(object_type)) => object_type.as_str(),
            ("", None) => {
                return Err(ProviderError::InvalidParameter {
                    provider: "infoblox".to_string(),
                    param: "reference".to_string(),
                    detail: "either an object or a reference is required".to_string(),
                });
            }
            (reference, _) => reference,
        };

        // refs contain ':' and '=', so append instead of Url::join
        let raw = format!("{}{path}", self.base_url());
        let mut url = Url::parse(&raw).map_err(|e| ProviderError::InvalidParameter {
            provider: "infoblox".to_string(),
            param: "url".to_string(),
            detail: format!("{raw}: {e}"),
        })?;

        if let (RequestKind::Get, Some(object_type)) = (kind, object_type) {
            let pairs = self.read_pairs(object_type, query);
            if !pairs.is_empty() {
                url.query_pairs_mut().extend_pairs(pairs);
            }
        }

        let body = match (kind, object) {
            (RequestKind::Create | RequestKind::Update, Some(object)) => {
                Some(object.to_body().map_err(|e| ProviderError::SerializationError {
                    provider: "infoblox".to_string(),
                    detail: e.to_string(),
                })?)
            }
            _ => None,
        };

        Ok(WapiRequest {
            method: kind.method(),
            url,
            body,
        })
    }

    fn read_pairs(
        &self,
        object_type: ObjectType,
        query: Option<&QueryParams>,
    ) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = query
            .map(|q| {
                q.iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect()
            })
            .unwrap_or_default();

        pairs.push((
            "_return_fields".to_string(),
            object_type.return_fields().join(","),
        ));

        if self.config.max_results > 0 {
            pairs.push((
                "_max_results".to_string(),
                self.config.max_results.to_string(),
            ));
        }

        match object_type {
            ObjectType::ZoneAuth => {
                if let Some(re) = &self.config.fqdn_regex {
                    pairs.push(("fqdn~".to_string(), re.clone()));
                }
            }
            ObjectType::RecordA | ObjectType::RecordCname | ObjectType::RecordTxt => {
                if let Some(re) = &self.config.name_regex {
                    pairs.push(("name~".to_string(), re.clone()));
                }
            }
            ObjectType::RecordHost | ObjectType::RecordPtr => {}
        }

        pairs
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::types::{RecordCname, ZoneAuth};

    fn query_value(req: &WapiRequest, key: &str) -> Option<String> {
        req.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    fn builder(config: WapiConfig) -> WapiRequestBuilder {
        WapiRequestBuilder::new(config.with_scheme("http"))
    }

    #[test]
    fn fqdn_regex_only_on_zone_reads() {
        let rb = builder(WapiConfig::new("localhost", 8080).with_fqdn_regex("^staging.*test.com$"));
        let zone = WapiObject::Zone(ZoneAuth::default());

        let req = rb.build(RequestKind::Get, Some(&zone), "", Some(&QueryParams::new()));
        let req = req.unwrap_or_else(|e| panic!("build failed: {e}"));
        assert_eq!(
            query_value(&req, "fqdn~").as_deref(),
            Some("^staging.*test.com$")
        );

        let req = rb.build(RequestKind::Create, Some(&zone), "", Some(&QueryParams::new()));
        let req = req.unwrap_or_else(|e| panic!("build failed: {e}"));
        assert_eq!(query_value(&req, "fqdn~"), None);
    }

    #[test]
    fn name_regex_only_on_record_reads() {
        let rb = builder(WapiConfig::new("localhost", 8080).with_name_regex("^staging.*test.com$"));
        let cname = WapiObject::Cname(RecordCname::default());

        let req = rb.build(RequestKind::Get, Some(&cname), "", Some(&QueryParams::new()));
        let req = req.unwrap_or_else(|e| panic!("build failed: {e}"));
        assert_eq!(
            query_value(&req, "name~").as_deref(),
            Some("^staging.*test.com$")
        );

        let req = rb.build(RequestKind::Create, Some(&cname), "", Some(&QueryParams::new()));
        let req = req.unwrap_or_else(|e| panic!("build failed: {e}"));
        assert_eq!(query_value(&req, "name~"), None);

        let host = WapiObject::template(ObjectType::RecordHost);
        let req = rb.build(RequestKind::Get, Some(&host), "", None);
        let req = req.unwrap_or_else(|e| panic!("build failed: {e}"));
        assert_eq!(query_value(&req, "name~"), None);
    }

    #[test]
    fn max_results_only_on_reads() {
        let rb = builder(WapiConfig::new("localhost", 8080).with_max_results(54321));
        let cname = WapiObject::Cname(RecordCname {
            zone: "foo.bar.com".to_string(),
            ..RecordCname::default()
        });

        let req = rb.build(RequestKind::Get, Some(&cname), "", Some(&QueryParams::new()));
        let req = req.unwrap_or_else(|e| panic!("build failed: {e}"));
        assert_eq!(query_value(&req, "_max_results").as_deref(), Some("54321"));

        let req = rb.build(RequestKind::Create, Some(&cname), "", Some(&QueryParams::new()));
        let req = req.unwrap_or_else(|e| panic!("build failed: {e}"));
        assert_eq!(query_value(&req, "_max_results"), None);
        assert_eq!(req.url.query(), None);
    }

    #[test]
    fn read_url_carries_search_fields() {
        let rb = builder(WapiConfig::new("gm.local", 8443));
        let query = QueryParams::new()
            .with("zone", "example.com")
            .with("view", "Inside");
        let req = rb.build(
            RequestKind::Get,
            Some(&WapiObject::template(ObjectType::RecordA)),
            "",
            Some(&query),
        );
        let req = req.unwrap_or_else(|e| panic!("build failed: {e}"));

        assert_eq!(req.method, Method::GET);
        assert_eq!(req.url.path(), "/wapi/v2.3.1/record:a");
        assert_eq!(query_value(&req, "zone").as_deref(), Some("example.com"));
        assert_eq!(query_value(&req, "view").as_deref(), Some("Inside"));
        assert_eq!(
            query_value(&req, "_return_fields").as_deref(),
            Some("name,ipv4addr,zone,view")
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn delete_addresses_reference() {
        let rb = builder(WapiConfig::new("gm.local", 8443));
        let reference = "record:a/ZXhhbXBsZS5jb20=:example.com/default";
        let req = rb.build(RequestKind::Delete, None, reference, None);
        let req = req.unwrap_or_else(|e| panic!("build failed: {e}"));

        assert_eq!(req.method, Method::DELETE);
        assert!(req.url.as_str().ends_with(reference), "url: {}", req.url);
        assert_eq!(req.url.query(), None);
    }

    #[test]
    fn missing_target_rejected() {
        let rb = builder(WapiConfig::new("gm.local", 8443));
        let result = rb.build(RequestKind::Delete, None, "", None);
        assert!(
            matches!(&result, Err(ProviderError::InvalidParameter { param, .. }) if param == "reference"),
            "unexpected result: {result:?}"
        );
    }

    #[test]
    fn create_serializes_body() {
        let rb = builder(WapiConfig::new("gm.local", 8443));
        let cname = WapiObject::Cname(RecordCname {
            name: "bar.example.com".to_string(),
            canonical: "other.com".to_string(),
            ..RecordCname::default()
        });
        let req = rb.build(RequestKind::Create, Some(&cname), "", None);
        let req = req.unwrap_or_else(|e| panic!("build failed: {e}"));

        assert_eq!(req.method, Method::POST);
        assert_eq!(
            req.body,
            Some(serde_json::json!({ "name": "bar.example.com", "canonical": "other.com" }))
        );
    }
}
