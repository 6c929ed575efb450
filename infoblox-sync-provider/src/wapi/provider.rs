//! `RecordStore` trait implementation

use async_trait::async_trait;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::request_builder::RequestKind;
use crate::traits::{ErrorContext, ProviderErrorMapper, RecordStore};
use crate::types::{QueryParams, WapiObject};

use super::WapiClient;

fn object_name(object: &WapiObject) -> Option<String> {
    let name = match object {
        WapiObject::A(r) => &r.name,
        WapiObject::Host(r) => &r.name,
        WapiObject::Cname(r) => &r.name,
        WapiObject::Txt(r) => &r.name,
        WapiObject::Ptr(r) => &r.ptrdname,
        WapiObject::Zone(z) => &z.fqdn,
    };
    Some(name.clone()).filter(|n| !n.is_empty())
}

#[async_trait]
impl RecordStore for WapiClient {
    async fn create_object(&self, object: &WapiObject) -> Result<String> {
        let request = self
            .requests
            .build(RequestKind::Create, Some(object), "", None)?;
        let ctx = ErrorContext {
            record_name: object_name(object),
            ..Default::default()
        };

        let text = self.send(request, ctx).await?;
        HttpUtils::parse_json(&text, self.provider_name())
    }

    async fn get_objects(
        &self,
        template: &WapiObject,
        reference: &str,
        query: &QueryParams,
    ) -> Result<Vec<WapiObject>> {
        let object_type = template.object_type();
        let request =
            self.requests
                .build(RequestKind::Get, Some(template), reference, Some(query))?;
        let ctx = ErrorContext {
            reference: Some(reference.to_string()).filter(|r| !r.is_empty()),
            ..Default::default()
        };

        let text = self.send(request, ctx).await?;
        HttpUtils::parse_with(&text, self.provider_name(), |t| {
            WapiObject::parse_list(object_type, t)
        })
    }

    async fn update_object(&self, object: &WapiObject, reference: &str) -> Result<String> {
        let request = self
            .requests
            .build(RequestKind::Update, Some(object), reference, None)?;
        let ctx = ErrorContext {
            record_name: object_name(object),
            reference: Some(reference.to_string()),
            ..Default::default()
        };

        let text = self.send(request, ctx).await?;
        HttpUtils::parse_json(&text, self.provider_name())
    }

    async fn delete_object(&self, reference: &str) -> Result<String> {
        let request = self
            .requests
            .build(RequestKind::Delete, None, reference, None)?;
        let ctx = ErrorContext {
            reference: Some(reference.to_string()),
            ..Default::default()
        };

        let text = self.send(request, ctx).await?;
        HttpUtils::parse_json(&text, self.provider_name())
    }
}
