//! Provider configuration
//!
//! Everything here is fixed at construction; the engine never mutates it.

use serde::{Deserialize, Serialize};

use crate::utils::IpNetwork;

fn normalize(entry: &str) -> String {
    entry.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// Names (or CIDR blocks) the engine is allowed to manage.
///
/// Empty means everything. A domain entry matches itself and every name below
/// it; an entry with a leading dot only matches names below it. A CIDR entry
/// matches any CIDR zone it contains.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainFilter(Vec<String>);

impl DomainFilter {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            entries
                .into_iter()
                .map(|e| normalize(e.as_ref()))
                .filter(|e| !e.is_empty() && e != ".")
                .collect(),
        )
    }

    pub fn entries(&self) -> &[String] {
        &self.0
    }

    fn is_unrestricted(&self) -> bool {
        self.0.iter().all(|e| normalize(e).is_empty())
    }

    pub fn matches(&self, name: &str) -> bool {
        if self.is_unrestricted() {
            return true;
        }
        let name = normalize(name);
        let network = name.parse::<IpNetwork>().ok();

        self.0.iter().map(|e| normalize(e)).any(|entry| {
            if let (Ok(block), Some(zone)) = (entry.parse::<IpNetwork>(), network.as_ref()) {
                return block.contains_network(zone);
            }
            match entry.strip_prefix('.') {
                Some(parent) => name.ends_with(&format!(".{parent}")),
                None => name == entry || name.ends_with(&format!(".{entry}")),
            }
        })
    }
}

/// Zone references the engine is allowed to manage, matched by suffix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneIdFilter(Vec<String>);

impl ZoneIdFilter {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            entries
                .into_iter()
                .map(Into::into)
                .filter(|e| !e.is_empty())
                .collect(),
        )
    }

    pub fn matches(&self, reference: &str) -> bool {
        let mut entries = self.0.iter().filter(|e| !e.is_empty()).peekable();
        if entries.peek().is_none() {
            return true;
        }
        entries.any(|suffix| reference.ends_with(suffix.as_str()))
    }
}

/// Engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    pub domain_filter: DomainFilter,
    pub zone_id_filter: ZoneIdFilter,
    /// DNS view; empty means the authority's default view
    pub view: String,
    /// Log mutations instead of performing them
    pub dry_run: bool,
    /// Mirror every A record with a PTR in the enclosing reverse zone
    pub create_ptr: bool,
}

impl ProviderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_domain_filter(mut self, filter: DomainFilter) -> Self {
        self.domain_filter = filter;
        self
    }

    #[must_use]
    pub fn with_zone_id_filter(mut self, filter: ZoneIdFilter) -> Self {
        self.zone_id_filter = filter;
        self
    }

    #[must_use]
    pub fn with_view(mut self, view: impl Into<String>) -> Self {
        self.view = view.into();
        self
    }

    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[must_use]
    pub fn with_create_ptr(mut self, create_ptr: bool) -> Self {
        self.create_ptr = create_ptr;
        self
    }

    /// The configured view as given, `None` when it is blank.
    pub fn view(&self) -> Option<&str> {
        Some(self.view.as_str()).filter(|v| !v.trim().is_empty())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_matches_everything() {
        assert!(DomainFilter::default().matches("anything.org"));
        assert!(DomainFilter::new([""]).matches("example.com"));
        assert!(DomainFilter::new(["", ""]).matches("1.2.3.0/24"));
    }

    #[test]
    fn domain_entries_match_suffix() {
        let filter = DomainFilter::new(["Example.com."]);
        assert!(filter.matches("example.com"));
        assert!(filter.matches("foo.EXAMPLE.com"));
        assert!(filter.matches("a.b.example.com."));
        assert!(!filter.matches("nomatch-example.com"));
        assert!(!filter.matches("other.com"));
    }

    #[test]
    fn leading_dot_matches_only_subdomains() {
        let filter = DomainFilter::new([".example.com"]);
        assert!(!filter.matches("example.com"));
        assert!(filter.matches("foo.example.com"));
    }

    #[test]
    fn cidr_entries_match_contained_zones() {
        let filter = DomainFilter::new(["10.0.0.0/8"]);
        assert!(filter.matches("10.0.0.0/8"));
        assert!(filter.matches("10.1.0.0/16"));
        assert!(!filter.matches("1.2.3.0/24"));
        assert!(!filter.matches("example.com"));
    }

    #[test]
    fn zone_id_filter_matches_suffix() {
        assert!(ZoneIdFilter::default().matches("zone_auth/abc:example.com/default"));
        assert!(ZoneIdFilter::new([""]).matches("zone_auth/abc:example.com/default"));

        let filter = ZoneIdFilter::new(["example.com/default"]);
        assert!(filter.matches("zone_auth/abc:example.com/default"));
        assert!(!filter.matches("zone_auth/def:other.com/default"));
    }

    #[test]
    fn view_is_verbatim_unless_blank() {
        assert_eq!(ProviderConfig::new().view(), None);
        assert_eq!(ProviderConfig::new().with_view("  ").view(), None);
        assert_eq!(ProviderConfig::new().with_view("Inside").view(), Some("Inside"));
        assert_eq!(ProviderConfig::new().with_view(" Inside ").view(), Some(" Inside "));
    }

    #[test]
    fn deserializes_camel_case_with_defaults() {
        let json = r#"{ "domainFilter": ["example.com"], "createPtr": true }"#;
        let config: Result<ProviderConfig, _> = serde_json::from_str(json);
        let config = config.unwrap_or_else(|e| panic!("deserialize failed: {e}"));

        assert!(config.create_ptr);
        assert!(!config.dry_run);
        assert_eq!(config.domain_filter.entries(), ["example.com".to_string()]);
        assert_eq!(config.view(), None);
    }
}
