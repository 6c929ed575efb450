//! Record reading

use std::collections::HashSet;
use std::sync::Arc;

use infoblox_sync_provider::{ObjectType, WapiObject};

use crate::codec::{read_kinds, unique_targets, write_kind};
use crate::error::CoreResult;
use crate::resolver::{find_reverse_zone, find_zone};
use crate::services::ServiceContext;
use crate::types::{Endpoint, RecordType, Zone, PTR_RECORD_EXISTS};

/// Lists managed zones and the logical records inside them.
pub struct RecordReader {
    ctx: Arc<ServiceContext>,
}

impl RecordReader {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Managed zones.
    ///
    /// One `zone_auth` read, scoped by view only. Reverse zones bypass the
    /// domain filter when PTR mirroring is on.
    pub async fn zones(&self) -> CoreResult<Vec<Zone>> {
        let config = &self.ctx.config;
        let objects = self
            .ctx
            .store
            .get_objects(
                &WapiObject::template(ObjectType::ZoneAuth),
                "",
                &self.ctx.scoped_query(None),
            )
            .await?;

        let zones: Vec<Zone> = objects
            .into_iter()
            .filter_map(|object| match object {
                WapiObject::Zone(zone) => Some(Zone::from(zone)),
                _ => None,
            })
            .filter(|zone| {
                let in_scope = config.zone_id_filter.matches(&zone.reference)
                    && (config.domain_filter.matches(&zone.fqdn)
                        || (config.create_ptr && zone.is_reverse()));
                if !in_scope {
                    log::debug!("[infoblox] Ignoring zone {} (filtered)", zone.fqdn);
                }
                in_scope
            })
            .collect();

        log::debug!("[infoblox] {} zone(s) in scope", zones.len());
        Ok(zones)
    }

    /// Every logical record in `zones`.
    ///
    /// Per zone, every kind is read in order; A and HOST addresses sharing a
    /// name fold into one A record. Any failed read aborts the whole call.
    pub async fn records(&self, zones: &[Zone]) -> CoreResult<Vec<Endpoint>> {
        let create_ptr = self.ctx.config.create_ptr;
        let mut endpoints = Vec::new();

        for zone in zones {
            if zone.is_reverse() && !create_ptr {
                continue;
            }

            let query = self.ctx.scoped_query(Some(&zone.fqdn));
            let mut zone_records: Vec<Endpoint> = Vec::new();

            for kind in read_kinds(create_ptr) {
                let objects = self
                    .ctx
                    .store
                    .get_objects(&WapiObject::template(kind.object_type()), "", &query)
                    .await?;
                log::debug!(
                    "[infoblox] Fetched {} {} object(s) in zone {}",
                    objects.len(),
                    kind.object_type(),
                    zone.fqdn
                );

                for endpoint in objects.iter().filter_map(|o| kind.decode(o)) {
                    fold_into(&mut zone_records, endpoint);
                }
            }

            zone_records.retain(|e| !e.targets.is_empty());
            endpoints.extend(zone_records);
        }

        if create_ptr {
            mark_ptr_records(&mut endpoints);
        }

        log::debug!("[infoblox] Read {} record(s)", endpoints.len());
        Ok(endpoints)
    }
}

impl RecordReader {
    /// Stored objects backing one logical record.
    ///
    /// Each target is searched by name and value first. When that finds
    /// nothing the whole zone is read once and filtered by name locally.
    /// Records outside every managed zone have no objects.
    pub async fn lookup(&self, zones: &[Zone], endpoint: &Endpoint) -> CoreResult<Vec<WapiObject>> {
        let kind = write_kind(&endpoint.record_type)?;
        let targets = unique_targets(endpoint);

        let zone = if endpoint.record_type == RecordType::Ptr {
            targets
                .first()
                .and_then(|target| find_reverse_zone(zones, target).ok())
        } else {
            find_zone(zones, &endpoint.dns_name).ok()
        };
        let Some(zone) = zone else {
            log::debug!("[infoblox] No managed zone for {}", endpoint.dns_name);
            return Ok(Vec::new());
        };

        let template = WapiObject::template(kind.object_type());
        let mut found: Vec<WapiObject> = Vec::new();
        let mut zone_objects: Option<Vec<WapiObject>> = None;

        for target in targets {
            let mut query = self.ctx.scoped_query(Some(&zone.fqdn));
            for (key, value) in kind.search_fields(endpoint, target) {
                query = query.with(key, value);
            }
            let mut objects = self.ctx.store.get_objects(&template, "", &query).await?;

            if objects.is_empty() {
                if zone_objects.is_none() {
                    let all = self
                        .ctx
                        .store
                        .get_objects(&template, "", &self.ctx.scoped_query(Some(&zone.fqdn)))
                        .await?;
                    zone_objects = Some(all);
                }
                objects = zone_objects
                    .iter()
                    .flatten()
                    .filter(|o| {
                        kind.decode(o)
                            .is_some_and(|e| e.dns_name.eq_ignore_ascii_case(&endpoint.dns_name))
                    })
                    .cloned()
                    .collect();
            }

            for object in objects {
                if !found.contains(&object) {
                    found.push(object);
                }
            }
        }

        Ok(found)
    }
}

/// Merge a decoded record into the zone's list.
///
/// A records with the same name share one entry; every other type keeps one
/// entry per stored object. Targets are de-duplicated in first-seen order.
fn fold_into(records: &mut Vec<Endpoint>, endpoint: Endpoint) {
    let Endpoint {
        dns_name,
        record_type,
        targets,
        provider_specific,
    } = endpoint;

    let existing = if record_type == RecordType::A {
        records.iter().position(|e| {
            e.record_type == RecordType::A && e.dns_name.eq_ignore_ascii_case(&dns_name)
        })
    } else {
        None
    };

    let index = match existing {
        Some(index) => index,
        None => {
            records.push(Endpoint {
                dns_name,
                record_type,
                targets: Vec::new(),
                provider_specific,
            });
            records.len() - 1
        }
    };

    let slot = &mut records[index];
    for target in targets {
        if !target.is_empty() && !slot.targets.contains(&target) {
            slot.targets.push(target);
        }
    }
}

fn mark_ptr_records(endpoints: &mut [Endpoint]) {
    let ptr_names: HashSet<String> = endpoints
        .iter()
        .filter(|e| e.record_type == RecordType::Ptr)
        .map(|e| e.dns_name.to_ascii_lowercase())
        .collect();

    for endpoint in endpoints.iter_mut().filter(|e| e.record_type == RecordType::A) {
        let exists = ptr_names.contains(&endpoint.dns_name.to_ascii_lowercase());
        endpoint.set_provider_specific(PTR_RECORD_EXISTS, if exists { "true" } else { "false" });
    }
}
