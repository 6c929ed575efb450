//! Change application
//!
//! Applies one batch in five phases: deletes, changed update-olds, creates,
//! changed update-news, then PTR mirrors claimed by otherwise unchanged A
//! records. Record-level problems (bad address, unsupported type,
//! no owning zone) skip that record; a failed store call aborts the batch.

use std::net::IpAddr;
use std::sync::Arc;

use infoblox_sync_provider::{ObjectType, WapiObject};

use crate::codec::{ptr_mirror, write_kind, HostKind, PtrKind, RecordKind, RecordReference};
use crate::error::{CoreError, CoreResult};
use crate::resolver::{find_reverse_zone, find_zone};
use crate::services::ServiceContext;
use crate::types::{Changes, Endpoint, RecordType, Zone, PTR_RECORD_EXISTS};

/// Counts of what a batch did (or would do, in dry-run mode).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub created: usize,
    pub deleted: usize,
    pub skipped: usize,
}

fn record_label(object_type: ObjectType) -> &'static str {
    match object_type {
        ObjectType::RecordA => "A",
        ObjectType::RecordHost => "HOST",
        ObjectType::RecordCname => "CNAME",
        ObjectType::RecordTxt => "TXT",
        ObjectType::RecordPtr => "PTR",
        ObjectType::ZoneAuth => "zone",
    }
}

fn describe(object: &WapiObject) -> String {
    match object {
        WapiObject::A(a) => format!("{} -> {}", a.name, a.ipv4addr),
        WapiObject::Host(h) => h.name.clone(),
        WapiObject::Cname(c) => format!("{} -> {}", c.name, c.canonical),
        WapiObject::Txt(t) => format!("{} -> \"{}\"", t.name, t.text),
        WapiObject::Ptr(p) => format!("{} -> {}", p.name, p.ptrdname),
        WapiObject::Zone(z) => z.fqdn.clone(),
    }
}

/// Writes change batches to the record store.
pub struct ChangeApplier {
    ctx: Arc<ServiceContext>,
}

impl ChangeApplier {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Apply one batch.
    ///
    /// Stops at the first store failure; mutations already made stay made.
    pub async fn apply(&self, zones: &[Zone], changes: &Changes) -> CoreResult<ApplySummary> {
        let mut summary = ApplySummary::default();
        let updates = self.changed_updates(zones, changes);
        let ptr_claims = self.ptr_claims(changes);

        for endpoint in &changes.delete {
            self.delete_record(zones, endpoint, &mut summary).await?;
        }
        for (old, _) in &updates {
            self.delete_record(zones, old, &mut summary).await?;
        }
        for endpoint in &changes.create {
            self.create_record(zones, endpoint, &mut summary).await?;
        }
        for (_, new) in &updates {
            self.create_record(zones, new, &mut summary).await?;
        }
        for endpoint in ptr_claims {
            self.create_mirror(zones, endpoint, &mut summary).await?;
        }

        log::info!(
            "[infoblox] {}Applied changes: {} created, {} deleted, {} skipped",
            self.dry_run_prefix(),
            summary.created,
            summary.deleted,
            summary.skipped
        );
        Ok(summary)
    }

    fn dry_run_prefix(&self) -> &'static str {
        if self.ctx.config.dry_run {
            "[dry-run] "
        } else {
            ""
        }
    }

    /// Update pairs that actually change something and whose new record is in scope.
    fn changed_updates<'a>(
        &self,
        zones: &[Zone],
        changes: &'a Changes,
    ) -> Vec<(&'a Endpoint, &'a Endpoint)> {
        if changes.update_old.len() != changes.update_new.len() {
            log::warn!(
                "[infoblox] Update lists differ in length ({} old, {} new), unpaired entries ignored",
                changes.update_old.len(),
                changes.update_new.len()
            );
        }

        changes
            .update_old
            .iter()
            .zip(&changes.update_new)
            .filter(|(old, new)| {
                if old.same_record(new) {
                    log::debug!(
                        "[infoblox] {} {} unchanged, nothing to update",
                        new.record_type,
                        new.dns_name
                    );
                    return false;
                }
                let placed =
                    write_kind(&new.record_type).and_then(|kind| self.placements(zones, kind, new));
                !matches!(placed, Ok(placed) if placed.is_empty())
            })
            .collect()
    }

    /// New A records of unchanged update pairs that now claim a PTR the old
    /// record did not have. Only meaningful with PTR mirroring on.
    fn ptr_claims<'a>(&self, changes: &'a Changes) -> Vec<&'a Endpoint> {
        if !self.ctx.config.create_ptr {
            return Vec::new();
        }
        changes
            .update_old
            .iter()
            .zip(&changes.update_new)
            .filter(|(old, new)| {
                new.record_type == RecordType::A
                    && old.same_record(new)
                    && new.get_provider_specific(PTR_RECORD_EXISTS) == Some("true")
                    && old.get_provider_specific(PTR_RECORD_EXISTS) != Some("true")
            })
            .map(|(_, new)| new)
            .collect()
    }

    /// Split a record into (record, owning zone) pairs.
    ///
    /// Forward kinds map the record to one zone. For the PTR kind the record
    /// is split per address, each placed in the reverse zone containing it.
    /// Empty means out of scope.
    fn placements<'z>(
        &self,
        zones: &'z [Zone],
        kind: &dyn RecordKind,
        endpoint: &Endpoint,
    ) -> CoreResult<Vec<(Endpoint, &'z Zone)>> {
        if kind.record_type() != RecordType::Ptr {
            return Ok(match find_zone(zones, &endpoint.dns_name) {
                Ok(zone) => vec![(endpoint.clone(), zone)],
                Err(e) => {
                    log::debug!("[infoblox] Skipping {} {}: {e}", endpoint.record_type, endpoint.dns_name);
                    Vec::new()
                }
            });
        }

        let mut placed = Vec::new();
        for single in ptr_mirror(endpoint) {
            let Some(address) = single.targets.first() else {
                continue;
            };
            if address.parse::<IpAddr>().is_err() {
                return Err(CoreError::InvalidAddress(address.clone()));
            }
            match find_reverse_zone(zones, address) {
                Ok(zone) => placed.push((single, zone)),
                Err(_) => log::debug!(
                    "[infoblox] Skipping PTR {} -> {address}: no reverse zone",
                    single.dns_name
                ),
            }
        }
        Ok(placed)
    }

    fn encode_in_scope(
        &self,
        zones: &[Zone],
        kind: &dyn RecordKind,
        endpoint: &Endpoint,
    ) -> CoreResult<Vec<WapiObject>> {
        let view = self.ctx.config.view();
        let mut objects = Vec::new();
        for (record, zone) in self.placements(zones, kind, endpoint)? {
            objects.extend(kind.encode(&record, zone, view)?);
        }
        Ok(objects)
    }

    fn references_in_scope(
        &self,
        zones: &[Zone],
        kind: &dyn RecordKind,
        endpoint: &Endpoint,
    ) -> CoreResult<Vec<RecordReference>> {
        let mut references = Vec::new();
        for (record, _) in self.placements(zones, kind, endpoint)? {
            references.extend(kind.references(&record)?);
        }
        Ok(references)
    }

    async fn create_record(
        &self,
        zones: &[Zone],
        endpoint: &Endpoint,
        summary: &mut ApplySummary,
    ) -> CoreResult<()> {
        let planned = write_kind(&endpoint.record_type)
            .and_then(|kind| self.encode_in_scope(zones, kind, endpoint));
        let mut objects = match planned {
            Ok(objects) => objects,
            Err(e) => {
                log::warn!("[infoblox] Skipping {} {}: {e}", endpoint.record_type, endpoint.dns_name);
                summary.skipped += 1;
                return Ok(());
            }
        };

        if objects.is_empty() {
            summary.skipped += 1;
            return Ok(());
        }

        if self.ctx.config.create_ptr && endpoint.record_type == RecordType::A {
            match self.encode_in_scope(zones, &PtrKind, endpoint) {
                Ok(mirror) => objects.extend(mirror),
                Err(e) => log::warn!("[infoblox] Not mirroring {}: {e}", endpoint.dns_name),
            }
        }

        for object in &objects {
            self.create_object(endpoint, object).await?;
            summary.created += 1;
        }
        Ok(())
    }

    /// Create only the PTR mirrors of an A record.
    async fn create_mirror(
        &self,
        zones: &[Zone],
        endpoint: &Endpoint,
        summary: &mut ApplySummary,
    ) -> CoreResult<()> {
        let objects = match self.encode_in_scope(zones, &PtrKind, endpoint) {
            Ok(objects) if !objects.is_empty() => objects,
            Ok(_) => {
                summary.skipped += 1;
                return Ok(());
            }
            Err(e) => {
                log::warn!("[infoblox] Not mirroring {}: {e}", endpoint.dns_name);
                summary.skipped += 1;
                return Ok(());
            }
        };

        for object in &objects {
            self.create_object(endpoint, object).await?;
            summary.created += 1;
        }
        Ok(())
    }

    async fn create_object(&self, endpoint: &Endpoint, object: &WapiObject) -> CoreResult<()> {
        let label = record_label(object.object_type());

        if self.ctx.config.dry_run {
            log::info!("[infoblox] [dry-run] Would create {label} record {}", describe(object));
            return Ok(());
        }

        match self.ctx.store.create_object(object).await {
            Ok(reference) => {
                log::info!("[infoblox] Created {label} record {} ({reference})", describe(object));
                Ok(())
            }
            Err(e) => {
                if e.is_expected() {
                    log::warn!("[infoblox] Failed to create {label} record {}: {e}", describe(object));
                } else {
                    log::error!("[infoblox] Failed to create {label} record {}: {e}", describe(object));
                }
                Err(CoreError::Apply {
                    operation: "create",
                    record_type: label.to_string(),
                    name: endpoint.dns_name.clone(),
                    source: e,
                })
            }
        }
    }

    async fn delete_record(
        &self,
        zones: &[Zone],
        endpoint: &Endpoint,
        summary: &mut ApplySummary,
    ) -> CoreResult<()> {
        let planned = write_kind(&endpoint.record_type)
            .and_then(|kind| self.references_in_scope(zones, kind, endpoint));
        let references = match planned {
            Ok(references) if !references.is_empty() => references,
            Ok(_) => {
                summary.skipped += 1;
                return Ok(());
            }
            Err(e) => {
                log::warn!("[infoblox] Skipping {} {}: {e}", endpoint.record_type, endpoint.dns_name);
                summary.skipped += 1;
                return Ok(());
            }
        };

        // (reference, may be absent): the HOST lookup is a guess
        let mut planned: Vec<(RecordReference, bool)> =
            references.into_iter().map(|r| (r, false)).collect();
        if endpoint.record_type == RecordType::A {
            planned.extend(HostKind.references(endpoint)?.into_iter().map(|r| (r, true)));
            if self.ctx.config.create_ptr {
                match self.references_in_scope(zones, &PtrKind, endpoint) {
                    Ok(mirror) => planned.extend(mirror.into_iter().map(|r| (r, false))),
                    Err(e) => log::warn!("[infoblox] Not removing PTR of {}: {e}", endpoint.dns_name),
                }
            }
        }

        for (reference, speculative) in &planned {
            let rendered = match reference.to_checked_string() {
                Ok(rendered) => rendered,
                Err(e) => {
                    log::warn!("[infoblox] Skipping delete of {}: {e}", endpoint.dns_name);
                    continue;
                }
            };
            let removed = self
                .delete_reference(endpoint, reference.object_type(), &rendered)
                .await?;
            // a dry run cannot tell whether the HOST object exists
            if removed && !(*speculative && self.ctx.config.dry_run) {
                summary.deleted += 1;
            }
        }
        Ok(())
    }

    /// Remove one object. A reference that no longer exists counts as done.
    async fn delete_reference(
        &self,
        endpoint: &Endpoint,
        object_type: ObjectType,
        reference: &str,
    ) -> CoreResult<bool> {
        let label = record_label(object_type);

        if self.ctx.config.dry_run {
            log::info!(
                "[infoblox] [dry-run] Would delete {label} record {} ({reference})",
                endpoint.dns_name
            );
            return Ok(true);
        }

        match self.ctx.store.delete_object(reference).await {
            Ok(_) => {
                log::info!("[infoblox] Deleted {label} record {} ({reference})", endpoint.dns_name);
                Ok(true)
            }
            Err(e) if e.is_not_found() => {
                log::debug!("[infoblox] {label} record {} already absent", endpoint.dns_name);
                Ok(false)
            }
            Err(e) => {
                if e.is_expected() {
                    log::warn!("[infoblox] Failed to delete {label} record {}: {e}", endpoint.dns_name);
                } else {
                    log::error!("[infoblox] Failed to delete {label} record {}: {e}", endpoint.dns_name);
                }
                Err(CoreError::Apply {
                    operation: "delete",
                    record_type: label.to_string(),
                    name: endpoint.dns_name.clone(),
                    source: e,
                })
            }
        }
    }
}
