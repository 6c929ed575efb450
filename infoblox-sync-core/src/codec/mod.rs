//! Record codec
//!
//! Translates between logical records ([`Endpoint`]) and the objects the
//! authority stores, one [`RecordKind`] per stored object type.

mod kinds;
mod reference;
mod reverse;

pub use kinds::{AKind, CnameKind, HostKind, PtrKind, RecordKind, TxtKind};
pub(crate) use kinds::unique_targets;
pub use reference::RecordReference;
pub use reverse::{parse_reverse_name, reverse_name};

use crate::error::{CoreError, CoreResult};
use crate::types::{Endpoint, RecordType};

/// Kinds queried per zone, in read order. HOST objects fold into A records.
pub fn read_kinds(create_ptr: bool) -> Vec<&'static dyn RecordKind> {
    let mut kinds = vec![
        &AKind as &'static dyn RecordKind,
        &HostKind,
        &CnameKind,
        &TxtKind,
    ];
    if create_ptr {
        kinds.push(&PtrKind);
    }
    kinds
}

/// The kind used to write records of `record_type`.
pub fn write_kind(record_type: &RecordType) -> CoreResult<&'static dyn RecordKind> {
    match record_type {
        RecordType::A => Ok(&AKind),
        RecordType::Cname => Ok(&CnameKind),
        RecordType::Txt => Ok(&TxtKind),
        RecordType::Ptr => Ok(&PtrKind),
        RecordType::Other(other) => Err(CoreError::UnsupportedRecordType(other.clone())),
    }
}

/// The PTR records mirroring an A record, one per address.
pub fn ptr_mirror(endpoint: &Endpoint) -> Vec<Endpoint> {
    kinds::unique_targets(endpoint)
        .into_iter()
        .map(|ip| Endpoint::new(endpoint.dns_name.clone(), RecordType::Ptr, [ip]))
        .collect()
}
