//! Deterministic record references
//!
//! `<type>/<base64(name)>:<discriminator>/default`. For forward records the
//! discriminator is the record name; PTR references carry the ptrdname in the
//! base64 part and the reverse-lookup name as discriminator.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use regex::Regex;

use infoblox_sync_provider::ObjectType;

use crate::error::{CoreError, CoreResult};

#[allow(clippy::unwrap_used)]
static REFERENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^/]+)/([^:]+):([^/]+)/default$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordReference {
    object_type: ObjectType,
    name: String,
    discriminator: String,
}

impl RecordReference {
    pub fn new(
        object_type: ObjectType,
        name: impl Into<String>,
        discriminator: impl Into<String>,
    ) -> Self {
        Self {
            object_type,
            name: name.into(),
            discriminator: discriminator.into(),
        }
    }

    /// Reference of a forward record, discriminated by its own name.
    pub fn forward(object_type: ObjectType, name: &str) -> Self {
        Self::new(object_type, name, name)
    }

    /// Reference of a PTR record.
    pub fn ptr(ptrdname: &str, reverse_name: &str) -> Self {
        Self::new(ObjectType::RecordPtr, ptrdname, reverse_name)
    }

    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }

    /// Render the reference, refusing one that would not parse back to itself.
    pub fn to_checked_string(&self) -> CoreResult<String> {
        let rendered = self.to_string();
        match rendered.parse::<Self>() {
            Ok(parsed) if parsed == *self => Ok(rendered),
            _ => Err(CoreError::InvalidReference(rendered)),
        }
    }
}

impl fmt::Display for RecordReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}:{}/default",
            self.object_type,
            STANDARD.encode(&self.name),
            self.discriminator
        )
    }
}

impl FromStr for RecordReference {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidReference(s.to_string());
        let caps = REFERENCE_RE.captures(s).ok_or_else(invalid)?;

        let object_type: ObjectType = caps[1].parse().map_err(|_| invalid())?;
        let name = STANDARD
            .decode(&caps[2])
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .ok_or_else(invalid)?;

        Ok(Self::new(object_type, name, &caps[3]))
    }
}
