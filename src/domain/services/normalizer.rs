//! Record normalization
//!
//! Collapses whitespace in every value and renames legacy field names to
//! their canonical form. Both steps are idempotent.

use crate::domain::constants::fields::LEGACY_RENAMES;
use crate::domain::records::{DetailRecord, FieldMap, MergedRecord};

/// Collapse runs of whitespace (newlines included) to single spaces and trim
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Return a normalized copy of `fields`
pub fn normalize_fields(fields: &FieldMap) -> FieldMap {
    let mut normalized: FieldMap = fields
        .iter()
        .map(|(key, value)| (key.clone(), collapse_whitespace(value)))
        .collect();

    for (legacy, canonical) in LEGACY_RENAMES {
        if normalized.contains_key(*canonical) {
            continue;
        }
        if let Some(value) = normalized.remove(*legacy) {
            normalized.insert((*canonical).to_string(), value);
        }
    }

    normalized
}

/// Records whose field map can be normalized
pub trait Normalize {
    #[must_use]
    fn normalized(&self) -> Self;
}

impl Normalize for DetailRecord {
    fn normalized(&self) -> Self {
        Self {
            id: self.id.clone(),
            fields: normalize_fields(&self.fields),
            error: self.error.clone(),
        }
    }
}

impl Normalize for MergedRecord {
    fn normalized(&self) -> Self {
        Self {
            id: self.id.clone(),
            fields: normalize_fields(&self.fields),
            error: self.error.as_deref().map(collapse_whitespace),
        }
    }
}
