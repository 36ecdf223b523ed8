//! Record entities produced by one harvesting run
//!
//! `ListingEntry` comes out of the listing walk, `DetailRecord` out of the
//! detail stage and `MergedRecord` is the union handed to downstream consumers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::constants::fields;

/// Flat field name → value mapping
pub type FieldMap = BTreeMap<String, String>;

/// One item discovered on a listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    /// Numeric result id taken from the item URL
    pub id: String,
    /// Absolute detail page URL
    pub url: String,
    /// "Added on" cell value
    pub added_on: Option<String>,
    /// Term chip such as "Fall 2025"
    pub term: Option<String>,
}

impl ListingEntry {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            added_on: None,
            term: None,
        }
    }

    pub fn with_added_on(mut self, added_on: impl Into<String>) -> Self {
        self.added_on = Some(added_on.into());
        self
    }

    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = Some(term.into());
        self
    }

    /// Listing fields as a map; absent values are left out
    pub fn to_fields(&self) -> FieldMap {
        let mut map = FieldMap::new();
        map.insert(fields::ID.to_string(), self.id.clone());
        map.insert(fields::URL.to_string(), self.url.clone());
        if let Some(added_on) = &self.added_on {
            map.insert(fields::ADDED_ON.to_string(), added_on.clone());
        }
        if let Some(term) = &self.term {
            map.insert(fields::TERM.to_string(), term.clone());
        }
        map
    }
}

impl fmt::Display for ListingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.url)
    }
}

/// Fields scraped from one detail page, or the reason they could not be
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub id: String,
    pub fields: FieldMap,
    pub error: Option<String>,
}

impl DetailRecord {
    pub fn new(id: impl Into<String>, fields: FieldMap) -> Self {
        Self {
            id: id.into(),
            fields,
            error: None,
        }
    }

    /// Degraded record for a detail page that could not be retrieved
    pub fn failed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: FieldMap::new(),
            error: Some(reason.into()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Listing entry combined with its detail fields
///
/// Serialized flat; on the way back in, `id` is recovered from the `id` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FlatMergedRecord")]
pub struct MergedRecord {
    #[serde(skip)]
    pub id: String,
    #[serde(flatten)]
    pub fields: FieldMap,
    #[serde(
        rename = "detail_error",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<String>,
}

#[derive(Deserialize)]
struct FlatMergedRecord {
    #[serde(flatten)]
    fields: FieldMap,
    #[serde(rename = "detail_error", default)]
    error: Option<String>,
}

impl From<FlatMergedRecord> for MergedRecord {
    fn from(flat: FlatMergedRecord) -> Self {
        Self {
            id: flat.fields.get(fields::ID).cloned().unwrap_or_default(),
            fields: flat.fields,
            error: flat.error,
        }
    }
}

impl MergedRecord {
    /// Attempted but incomplete: the detail stage failed for this id
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }
}
