//! Listing/detail merge
//!
//! Output order is the listing discovery order. Detail values win on key
//! collision, and every listing entry yields exactly one merged record.

use std::collections::HashMap;

use crate::domain::records::{DetailRecord, ListingEntry, MergedRecord};

pub fn merge(entries: &[ListingEntry], details: Vec<DetailRecord>) -> Vec<MergedRecord> {
    let mut by_id: HashMap<String, DetailRecord> = details
        .into_iter()
        .map(|record| (record.id.clone(), record))
        .collect();

    entries
        .iter()
        .map(|entry| {
            let mut fields = entry.to_fields();
            let error = match by_id.remove(&entry.id) {
                Some(detail) => {
                    fields.extend(detail.fields);
                    detail.error
                }
                None => None,
            };

            MergedRecord {
                id: entry.id.clone(),
                fields,
                error,
            }
        })
        .collect()
}
