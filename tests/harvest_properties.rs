//! Property tests: walker dedup/limit and normalizer idempotence
mod common;

use std::collections::HashSet;
use std::sync::Arc;

use common::{FakeFetcher, listing_page, listing_url, test_config};
use proptest::prelude::*;
use survey_harvester::crawling::{ListingWalker, WalkOptions};
use survey_harvester::domain::{FieldMap, normalize_fields};
use survey_harvester::infrastructure::parsing::ListingParser;
use tokio_util::sync::CancellationToken;

fn walk_pages(pages: &[Vec<u8>], limit: Option<usize>) -> Vec<String> {
    let mut fetcher = FakeFetcher::new();
    for (index, ids) in pages.iter().enumerate() {
        let ids: Vec<String> = ids.iter().map(u8::to_string).collect();
        let rows: Vec<_> = ids.iter().map(|id| (id.as_str(), "March 1, 2025", None)).collect();
        fetcher = fetcher.page(listing_url(index as u32 + 1), listing_page(&rows));
    }

    let mut config = test_config();
    config.walk.end_page = Some(pages.len() as u32);
    config.walk.limit = limit;

    let walker = ListingWalker::new(
        Arc::new(fetcher),
        ListingParser::new().unwrap(),
        WalkOptions::from_config(&config),
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    runtime
        .block_on(walker.walk(&CancellationToken::new()))
        .unwrap()
        .into_iter()
        .map(|entry| entry.id)
        .collect()
}

fn first_occurrences(pages: &[Vec<u8>]) -> Vec<String> {
    let mut seen = HashSet::new();
    pages
        .iter()
        .flatten()
        .filter(|id| seen.insert(**id))
        .map(u8::to_string)
        .collect()
}

const KEYS: &[&str] = &[
    "added_on",
    "date_added",
    "Decision",
    "status",
    "Institution",
    "university",
    "Program",
    "program",
    "result_url",
    "url",
    "Degree Type",
    "Degree",
    "Degree's Country of Origin",
    "US/International",
    "GRE",
];

fn field_maps() -> impl Strategy<Value = FieldMap> {
    prop::collection::btree_map(
        prop::sample::select(KEYS).prop_map(str::to_string),
        "[ \\t\\na-zA-Z0-9]{0,16}",
        0..10,
    )
}

proptest! {
    #[test]
    fn walker_emits_distinct_ids_in_first_seen_order(
        pages in prop::collection::vec(prop::collection::vec(0u8..20, 0..8), 1..5)
    ) {
        prop_assert_eq!(walk_pages(&pages, None), first_occurrences(&pages));
    }

    #[test]
    fn walker_never_exceeds_the_limit(
        pages in prop::collection::vec(prop::collection::vec(0u8..20, 0..8), 1..5),
        limit in 1usize..10,
    ) {
        let expected: Vec<String> = first_occurrences(&pages).into_iter().take(limit).collect();
        prop_assert_eq!(walk_pages(&pages, Some(limit)), expected);
    }

    #[test]
    fn normalization_is_idempotent(fields in field_maps()) {
        let once = normalize_fields(&fields);
        prop_assert_eq!(normalize_fields(&once), once);
    }

    #[test]
    fn canonical_values_are_never_overwritten(fields in field_maps(), status in "[a-zA-Z]{1,10}") {
        let mut fields = fields;
        fields.insert("status".to_string(), status.clone());
        fields.insert("Decision".to_string(), "Rejected".to_string());

        let normalized = normalize_fields(&fields);
        prop_assert_eq!(normalized.get("status"), Some(&status));
    }
}
