//! Result detail parser
//!
//! Two extraction passes over one detail page, merged into a single flat map:
//!
//! 1. definition lists: `dl > div` rows holding a `dt` label and a `dd` value
//! 2. labeled lists: items of the flagged `ul` with a label span and a value span
//!
//! The second pass wins when both touch the same key. Labels are kept exactly
//! as they appear on the page; renaming happens later in the normalizer.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::config::DetailSelectors;
use super::{
    ContextualParser, DetailParseContext, ParsingResult, child_elements, compile_selector,
    joined_text,
};
use crate::domain::constants::fields;
use crate::domain::records::FieldMap;

/// Parser for result detail pages
pub struct DetailParser {
    definition_list: Selector,
    labeled_list_item: Selector,
    dt: Selector,
    dd: Selector,
    span: Selector,
}

impl DetailParser {
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&DetailSelectors::default())
    }

    pub fn with_config(selectors: &DetailSelectors) -> ParsingResult<Self> {
        Ok(Self {
            definition_list: compile_selector(&selectors.definition_list)?,
            labeled_list_item: compile_selector(&selectors.labeled_list_item)?,
            dt: compile_selector("dt")?,
            dd: compile_selector("dd")?,
            span: compile_selector("span")?,
        })
    }

    /// Pass A: only the direct `div` children of each list are read
    fn extract_from_definition_lists(&self, html: &Html, data: &mut FieldMap) {
        for list in html.select(&self.definition_list) {
            for row in child_elements(list, "div") {
                let (Some(label), Some(value)) = (row.select(&self.dt).next(), row.select(&self.dd).next())
                else {
                    continue;
                };
                insert_pair(data, joined_text(label, ""), joined_text(value, " "));
            }
        }
    }

    /// Pass B: first span is the label, last span the value
    fn extract_from_labeled_lists(&self, html: &Html, data: &mut FieldMap) {
        for item in html.select(&self.labeled_list_item) {
            let spans: Vec<ElementRef<'_>> = item.select(&self.span).collect();
            let (Some(label), Some(value)) = (spans.first(), spans.last()) else {
                continue;
            };
            let label = joined_text(*label, "");
            let label = label.trim_end_matches(':').trim_end().to_string();
            insert_pair(data, label, joined_text(*value, ""));
        }
    }
}

fn insert_pair(data: &mut FieldMap, label: String, value: String) {
    if label.is_empty() || value.is_empty() {
        return;
    }
    data.insert(label, value);
}

impl ContextualParser for DetailParser {
    type Output = FieldMap;
    type Context = DetailParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> Self::Output {
        let mut data = FieldMap::new();
        self.extract_from_definition_lists(html, &mut data);
        self.extract_from_labeled_lists(html, &mut data);

        if data.is_empty() {
            debug!("No detail fields found for result {} ({})", context.id, context.url);
        } else {
            debug!("Extracted {} detail fields for result {}", data.len(), context.id);
        }

        data.insert(fields::ID.to_string(), context.id.clone());
        data
    }
}
