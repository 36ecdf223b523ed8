//! Survey listing parser
//!
//! Extracts one `ListingRow` per qualifying result row of a listing page.
//! Decorative rows, rows without a result link and unresolvable links are
//! skipped; a missing date or term is recorded as `None`.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use super::config::ListingSelectors;
use super::{
    ContextualParser, ParseContext, ParsingResult, child_elements, compile_pattern, compile_selector,
    joined_text,
};
use crate::domain::records::ListingEntry;
use crate::infrastructure::parsing_error::ParsingError;

/// Raw row extracted from a listing page, before deduplication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    pub id: String,
    pub url: String,
    pub added_on: Option<String>,
    pub term: Option<String>,
}

impl From<ListingRow> for ListingEntry {
    fn from(row: ListingRow) -> Self {
        Self {
            id: row.id,
            url: row.url,
            added_on: row.added_on,
            term: row.term,
        }
    }
}

/// Parser for survey listing pages
pub struct ListingParser {
    row_selector: Selector,
    link_selector: Selector,
    result_id: Regex,
    date: Regex,
    term: Regex,
    term_row_class: String,
    min_cells: usize,
    date_cell_index: usize,
}

impl ListingParser {
    /// Create a listing parser with the default selectors
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ListingSelectors::default())
    }

    pub fn with_config(selectors: &ListingSelectors) -> ParsingResult<Self> {
        if selectors.date_cell_index >= selectors.min_cells {
            return Err(ParsingError::ConfigurationError {
                message: format!(
                    "date cell index {} is outside the {} required cells",
                    selectors.date_cell_index, selectors.min_cells
                ),
                field: "date_cell_index".to_string(),
            });
        }

        Ok(Self {
            row_selector: compile_selector(&selectors.row)?,
            link_selector: compile_selector(&selectors.result_link)?,
            result_id: compile_pattern("result_id", &selectors.result_id_pattern)?,
            date: compile_pattern("date", &selectors.date_pattern)?,
            term: compile_pattern("term", &selectors.term_pattern)?,
            term_row_class: selectors.term_row_class.clone(),
            min_cells: selectors.min_cells,
            date_cell_index: selectors.date_cell_index,
        })
    }

    fn extract_row(&self, row: ElementRef<'_>, context: &ParseContext) -> Option<ListingRow> {
        let cells: Vec<ElementRef<'_>> = child_elements(row, "td").collect();
        if cells.len() < self.min_cells {
            return None;
        }

        let href = row.select(&self.link_selector).next()?.value().attr("href")?;
        let id = self.result_id.captures(href)?.get(1)?.as_str().to_string();

        let url = match resolve_url(href, &context.base_url) {
            Ok(url) => url,
            Err(e) => {
                warn!("Skipping result {} on page {}: {}", id, context.page, e);
                return None;
            }
        };

        Some(ListingRow {
            id,
            url,
            added_on: self.extract_added_on(cells[self.date_cell_index]),
            term: self.extract_term(row),
        })
    }

    /// Date match, else the full cell text, else nothing
    fn extract_added_on(&self, cell: ElementRef<'_>) -> Option<String> {
        let text = joined_text(cell, " ");
        if let Some(found) = self.date.find(&text) {
            return Some(found.as_str().to_string());
        }
        Some(text).filter(|t| !t.is_empty())
    }

    /// Term chip from the detail rows that follow `row`, up to the next result row
    fn extract_term(&self, row: ElementRef<'_>) -> Option<String> {
        let following_rows = row
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .filter(|sibling| sibling.value().name() == "tr");

        for sibling in following_rows {
            if child_elements(sibling, "td").count() >= self.min_cells {
                break;
            }
            let is_term_row = sibling
                .value()
                .classes()
                .any(|class| class == self.term_row_class);
            if !is_term_row {
                continue;
            }
            let term = sibling
                .text()
                .find_map(|piece| self.term.find(piece).map(|m| m.as_str().to_string()));
            if term.is_some() {
                return term;
            }
        }
        None
    }
}

impl ContextualParser for ListingParser {
    type Output = Vec<ListingRow>;
    type Context = ParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> Self::Output {
        let rows: Vec<ListingRow> = html
            .select(&self.row_selector)
            .filter_map(|row| self.extract_row(row, context))
            .collect();

        debug!("Extracted {} result rows from page {}", rows.len(), context.page);
        rows
    }
}

/// Resolve a link target against the listing base URL
fn resolve_url(href: &str, base_url: &str) -> ParsingResult<String> {
    let base = Url::parse(base_url)
        .map_err(|e| ParsingError::url_resolution_failed(base_url, format!("Invalid base URL: {e}"), None))?;

    base.join(href)
        .map(|url| url.to_string())
        .map_err(|e| ParsingError::url_resolution_failed(href, format!("Failed to join URL: {e}"), Some(base_url)))
}
