//! Parsing configuration for HTML extraction
//!
//! Centralized selectors and patterns for the listing and detail pages.
//! Everything a parser matches on is passed in from here.

use serde::{Deserialize, Serialize};

/// Main parsing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ParsingConfig {
    /// Survey listing selectors and patterns
    pub listing: ListingSelectors,

    /// Result detail selectors
    pub detail: DetailSelectors,
}

/// Selectors and patterns for survey listing pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSelectors {
    /// Table rows scanned for results
    pub row: String,

    /// Link to a result detail page inside a row
    pub result_link: String,

    /// Captures the numeric result id from a link target
    pub result_id_pattern: String,

    /// Recognizable "added on" date inside the date cell
    pub date_pattern: String,

    /// Season followed by a four-digit year
    pub term_pattern: String,

    /// Class carried by the chip rows that follow a result row
    pub term_row_class: String,

    /// Direct `td` cells a row needs to count as a result row
    pub min_cells: usize,

    /// Zero-based index of the "added on" cell
    pub date_cell_index: usize,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            row: "tbody tr".to_string(),
            result_link: r#"a[href*="/result/"]"#.to_string(),
            result_id_pattern: r"/result/(\d+)\b".to_string(),
            date_pattern: r"[A-Z][a-z]+ \d{1,2}, \d{4}".to_string(),
            term_pattern: r"\b(Spring|Summer|Fall|Winter)\s+\d{4}\b".to_string(),
            term_row_class: "tw-border-none".to_string(),
            min_cells: 3,
            date_cell_index: 2,
        }
    }
}

/// Selectors for result detail pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailSelectors {
    /// Definition-list blocks (`dt`/`dd` pairs wrapped in direct `div` children)
    pub definition_list: String,

    /// Items of the flagged list holding label/value span pairs
    pub labeled_list_item: String,
}

impl Default for DetailSelectors {
    fn default() -> Self {
        Self {
            definition_list: "dl".to_string(),
            labeled_list_item: "ul.tw-list-none > li".to_string(),
        }
    }
}
