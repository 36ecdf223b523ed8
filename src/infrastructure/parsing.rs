//! HTML parsing infrastructure
//!
//! Trait-based parsers for survey listing pages and result detail pages,
//! plus the text helpers both of them share.

pub mod config;
pub mod context;
pub mod detail_parser;
pub mod error;
pub mod listing_parser;

// Re-export public types
pub use config::{DetailSelectors, ListingSelectors, ParsingConfig};
pub use context::{DetailParseContext, ParseContext};
pub use detail_parser::DetailParser;
pub use error::{ParsingError, ParsingResult};
pub use listing_parser::{ListingParser, ListingRow};

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Parser over an already-built document with contextual information
pub trait ContextualParser {
    type Output;
    type Context;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> Self::Output;

    /// Parse raw page bytes; invalid UTF-8 is replaced rather than rejected
    fn parse_bytes(&self, body: &[u8], context: &Self::Context) -> Self::Output {
        let document = Html::parse_document(&String::from_utf8_lossy(body));
        self.parse_with_context(&document, context)
    }
}

pub(crate) fn compile_selector(selector: &str) -> ParsingResult<Selector> {
    Selector::parse(selector).map_err(|e| ParsingError::invalid_selector(selector, e))
}

pub(crate) fn compile_pattern(name: &str, pattern: &str) -> ParsingResult<Regex> {
    Regex::new(pattern).map_err(|e| ParsingError::invalid_pattern(name, pattern, e))
}

/// Text pieces of `element`, each trimmed, empty pieces dropped, joined by `separator`
pub(crate) fn joined_text(element: ElementRef<'_>, separator: &str) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Direct element children of `element` with the given tag name
pub(crate) fn child_elements<'a>(
    element: ElementRef<'a>,
    tag: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| child.value().name() == tag)
}
