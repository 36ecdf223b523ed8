//! Parsing context for HTML extraction
//!
//! Carries per-page information a parser needs but cannot read from markup.

/// Context for one listing page
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// Listing page number being parsed
    pub page: u32,

    /// Base URL for resolving relative result links
    pub base_url: String,
}

impl ParseContext {
    pub fn new(page: u32, base_url: impl Into<String>) -> Self {
        Self {
            page,
            base_url: base_url.into(),
        }
    }
}

/// Context for one result detail page
#[derive(Debug, Clone)]
pub struct DetailParseContext {
    /// Result id the page belongs to
    pub id: String,

    /// Detail page URL, for diagnostics
    pub url: String,
}

impl DetailParseContext {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }
}
