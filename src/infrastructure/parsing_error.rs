//! Parsing error types
//!
//! Errors raised while building parsers or resolving extracted links. A row or
//! field that is simply absent from a page is not an error; parsers skip it.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Invalid pattern '{name}': {pattern} - {reason}")]
    InvalidPattern {
        name: String,
        pattern: String,
        reason: String,
    },

    #[error("URL resolution failed: {url} - {reason}")]
    UrlResolutionFailed {
        url: String,
        reason: String,
        base_url: Option<String>,
    },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String, field: String },
}

impl ParsingError {
    pub fn invalid_selector(selector: &str, reason: impl ToString) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_pattern(name: &str, pattern: &str, reason: impl ToString) -> Self {
        Self::InvalidPattern {
            name: name.to_string(),
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn url_resolution_failed(url: &str, reason: impl ToString, base_url: Option<&str>) -> Self {
        Self::UrlResolutionFailed {
            url: url.to_string(),
            reason: reason.to_string(),
            base_url: base_url.map(ToString::to_string),
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
