//! Site characteristics and domain constants
//!
//! Defines the fixed traits of the survey site and the field-naming
//! conventions shared by the harvesting stages.

/// Survey site characteristics
pub mod site {
    /// Paginated survey listing endpoint
    pub const SURVEY_BASE_URL: &str = "https://www.thegradcafe.com/survey/";

    /// Per-result detail endpoint (result id is appended)
    pub const RESULT_BASE_URL: &str = "https://www.thegradcafe.com/result/";

    /// Query parameter carrying the listing page number
    pub const PAGE_PARAM: &str = "page";

    /// Listing page numbers are 1-based
    pub const FIRST_PAGE: u32 = 1;

    /// Identification header sent with every request
    pub const USER_AGENT: &str = "Mozilla/5.0";
}

/// Crawling limits and politeness defaults
pub mod crawling {
    /// Lower bound of the random pause between requests (milliseconds)
    pub const DEFAULT_DELAY_MIN_MS: u64 = 800;

    /// Upper bound of the random pause between requests (milliseconds)
    pub const DEFAULT_DELAY_MAX_MS: u64 = 1600;

    /// Request timeout (seconds)
    pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

    /// Global minimum spacing between two requests (milliseconds)
    pub const DEFAULT_MIN_REQUEST_INTERVAL_MS: u64 = 250;

    /// Detail pages fetched at once
    pub const DEFAULT_DETAIL_CONCURRENCY: usize = 1;

    /// Consecutive failed listing pages tolerated before the walk gives up
    pub const DEFAULT_MAX_CONSECUTIVE_PAGE_FAILURES: u32 = 25;
}

/// Field names used in listing, detail and merged records
pub mod fields {
    pub const ID: &str = "id";
    pub const URL: &str = "url";
    pub const ADDED_ON: &str = "added_on";
    pub const TERM: &str = "term";

    /// Legacy field name → canonical field name.
    ///
    /// Applied in order; a rename never replaces an existing canonical key.
    pub const LEGACY_RENAMES: &[(&str, &str)] = &[
        ("result_url", "url"),
        ("added_on", "date_added"),
        ("Decision", "status"),
        ("Institution", "university"),
        ("Program", "program"),
        ("Degree's Country of Origin", "US/International"),
        ("Degree Type", "Degree"),
    ];
}

/// Export defaults
pub mod export {
    /// Default JSON output file
    pub const DEFAULT_OUTPUT_FILE: &str = "applicant_data.json";
}
