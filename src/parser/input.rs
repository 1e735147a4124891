//! Types representing parsed input items and results.

use std::fmt;

/// A single URL parsed from input.
#[derive(Debug, Clone)]
pub struct ParsedUrl {
    /// Original input text the URL was found in.
    pub raw: String,
    /// Validated, normalized URL.
    pub value: String,
}

impl ParsedUrl {
    /// Creates a parsed URL item.
    #[must_use]
    pub fn new(raw: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for ParsedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Collection of URLs parsed from input, in input order.
///
/// Duplicate URLs are kept: the pipeline's content-hash check decides what a
/// duplicate is, not URL comparison.
#[derive(Debug, Default)]
pub struct ParseResult {
    /// Successfully parsed URLs.
    pub urls: Vec<ParsedUrl>,
    /// Candidates that could not be validated (for logging).
    pub skipped: Vec<String>,
}

impl ParseResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a successfully parsed URL.
    pub fn add_url(&mut self, url: ParsedUrl) {
        self.urls.push(url);
    }

    /// Adds a skipped candidate (non-parseable).
    pub fn add_skipped(&mut self, candidate: impl Into<String>) {
        self.skipped.push(candidate.into());
    }

    /// Returns true if no URLs were parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Returns count of parsed URLs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Returns count of skipped candidates.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Returns the validated URL strings, in input order.
    #[must_use]
    pub fn url_strings(&self) -> Vec<String> {
        self.urls.iter().map(|u| u.value.clone()).collect()
    }
}

impl fmt::Display for ParseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parsed {} URLs ({} skipped)",
            self.urls.len(),
            self.skipped.len()
        )
    }
}
