//! Input parsing: extracting image URLs from raw text.
//!
//! Input may be bare URLs (one per line), or prose with URLs embedded in it;
//! everything that is not a valid http/https URL is reported as skipped
//! rather than failing the parse.
//!
//! # Example
//!
//! ```
//! use imgfetch_core::parser::parse_input;
//!
//! let result = parse_input("Grab https://example.com/cat.png when you can");
//! assert_eq!(result.len(), 1);
//! assert_eq!(result.urls[0].value, "https://example.com/cat.png");
//! ```

mod error;
mod input;
mod url;

pub use error::ParseError;
pub use input::{ParseResult, ParsedUrl};
pub use url::extract_urls;

use tracing::debug;

/// Parses raw text input and extracts fetchable image URLs.
///
/// Each URL candidate is validated individually; invalid candidates land in
/// `skipped` and do not fail the parse. Duplicate URLs are preserved in
/// input order — the pipeline's content-hash check is responsible for
/// duplicate handling.
#[must_use]
pub fn parse_input(input: &str) -> ParseResult {
    let mut result = ParseResult::new();

    for extraction in extract_urls(input) {
        match extraction {
            Ok(parsed) => result.add_url(parsed),
            Err(e) => result.add_skipped(e.to_string()),
        }
    }

    debug!(
        urls = result.len(),
        skipped = result.skipped_count(),
        "parsed input"
    );
    result
}
