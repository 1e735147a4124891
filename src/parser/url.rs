//! URL extraction and validation from text input.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};
use url::Url;

use super::error::{MAX_URL_LENGTH, ParseError};
use super::input::ParsedUrl;

/// Regex pattern for finding URLs in text.
/// Matches http:// and https:// URLs, capturing until whitespace or common delimiters.
#[allow(clippy::expect_used)]
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s<>"'\]]+"#).expect("URL regex is valid") // Static pattern, safe to panic
});

/// Result type for URL extraction operations.
pub type UrlExtractionResult = Result<ParsedUrl, ParseError>;

/// Extracts and validates URLs from text input.
///
/// Finds all HTTP/HTTPS URL candidates in the input, validates each
/// individually, and returns one result per candidate in input order, so
/// some may succeed while others fail.
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
#[must_use]
pub fn extract_urls(input: &str) -> Vec<UrlExtractionResult> {
    let mut results = Vec::new();

    for url_match in URL_PATTERN.find_iter(input) {
        let raw_url = url_match.as_str();
        let cleaned = clean_url_trailing(raw_url);
        trace!(url = %cleaned, "found URL candidate");

        match validate_url(cleaned) {
            Ok(validated) => {
                debug!(url = %validated, "URL validated");
                results.push(Ok(ParsedUrl::new(raw_url, validated)));
            }
            Err(e) => {
                debug!(url = %cleaned, error = %e, "URL validation failed");
                results.push(Err(e));
            }
        }
    }

    results
}

/// Cleans trailing punctuation that often gets captured with URLs in prose.
fn clean_url_trailing(url: &str) -> &str {
    let mut result = url;

    while let Some(last) = result.chars().last() {
        match last {
            // Sentence-ending punctuation is usually not part of the URL
            '.' | ',' | ';' | ':' | '!' | '?' => {
                if last == '.' {
                    // Keep the dot when it looks like a file extension
                    if let Some(dot_pos) = result.rfind('.') {
                        let after_dot = &result[dot_pos + 1..];
                        if (1..=5).contains(&after_dot.len())
                            && after_dot.chars().all(|c| c.is_ascii_alphanumeric())
                        {
                            break;
                        }
                    }
                }
                result = &result[..result.len() - 1];
            }
            // Closing parens/brackets at end are usually not part of the URL,
            // unless matched by an opener inside it (Wikipedia-style URLs)
            ')' | ']' => {
                let open = if last == ')' { '(' } else { '[' };
                let open_count = result.chars().filter(|&c| c == open).count();
                let close_count = result.chars().filter(|&c| c == last).count();
                if close_count > open_count {
                    result = &result[..result.len() - 1];
                } else {
                    break;
                }
            }
            _ => break,
        }
    }

    result
}

/// Validates a URL string and normalizes it.
///
/// Rules: at most `MAX_URL_LENGTH` chars, parseable by the `url` crate,
/// http/https scheme, and a host.
fn validate_url(raw: &str) -> Result<String, ParseError> {
    if raw.len() > MAX_URL_LENGTH {
        return Err(ParseError::too_long(raw));
    }

    let parsed = Url::parse(raw).map_err(|e| ParseError::malformed(raw, &e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(ParseError::unsupported_scheme(raw, scheme)),
    }

    if parsed.host().is_none() {
        return Err(ParseError::no_host(raw));
    }

    Ok(parsed.to_string())
}
