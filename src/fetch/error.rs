//! Error types for the fetch module.
//!
//! This module defines structured errors for one bounded HTTP retrieval,
//! distinguishing failure classes the pipeline reports differently.

use thiserror::Error;

/// Errors that can occur while fetching a payload.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request timed out before completion.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Connection-level error (DNS resolution, connection refused, TLS errors).
    #[error("connection error fetching {url}: {source}")]
    Connection {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Response body exceeds the configured size ceiling.
    ///
    /// Raised from the streaming read as soon as the ceiling is crossed, so
    /// the payload is never buffered past the limit.
    #[error("response too large fetching {url}: limit {limit_bytes} bytes, received at least {received_bytes}")]
    TooLarge {
        /// The URL whose response was too large.
        url: String,
        /// Configured byte ceiling.
        limit_bytes: u64,
        /// Bytes received (or declared) when the limit was crossed.
        received_bytes: u64,
    },

    /// The provided URL is malformed or uses an unsupported scheme.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// Any other transport failure (body read errors, protocol errors).
    #[error("error fetching {url}: {source}")]
    Other {
        /// The URL that failed.
        url: String,
        /// The underlying error.
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates a connection error from a reqwest error.
    pub fn connection(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Connection {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a size-ceiling error.
    pub fn too_large(url: impl Into<String>, limit_bytes: u64, received_bytes: u64) -> Self {
        Self::TooLarge {
            url: url.into(),
            limit_bytes,
            received_bytes,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Classifies a reqwest error into the matching variant.
    pub(crate) fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::timeout(url)
        } else if source.is_connect() {
            Self::connection(url, source)
        } else {
            Self::Other {
                url: url.to_string(),
                source,
            }
        }
    }
}

// Note on From trait implementations:
// We intentionally do NOT implement `From<reqwest::Error>` because the
// variants require context (url) that the source error does not provide.
// The helper constructors are the correct pattern here.
