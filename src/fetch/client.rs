//! HTTP client wrapper for fetching image payloads.
//!
//! This module provides the `ImageClient` struct which performs one bounded
//! GET per URL, streams the body into memory under a byte ceiling, and
//! classifies transport failures.

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use tracing::{debug, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, DEFAULT_MAX_BYTES, REQUEST_TIMEOUT_SECS};
use super::error::FetchError;
use super::filename::filename_hint_from_url;
use crate::user_agent;

/// A fetched response body with the metadata the validator needs.
///
/// Owned by the fetcher until handed to validation; never written to disk
/// directly. Only the validated, deduplicated result is persisted.
#[derive(Debug, Clone)]
pub struct Payload {
    /// Source URL the payload was fetched from.
    pub url: String,
    /// Raw response body bytes.
    pub bytes: Vec<u8>,
    /// Declared `Content-Type` (parameters stripped, lowercased), if present.
    pub content_type: Option<String>,
    /// Percent-decoded last URL path segment, if usable as a filename.
    pub filename_hint: Option<String>,
}

/// HTTP client for fetching image payloads.
///
/// Created once and reused across a batch, taking advantage of connection
/// pooling. The client sends an identifying User-Agent on every request and
/// enforces connect and total-request timeouts.
///
/// # Example
///
/// ```no_run
/// use imgfetch_core::fetch::ImageClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ImageClient::new();
/// let payload = client.fetch("https://example.com/cat.png").await?;
/// println!("fetched {} bytes", payload.bytes.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ImageClient {
    client: Client,
    max_bytes: u64,
}

impl Default for ImageClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageClient {
    /// Creates a client with default timeouts and size ceiling.
    ///
    /// Default configuration:
    /// - Connect timeout: 10 seconds
    /// - Total request timeout: 30 seconds
    /// - Size ceiling: 50 MiB
    /// - Gzip decompression: enabled
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::new_with_limits(REQUEST_TIMEOUT_SECS, DEFAULT_MAX_BYTES)
    }

    /// Creates a client with an explicit request timeout and size ceiling.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new_with_limits(request_timeout_secs: u64, max_bytes: u64) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(request_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_fetch_user_agent())
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client, max_bytes }
    }

    /// Returns the configured response size ceiling in bytes.
    #[must_use]
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Fetches one URL and returns the raw payload.
    ///
    /// Sends a single GET with the identifying User-Agent. The response body
    /// is streamed chunk by chunk; the byte ceiling is enforced both from the
    /// `Content-Length` header (when present) and incrementally during the
    /// read, so an oversized response is never fully buffered.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if:
    /// - The URL is malformed or not http/https (`InvalidUrl`)
    /// - The request times out (`Timeout`)
    /// - The connection fails (`Connection`)
    /// - The server returns a non-2xx status (`HttpStatus`)
    /// - The body exceeds the ceiling (`TooLarge`)
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &str) -> Result<Payload, FetchError> {
        debug!("starting fetch");

        let parsed_url = Url::parse(url).map_err(|_| FetchError::invalid_url(url))?;
        if !matches!(parsed_url.scheme(), "http" | "https") {
            return Err(FetchError::invalid_url(url));
        }

        let response = self
            .client
            .get(parsed_url.clone())
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http_status(url, status.as_u16()));
        }

        // Reject early when the server declares an oversized body.
        if let Some(declared) = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            && declared > self.max_bytes
        {
            return Err(FetchError::too_large(url, self.max_bytes, declared));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_lowercase())
            .filter(|v| !v.is_empty());

        let bytes = self.read_body_bounded(response, url).await?;
        let filename_hint = filename_hint_from_url(&parsed_url);

        debug!(
            bytes = bytes.len(),
            content_type = content_type.as_deref().unwrap_or("<none>"),
            hint = filename_hint.as_deref().unwrap_or("<none>"),
            "fetch complete"
        );

        Ok(Payload {
            url: url.to_string(),
            bytes,
            content_type,
            filename_hint,
        })
    }

    /// Streams the response body into memory, enforcing the byte ceiling.
    async fn read_body_bounded(
        &self,
        response: reqwest::Response,
        url: &str,
    ) -> Result<Vec<u8>, FetchError> {
        let mut stream = response.bytes_stream();
        let mut body: Vec<u8> = Vec::new();

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(|e| FetchError::from_reqwest(url, e))?;

            let received = body.len() as u64 + chunk.len() as u64;
            if received > self.max_bytes {
                return Err(FetchError::too_large(url, self.max_bytes, received));
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body)
    }
}
