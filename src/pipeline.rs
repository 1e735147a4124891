//! Pipeline orchestrator: fetch → validate → dedup → write, per URL.
//!
//! A batch is processed strictly sequentially: one URL is fully resolved
//! before the next begins, with a fixed politeness delay in between. Every
//! stage failure is converted into that URL's terminal outcome; one bad URL
//! never aborts the batch and no outcome is silently dropped.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::dedup::{self, KnownHashes};
use crate::fetch::constants::{
    DEFAULT_DEST_DIR, DEFAULT_MAX_BYTES, DEFAULT_REQUEST_DELAY, REQUEST_TIMEOUT_SECS,
};
use crate::fetch::filename::{apply_extension, resolve_unique_path, synthesize_filename};
use crate::fetch::{FetchError, ImageClient};
use crate::validate::{self, ValidationError};

/// Configuration for one batch of fetches.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Directory accepted images are written to.
    pub dest_dir: PathBuf,
    /// Total per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Response size ceiling in bytes.
    pub max_bytes: u64,
    /// Politeness delay inserted between consecutive requests.
    pub request_delay: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            dest_dir: PathBuf::from(DEFAULT_DEST_DIR),
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            max_bytes: DEFAULT_MAX_BYTES,
            request_delay: DEFAULT_REQUEST_DELAY,
        }
    }
}

/// Per-URL failure that terminates that URL's processing.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Transport-level failure from the fetcher.
    #[error(transparent)]
    Transport(#[from] FetchError),

    /// Filesystem failure writing the accepted image.
    #[error("IO error writing {path}: {source}")]
    Io {
        /// Path the write targeted.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Batch-level failure surfaced before any URL is fetched.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The destination directory could not be created.
    #[error("failed to create destination directory {dir}: {source}")]
    CreateDir {
        /// The destination directory.
        dir: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// The destination directory could not be scanned for known hashes.
    #[error("failed to scan {dir} for existing images: {source}")]
    Scan {
        /// The destination directory.
        dir: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Terminal outcome for one URL. Exactly one variant holds per request.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Image validated, unique, and written to disk.
    Saved {
        /// Final on-disk path.
        path: PathBuf,
        /// Payload size in bytes.
        bytes: u64,
        /// Hex SHA-256 of the payload.
        hash: String,
    },
    /// Identical content already present; nothing written.
    Duplicate {
        /// Hex SHA-256 of the payload.
        hash: String,
    },
    /// Payload failed content validation; nothing written.
    Rejected {
        /// Why the payload was rejected.
        reason: ValidationError,
    },
    /// Transport or filesystem failure; nothing written.
    Failed {
        /// The failure that terminated this URL.
        error: PipelineError,
    },
}

/// One input URL paired with its terminal outcome.
#[derive(Debug)]
pub struct UrlReport {
    /// The URL as submitted.
    pub url: String,
    /// Terminal outcome for this URL.
    pub outcome: FetchOutcome,
}

/// Counts of terminal outcomes across a batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    /// URLs written to disk.
    pub saved: usize,
    /// URLs skipped as duplicates.
    pub duplicate: usize,
    /// URLs rejected by validation.
    pub rejected: usize,
    /// URLs that failed in transport or filesystem.
    pub failed: usize,
}

impl BatchSummary {
    /// Tallies outcomes from a batch report.
    #[must_use]
    pub fn from_reports(reports: &[UrlReport]) -> Self {
        let mut summary = Self::default();
        for report in reports {
            match report.outcome {
                FetchOutcome::Saved { .. } => summary.saved += 1,
                FetchOutcome::Duplicate { .. } => summary.duplicate += 1,
                FetchOutcome::Rejected { .. } => summary.rejected += 1,
                FetchOutcome::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }

    /// Total outcomes tallied.
    #[must_use]
    pub fn total(&self) -> usize {
        self.saved + self.duplicate + self.rejected + self.failed
    }
}

/// Sequences fetch, validation, dedup, and disk writes for batches of URLs.
///
/// # Example
///
/// ```no_run
/// use imgfetch_core::pipeline::{FetchConfig, FetchPipeline};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pipeline = FetchPipeline::new(FetchConfig::default());
/// let urls = vec!["https://example.com/cat.png".to_string()];
/// let reports = pipeline.run_batch(&urls).await?;
/// for report in &reports {
///     println!("{}: {:?}", report.url, report.outcome);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FetchPipeline {
    client: ImageClient,
    config: FetchConfig,
}

impl FetchPipeline {
    /// Creates a pipeline, building the HTTP client from `config`.
    #[must_use]
    pub fn new(config: FetchConfig) -> Self {
        let client = ImageClient::new_with_limits(config.request_timeout_secs, config.max_bytes);
        Self { client, config }
    }

    /// Returns the batch configuration.
    #[must_use]
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Processes a batch of URLs sequentially, one outcome per URL in input
    /// order.
    ///
    /// The destination directory is created if missing, then hashed once to
    /// seed the known-hash set. Each URL runs the full
    /// fetch → validate → dedup → write sequence before the next begins,
    /// with the configured politeness delay between requests (none after the
    /// last).
    ///
    /// # Errors
    ///
    /// Returns [`BatchError`] only for destination-directory setup failures.
    /// Per-URL failures never escape; they become `Failed` outcomes.
    #[instrument(skip(self, urls), fields(urls = urls.len(), dest = %self.config.dest_dir.display()))]
    pub async fn run_batch(&self, urls: &[String]) -> Result<Vec<UrlReport>, BatchError> {
        tokio::fs::create_dir_all(&self.config.dest_dir)
            .await
            .map_err(|e| BatchError::CreateDir {
                dir: self.config.dest_dir.clone(),
                source: e,
            })?;

        let mut known = KnownHashes::scan(&self.config.dest_dir).map_err(|e| BatchError::Scan {
            dir: self.config.dest_dir.clone(),
            source: e,
        })?;
        info!(known = known.len(), "starting batch");

        let mut reports = Vec::with_capacity(urls.len());
        for (index, url) in urls.iter().enumerate() {
            if index > 0 {
                debug!(delay_ms = self.config.request_delay.as_millis(), "pacing");
                tokio::time::sleep(self.config.request_delay).await;
            }

            let outcome = self.fetch_one(url, &mut known).await;
            match &outcome {
                FetchOutcome::Saved { path, bytes, .. } => {
                    info!(url = %url, path = %path.display(), bytes, "saved");
                }
                FetchOutcome::Duplicate { hash } => {
                    info!(url = %url, hash = %hash, "duplicate, skipped");
                }
                FetchOutcome::Rejected { reason } => {
                    warn!(url = %url, reason = %reason, "rejected");
                }
                FetchOutcome::Failed { error } => {
                    warn!(url = %url, error = %error, "failed");
                }
            }
            reports.push(UrlReport {
                url: url.clone(),
                outcome,
            });
        }

        let summary = BatchSummary::from_reports(&reports);
        info!(
            saved = summary.saved,
            duplicate = summary.duplicate,
            rejected = summary.rejected,
            failed = summary.failed,
            "batch complete"
        );
        Ok(reports)
    }

    /// Runs the full per-URL sequence, converting every error into a
    /// terminal outcome.
    async fn fetch_one(&self, url: &str, known: &mut KnownHashes) -> FetchOutcome {
        let payload = match self.client.fetch(url).await {
            Ok(payload) => payload,
            Err(e) => {
                return FetchOutcome::Failed { error: e.into() };
            }
        };

        let format = match validate::validate(&payload) {
            Ok(format) => format,
            Err(reason) => return FetchOutcome::Rejected { reason },
        };

        let hash = dedup::hash_bytes(&payload.bytes);
        if known.contains(&hash) {
            return FetchOutcome::Duplicate { hash };
        }

        let ext = format.canonical_extension();
        let filename = match payload.filename_hint.as_deref() {
            Some(hint) => apply_extension(hint, ext, format.extension_aliases()),
            None => synthesize_filename(ext),
        };
        let path = resolve_unique_path(&self.config.dest_dir, &filename);

        if let Err(e) = tokio::fs::write(&path, &payload.bytes).await {
            return FetchOutcome::Failed {
                error: PipelineError::Io { path, source: e },
            };
        }

        // Hash recorded only after the write lands, so a failed write leaves
        // the content eligible for a later attempt.
        known.insert(hash.clone());

        FetchOutcome::Saved {
            path,
            bytes: payload.bytes.len() as u64,
            hash,
        }
    }
}
