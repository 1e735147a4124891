//! Rendering of batch outcomes: human-readable lines and JSON rows.

use serde::Serialize;

use imgfetch_core::pipeline::{BatchSummary, FetchOutcome, UrlReport};

/// One serializable report row per input URL.
#[derive(Debug, Serialize)]
pub struct ReportRow {
    /// The URL as submitted.
    pub url: String,
    /// Terminal status: `saved`, `duplicate`, `rejected`, or `failed`.
    pub status: &'static str,
    /// On-disk path for saved images.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Payload size in bytes for saved images.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
    /// Hex SHA-256 of the payload, for saved and duplicate outcomes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Rejection or failure detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl From<&UrlReport> for ReportRow {
    fn from(report: &UrlReport) -> Self {
        match &report.outcome {
            FetchOutcome::Saved { path, bytes, hash } => Self {
                url: report.url.clone(),
                status: "saved",
                path: Some(path.display().to_string()),
                bytes: Some(*bytes),
                hash: Some(hash.clone()),
                detail: None,
            },
            FetchOutcome::Duplicate { hash } => Self {
                url: report.url.clone(),
                status: "duplicate",
                path: None,
                bytes: None,
                hash: Some(hash.clone()),
                detail: None,
            },
            FetchOutcome::Rejected { reason } => Self {
                url: report.url.clone(),
                status: "rejected",
                path: None,
                bytes: None,
                hash: None,
                detail: Some(reason.to_string()),
            },
            FetchOutcome::Failed { error } => Self {
                url: report.url.clone(),
                status: "failed",
                path: None,
                bytes: None,
                hash: None,
                detail: Some(error.to_string()),
            },
        }
    }
}

/// Formats one human-readable outcome line for a URL.
#[must_use]
pub fn render_line(report: &UrlReport) -> String {
    match &report.outcome {
        FetchOutcome::Saved { path, bytes, .. } => {
            format!("{}: saved as {} ({} bytes)", report.url, path.display(), bytes)
        }
        FetchOutcome::Duplicate { .. } => {
            format!("{}: skipped, identical content already saved", report.url)
        }
        FetchOutcome::Rejected { reason } => format!("{}: rejected, {}", report.url, reason),
        FetchOutcome::Failed { error } => format!("{}: failed, {}", report.url, error),
    }
}

/// Formats the batch summary line.
#[must_use]
pub fn render_summary(summary: &BatchSummary) -> String {
    format!(
        "Summary: {} saved, {} duplicates, {} rejected, {} failed",
        summary.saved, summary.duplicate, summary.rejected, summary.failed
    )
}
