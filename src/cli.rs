//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use imgfetch_core::fetch::constants::{
    DEFAULT_DEST_DIR, DEFAULT_MAX_BYTES, REQUEST_TIMEOUT_SECS,
};

/// Politely fetch, validate, and deduplicate images from the web.
///
/// imgfetch downloads each given URL once, accepts only payloads that carry a
/// real image signature, skips content already present in the destination
/// directory, and reports one outcome line per URL.
#[derive(Parser, Debug)]
#[command(name = "imgfetch")]
#[command(author, version, about)]
pub struct Args {
    /// Image URLs to fetch (reads from stdin when omitted and piped)
    pub urls: Vec<String>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Destination directory for accepted images
    #[arg(short = 'd', long, default_value = DEFAULT_DEST_DIR)]
    pub dir: PathBuf,

    /// Request timeout in seconds (1-600)
    #[arg(short = 't', long, default_value_t = REQUEST_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=600))]
    pub timeout: u64,

    /// Response size ceiling in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_BYTES, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_bytes: u64,

    /// Delay between requests in milliseconds (0 to disable, max 60000)
    #[arg(short = 'l', long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(0..=60000))]
    pub delay_ms: u64,

    /// Emit the batch report as JSON instead of human-readable lines
    #[arg(long)]
    pub json: bool,
}
