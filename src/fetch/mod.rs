//! Bounded HTTP retrieval of image payloads.
//!
//! This module performs one GET per URL with an identifying User-Agent,
//! streams the body into memory under a configurable byte ceiling, and
//! classifies transport failures so the pipeline can report them distinctly.
//!
//! # Features
//!
//! - Streaming body reads with an incremental size ceiling
//! - Distinguishable failure classes (timeout, connection, status, too-large)
//! - Percent-decoded filename hints derived from the URL path
//! - Unique on-disk path resolution (numeric suffixes, never overwrite)
//!
//! # Example
//!
//! ```no_run
//! use imgfetch_core::fetch::ImageClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ImageClient::new();
//! let payload = client.fetch("https://example.com/cat.png").await?;
//! println!("fetched {} bytes from {}", payload.bytes.len(), payload.url);
//! # Ok(())
//! # }
//! ```

mod client;
pub mod constants;
mod error;
pub mod filename;

pub use client::{ImageClient, Payload};
pub use error::FetchError;
