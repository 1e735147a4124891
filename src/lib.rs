//! imgfetch core library
//!
//! This library implements a polite image-fetching pipeline: each URL goes
//! through bounded network retrieval, content-type and magic-number
//! validation, content-hash duplicate detection, and a safe unique write
//! into a destination directory.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`fetch`] - Bounded HTTP retrieval with classified transport failures
//! - [`validate`] - Image allow-list validation by byte signature
//! - [`dedup`] - SHA-256 content-hash duplicate detection
//! - [`pipeline`] - Sequential batch orchestration with politeness pacing
//! - [`parser`] - URL extraction from raw text input

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod dedup;
pub mod fetch;
pub mod parser;
pub mod pipeline;
pub mod validate;

mod user_agent;

// Re-export commonly used types
pub use dedup::{KnownHashes, hash_bytes};
pub use fetch::{FetchError, ImageClient, Payload};
pub use parser::{ParseResult, parse_input};
pub use pipeline::{
    BatchError, BatchSummary, FetchConfig, FetchOutcome, FetchPipeline, PipelineError, UrlReport,
};
pub use validate::{ImageFormat, ValidationError, validate};
