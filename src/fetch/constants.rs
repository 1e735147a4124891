//! Constants for the fetch module (timeouts, size ceiling, pacing).

use std::time::Duration;

/// Default HTTP connect timeout (10 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default total request timeout (30 seconds).
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default response size ceiling (50 MiB).
pub const DEFAULT_MAX_BYTES: u64 = 50 * 1024 * 1024;

/// Default politeness delay between consecutive requests in a batch.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(1000);

/// Default destination directory for accepted images.
pub const DEFAULT_DEST_DIR: &str = "fetched_images";
