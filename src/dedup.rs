//! Content-hash duplicate detection.
//!
//! Identical images fetched from different URLs (or re-fetched under new
//! names) are identified by a SHA-256 digest of the payload bytes, never by
//! filename or URL comparison. The set of known digests is rebuilt by
//! hashing the destination directory at batch start, so no persistent index
//! can go stale.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

/// Computes the SHA-256 digest of `bytes` as lowercase hex.
#[must_use]
pub fn hash_bytes(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().fold(String::with_capacity(64), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

/// Set of content hashes for files already in the destination directory.
///
/// Grown as new files are accepted within a batch, so intra-batch duplicates
/// are caught too.
#[derive(Debug, Default)]
pub struct KnownHashes {
    hashes: HashSet<String>,
}

impl KnownHashes {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the set by hashing every regular file in `dir`.
    ///
    /// A missing directory yields an empty set (nothing is known yet).
    /// Files that cannot be read are skipped, matching the tolerance for
    /// foreign files a user may have dropped into the directory.
    ///
    /// # Errors
    ///
    /// Returns an error only when the directory itself exists but cannot be
    /// listed.
    #[instrument(fields(dir = %dir.display()))]
    pub fn scan(dir: &Path) -> io::Result<Self> {
        let mut hashes = HashSet::new();

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("destination directory does not exist yet; starting empty");
                return Ok(Self { hashes });
            }
            Err(e) => return Err(e),
        };

        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            match std::fs::read(&path) {
                Ok(bytes) => {
                    hashes.insert(hash_bytes(&bytes));
                }
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "skipping unreadable file");
                }
            }
        }

        debug!(known = hashes.len(), "scanned destination directory");
        Ok(Self { hashes })
    }

    /// Returns true when `hash` is already known.
    #[must_use]
    pub fn contains(&self, hash: &str) -> bool {
        self.hashes.contains(hash)
    }

    /// Records a newly written file's hash.
    pub fn insert(&mut self, hash: String) {
        self.hashes.insert(hash);
    }

    /// Number of known hashes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// Returns true when no hashes are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}
