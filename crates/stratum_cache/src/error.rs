//! Error types for fingerprint persistence.

use std::path::PathBuf;

/// Errors raised while persisting the fingerprint manifest.
///
/// Reads are fail-safe (a bad manifest means a full rebuild, not an error),
/// so these only surface on the write path.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while writing the manifest.
    #[error("fingerprint manifest I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The manifest could not be serialized.
    #[error("fingerprint serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}
