//! Error types for configuration loading.

use std::path::PathBuf;

/// Errors that can occur while loading `stratum.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("config I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The configuration file is not valid TOML.
    #[error("failed to parse stratum.toml: {0}")]
    ParseError(String),

    /// A required field is missing or empty.
    #[error("missing required config field: {0}")]
    MissingField(String),

    /// A field has a value that fails validation.
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue {
        /// The offending field, in dotted path form.
        field: String,
        /// Why the value is invalid.
        reason: String,
    },

    /// A module's listed source file could not be read for fingerprinting.
    #[error("failed to read source `{path}` for module `{module}`: {source}")]
    SourceRead {
        /// The module whose source list names the file.
        module: String,
        /// The file path that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
