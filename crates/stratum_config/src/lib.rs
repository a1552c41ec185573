//! Project configuration loaded from `stratum.toml`.
//!
//! The manifest declares the project's modules (dependencies, precompiled
//! header mode, source files) and build settings. Loading validates the
//! manifest and converts module tables into descriptors, hashing each
//! module's declaration and source files into its content fingerprint.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, to_descriptors};
pub use types::{BuildConfig, ModuleConfig, ProjectConfig, ProjectMeta};
