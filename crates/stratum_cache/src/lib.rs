//! Incremental change detection across build runs.
//!
//! Persists per-module fingerprint records between runs and computes, from a
//! fresh descriptor set, the minimal set of modules that need rebuilding.
//! Detection never mutates stored state; recording new fingerprints is a
//! separate, explicit commit performed only after a successful build.

#![warn(missing_docs)]

pub mod dirty;
pub mod error;
pub mod manifest;

pub use dirty::{commit, commit_modules, compute_dirty, current_fingerprints};
pub use error::CacheError;
pub use manifest::{FingerprintManifest, FingerprintRecord};
