//! Persisted fingerprint manifest.
//!
//! Stored as `fingerprints.json` in the state directory. Records, for every
//! module built in the last successful run, its own content fingerprint and
//! the composite fingerprints of its direct dependencies at that time.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use stratum_common::ContentHash;

use crate::error::CacheError;

/// Name of the manifest file within the state directory.
const MANIFEST_FILE: &str = "fingerprints.json";

/// Manifest format version. Bump on incompatible layout changes.
const FORMAT_VERSION: u32 = 1;

/// Stored fingerprint state for one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintRecord {
    /// The module's own content fingerprint at the last successful build.
    pub own: ContentHash,

    /// Composite fingerprint of each direct dependency at that time,
    /// keyed by dependency name.
    pub deps: BTreeMap<String, ContentHash>,
}

/// All fingerprint records from the previous successful build.
///
/// Loading is fail-safe: a missing, corrupt, or version-incompatible file
/// yields an empty manifest, which marks every module dirty and triggers a
/// full rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FingerprintManifest {
    /// Manifest format version.
    pub format_version: u32,

    /// Per-module records, keyed by module name.
    pub records: BTreeMap<String, FingerprintRecord>,
}

impl FingerprintManifest {
    /// Creates a new, empty manifest at the current format version.
    pub fn new() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            records: BTreeMap::new(),
        }
    }

    /// Loads the manifest from the state directory, degrading to an empty
    /// manifest if the file is missing, unreadable, unparsable, or from a
    /// different format version.
    pub fn load_or_empty(state_dir: &Path) -> Self {
        Self::load(state_dir)
            .filter(|m| m.format_version == FORMAT_VERSION)
            .unwrap_or_else(Self::new)
    }

    /// Loads the manifest, returning `None` on any problem.
    pub fn load(state_dir: &Path) -> Option<Self> {
        let path = state_dir.join(MANIFEST_FILE);
        let content = std::fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Saves the manifest into the state directory, creating it if needed.
    pub fn save(&self, state_dir: &Path) -> Result<(), CacheError> {
        std::fs::create_dir_all(state_dir).map_err(|e| CacheError::Io {
            path: state_dir.to_path_buf(),
            source: e,
        })?;
        let path = state_dir.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(self).map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })?;
        std::fs::write(&path, json).map_err(|e| CacheError::Io { path, source: e })
    }
}

impl Default for FingerprintManifest {
    fn default() -> Self {
        Self::new()
    }
}
