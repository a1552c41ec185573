//! Content hashing for module fingerprints and incremental rebuild decisions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 128-bit content hash computed using XXH3.
///
/// Two inputs with the same `ContentHash` are assumed identical. Used as the
/// opaque fingerprint of a module's declared content and, combined with the
/// fingerprints of its direct dependencies, as the composite fingerprint that
/// drives dirty detection between builds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Computes a content hash from a byte slice using XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_le_bytes())
    }

    /// Computes a hash over a sequence of parts.
    ///
    /// Each part's raw digest bytes are concatenated and rehashed, so the
    /// result depends on both the parts and their order. Used to fold a
    /// module's own fingerprint together with its dependencies' fingerprints.
    pub fn combine<I>(parts: I) -> Self
    where
        I: IntoIterator<Item = ContentHash>,
    {
        let mut buf = Vec::new();
        for part in parts {
            buf.extend_from_slice(&part.0);
        }
        Self::from_bytes(&buf)
    }

    /// Returns the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}
