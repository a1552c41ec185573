//! The per-module build descriptor record.

use serde::{Deserialize, Serialize};
use stratum_common::ContentHash;

/// Precompiled header policy declared by a module.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PchMode {
    /// The module does not use a precompiled header.
    None,
    /// The module reuses a dependency's header when one is eligible,
    /// otherwise generates its own (default).
    #[default]
    Shared,
    /// The module always generates its own header.
    Explicit,
}

/// A declarative build descriptor for one compilation module.
///
/// Immutable once loaded into a [`DescriptorStore`](crate::DescriptorStore)
/// for a build pass. Dependency lists hold plain module names; resolution to
/// actual descriptors happens in the graph builder, so declaration order in
/// the manifest never matters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    /// Unique module name.
    pub name: String,

    /// Names of modules this module publicly depends on.
    pub public_deps: Vec<String>,

    /// Names of modules this module privately depends on.
    ///
    /// Private and public dependencies produce identical graph edges; the
    /// split is kept for reporting and interface-level change tracking.
    pub private_deps: Vec<String>,

    /// Declared precompiled header mode.
    pub pch_mode: PchMode,

    /// Opaque fingerprint of the module's declared content.
    pub content_hash: ContentHash,
}

impl ModuleDescriptor {
    /// Creates a descriptor with no dependencies and the default PCH mode.
    pub fn new(name: impl Into<String>, content_hash: ContentHash) -> Self {
        Self {
            name: name.into(),
            public_deps: Vec::new(),
            private_deps: Vec::new(),
            pch_mode: PchMode::default(),
            content_hash,
        }
    }

    /// Iterates over all declared dependency names, public first, in
    /// declaration order. May yield duplicates if a name appears in both
    /// lists; the graph builder deduplicates.
    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.public_deps
            .iter()
            .chain(self.private_deps.iter())
            .map(String::as_str)
    }
}
