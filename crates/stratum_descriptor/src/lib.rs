//! Module descriptors and the descriptor store.
//!
//! A [`ModuleDescriptor`] is the declarative record an external build manifest
//! produces for each compilation module: its name, the names of the modules it
//! depends on, its precompiled header mode, and a fingerprint of its declared
//! content. The [`DescriptorStore`] holds all descriptors for one resolution
//! pass, keyed by name, and rejects duplicate names at load time.

#![warn(missing_docs)]

pub mod descriptor;
pub mod error;
pub mod store;

pub use descriptor::{ModuleDescriptor, PchMode};
pub use error::StoreError;
pub use store::DescriptorStore;
