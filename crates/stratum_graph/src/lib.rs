//! Module dependency graph construction and validation.
//!
//! Takes a loaded [`DescriptorStore`](stratum_descriptor::DescriptorStore),
//! resolves every declared dependency name to a descriptor, and produces an
//! immutable directed graph with edges pointing from each module to its
//! dependencies. Unresolved names and cycles (including self-dependencies)
//! are fatal validation errors; no partial graph is ever returned.

#![warn(missing_docs)]

pub mod error;
pub mod graph;

pub use error::GraphError;
pub use graph::DependencyGraph;
