//! Shared foundational types for the Stratum build scheduler.
//!
//! Currently this is just [`ContentHash`], the opaque content digest used for
//! module fingerprinting and change detection across the workspace.

#![warn(missing_docs)]

pub mod hash;

pub use hash::ContentHash;
