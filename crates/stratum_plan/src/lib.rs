//! Build planning: wave scheduling, precompiled header assignment, and
//! bounded parallel wave execution.
//!
//! The scheduler turns a validated [`DependencyGraph`](stratum_graph) plus a
//! dirty set into an ordered sequence of waves, each wave a set of modules
//! with no dependencies on each other. The PCH engine decides per module
//! whether to generate, share, or skip a precompiled header. The runner
//! executes a plan wave by wave on a bounded worker pool, halting at the
//! first wave that contains a failure.

#![warn(missing_docs)]

pub mod error;
pub mod pch;
pub mod runner;
pub mod schedule;

pub use error::PlanError;
pub use pch::{assign, PchAssignment, PchDecision};
pub use runner::{BuildReport, BuildStepFailure, WaveRunner};
pub use schedule::{schedule, BuildAction, BuildPlan, DirtySet, PlanEntry, Wave};
