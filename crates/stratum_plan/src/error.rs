//! Error types for scheduling and PCH assignment.

/// Errors raised while producing a build plan or PCH assignment.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// Wave peeling stalled with modules left over.
    ///
    /// The graph builder already rejects cycles, so this indicates a logic
    /// bug in the scheduler itself. Always fatal.
    #[error("scheduler invariant violated: no schedulable module among {}", remaining.join(", "))]
    SchedulerInvariant {
        /// Modules that could not be placed in any wave, ascending by name.
        remaining: Vec<String>,
    },

    /// A share-with PCH decision points at an ineligible target.
    ///
    /// Defensive check on the computed assignment: the target must generate
    /// its own header and be a transitive dependency of the sharing module.
    #[error("module `{module}` cannot share precompiled header with `{target}`: {reason}")]
    InvalidPchTarget {
        /// The module whose decision is invalid.
        module: String,
        /// The share target.
        target: String,
        /// Why the target is ineligible.
        reason: String,
    },

    /// The worker thread pool could not be created.
    #[error("failed to create worker pool: {reason}")]
    WorkerPool {
        /// Description of the pool construction failure.
        reason: String,
    },
}
