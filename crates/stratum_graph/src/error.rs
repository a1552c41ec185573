//! Error types for dependency graph construction.

/// Errors raised while building or validating the dependency graph.
///
/// Both variants are fatal to the resolution pass: the descriptor set must
/// be fixed and the graph rebuilt from scratch.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A module declared a dependency on a name with no descriptor.
    #[error("module `{module}` depends on unknown module `{missing}`")]
    UnresolvedDependency {
        /// The module whose dependency list contains the bad name.
        module: String,
        /// The dependency name that did not resolve.
        missing: String,
    },

    /// The dependency graph contains a cycle.
    ///
    /// The reported cycle is a closed walk: the first module is repeated at
    /// the end, so a self-dependency reads `A -> A`.
    #[error("cyclic module dependency: {}", cycle.join(" -> "))]
    CyclicDependency {
        /// The modules forming the cycle, first module repeated last.
        cycle: Vec<String>,
    },
}
