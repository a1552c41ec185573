//! Precompiled header assignment.
//!
//! Decides once per graph, from declared modes and graph structure alone,
//! whether each module generates its own header, shares a dependency's
//! header, or uses none. The result is independent of dirty state, so it is
//! computed alongside the graph rather than per build.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use stratum_descriptor::{DescriptorStore, PchMode};
use stratum_graph::DependencyGraph;

use crate::error::PlanError;

/// The precompiled header decision for one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PchDecision {
    /// The module generates its own precompiled header.
    GenerateOwn,
    /// The module reuses the named module's header. The target always
    /// generates its own header (share chains are collapsed at assignment
    /// time) and is a transitive dependency of the sharing module.
    ShareWith(String),
    /// The module uses no precompiled header.
    None,
}

/// Mapping from module name to its PCH decision.
///
/// Serializable for consumption by the external compiler invocation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PchAssignment {
    /// Decisions keyed by module name.
    pub decisions: BTreeMap<String, PchDecision>,
}

impl PchAssignment {
    /// Returns the decision for a module, if it was assigned.
    pub fn decision(&self, name: &str) -> Option<&PchDecision> {
        self.decisions.get(name)
    }

    /// Checks the share-target invariants against the graph and store.
    ///
    /// Every `ShareWith` target must exist, generate its own header, and be
    /// a transitive dependency of the sharing module. [`assign`] upholds
    /// this by construction; the check guards hand-built or deserialized
    /// assignments.
    pub fn validate(
        &self,
        graph: &DependencyGraph,
        store: &DescriptorStore,
    ) -> Result<(), PlanError> {
        for (module, decision) in &self.decisions {
            let PchDecision::ShareWith(target) = decision else {
                continue;
            };
            let invalid = |reason: &str| PlanError::InvalidPchTarget {
                module: module.clone(),
                target: target.clone(),
                reason: reason.to_string(),
            };
            if !store.contains(target) {
                return Err(invalid("no such module"));
            }
            if self.decisions.get(target) != Some(&PchDecision::GenerateOwn) {
                return Err(invalid("target does not generate its own header"));
            }
            let reachable = graph.transitive_dependencies([module.as_str()]);
            if target == module || !reachable.contains(target) {
                return Err(invalid("not a transitive dependency"));
            }
        }
        Ok(())
    }
}

/// Computes the PCH assignment for every module in the graph.
///
/// Policy: `explicit` modules always generate their own header; `none`
/// modules get none; a `shared` module reuses the header of its first direct
/// dependency (ascending name order) whose mode is `shared` or `explicit`,
/// falling back to generating its own when no dependency qualifies. When the
/// chosen dependency itself shares, the chain is collapsed so the recorded
/// target is the actual generator.
pub fn assign(
    graph: &DependencyGraph,
    store: &DescriptorStore,
) -> Result<PchAssignment, PlanError> {
    let mut decisions = BTreeMap::new();
    for name in graph.module_names() {
        resolve(name, graph, store, &mut decisions);
    }
    let assignment = PchAssignment { decisions };
    assignment.validate(graph, store)?;
    Ok(assignment)
}

/// Resolves one module's decision, memoizing into `decisions`.
///
/// Dependencies resolve before dependents; the graph is acyclic, so the
/// recursion terminates.
fn resolve(
    name: &str,
    graph: &DependencyGraph,
    store: &DescriptorStore,
    decisions: &mut BTreeMap<String, PchDecision>,
) -> PchDecision {
    if let Some(existing) = decisions.get(name) {
        return existing.clone();
    }

    let mode = store.lookup(name).map(|d| d.pch_mode).unwrap_or(PchMode::None);
    let decision = match mode {
        PchMode::Explicit => PchDecision::GenerateOwn,
        PchMode::None => PchDecision::None,
        PchMode::Shared => {
            let candidate = graph.dependencies_of(name).into_iter().find(|dep| {
                matches!(
                    store.lookup(dep).map(|d| d.pch_mode),
                    Some(PchMode::Shared) | Some(PchMode::Explicit)
                )
            });
            match candidate {
                Some(dep) => {
                    let dep = dep.to_string();
                    match resolve(&dep, graph, store, decisions) {
                        // Collapse so the target is always the generator.
                        PchDecision::ShareWith(target) => PchDecision::ShareWith(target),
                        _ => PchDecision::ShareWith(dep),
                    }
                }
                None => PchDecision::GenerateOwn,
            }
        }
    };

    decisions.insert(name.to_string(), decision.clone());
    decision
}
