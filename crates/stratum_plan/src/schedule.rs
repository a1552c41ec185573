//! Topological wave scheduling over the dependency graph.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use stratum_graph::DependencyGraph;

use crate::error::PlanError;

/// Which modules need rebuilding in this pass.
#[derive(Debug, Clone)]
pub enum DirtySet {
    /// Rebuild every module in the graph.
    All,
    /// Rebuild exactly these modules (their clean transitive dependencies
    /// are pulled into the plan as reuse-only entries).
    Modules(BTreeSet<String>),
}

impl DirtySet {
    /// Builds a dirty set from an iterator of module names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Modules(names.into_iter().map(Into::into).collect())
    }
}

/// What the external build layer should do with a planned module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildAction {
    /// Compile the module.
    Compile,
    /// Do not recompile; only ensure the existing artifact is present.
    /// Applied to clean modules pulled in as dependencies of dirty ones.
    ReuseOnly,
}

/// One module within a wave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    /// The module name.
    pub module: String,
    /// Whether to compile or merely reuse the module.
    pub action: BuildAction,
}

/// A set of modules that may be built concurrently.
///
/// No module in a wave depends on another module in the same wave; entries
/// are ordered ascending by module name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wave {
    /// The modules in this wave, ascending by name.
    pub entries: Vec<PlanEntry>,
}

impl Wave {
    /// Iterates over all module names in the wave.
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.module.as_str())
    }

    /// Iterates over the names of modules tagged for compilation.
    pub fn compile_modules(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| e.action == BuildAction::Compile)
            .map(|e| e.module.as_str())
    }

    /// Returns the number of entries in the wave.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the wave has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An ordered sequence of waves.
///
/// Every dependency of a module in wave `k` sits in a wave before `k`.
/// Produced once per scheduling pass and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlan {
    /// The waves in build order.
    pub waves: Vec<Wave>,
}

impl BuildPlan {
    /// Returns the total number of modules across all waves.
    pub fn module_count(&self) -> usize {
        self.waves.iter().map(Wave::len).sum()
    }

    /// Returns the number of modules tagged for compilation.
    pub fn compile_count(&self) -> usize {
        self.waves.iter().map(|w| w.compile_modules().count()).sum()
    }

    /// Returns `true` if the plan contains no modules.
    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }
}

/// Computes a build plan for the given dirty set.
///
/// The plan covers the dirty modules plus every transitive dependency of a
/// dirty module; clean dependencies are tagged
/// [`BuildAction::ReuseOnly`] since their artifacts must exist for linking
/// but need no recompilation. Waves are peeled by repeatedly collecting all
/// modules with no unbuilt dependencies; within a wave modules are ordered
/// ascending by name, making the output deterministic for identical inputs.
pub fn schedule(graph: &DependencyGraph, dirty: &DirtySet) -> Result<BuildPlan, PlanError> {
    let included: BTreeSet<String> = match dirty {
        DirtySet::All => graph.module_names().iter().map(|s| s.to_string()).collect(),
        DirtySet::Modules(names) => {
            graph.transitive_dependencies(names.iter().map(String::as_str))
        }
    };
    let compile: BTreeSet<String> = match dirty {
        DirtySet::All => included.clone(),
        DirtySet::Modules(names) => names.intersection(&included).cloned().collect(),
    };

    // In-degree restricted to the induced subgraph over `included`.
    let mut indegree: BTreeMap<String, usize> = included
        .iter()
        .map(|m| {
            let deps_in = graph
                .dependencies_of(m)
                .iter()
                .filter(|d| included.contains(**d))
                .count();
            (m.clone(), deps_in)
        })
        .collect();
    let mut remaining = included;

    let mut waves = Vec::new();
    while !remaining.is_empty() {
        let ready: Vec<String> = remaining
            .iter()
            .filter(|m| indegree.get(*m).copied() == Some(0))
            .cloned()
            .collect();

        if ready.is_empty() {
            // Unreachable after graph validation; indicates a scheduler bug.
            return Err(PlanError::SchedulerInvariant {
                remaining: remaining.into_iter().collect(),
            });
        }

        for module in &ready {
            remaining.remove(module);
            for dependent in graph.dependents_of(module) {
                if let Some(count) = indegree.get_mut(dependent) {
                    if remaining.contains(dependent) {
                        *count = count.saturating_sub(1);
                    }
                }
            }
        }

        let entries = ready
            .into_iter()
            .map(|module| {
                let action = if compile.contains(&module) {
                    BuildAction::Compile
                } else {
                    BuildAction::ReuseOnly
                };
                PlanEntry { module, action }
            })
            .collect();
        waves.push(Wave { entries });
    }

    Ok(BuildPlan { waves })
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_common::ContentHash;
    use stratum_descriptor::{DescriptorStore, ModuleDescriptor};

    fn graph(descs: &[(&str, &[&str])]) -> DependencyGraph {
        let descriptors: Vec<ModuleDescriptor> = descs
            .iter()
            .map(|(name, deps)| {
                let mut d =
                    ModuleDescriptor::new(*name, ContentHash::from_bytes(name.as_bytes()));
                d.public_deps = deps.iter().map(|s| s.to_string()).collect();
                d
            })
            .collect();
        DependencyGraph::build(&DescriptorStore::load(descriptors).unwrap()).unwrap()
    }

    fn wave_names(wave: &Wave) -> Vec<&str> {
        wave.modules().collect()
    }

    #[test]
    fn chain_schedules_one_module_per_wave() {
        let g = graph(&[("A", &[]), ("B", &["A"]), ("C", &["A", "B"])]);
        let plan = schedule(&g, &DirtySet::All).unwrap();
        assert_eq!(plan.waves.len(), 3);
        assert_eq!(wave_names(&plan.waves[0]), vec!["A"]);
        assert_eq!(wave_names(&plan.waves[1]), vec!["B"]);
        assert_eq!(wave_names(&plan.waves[2]), vec!["C"]);
        assert_eq!(plan.compile_count(), 3);
    }

    #[test]
    fn independent_modules_share_a_wave_sorted() {
        let g = graph(&[("Zeta", &[]), ("Alpha", &[]), ("Mid", &[])]);
        let plan = schedule(&g, &DirtySet::All).unwrap();
        assert_eq!(plan.waves.len(), 1);
        assert_eq!(wave_names(&plan.waves[0]), vec!["Alpha", "Mid", "Zeta"]);
    }

    #[test]
    fn every_dependency_lands_in_an_earlier_wave() {
        let g = graph(&[
            ("Base", &[]),
            ("Left", &["Base"]),
            ("Right", &["Base"]),
            ("Top", &["Left", "Right"]),
        ]);
        let plan = schedule(&g, &DirtySet::All).unwrap();
        let wave_of = |name: &str| {
            plan.waves
                .iter()
                .position(|w| w.modules().any(|m| m == name))
                .unwrap()
        };
        for (module, deps) in [
            ("Left", vec!["Base"]),
            ("Right", vec!["Base"]),
            ("Top", vec!["Left", "Right"]),
        ] {
            for dep in deps {
                assert!(wave_of(dep) < wave_of(module), "{dep} must precede {module}");
            }
        }
        assert_eq!(plan.module_count(), 4);
    }

    #[test]
    fn dirty_subset_pulls_dependencies_as_reuse_only() {
        let g = graph(&[("A", &[]), ("B", &["A"]), ("C", &["B"]), ("D", &[])]);
        let plan = schedule(&g, &DirtySet::from_names(["C"])).unwrap();
        // A and B are needed for linking but stay reuse-only; D is absent.
        assert_eq!(plan.module_count(), 3);
        assert_eq!(plan.compile_count(), 1);
        let entries: Vec<&PlanEntry> =
            plan.waves.iter().flat_map(|w| w.entries.iter()).collect();
        for entry in &entries {
            match entry.module.as_str() {
                "C" => assert_eq!(entry.action, BuildAction::Compile),
                "A" | "B" => assert_eq!(entry.action, BuildAction::ReuseOnly),
                other => panic!("unexpected module {other}"),
            }
        }
    }

    #[test]
    fn empty_dirty_set_yields_empty_plan() {
        let g = graph(&[("A", &[]), ("B", &["A"])]);
        let plan = schedule(&g, &DirtySet::from_names(Vec::<String>::new())).unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.module_count(), 0);
    }

    #[test]
    fn deterministic_output() {
        let g = graph(&[
            ("Engine", &["Core"]),
            ("Core", &[]),
            ("Game", &["Engine", "Core"]),
            ("Tools", &["Core"]),
        ]);
        let a = schedule(&g, &DirtySet::All).unwrap();
        let b = schedule(&g, &DirtySet::All).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn plan_serializes_with_kebab_case_actions() {
        let g = graph(&[("A", &[]), ("B", &["A"])]);
        let plan = schedule(&g, &DirtySet::from_names(["B"])).unwrap();
        let json = serde_json::to_string(&plan).unwrap();
        assert!(json.contains("\"reuse-only\""));
        assert!(json.contains("\"compile\""));
    }

    #[test]
    fn linear_dependency_triple_waves() {
        let g = graph(&[("A", &[]), ("B", &["A"]), ("C", &["A", "B"])]);
        let plan = schedule(&g, &DirtySet::All).unwrap();
        let waves: Vec<Vec<&str>> = plan.waves.iter().map(wave_names).collect();
        assert_eq!(waves, vec![vec!["A"], vec!["B"], vec!["C"]]);
    }
}
