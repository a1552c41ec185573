//! Bounded parallel execution of a build plan, wave by wave.
//!
//! The runner performs no compilation itself; the caller supplies the build
//! step. Modules within a wave run concurrently on a dedicated rayon pool.
//! Waves are strictly sequential: a failure anywhere in wave `k` lets the
//! in-flight siblings of that wave finish, then halts every later wave.

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;

use crate::error::PlanError;
use crate::schedule::{BuildAction, BuildPlan};

/// A failed build step for one module, reported by the external build layer.
#[derive(Debug, Clone, thiserror::Error)]
#[error("build step failed for `{module}`: {reason}")]
pub struct BuildStepFailure {
    /// The module whose build step failed.
    pub module: String,
    /// Description of the failure.
    pub reason: String,
}

impl BuildStepFailure {
    /// Creates a failure record for a module.
    pub fn new(module: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            reason: reason.into(),
        }
    }
}

/// Outcome of executing a build plan.
///
/// Completed modules from earlier waves stay valid on failure; their
/// artifacts and fingerprint bookkeeping are reusable on the next run.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Modules whose build step succeeded.
    pub completed: BTreeSet<String>,
    /// Failure reason per failed module.
    pub failed: BTreeMap<String, String>,
    /// Compile-tagged modules never started because an earlier wave failed.
    pub skipped: BTreeSet<String>,
    /// Reuse-only modules, which require no build step.
    pub reused: BTreeSet<String>,
}

impl BuildReport {
    /// Returns `true` if every compile-tagged module completed.
    pub fn success(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }
}

/// Executes build plans on a bounded worker pool.
pub struct WaveRunner {
    pool: rayon::ThreadPool,
}

impl WaveRunner {
    /// Creates a runner with the given worker count.
    ///
    /// A count of zero uses one worker per available core.
    pub fn new(workers: usize) -> Result<Self, PlanError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| PlanError::WorkerPool {
                reason: e.to_string(),
            })?;
        Ok(Self { pool })
    }

    /// Runs the plan's waves in order, invoking `step` for every
    /// compile-tagged module.
    ///
    /// All compile entries of a wave are submitted together and run
    /// concurrently, bounded by the worker count. If any step in a wave
    /// fails, the wave's other steps still run to completion, but every
    /// later wave's compile entries are skipped. Reuse-only entries never
    /// invoke `step`.
    pub fn run<F>(&self, plan: &BuildPlan, step: F) -> BuildReport
    where
        F: Fn(&str) -> Result<(), BuildStepFailure> + Sync,
    {
        let mut report = BuildReport::default();
        let mut halted = false;

        for wave in &plan.waves {
            for entry in &wave.entries {
                if entry.action == BuildAction::ReuseOnly {
                    report.reused.insert(entry.module.clone());
                }
            }

            let compile: Vec<&str> = wave.compile_modules().collect();
            if halted {
                for module in compile {
                    report.skipped.insert(module.to_string());
                }
                continue;
            }

            let results: Vec<(String, Result<(), BuildStepFailure>)> = self.pool.install(|| {
                compile
                    .par_iter()
                    .map(|module| (module.to_string(), step(module)))
                    .collect()
            });

            for (module, result) in results {
                match result {
                    Ok(()) => {
                        report.completed.insert(module);
                    }
                    Err(failure) => {
                        report.failed.insert(module, failure.reason);
                    }
                }
            }

            if !report.failed.is_empty() {
                halted = true;
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use stratum_common::ContentHash;
    use stratum_descriptor::{DescriptorStore, ModuleDescriptor};
    use stratum_graph::DependencyGraph;

    use crate::schedule::{schedule, DirtySet};

    fn plan(descs: &[(&str, &[&str])], dirty: DirtySet) -> BuildPlan {
        let descriptors: Vec<ModuleDescriptor> = descs
            .iter()
            .map(|(name, deps)| {
                let mut d =
                    ModuleDescriptor::new(*name, ContentHash::from_bytes(name.as_bytes()));
                d.public_deps = deps.iter().map(|s| s.to_string()).collect();
                d
            })
            .collect();
        let store = DescriptorStore::load(descriptors).unwrap();
        let graph = DependencyGraph::build(&store).unwrap();
        schedule(&graph, &dirty).unwrap()
    }

    #[test]
    fn all_steps_succeed() {
        let p = plan(&[("A", &[]), ("B", &["A"]), ("C", &["B"])], DirtySet::All);
        let runner = WaveRunner::new(2).unwrap();
        let report = runner.run(&p, |_| Ok(()));
        assert!(report.success());
        assert_eq!(report.completed.len(), 3);
        assert!(report.failed.is_empty());
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn steps_run_in_dependency_order() {
        let p = plan(&[("A", &[]), ("B", &["A"]), ("C", &["B"])], DirtySet::All);
        let runner = WaveRunner::new(1).unwrap();
        let order = Mutex::new(Vec::new());
        let report = runner.run(&p, |module| {
            order.lock().unwrap().push(module.to_string());
            Ok(())
        });
        assert!(report.success());
        assert_eq!(order.into_inner().unwrap(), vec!["A", "B", "C"]);
    }

    #[test]
    fn failure_halts_later_waves() {
        let p = plan(&[("A", &[]), ("B", &["A"]), ("C", &["B"])], DirtySet::All);
        let runner = WaveRunner::new(1).unwrap();
        let report = runner.run(&p, |module| {
            if module == "B" {
                Err(BuildStepFailure::new(module, "compiler exited with 1"))
            } else {
                Ok(())
            }
        });
        assert!(!report.success());
        assert!(report.completed.contains("A"));
        assert_eq!(
            report.failed.get("B").map(String::as_str),
            Some("compiler exited with 1")
        );
        assert!(report.skipped.contains("C"));
    }

    #[test]
    fn siblings_of_failed_step_still_run() {
        // A and B share a wave; C depends on both.
        let p = plan(
            &[("A", &[]), ("B", &[]), ("C", &["A", "B"])],
            DirtySet::All,
        );
        let runner = WaveRunner::new(2).unwrap();
        let ran = Mutex::new(BTreeSet::new());
        let report = runner.run(&p, |module| {
            ran.lock().unwrap().insert(module.to_string());
            if module == "A" {
                Err(BuildStepFailure::new(module, "boom"))
            } else {
                Ok(())
            }
        });
        let ran = ran.into_inner().unwrap();
        assert!(ran.contains("A") && ran.contains("B"));
        assert!(!ran.contains("C"));
        assert!(report.completed.contains("B"));
        assert!(report.failed.contains_key("A"));
        assert!(report.skipped.contains("C"));
    }

    #[test]
    fn reuse_only_entries_never_invoke_step() {
        let p = plan(
            &[("A", &[]), ("B", &["A"])],
            DirtySet::from_names(["B"]),
        );
        let runner = WaveRunner::new(1).unwrap();
        let ran = Mutex::new(Vec::new());
        let report = runner.run(&p, |module| {
            ran.lock().unwrap().push(module.to_string());
            Ok(())
        });
        assert_eq!(ran.into_inner().unwrap(), vec!["B"]);
        assert!(report.reused.contains("A"));
        assert!(report.completed.contains("B"));
        assert!(report.success());
    }

    #[test]
    fn empty_plan_reports_success() {
        let p = BuildPlan { waves: Vec::new() };
        let runner = WaveRunner::new(1).unwrap();
        let report = runner.run(&p, |_| Ok(()));
        assert!(report.success());
        assert!(report.completed.is_empty());
    }

    #[test]
    fn failure_display() {
        let f = BuildStepFailure::new("Core", "missing header");
        assert_eq!(
            f.to_string(),
            "build step failed for `Core`: missing header"
        );
    }
}
