//! `stratum plan` — compute the incremental build plan and PCH assignment.

use serde::Serialize;
use stratum_cache::FingerprintManifest;
use stratum_plan::{assign, schedule, BuildAction, BuildPlan, DirtySet, PchAssignment, PchDecision};

use crate::pipeline::{resolve_project, state_dir};
use crate::{GlobalArgs, OutputFormat, PlanArgs};

/// Serialized output of the `plan` command.
#[derive(Serialize)]
struct PlanOutput<'a> {
    /// Modules requiring recompilation, ascending by name.
    dirty: Vec<&'a str>,
    /// The scheduled waves.
    plan: &'a BuildPlan,
    /// The precompiled header assignment.
    pch: &'a PchAssignment,
}

/// Runs the `stratum plan` command.
///
/// Resolves the project, loads fingerprint state, computes the dirty set
/// (or plans a full rebuild with `--all`), schedules the waves, and computes
/// the PCH assignment. Prints text or JSON; never mutates stored state.
pub fn run(args: &PlanArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = resolve_project(global)?;

    let dirty = if args.all {
        DirtySet::All
    } else {
        let dir = state_dir(&project.root, args.state_dir.as_deref());
        let manifest = FingerprintManifest::load_or_empty(&dir);
        DirtySet::Modules(stratum_cache::compute_dirty(
            &project.graph,
            &project.store,
            &manifest,
        ))
    };

    let plan = schedule(&project.graph, &dirty)?;
    let pch = assign(&project.graph, &project.store)?;

    let dirty_names: Vec<&str> = plan
        .waves
        .iter()
        .flat_map(|w| w.compile_modules())
        .collect();

    match args.format {
        OutputFormat::Json => {
            let output = PlanOutput {
                dirty: dirty_names,
                plan: &plan,
                pch: &pch,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            if plan.is_empty() {
                if !global.quiet {
                    println!("nothing to build");
                }
                return Ok(0);
            }
            for (i, wave) in plan.waves.iter().enumerate() {
                let entries: Vec<String> = wave
                    .entries
                    .iter()
                    .map(|e| match e.action {
                        BuildAction::Compile => e.module.clone(),
                        BuildAction::ReuseOnly => format!("{} (reuse)", e.module),
                    })
                    .collect();
                println!("wave {}: {}", i + 1, entries.join(", "));
            }
            for (module, decision) in &pch.decisions {
                println!("pch {module}: {}", decision_label(decision));
            }
        }
    }

    Ok(0)
}

/// Human-readable label for a PCH decision.
fn decision_label(decision: &PchDecision) -> String {
    match decision {
        PchDecision::GenerateOwn => "generate-own".to_string(),
        PchDecision::ShareWith(target) => format!("share-with:{target}"),
        PchDecision::None => "none".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("stratum.toml"),
            r#"
[project]
name = "stealth"
version = "0.1.0"

[modules.Core]
pch = "explicit"

[modules.Engine]
deps = ["Core"]

[modules.Game]
deps = ["Core", "Engine"]
"#,
        )
        .unwrap();
        dir
    }

    fn global(dir: &tempfile::TempDir) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            config: Some(dir.path().display().to_string()),
        }
    }

    #[test]
    fn plan_all_succeeds() {
        let dir = project_dir();
        let args = PlanArgs {
            all: true,
            format: OutputFormat::Text,
            state_dir: None,
        };
        assert_eq!(run(&args, &global(&dir)).unwrap(), 0);
    }

    #[test]
    fn plan_json_succeeds() {
        let dir = project_dir();
        let args = PlanArgs {
            all: false,
            format: OutputFormat::Json,
            state_dir: None,
        };
        assert_eq!(run(&args, &global(&dir)).unwrap(), 0);
    }

    #[test]
    fn decision_labels() {
        assert_eq!(decision_label(&PchDecision::GenerateOwn), "generate-own");
        assert_eq!(decision_label(&PchDecision::None), "none");
        assert_eq!(
            decision_label(&PchDecision::ShareWith("Core".to_string())),
            "share-with:Core"
        );
    }
}
