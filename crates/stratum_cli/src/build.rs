//! `stratum build` — execute the build plan with the configured command.
//!
//! Each compile-tagged module runs the command template (with `{module}`
//! substituted) through `sh -c` on the wave runner's worker pool. After a
//! fully successful run all fingerprints are committed; after a partial
//! failure only the completed modules are recorded, so a retry skips them.

use std::process::Command;

use stratum_cache::FingerprintManifest;
use stratum_plan::{schedule, BuildStepFailure, DirtySet, WaveRunner};

use crate::pipeline::{resolve_project, state_dir};
use crate::{BuildArgs, GlobalArgs};

/// Runs the `stratum build` command.
///
/// Returns exit code 0 when every scheduled module builds, 1 otherwise.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = resolve_project(global)?;
    let dir = state_dir(&project.root, args.state_dir.as_deref());
    let mut manifest = FingerprintManifest::load_or_empty(&dir);

    let dirty = if args.all {
        DirtySet::All
    } else {
        DirtySet::Modules(stratum_cache::compute_dirty(
            &project.graph,
            &project.store,
            &manifest,
        ))
    };
    let plan = schedule(&project.graph, &dirty)?;

    if plan.compile_count() == 0 {
        if !global.quiet {
            println!("{} is up to date", project.config.project.name);
        }
        return Ok(0);
    }

    let template = args
        .command
        .clone()
        .or_else(|| project.config.build.command.clone())
        .ok_or("no build command configured (set build.command or pass --command)")?;
    let workers = args.workers.unwrap_or(project.config.build.workers);

    if !global.quiet {
        eprintln!(
            "   Building {} modules in {} waves",
            plan.compile_count(),
            plan.waves.len()
        );
    }

    let runner = WaveRunner::new(workers)?;
    let report = runner.run(&plan, |module| {
        let command = template.replace("{module}", module);
        let status = Command::new("sh")
            .arg("-c")
            .arg(&command)
            .status()
            .map_err(|e| BuildStepFailure::new(module, e.to_string()))?;
        if status.success() {
            Ok(())
        } else {
            Err(BuildStepFailure::new(
                module,
                format!("command exited with {status}"),
            ))
        }
    });

    if report.success() {
        stratum_cache::commit(&project.graph, &project.store, &mut manifest);
        manifest.save(&dir)?;
        if !global.quiet {
            eprintln!("   Built {} modules", report.completed.len());
        }
        Ok(0)
    } else {
        // Record what did finish so the retry picks up where this run stopped.
        stratum_cache::commit_modules(
            &project.graph,
            &project.store,
            &mut manifest,
            report.completed.iter().map(String::as_str),
        );
        manifest.save(&dir)?;
        for (module, reason) in &report.failed {
            eprintln!("error: build step failed for `{module}`: {reason}");
        }
        if !global.quiet && !report.skipped.is_empty() {
            let skipped: Vec<&str> = report.skipped.iter().map(String::as_str).collect();
            eprintln!("   Skipped after failure: {}", skipped.join(", "));
        }
        Ok(1)
    }
}
