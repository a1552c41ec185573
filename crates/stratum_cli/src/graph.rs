//! `stratum graph` — resolve and print the module dependency graph.

use crate::pipeline::resolve_project;
use crate::GlobalArgs;

/// Runs the `stratum graph` command.
///
/// Resolves the project and prints each module with its direct dependencies.
/// Resolution failures (duplicates, unresolved names, cycles) propagate as
/// errors and exit nonzero.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = resolve_project(global)?;

    if !global.quiet {
        eprintln!(
            "   Resolved {} v{} ({} modules)",
            project.config.project.name,
            project.config.project.version,
            project.graph.len()
        );
    }

    for name in project.graph.module_names() {
        let deps = project.graph.dependencies_of(name);
        if deps.is_empty() {
            println!("{name}");
        } else {
            println!("{name} -> {}", deps.join(", "));
        }
    }

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_command_resolves_valid_project() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("stratum.toml"),
            r#"
[project]
name = "stealth"
version = "0.1.0"

[modules.Core]

[modules.Game]
deps = ["Core"]
"#,
        )
        .unwrap();
        let global = GlobalArgs {
            quiet: true,
            config: Some(dir.path().display().to_string()),
        };
        assert_eq!(run(&global).unwrap(), 0);
    }

    #[test]
    fn graph_command_fails_on_cycle() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("stratum.toml"),
            r#"
[project]
name = "stealth"
version = "0.1.0"

[modules.A]
deps = ["A"]
"#,
        )
        .unwrap();
        let global = GlobalArgs {
            quiet: true,
            config: Some(dir.path().display().to_string()),
        };
        assert!(run(&global).is_err());
    }
}
