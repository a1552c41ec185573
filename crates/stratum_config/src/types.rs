//! Configuration types deserialized from `stratum.toml`.

use serde::Deserialize;
use std::collections::BTreeMap;
use stratum_descriptor::PchMode;

/// The top-level project configuration parsed from `stratum.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Core project metadata.
    pub project: ProjectMeta,
    /// Module descriptor tables, keyed by module name.
    #[serde(default)]
    pub modules: BTreeMap<String, ModuleConfig>,
    /// Build execution settings.
    #[serde(default)]
    pub build: BuildConfig,
}

/// Core project metadata required in every `stratum.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// The project version string.
    pub version: String,
    /// A brief description of the project.
    #[serde(default)]
    pub description: String,
}

/// One module's declaration: `[modules.<name>]`.
#[derive(Debug, Default, Deserialize)]
pub struct ModuleConfig {
    /// Names of publicly depended-on modules.
    #[serde(default)]
    pub deps: Vec<String>,

    /// Names of privately depended-on modules.
    #[serde(default)]
    pub private_deps: Vec<String>,

    /// Precompiled header mode (`none`, `shared`, or `explicit`).
    /// Defaults to `shared`.
    #[serde(default)]
    pub pch: PchMode,

    /// Source file paths, relative to the project root, hashed into the
    /// module's content fingerprint.
    #[serde(default)]
    pub sources: Vec<String>,
}

/// Build execution settings: `[build]`.
#[derive(Debug, Default, Deserialize)]
pub struct BuildConfig {
    /// Worker count for wave execution. Zero means one worker per core.
    #[serde(default)]
    pub workers: usize,

    /// Command template run per compiled module. Must contain a `{module}`
    /// placeholder, which is replaced with the module name.
    pub command: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    #[test]
    fn module_defaults() {
        let toml = r#"
[project]
name = "stealth"
version = "0.1.0"

[modules.Core]
"#;
        let config = load_config_from_str(toml).unwrap();
        let core = &config.modules["Core"];
        assert!(core.deps.is_empty());
        assert!(core.private_deps.is_empty());
        assert_eq!(core.pch, PchMode::Shared);
        assert!(core.sources.is_empty());
    }

    #[test]
    fn pch_all_variants_parse() {
        for (input, expected) in [
            ("none", PchMode::None),
            ("shared", PchMode::Shared),
            ("explicit", PchMode::Explicit),
        ] {
            let toml = format!(
                r#"
[project]
name = "stealth"
version = "0.1.0"

[modules.Core]
pch = "{input}"
"#
            );
            let config = load_config_from_str(&toml).unwrap();
            assert_eq!(config.modules["Core"].pch, expected);
        }
    }

    #[test]
    fn build_defaults() {
        let toml = r#"
[project]
name = "stealth"
version = "0.1.0"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.build.workers, 0);
        assert!(config.build.command.is_none());
    }

    #[test]
    fn modules_are_name_ordered() {
        let toml = r#"
[project]
name = "stealth"
version = "0.1.0"

[modules.Zeta]
[modules.Alpha]
"#;
        let config = load_config_from_str(toml).unwrap();
        let names: Vec<&String> = config.modules.keys().collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
    }
}
