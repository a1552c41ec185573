//! Configuration loading, validation, and descriptor conversion.

use std::path::Path;

use stratum_common::ContentHash;
use stratum_descriptor::ModuleDescriptor;

use crate::error::ConfigError;
use crate::types::ProjectConfig;

/// Name of the project manifest file.
const CONFIG_FILE: &str = "stratum.toml";

/// Loads and validates a `stratum.toml` configuration from a project directory.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `stratum.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates required fields and value consistency.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.project.version.is_empty() {
        return Err(ConfigError::MissingField("project.version".to_string()));
    }
    if let Some(command) = &config.build.command {
        if !command.contains("{module}") {
            return Err(ConfigError::InvalidValue {
                field: "build.command".to_string(),
                reason: "must contain a {module} placeholder".to_string(),
            });
        }
    }
    for name in config.modules.keys() {
        if name.is_empty() {
            return Err(ConfigError::MissingField("modules.<name>".to_string()));
        }
    }
    Ok(())
}

/// Converts the module tables into build descriptors.
///
/// Each module's content fingerprint covers its declaration (name,
/// dependency lists, PCH mode) and the contents of its listed source files,
/// resolved relative to `project_dir`. An unreadable source file is an
/// error, not a silent cache miss.
pub fn to_descriptors(
    config: &ProjectConfig,
    project_dir: &Path,
) -> Result<Vec<ModuleDescriptor>, ConfigError> {
    let mut descriptors = Vec::with_capacity(config.modules.len());
    for (name, module) in &config.modules {
        let mut declaration = Vec::new();
        declaration.extend_from_slice(name.as_bytes());
        declaration.push(0);
        for dep in module.deps.iter().chain(module.private_deps.iter()) {
            declaration.extend_from_slice(dep.as_bytes());
            declaration.push(0);
        }
        declaration.extend_from_slice(format!("{:?}", module.pch).as_bytes());

        let mut parts = vec![ContentHash::from_bytes(&declaration)];
        for source in &module.sources {
            let path = project_dir.join(source);
            let bytes = std::fs::read(&path).map_err(|e| ConfigError::SourceRead {
                module: name.clone(),
                path,
                source: e,
            })?;
            parts.push(ContentHash::from_bytes(&bytes));
        }

        let mut desc = ModuleDescriptor::new(name.clone(), ContentHash::combine(parts));
        desc.public_deps = module.deps.clone();
        desc.private_deps = module.private_deps.clone();
        desc.pch_mode = module.pch;
        descriptors.push(desc);
    }
    Ok(descriptors)
}
