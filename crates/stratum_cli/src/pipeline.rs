//! Shared resolution pipeline for CLI commands.
//!
//! Every command starts the same way: find the project root, load
//! `stratum.toml`, convert module tables to descriptors, load the store, and
//! build the validated dependency graph. Any resolution failure aborts the
//! command with no partial plan.

use std::path::{Path, PathBuf};

use stratum_config::ProjectConfig;
use stratum_descriptor::DescriptorStore;
use stratum_graph::DependencyGraph;

use crate::GlobalArgs;

/// Default state directory name under the project root.
const STATE_DIR: &str = ".stratum";

/// A fully resolved project: config, descriptor store, and validated graph.
#[derive(Debug)]
pub struct ResolvedProject {
    /// The parsed project configuration.
    pub config: ProjectConfig,
    /// The loaded descriptor store.
    pub store: DescriptorStore,
    /// The validated dependency graph.
    pub graph: DependencyGraph,
    /// The project root directory.
    pub root: PathBuf,
}

/// Walks up from `start` looking for the nearest directory containing
/// `stratum.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join("stratum.toml").exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find stratum.toml in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project root directory from global CLI args.
///
/// If `--config` is specified, uses that path (file → parent dir, dir →
/// itself). Otherwise walks up from the current directory.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            Ok(p.parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")))
        } else if p.is_dir() {
            Ok(p)
        } else {
            Err(format!("config path {} does not exist", p.display()).into())
        }
    } else {
        let cwd = std::env::current_dir()?;
        find_project_root(&cwd)
    }
}

/// Runs the full resolution pipeline: config → descriptors → store → graph.
pub fn resolve_project(global: &GlobalArgs) -> Result<ResolvedProject, Box<dyn std::error::Error>> {
    let root = resolve_project_root(global)?;
    let config = stratum_config::load_config(&root)?;
    let descriptors = stratum_config::to_descriptors(&config, &root)?;
    let store = DescriptorStore::load(descriptors)?;
    let graph = DependencyGraph::build(&store)?;
    Ok(ResolvedProject {
        config,
        store,
        graph,
        root,
    })
}

/// Resolves the fingerprint state directory for a project.
pub fn state_dir(root: &Path, override_dir: Option<&str>) -> PathBuf {
    match override_dir {
        Some(dir) => PathBuf::from(dir),
        None => root.join(STATE_DIR),
    }
}
