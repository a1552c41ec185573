//! Dirty-set computation and fingerprint commit.
//!
//! A module's composite fingerprint folds its own content fingerprint with
//! the composite fingerprints of its direct dependencies, recursively, so it
//! summarizes the module's whole dependency subtree. Comparing fresh
//! composites against the records from the previous build yields the seed
//! dirty set, which then propagates forward to all transitive dependents.

use std::collections::{BTreeMap, BTreeSet};

use stratum_common::ContentHash;
use stratum_descriptor::DescriptorStore;
use stratum_graph::DependencyGraph;

use crate::manifest::{FingerprintManifest, FingerprintRecord};

/// Computes the current composite fingerprint of every module.
///
/// Direct dependencies are folded in ascending name order, so the result is
/// deterministic for a given descriptor set.
pub fn current_fingerprints(
    graph: &DependencyGraph,
    store: &DescriptorStore,
) -> BTreeMap<String, ContentHash> {
    let mut memo = BTreeMap::new();
    for desc in store.iter() {
        composite(&desc.name, graph, store, &mut memo);
    }
    memo
}

/// Memoized post-order fold; the graph is acyclic so recursion terminates.
fn composite(
    name: &str,
    graph: &DependencyGraph,
    store: &DescriptorStore,
    memo: &mut BTreeMap<String, ContentHash>,
) -> ContentHash {
    if let Some(&hash) = memo.get(name) {
        return hash;
    }
    let own = store
        .lookup(name)
        .map(|d| d.content_hash)
        .unwrap_or_else(|| ContentHash::from_bytes(name.as_bytes()));

    let deps: Vec<String> = graph
        .dependencies_of(name)
        .into_iter()
        .map(str::to_string)
        .collect();
    let mut parts = vec![own];
    for dep in &deps {
        parts.push(composite(dep, graph, store, memo));
    }

    let hash = ContentHash::combine(parts);
    memo.insert(name.to_string(), hash);
    hash
}

/// Determines which modules need rebuilding.
///
/// A module seeds the dirty set if it has no record from the previous build,
/// its own content fingerprint changed, or any direct dependency's current
/// composite fingerprint differs from what its record captured (including
/// dependencies added or removed since then). The seed set then propagates
/// forward: every transitive dependent of a dirty module is dirty. Stored
/// records are never mutated here; see [`commit`].
pub fn compute_dirty(
    graph: &DependencyGraph,
    store: &DescriptorStore,
    previous: &FingerprintManifest,
) -> BTreeSet<String> {
    let current = current_fingerprints(graph, store);
    let mut seeds = BTreeSet::new();

    for desc in store.iter() {
        let Some(record) = previous.records.get(&desc.name) else {
            seeds.insert(desc.name.clone());
            continue;
        };
        if record.own != desc.content_hash {
            seeds.insert(desc.name.clone());
            continue;
        }
        let deps = graph.dependencies_of(&desc.name);
        let deps_changed = deps.len() != record.deps.len()
            || deps
                .iter()
                .any(|dep| record.deps.get(*dep) != current.get(*dep));
        if deps_changed {
            seeds.insert(desc.name.clone());
        }
    }

    graph.transitive_dependents(seeds.iter().map(String::as_str))
}

/// Records fresh fingerprints for every module, pruning records for modules
/// that no longer exist. Called after a fully successful build.
pub fn commit(graph: &DependencyGraph, store: &DescriptorStore, manifest: &mut FingerprintManifest) {
    manifest.records.retain(|name, _| store.contains(name));
    let names: Vec<&str> = store.names().collect();
    commit_modules(graph, store, manifest, names);
}

/// Records fresh fingerprints for the given modules only.
///
/// Used after a partially failed build to capture the modules that did
/// complete, so a retry does not recompile them.
pub fn commit_modules<'a>(
    graph: &DependencyGraph,
    store: &DescriptorStore,
    manifest: &mut FingerprintManifest,
    modules: impl IntoIterator<Item = &'a str>,
) {
    let current = current_fingerprints(graph, store);
    for name in modules {
        let Some(desc) = store.lookup(name) else {
            continue;
        };
        let deps = graph
            .dependencies_of(name)
            .into_iter()
            .filter_map(|dep| current.get(dep).map(|&h| (dep.to_string(), h)))
            .collect();
        manifest.records.insert(
            name.to_string(),
            FingerprintRecord {
                own: desc.content_hash,
                deps,
            },
        );
    }
}
