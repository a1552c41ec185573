//! The validated, immutable module dependency graph.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use stratum_descriptor::DescriptorStore;

use crate::error::GraphError;

/// DFS traversal state for cycle detection.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    Unvisited,
    InProgress,
    Done,
}

/// A directed graph of module dependencies.
///
/// Nodes carry module names; an edge points from a module to each of its
/// dependencies. Built fresh per resolution pass from a
/// [`DescriptorStore`] and never mutated afterwards. Construction guarantees
/// that every edge endpoint resolved to a descriptor and that the graph is
/// acyclic.
#[derive(Debug)]
pub struct DependencyGraph {
    graph: DiGraph<String, ()>,
    indices: BTreeMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Builds and validates the dependency graph for a descriptor store.
    ///
    /// Fails with [`GraphError::UnresolvedDependency`] on the first
    /// dependency name without a descriptor, and with
    /// [`GraphError::CyclicDependency`] if the graph contains any cycle.
    /// A module listing itself is a cycle of length one.
    pub fn build(store: &DescriptorStore) -> Result<Self, GraphError> {
        let mut graph = DiGraph::new();
        let mut indices = BTreeMap::new();

        // Nodes in ascending name order so indices are deterministic.
        for desc in store.iter() {
            let idx = graph.add_node(desc.name.clone());
            indices.insert(desc.name.clone(), idx);
        }

        for desc in store.iter() {
            let from = indices[&desc.name];
            let mut seen = BTreeSet::new();
            for dep in desc.dependencies() {
                // A name in both the public and private lists is one edge.
                if !seen.insert(dep.to_string()) {
                    continue;
                }
                let to = *indices.get(dep).ok_or_else(|| GraphError::UnresolvedDependency {
                    module: desc.name.clone(),
                    missing: dep.to_string(),
                })?;
                graph.add_edge(from, to, ());
            }
        }

        let built = Self { graph, indices };
        if let Some(cycle) = built.find_cycle() {
            return Err(GraphError::CyclicDependency { cycle });
        }
        Ok(built)
    }

    /// Returns all module names in ascending order.
    pub fn module_names(&self) -> Vec<&str> {
        self.indices.keys().map(String::as_str).collect()
    }

    /// Returns `true` if the graph contains a module with this name.
    pub fn contains(&self, name: &str) -> bool {
        self.indices.contains_key(name)
    }

    /// Returns the number of modules in the graph.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if the graph has no modules.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns the direct dependencies of a module, ascending by name.
    ///
    /// Unknown names yield an empty list.
    pub fn dependencies_of(&self, name: &str) -> Vec<&str> {
        self.neighbors_sorted(name, Direction::Outgoing)
    }

    /// Returns the direct dependents of a module, ascending by name.
    ///
    /// Unknown names yield an empty list.
    pub fn dependents_of(&self, name: &str) -> Vec<&str> {
        self.neighbors_sorted(name, Direction::Incoming)
    }

    /// Computes the set of all transitive dependencies of the seed modules,
    /// including the seeds themselves.
    pub fn transitive_dependencies<'a>(
        &self,
        seeds: impl IntoIterator<Item = &'a str>,
    ) -> BTreeSet<String> {
        self.closure(seeds, Direction::Outgoing)
    }

    /// Computes the set of all transitive dependents of the seed modules,
    /// including the seeds themselves. This is the forward propagation set
    /// used for dirty marking.
    pub fn transitive_dependents<'a>(
        &self,
        seeds: impl IntoIterator<Item = &'a str>,
    ) -> BTreeSet<String> {
        self.closure(seeds, Direction::Incoming)
    }

    fn neighbors_sorted(&self, name: &str, dir: Direction) -> Vec<&str> {
        let Some(&idx) = self.indices.get(name) else {
            return Vec::new();
        };
        let mut out: Vec<&str> = self
            .graph
            .neighbors_directed(idx, dir)
            .map(|n| self.graph[n].as_str())
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    fn closure<'a>(
        &self,
        seeds: impl IntoIterator<Item = &'a str>,
        dir: Direction,
    ) -> BTreeSet<String> {
        let mut visited = BTreeSet::new();
        let mut stack: Vec<NodeIndex> = seeds
            .into_iter()
            .filter_map(|name| self.indices.get(name).copied())
            .collect();
        while let Some(idx) = stack.pop() {
            if !visited.insert(self.graph[idx].clone()) {
                continue;
            }
            for next in self.graph.neighbors_directed(idx, dir) {
                if !visited.contains(&self.graph[next]) {
                    stack.push(next);
                }
            }
        }
        visited
    }

    /// Searches for a cycle, returning it as a closed walk (first module
    /// repeated at the end) or `None` if the graph is acyclic.
    ///
    /// Roots and neighbors are visited in ascending name order, so the
    /// reported cycle is deterministic for a given descriptor set.
    fn find_cycle(&self) -> Option<Vec<String>> {
        let mut color = vec![Color::Unvisited; self.graph.node_count()];
        for &idx in self.indices.values() {
            if color[idx.index()] == Color::Unvisited {
                let mut path = Vec::new();
                if let Some(cycle) = self.cycle_dfs(idx, &mut color, &mut path) {
                    return Some(cycle);
                }
            }
        }
        None
    }

    fn cycle_dfs(
        &self,
        node: NodeIndex,
        color: &mut [Color],
        path: &mut Vec<NodeIndex>,
    ) -> Option<Vec<String>> {
        color[node.index()] = Color::InProgress;
        path.push(node);

        let mut next: Vec<NodeIndex> = self.graph.neighbors(node).collect();
        next.sort_by(|a, b| self.graph[*a].cmp(&self.graph[*b]));
        next.dedup();

        for succ in next {
            match color[succ.index()] {
                Color::InProgress => {
                    // Back edge: in-progress nodes are always on the path.
                    let start = path.iter().position(|&n| n == succ).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        path[start..].iter().map(|&n| self.graph[n].clone()).collect();
                    cycle.push(self.graph[succ].clone());
                    return Some(cycle);
                }
                Color::Unvisited => {
                    if let Some(cycle) = self.cycle_dfs(succ, color, path) {
                        return Some(cycle);
                    }
                }
                Color::Done => {}
            }
        }

        path.pop();
        color[node.index()] = Color::Done;
        None
    }
}
