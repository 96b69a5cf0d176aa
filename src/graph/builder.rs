// src/graph/builder.rs
//! Changeset-scoped graph construction.
//!
//! Starting from the changed files, follow resolved imports breadth-first and
//! scan only what is reachable. Repository size never enters the cost.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use super::cycles::detect_cycles;
use super::imports;
use super::resolver::ImportResolver;
use super::types::{DependencyGraph, DependencyNode};
use crate::config::GraphConfig;
use crate::lang;
use crate::types::ChangedFile;

/// Builds the dependency graph for the closure of `changed`.
pub struct GraphBuilder<'a> {
    root: &'a Path,
    resolver: &'a dyn ImportResolver,
    config: &'a GraphConfig,
}

impl<'a> GraphBuilder<'a> {
    #[must_use]
    pub fn new(root: &'a Path, resolver: &'a dyn ImportResolver, config: &'a GraphConfig) -> Self {
        Self { root, resolver, config }
    }

    #[must_use]
    pub fn build(&self, changed: &[ChangedFile]) -> DependencyGraph {
        let seeds: BTreeSet<String> = changed
            .iter()
            .filter(|f| !f.is_deleted())
            .map(|f| f.path().to_string())
            .collect();

        let mut nodes = self.scan_closure(&seeds);
        link_back_edges(&mut nodes);

        let mut graph = DependencyGraph {
            impacted: nodes.keys().cloned().collect(),
            nodes,
            cycles: Vec::new(),
        };
        graph.cycles = detect_cycles(&graph.adjacency());

        info!(
            nodes = graph.len(),
            edges = graph.edge_count(),
            cycles = graph.cycles.len(),
            "scoped dependency graph built"
        );
        graph
    }

    fn scan_closure(&self, seeds: &BTreeSet<String>) -> BTreeMap<String, DependencyNode> {
        let mut queue: VecDeque<String> = seeds.iter().cloned().collect();
        let mut seen: BTreeSet<String> = seeds.clone();
        let mut nodes = BTreeMap::new();

        while let Some(path) = queue.pop_front() {
            if self.is_skipped(&path) {
                debug!(file = %path, "skipped");
                continue;
            }
            if self.config.max_nodes > 0 && nodes.len() >= self.config.max_nodes {
                warn!(limit = self.config.max_nodes, "node limit reached, graph truncated");
                break;
            }

            let mut node = DependencyNode::new(&path, seeds.contains(&path));
            node.imports = self.runtime_imports(&path);
            for target in &node.imports {
                if seen.insert(target.clone()) {
                    queue.push_back(target.clone());
                }
            }
            debug!(file = %path, imports = node.imports.len(), "scanned");
            nodes.insert(path, node);
        }
        nodes
    }

    fn runtime_imports(&self, path: &str) -> BTreeSet<String> {
        let content = match fs::read_to_string(self.root.join(path)) {
            Ok(c) => c,
            Err(e) => {
                debug!(file = %path, error = %e, "unreadable, no edges");
                return BTreeSet::new();
            }
        };
        imports::extract(&content)
            .into_iter()
            .filter(imports::ImportRef::is_runtime)
            .filter_map(|r| self.resolver.resolve(path, &r.specifier))
            .collect()
    }

    fn is_skipped(&self, path: &str) -> bool {
        !lang::is_graph_source(path) || lang::is_test_file(path) || self.is_vendored(path)
    }

    fn is_vendored(&self, path: &str) -> bool {
        path.split('/')
            .any(|segment| self.config.vendored_dirs.iter().any(|v| v == segment))
    }
}

/// Records `imported_by` for every edge whose target was scanned.
fn link_back_edges(nodes: &mut BTreeMap<String, DependencyNode>) {
    let edges: Vec<(String, String)> = nodes
        .values()
        .flat_map(|n| n.imports.iter().map(|t| (n.path.clone(), t.clone())))
        .collect();
    for (from, to) in edges {
        if let Some(target) = nodes.get_mut(&to) {
            target.imported_by.insert(from);
        }
    }
}

/// Convenience wrapper around [`GraphBuilder`].
#[must_use]
pub fn build_scoped_graph(
    root: &Path,
    changed: &[ChangedFile],
    resolver: &dyn ImportResolver,
    config: &GraphConfig,
) -> DependencyGraph {
    GraphBuilder::new(root, resolver, config).build(changed)
}
