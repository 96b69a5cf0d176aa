// src/graph/types.rs
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::cycles::Cycle;

/// A scanned module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyNode {
    pub path: String,
    /// Resolved same-repository runtime imports.
    pub imports: BTreeSet<String>,
    /// Scanned files importing this one.
    pub imported_by: BTreeSet<String>,
    /// Whether the file is part of the changeset.
    pub is_changed: bool,
}

impl DependencyNode {
    #[must_use]
    pub fn new(path: &str, is_changed: bool) -> Self {
        Self { path: path.to_string(), is_changed, ..Self::default() }
    }
}

/// The changeset-scoped dependency graph.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DependencyGraph {
    pub nodes: BTreeMap<String, DependencyNode>,
    pub cycles: Vec<Cycle>,
    /// Every scanned node; scanning is already scoped to the change.
    pub impacted: BTreeSet<String>,
}

impl DependencyGraph {
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn node(&self, path: &str) -> Option<&DependencyNode> {
        self.nodes.get(path)
    }

    /// Every `(importer, imported)` runtime edge, sorted.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.nodes
            .values()
            .flat_map(|n| n.imports.iter().map(move |t| (n.path.as_str(), t.as_str())))
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.imports.len()).sum()
    }

    #[must_use]
    pub fn first_cycle(&self) -> Option<&Cycle> {
        self.cycles.first()
    }

    #[must_use]
    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }

    /// Forward edges restricted to scanned nodes.
    #[must_use]
    pub fn adjacency(&self) -> BTreeMap<String, BTreeSet<String>> {
        self.nodes
            .iter()
            .map(|(path, node)| {
                let targets = node
                    .imports
                    .iter()
                    .filter(|t| self.nodes.contains_key(*t))
                    .cloned()
                    .collect();
                (path.clone(), targets)
            })
            .collect()
    }
}

/// Summary counts for reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub cycles: usize,
    pub changed: usize,
}

impl From<&DependencyGraph> for GraphStats {
    fn from(graph: &DependencyGraph) -> Self {
        Self {
            nodes: graph.len(),
            edges: graph.edge_count(),
            cycles: graph.cycles.len(),
            changed: graph.nodes.values().filter(|n| n.is_changed).count(),
        }
    }
}
