// src/graph/cycles.rs
//! Circular dependency detection.
//!
//! Depth-first search over the scanned nodes using an explicit frame stack,
//! so graph depth never turns into call-stack depth.

use std::collections::btree_set;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// A closed dependency loop: the last path repeats the first (`[a, b, a]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cycle(Vec<String>);

impl Cycle {
    #[must_use]
    pub fn new(path: Vec<String>) -> Self {
        Self(path)
    }

    /// The closed path, including the repeated start.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.0
    }

    /// Distinct files on the loop, in traversal order.
    #[must_use]
    pub fn members(&self) -> &[String] {
        match self.0.split_last() {
            Some((_, open)) if !open.is_empty() => open,
            _ => &self.0,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.members().iter().any(|m| m == path)
    }

    /// Consecutive `(importer, imported)` pairs around the loop.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.windows(2).filter_map(|w| match w {
            [from, to] => Some((from.as_str(), to.as_str())),
            _ => None,
        })
    }
}

/// Detects cycles among the keys of `adjacency`.
///
/// Edges to targets that are not keys are ignored. Iteration is sorted, so the
/// result is stable for a given graph.
#[must_use]
pub fn detect_cycles(adjacency: &BTreeMap<String, BTreeSet<String>>) -> Vec<Cycle> {
    let mut state = DfsState::default();
    for start in adjacency.keys() {
        if !state.visited.contains(start.as_str()) {
            state.walk(start, adjacency);
        }
    }
    state.cycles
}

struct Frame<'a> {
    node: &'a str,
    neighbors: btree_set::Iter<'a, String>,
}

#[derive(Default)]
struct DfsState<'a> {
    visited: BTreeSet<&'a str>,
    on_stack: BTreeSet<&'a str>,
    path_stack: Vec<&'a str>,
    cycles: Vec<Cycle>,
}

impl<'a> DfsState<'a> {
    fn walk(&mut self, start: &'a str, adjacency: &'a BTreeMap<String, BTreeSet<String>>) {
        let mut frames: Vec<Frame<'a>> = Vec::new();
        self.enter(start, adjacency, &mut frames);

        while let Some(frame) = frames.last_mut() {
            let Some(next) = frame.neighbors.next() else {
                let node = frame.node;
                frames.pop();
                self.on_stack.remove(node);
                self.path_stack.pop();
                continue;
            };
            if !adjacency.contains_key(next) {
                continue;
            }
            if !self.visited.contains(next.as_str()) {
                self.enter(next, adjacency, &mut frames);
            } else if self.on_stack.contains(next.as_str()) {
                self.record_cycle(next);
            }
        }
    }

    fn enter(
        &mut self,
        node: &'a str,
        adjacency: &'a BTreeMap<String, BTreeSet<String>>,
        frames: &mut Vec<Frame<'a>>,
    ) {
        let Some(neighbors) = adjacency.get(node) else { return };
        self.visited.insert(node);
        self.on_stack.insert(node);
        self.path_stack.push(node);
        frames.push(Frame { node, neighbors: neighbors.iter() });
    }

    fn record_cycle(&mut self, target: &str) {
        if let Some(pos) = self.path_stack.iter().position(|n| *n == target) {
            let mut path: Vec<String> =
                self.path_stack.iter().skip(pos).map(|n| (*n).to_string()).collect();
            path.push(target.to_string());
            self.cycles.push(Cycle::new(path));
        }
    }
}
