use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::types::Confidence;

/// How import references are rebased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Prefix marking a project alias import.
    pub alias_prefix: String,
    /// Directory (repo-relative) that alias imports are rebased at.
    pub alias_root: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { alias_prefix: "@/".to_string(), alias_root: "src".to_string() }
    }
}

/// Scope limits for the changeset graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Directory names whose contents are never scanned.
    pub vendored_dirs: Vec<String>,
    /// Maximum number of nodes to scan. 0 = unlimited.
    pub max_nodes: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            vendored_dirs: vec!["node_modules".to_string(), "vendor".to_string()],
            max_nodes: 0,
        }
    }
}

/// Tuning knobs for the lexical scanners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanThresholds {
    /// Leading whitespace wider than this counts as deep nesting.
    pub max_indent_columns: usize,
    /// Distance between function markers that counts as a long function.
    pub max_function_lines: usize,
    /// `if (` occurrences per file above which the file is a god function.
    pub max_conditionals: usize,
    /// `for (` / `while (` occurrences per file above which the file is a god function.
    pub max_loops: usize,
    /// `/` separators an index file may have before it counts as deep.
    pub max_index_depth: usize,
}

impl Default for ScanThresholds {
    fn default() -> Self {
        Self {
            max_indent_columns: 16,
            max_function_lines: 60,
            max_conditionals: 10,
            max_loops: 5,
            max_index_depth: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestsConfig {
    pub command: String,
    pub timeout_secs: u64,
}

impl Default for TestsConfig {
    fn default() -> Self {
        Self {
            command: "npm test -- --passWithNoTests".to_string(),
            timeout_secs: 300,
        }
    }
}

impl TestsConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewSettings {
    pub base_branch: String,
    pub min_confidence: Confidence,
    pub max_results: usize,
    /// Check catalog path, relative to the repository root.
    pub catalog: String,
    /// Layered override store, relative to the repository root.
    pub review_system_dir: String,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            base_branch: "main".to_string(),
            min_confidence: Confidence::Low,
            max_results: 50,
            catalog: ".review-gate/catalog.toml".to_string(),
            review_system_dir: ".review-gate/review-system".to_string(),
        }
    }
}

/// Contents of `reviewgate.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    pub resolver: ResolverConfig,
    pub graph: GraphConfig,
    pub thresholds: ScanThresholds,
    pub tests: TestsConfig,
    pub review: ReviewSettings,
}
