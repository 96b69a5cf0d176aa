// src/review.rs
//! The review pipeline.
//!
//! changeset → layers, graph, scanners → signals → router → findings →
//! scorer → auto-fixer → commit. Every stage past the changeset is
//! infallible: misses and failures become empty results or failed values.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::{Catalog, ReviewConfig, ReviewSettings};
use crate::engine::{self, Router, RoutingResult, Signal};
use crate::exit::ReviewExit;
use crate::fix::{commit_fixes, AutoFixer, CommitOutcome};
use crate::graph::{build_scoped_graph, DependencyGraph, GraphStats, ImportResolver};
use crate::lang::Lang;
use crate::layers::{self, LayerInfo};
use crate::scan::{ApiSurface, ComplexityScanner, ExportInfo, FileScanner, SideEffectScanner};
use crate::types::{Area, Changeset, Confidence, Finding, FixResult, TestOutcome};
use crate::verification::TestSuite;
use crate::vcs::VersionControl;

/// Per-run knobs, usually from the command line.
#[derive(Debug, Clone)]
pub struct ReviewOptions {
    pub stack: Option<String>,
    pub packages: Vec<String>,
    /// Areas kept for fixing and reporting; empty keeps all.
    pub areas: Vec<Area>,
    pub max_results: usize,
    pub min_confidence: Confidence,
    pub apply_fixes: bool,
    /// Branch named in the fix commit message.
    pub branch: String,
}

impl ReviewOptions {
    #[must_use]
    pub fn from_settings(settings: &ReviewSettings) -> Self {
        Self {
            stack: None,
            packages: Vec::new(),
            areas: Vec::new(),
            max_results: settings.max_results,
            min_confidence: settings.min_confidence,
            apply_fixes: true,
            branch: String::new(),
        }
    }
}

impl Default for ReviewOptions {
    fn default() -> Self {
        Self::from_settings(&ReviewSettings::default())
    }
}

/// Optional external collaborators. `None` skips the stage.
#[derive(Default, Clone, Copy)]
pub struct Collaborators<'a> {
    pub tests: Option<&'a dyn TestSuite>,
    pub vcs: Option<&'a dyn VersionControl>,
}

/// Everything derived from the changeset before routing.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub graph: DependencyGraph,
    pub layers: BTreeMap<String, LayerInfo>,
    pub api: ApiSurface,
    pub signals: Vec<Signal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangesetSummary {
    pub base: String,
    pub total_files: usize,
    pub additions: usize,
    pub deletions: usize,
}

impl From<&Changeset> for ChangesetSummary {
    fn from(c: &Changeset) -> Self {
        Self {
            base: c.base.clone(),
            total_files: c.total_files(),
            additions: c.additions,
            deletions: c.deletions,
        }
    }
}

/// Result of one review run, handed to reporting as-is.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewOutcome {
    pub branch: String,
    pub changeset: ChangesetSummary,
    pub graph: GraphStats,
    pub signals: Vec<Signal>,
    pub routing: RoutingResult,
    /// Export surface of the changed modules.
    pub api: ApiSurface,
    /// Prioritized, filtered and truncated to `max_results`.
    pub findings: Vec<Finding>,
    /// Findings that passed the filters, before truncation.
    pub total_findings: usize,
    pub fixes: Vec<FixResult>,
    /// Import cycles still present after auto-fix.
    pub cycles_remaining: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<CommitOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tests: Option<TestOutcome>,
    /// Blockers without a successful fix.
    pub remaining_blockers: Vec<Finding>,
}

impl ReviewOutcome {
    #[must_use]
    pub fn exit(&self) -> ReviewExit {
        ReviewExit::for_blockers(self.remaining_blockers.len())
    }
}

pub struct Reviewer<'a> {
    root: &'a Path,
    config: &'a ReviewConfig,
    catalog: &'a Catalog,
    resolver: &'a dyn ImportResolver,
}

impl<'a> Reviewer<'a> {
    #[must_use]
    pub fn new(
        root: &'a Path,
        config: &'a ReviewConfig,
        catalog: &'a Catalog,
        resolver: &'a dyn ImportResolver,
    ) -> Self {
        Self { root, config, catalog, resolver }
    }

    /// Builds the graph, classifies and scans the changed files, and turns
    /// the results into signals.
    #[must_use]
    pub fn analyze(&self, changeset: &Changeset, tests: Option<&TestOutcome>) -> Analysis {
        let paths = changeset.paths();
        let graph = build_scoped_graph(self.root, &changeset.files, self.resolver, &self.config.graph);
        let layer_map = layers::classify_batch(&paths);
        let api = ApiSurface::analyze(self.root, &changeset.files, self.config.thresholds.max_index_depth);

        let complexity = ComplexityScanner::new(self.config.thresholds);
        let mut signals = Vec::new();

        for path in &paths {
            let info = layer_map.get(path).cloned().unwrap_or_else(|| layers::classify(path));
            let layer = info.layer;
            signals.push(Signal::LayerClassification { file: path.clone(), info });

            if !is_code(path) {
                continue;
            }
            let violations = SideEffectScanner.scan(self.root, path, layer);
            if !violations.is_empty() {
                signals.push(Signal::SideEffectViolation { file: path.clone(), violations });
            }
            let issues = complexity.scan(self.root, path, layer);
            if !issues.is_empty() {
                signals.push(Signal::ComplexityIssue { file: path.clone(), issues });
            }
        }

        if graph.has_cycles() {
            signals.push(Signal::CircularDependency { cycles: graph.cycles.len() });
        }
        if !api.breaking_changes.is_empty() {
            signals.push(Signal::ApiBreakingChange { changes: api.breaking_changes.clone() });
        }
        if !api.deep_index_files.is_empty() {
            signals.push(Signal::DeepIndexFiles { files: api.deep_index_files.clone() });
        }
        let defaults: Vec<ExportInfo> = api.default_export_overuse().into_iter().cloned().collect();
        if !defaults.is_empty() {
            signals.push(Signal::DefaultExportOveruse { exports: defaults });
        }
        if let Some(outcome) = tests.filter(|t| !t.passed()) {
            signals.push(Signal::TestFailure {
                failed: outcome.failed_tests(),
                files: outcome.failed_files().to_vec(),
            });
        }

        info!(
            nodes = graph.len(),
            cycles = graph.cycles.len(),
            signals = signals.len(),
            "analysis complete"
        );
        Analysis { graph, layers: layer_map, api, signals }
    }

    /// Runs the whole pipeline over `changeset`.
    #[must_use]
    pub fn run(
        &self,
        changeset: &Changeset,
        options: &ReviewOptions,
        collaborators: Collaborators<'_>,
    ) -> ReviewOutcome {
        let tests = collaborators.tests.map(|suite| suite.run());
        let analysis = self.analyze(changeset, tests.as_ref());

        let overrides = self.config.override_store(self.root).resolve(
            options.stack.as_deref(),
            &options.packages,
            &changeset.live_paths(),
        );
        let routing = Router::new(self.catalog, &overrides).route(&analysis.signals);

        let generated = engine::generate_findings(&analysis.signals, &analysis.graph, &analysis.layers);
        let prioritized = engine::prioritize(generated);
        let scoped = engine::filter_by_confidence(
            engine::filter_by_area(prioritized, &options.areas),
            options.min_confidence,
        );

        let fixes = if options.apply_fixes {
            AutoFixer::new(self.root, self.resolver).apply_fixes(&scoped)
        } else {
            Vec::new()
        };
        let commit = collaborators
            .vcs
            .map(|vcs| commit_fixes(vcs, &fixes, &options.branch));

        let cycles_remaining = self.cycles_after_fixes(changeset, &analysis.graph, &scoped, &fixes);
        let remaining_blockers = remaining_blockers(&scoped, &fixes, cycles_remaining);
        let total_findings = scoped.len();
        let mut findings = scoped;
        findings.truncate(options.max_results);

        info!(
            findings = total_findings,
            fixed = fixes.iter().filter(|r| r.success).count(),
            cycles_remaining,
            blockers = remaining_blockers.len(),
            "review complete"
        );

        ReviewOutcome {
            branch: options.branch.clone(),
            changeset: ChangesetSummary::from(changeset),
            graph: GraphStats::from(&analysis.graph),
            signals: analysis.signals,
            routing,
            api: analysis.api,
            findings,
            total_findings,
            fixes,
            cycles_remaining,
            commit,
            tests,
            remaining_blockers,
        }
    }

    /// A cycle fix converts one edge of one cycle, so the graph is rebuilt to
    /// see what is left.
    fn cycles_after_fixes(
        &self,
        changeset: &Changeset,
        before: &DependencyGraph,
        findings: &[Finding],
        fixes: &[FixResult],
    ) -> usize {
        let dep_fixed = findings
            .iter()
            .filter(|f| f.area == Area::Dep)
            .any(|f| fixes.iter().any(|r| r.success && r.finding_id == f.id));
        if !dep_fixed {
            return before.cycles.len();
        }
        let after = build_scoped_graph(self.root, &changeset.files, self.resolver, &self.config.graph);
        if after.has_cycles() {
            warn!(cycles = after.cycles.len(), "import cycles remain after auto-fix");
        }
        after.cycles.len()
    }
}

/// Code files worth scanning; data formats and unknown extensions are not.
fn is_code(path: &str) -> bool {
    Lang::from_path(path).is_some_and(|l| l != Lang::Config)
}

/// BLOCKER findings with no successful fix. A DEP blocker stays while any
/// cycle remains, fixed or not.
#[must_use]
pub fn remaining_blockers(findings: &[Finding], fixes: &[FixResult], cycles_remaining: usize) -> Vec<Finding> {
    findings
        .iter()
        .filter(|f| f.is_blocker())
        .filter(|f| {
            let fixed = fixes.iter().any(|r| r.success && r.finding_id == f.id);
            !fixed || (f.area == Area::Dep && cycles_remaining > 0)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::FsResolver;
    use crate::types::{ChangeStatus, ChangedFile};
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, path: &str, content: &str) -> std::io::Result<()> {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(full, content)
    }

    fn changeset(paths: &[&str]) -> Changeset {
        Changeset::new("main", paths.iter().map(|p| ChangedFile::new(p, ChangeStatus::Modified)).collect())
    }

    #[test]
    fn side_effect_in_domain_yields_signal() -> std::io::Result<()> {
        let dir = TempDir::new()?;
        write(&dir, "domain/order.ts", "export function load(url) {\n  return fetch(url);\n}\n")?;
        let config = ReviewConfig::default();
        let catalog = Catalog::builtin();
        let resolver = FsResolver::new(dir.path(), &config.resolver);
        let reviewer = Reviewer::new(dir.path(), &config, &catalog, &resolver);

        let analysis = reviewer.analyze(&changeset(&["domain/order.ts"]), None);
        let kinds: Vec<&str> = analysis.signals.iter().map(Signal::kind).collect();
        assert_eq!(kinds, vec!["layer_classification", "side_effect_violation"]);
        Ok(())
    }

    #[test]
    fn fixed_blockers_do_not_remain() -> std::io::Result<()> {
        let dir = TempDir::new()?;
        write(&dir, "src/domain/a.ts", "import { B } from './b';\nexport type A = B;\n")?;
        write(&dir, "src/domain/b.ts", "import { A } from './a';\nexport type B = A;\n")?;
        let config = ReviewConfig::default();
        let catalog = Catalog::builtin();
        let resolver = FsResolver::new(dir.path(), &config.resolver);
        let reviewer = Reviewer::new(dir.path(), &config, &catalog, &resolver);

        let outcome = reviewer.run(
            &changeset(&["src/domain/a.ts", "src/domain/b.ts"]),
            &ReviewOptions::default(),
            Collaborators::default(),
        );
        assert_eq!(outcome.total_findings, 1);
        assert!(outcome.routing.triggered_domains.contains("dependencies"));
        assert!(outcome.fixes[0].success);
        assert!(outcome.remaining_blockers.is_empty());
        assert_eq!(outcome.exit(), ReviewExit::Success);
        assert!(outcome.commit.is_none());
        Ok(())
    }

    #[test]
    fn without_fixes_blockers_fail_the_run() -> std::io::Result<()> {
        let dir = TempDir::new()?;
        write(&dir, "src/domain/a.ts", "import { B } from './b';\n")?;
        write(&dir, "src/domain/b.ts", "import { A } from './a';\n")?;
        let config = ReviewConfig::default();
        let catalog = Catalog::builtin();
        let resolver = FsResolver::new(dir.path(), &config.resolver);
        let reviewer = Reviewer::new(dir.path(), &config, &catalog, &resolver);

        let options = ReviewOptions { apply_fixes: false, ..ReviewOptions::default() };
        let outcome = reviewer.run(&changeset(&["src/domain/a.ts", "src/domain/b.ts"]), &options, Collaborators::default());
        assert_eq!(outcome.remaining_blockers.len(), 1);
        assert_eq!(outcome.exit(), ReviewExit::BlockersRemain);
        Ok(())
    }

    #[test]
    fn fixed_cycle_blocker_stays_while_cycles_remain() {
        let signals = [Signal::CircularDependency { cycles: 2 }];
        let findings = engine::generate_findings(&signals, &DependencyGraph::default(), &BTreeMap::new());
        let fixes = vec![FixResult::success(&findings[0].id, vec!["src/a.ts".into()])];

        assert_eq!(remaining_blockers(&findings, &fixes, 1).len(), 1);
        assert!(remaining_blockers(&findings, &fixes, 0).is_empty());
        assert_eq!(remaining_blockers(&findings, &[], 0).len(), 1);
    }

    #[test]
    fn max_results_truncates_report_only() -> std::io::Result<()> {
        let dir = TempDir::new()?;
        let deep = "                    x();\n";
        write(&dir, "src/a.ts", deep)?;
        write(&dir, "src/b.ts", deep)?;
        let config = ReviewConfig::default();
        let catalog = Catalog::builtin();
        let resolver = FsResolver::new(dir.path(), &config.resolver);
        let reviewer = Reviewer::new(dir.path(), &config, &catalog, &resolver);

        let options = ReviewOptions { max_results: 1, ..ReviewOptions::default() };
        let outcome = reviewer.run(&changeset(&["src/a.ts", "src/b.ts"]), &options, Collaborators::default());
        assert_eq!(outcome.total_findings, 2);
        assert_eq!(outcome.findings.len(), 1);
        assert_eq!(outcome.fixes.len(), 2);
        Ok(())
    }
}
