// src/engine/findings.rs
//! Finding synthesis.
//!
//! One hand-written rule per signal kind. The output for a given input is
//! identical across runs: same order, same ids, same text.

use std::collections::{BTreeMap, HashSet};

use super::signal::Signal;
use crate::graph::DependencyGraph;
use crate::layers::{self, Layer, LayerInfo};
use crate::scan::ExportInfo;
use crate::types::{
    Area, Automatable, BlastRadius, Confidence, DependencyTrace, Evidence, Finding,
    HardGateCandidate, Impact, Severity,
};

/// Builds the deduplicated, numbered findings for a set of signals.
#[must_use]
pub fn generate_findings(
    signals: &[Signal],
    graph: &DependencyGraph,
    layer_map: &BTreeMap<String, LayerInfo>,
) -> Vec<Finding> {
    let drafts = signals.iter().flat_map(|signal| synthesize(signal, graph, layer_map));
    number(dedup(drafts))
}

fn synthesize(
    signal: &Signal,
    graph: &DependencyGraph,
    layer_map: &BTreeMap<String, LayerInfo>,
) -> Vec<Finding> {
    match signal {
        Signal::LayerClassification { file, info } => layer_findings(file, info.layer, graph, layer_map),
        Signal::CircularDependency { cycles } => vec![dependency_finding(*cycles, graph)],
        Signal::SideEffectViolation { file, .. } => vec![purity_finding(file)],
        Signal::ComplexityIssue { file, .. } => vec![complexity_finding(file)],
        Signal::DeepIndexFiles { files } => vec![deep_index_finding(files)],
        Signal::ApiBreakingChange { changes } => vec![breaking_change_finding(changes)],
        Signal::DefaultExportOveruse { exports } => vec![default_export_finding(exports)],
        Signal::TestFailure { .. } => Vec::new(),
    }
}

fn layer_findings(
    file: &str,
    from: Layer,
    graph: &DependencyGraph,
    layer_map: &BTreeMap<String, LayerInfo>,
) -> Vec<Finding> {
    let Some(node) = graph.node(file) else {
        return Vec::new();
    };
    node.imports
        .iter()
        .filter_map(|target| {
            let to = layer_map
                .get(target)
                .map_or_else(|| layers::classify(target).layer, |info| info.layer);
            (!layers::is_valid_dependency(from, to)).then(|| layer_finding(file, target, from, to))
        })
        .collect()
}

fn layer_finding(file: &str, target: &str, from: Layer, to: Layer) -> Finding {
    let trace = DependencyTrace {
        chain: vec![file.to_string(), target.to_string()],
        direction_violation: true,
        cycle_count: None,
    };
    Finding {
        title: format!("{from} layer imports from {to}"),
        evidence: Evidence::files(&[file]).with_trace(trace),
        impact: vec![Impact::Arch, Impact::Maintainability],
        risk_if_merge: format!("Violates dependency inversion: {from} should not depend on {to}"),
        proposed_fix: steps(&[
            "Extract shared types to types/ or shared/",
            "Use dependency injection for cross-layer concerns",
            "Refactor to respect layer boundaries",
        ]),
        acceptance_criteria: format!("{from} layer has no imports from {to}"),
        hard_gate_candidate: Some(gate(
            &format!("Detect imports from {from}/* to {to}/*"),
            "AST analysis + import path checking",
            Confidence::Low,
            "TypeScript/JavaScript imports",
        )),
        ..draft(Area::Layer, Severity::Blocker, Confidence::High, BlastRadius::Module, Automatable::Partial)
    }
}

fn dependency_finding(cycle_count: usize, graph: &DependencyGraph) -> Finding {
    let (members, chain) = graph
        .first_cycle()
        .map(|c| (c.members().to_vec(), c.path().to_vec()))
        .unwrap_or_default();
    let trace = DependencyTrace { chain, direction_violation: false, cycle_count: Some(cycle_count) };
    Finding {
        title: "Circular dependencies detected".to_string(),
        evidence: Evidence::files(&members).with_trace(trace),
        impact: vec![Impact::Arch, Impact::Maintainability, Impact::Testability],
        risk_if_merge: "Circular dependencies make code hard to test and refactor".to_string(),
        proposed_fix: steps(&[
            "Identify the cycle using dependency graph",
            "Extract shared abstractions to break the cycle",
            "Use dependency injection or event-driven patterns",
        ]),
        acceptance_criteria: "Zero circular dependencies in the module".to_string(),
        hard_gate_candidate: Some(gate(
            "Detect circular imports using static analysis",
            "Build import graph and detect cycles with DFS",
            Confidence::Low,
            "All TypeScript/JavaScript files",
        )),
        ..draft(Area::Dep, Severity::Blocker, Confidence::High, BlastRadius::Package, Automatable::Yes)
    }
}

fn purity_finding(file: &str) -> Finding {
    Finding {
        title: format!("Side effects in pure layer: {file}"),
        evidence: Evidence::files(&[file]),
        impact: vec![Impact::Testability, Impact::Maintainability],
        risk_if_merge: "Makes business logic hard to test and reason about".to_string(),
        proposed_fix: steps(&[
            "Move I/O operations to infrastructure layer",
            "Use dependency injection for external dependencies",
            "Keep domain/application layers pure",
        ]),
        acceptance_criteria: "Domain/application layers have no direct side effects".to_string(),
        hard_gate_candidate: Some(gate(
            "Detect fetch/axios/fs/Date.now in domain/application",
            "Regex or AST analysis for side-effect patterns",
            Confidence::Medium,
            "domain/* and application/* files",
        )),
        ..draft(Area::Pure, Severity::Recommendation, Confidence::High, BlastRadius::Module, Automatable::Partial)
    }
}

fn complexity_finding(file: &str) -> Finding {
    Finding {
        title: format!("Complexity issues in {file}"),
        evidence: Evidence::files(&[file]),
        impact: vec![Impact::Maintainability],
        risk_if_merge: "Complex code is harder to understand and maintain".to_string(),
        proposed_fix: steps(&[
            "Extract complex logic into smaller functions",
            "Reduce nesting with early returns",
            "Split god functions into focused units",
        ]),
        acceptance_criteria: "Functions are focused and easy to understand".to_string(),
        ..draft(Area::Complex, Severity::Recommendation, Confidence::Medium, BlastRadius::Local, Automatable::No)
    }
}

fn deep_index_finding(files: &[String]) -> Finding {
    Finding {
        title: "Deep index.ts files may cause coupling".to_string(),
        evidence: Evidence::files(files),
        impact: vec![Impact::Arch, Impact::Maintainability],
        risk_if_merge: "Deep index files can lead to circular dependencies and tight coupling".to_string(),
        proposed_fix: steps(&[
            "Use package.json exports instead of deep index files",
            "Export from root index.ts only",
            "Remove intermediate index.ts files",
        ]),
        acceptance_criteria: "No index.ts files deeper than 2 levels".to_string(),
        hard_gate_candidate: Some(gate(
            "Detect index.ts files deeper than src/module/index.ts",
            "File path depth analysis",
            Confidence::Low,
            "All index.ts files",
        )),
        ..draft(Area::Api, Severity::Recommendation, Confidence::Medium, BlastRadius::Module, Automatable::Partial)
    }
}

fn breaking_change_finding(changes: &[String]) -> Finding {
    let files: Vec<&str> = changes
        .iter()
        .filter_map(|c| c.rsplit_once(": ").map(|(_, path)| path))
        .collect();
    Finding {
        title: "Potential breaking changes in public API".to_string(),
        evidence: Evidence::files(&files),
        impact: vec![Impact::Arch],
        risk_if_merge: format!("Consumers may break: {}", changes.join("; ")),
        proposed_fix: steps(&[
            "Keep the previous export available behind a deprecation",
            "Document the migration path for consumers",
            "Bump the major version if the break is intended",
        ]),
        acceptance_criteria: "Public exports stay backward compatible or the break is versioned".to_string(),
        ..draft(Area::Api, Severity::Recommendation, Confidence::Medium, BlastRadius::App, Automatable::No)
    }
}

fn default_export_finding(exports: &[ExportInfo]) -> Finding {
    let mut files: Vec<&str> = exports.iter().map(|e| e.file.as_str()).collect();
    files.dedup();
    let names: Vec<String> = exports.iter().map(|e| format!("{}:{} {}", e.file, e.line, e.name)).collect();
    Finding {
        title: "Default exports outside page modules".to_string(),
        evidence: Evidence::files(&files),
        impact: vec![Impact::Maintainability],
        risk_if_merge: format!("Default exports rename silently at import sites: {}", names.join(", ")),
        proposed_fix: steps(&[
            "Replace default exports with named exports",
            "Update import sites to use the exported name",
        ]),
        acceptance_criteria: "Only page modules use default exports".to_string(),
        ..draft(Area::Api, Severity::Info, Confidence::Low, BlastRadius::Local, Automatable::No)
    }
}

/// Skeleton with the classification fields set and the text left empty.
fn draft(
    area: Area,
    severity: Severity,
    confidence: Confidence,
    blast_radius: BlastRadius,
    automatable: Automatable,
) -> Finding {
    Finding {
        id: String::new(),
        area,
        severity,
        confidence,
        checklist_ref: format!("C-{}-01", area.label()),
        title: String::new(),
        status: "OPEN",
        evidence: Evidence::default(),
        impact: Vec::new(),
        blast_radius,
        risk_if_merge: String::new(),
        proposed_fix: Vec::new(),
        acceptance_criteria: String::new(),
        automatable,
        hard_gate_candidate: None,
    }
}

fn gate(rule_idea: &str, hint: &str, risk: Confidence, scope: &str) -> HardGateCandidate {
    HardGateCandidate {
        rule_idea: rule_idea.to_string(),
        implementation_hint: hint.to_string(),
        false_positive_risk: risk,
        scope: scope.to_string(),
    }
}

fn steps(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn dedup(drafts: impl Iterator<Item = Finding>) -> Vec<Finding> {
    let mut seen: HashSet<(Area, Vec<String>, Vec<String>)> = HashSet::new();
    drafts
        .filter(|f| {
            let paths = f.evidence.paths().into_iter().map(str::to_string).collect();
            seen.insert((f.area, paths, f.evidence.chain().to_vec()))
        })
        .collect()
}

/// Assigns `RG-<AREA>-NNN`, counting per area in order.
fn number(mut findings: Vec<Finding>) -> Vec<Finding> {
    let mut counters: BTreeMap<Area, usize> = BTreeMap::new();
    for finding in &mut findings {
        let n = counters.entry(finding.area).or_insert(0);
        *n += 1;
        finding.id = format!("RG-{}-{:03}", finding.area.label(), n);
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{detect_cycles, DependencyNode};
    use std::collections::BTreeSet;

    fn graph(edges: &[(&str, &str)]) -> DependencyGraph {
        let mut g = DependencyGraph::default();
        for (from, to) in edges {
            g.nodes
                .entry((*from).to_string())
                .or_insert_with(|| DependencyNode::new(from, true))
                .imports
                .insert((*to).to_string());
            g.nodes.entry((*to).to_string()).or_insert_with(|| DependencyNode::new(to, false));
        }
        g.impacted = g.nodes.keys().cloned().collect::<BTreeSet<_>>();
        g.cycles = detect_cycles(&g.adjacency());
        g
    }

    fn layer_signal(file: &str) -> Signal {
        Signal::LayerClassification { file: file.to_string(), info: layers::classify(file) }
    }

    #[test]
    fn domain_cycle_yields_one_dep_and_no_layer_findings() {
        let g = graph(&[("src/domain/a.ts", "src/domain/b.ts"), ("src/domain/b.ts", "src/domain/a.ts")]);
        let map = layers::classify_batch(&["src/domain/a.ts", "src/domain/b.ts"]);
        let signals = vec![
            layer_signal("src/domain/a.ts"),
            layer_signal("src/domain/b.ts"),
            Signal::CircularDependency { cycles: g.cycles.len() },
        ];
        let findings = generate_findings(&signals, &g, &map);
        assert_eq!(findings.len(), 1);
        let dep = &findings[0];
        assert_eq!(dep.id, "RG-DEP-001");
        assert_eq!(dep.evidence.paths(), vec!["src/domain/a.ts", "src/domain/b.ts"]);
        assert_eq!(dep.evidence.chain(), ["src/domain/a.ts", "src/domain/b.ts", "src/domain/a.ts"]);
        assert_eq!(dep.evidence.dependency_trace.as_ref().and_then(|t| t.cycle_count), Some(1));
    }

    #[test]
    fn illegal_edge_yields_layer_blocker() {
        let g = graph(&[("src/domain/order.ts", "src/infra/db.ts")]);
        let map = layers::classify_batch(&["src/domain/order.ts"]);
        let findings = generate_findings(&[layer_signal("src/domain/order.ts")], &g, &map);
        assert_eq!(findings.len(), 1);
        let f = &findings[0];
        assert_eq!(f.id, "RG-LAYER-001");
        assert_eq!(f.severity, Severity::Blocker);
        assert_eq!(f.title, "domain layer imports from infra");
        assert_eq!(f.evidence.chain(), ["src/domain/order.ts", "src/infra/db.ts"]);
        assert!(f.is_hard_gate_candidate());
    }

    #[test]
    fn purity_finding_is_partial() {
        let signal = Signal::SideEffectViolation { file: "domain/order.ts".into(), violations: Vec::new() };
        let findings = generate_findings(&[signal], &DependencyGraph::default(), &BTreeMap::new());
        assert_eq!(findings[0].area, Area::Pure);
        assert_eq!(findings[0].automatable, Automatable::Partial);
        assert_eq!(findings[0].checklist_ref, "C-PURE-01");
        assert_eq!(findings[0].status, "OPEN");
    }

    #[test]
    fn duplicates_are_dropped_before_numbering() {
        let signals = vec![
            Signal::ComplexityIssue { file: "src/a.ts".into(), issues: Vec::new() },
            Signal::ComplexityIssue { file: "src/a.ts".into(), issues: Vec::new() },
            Signal::ComplexityIssue { file: "src/b.ts".into(), issues: Vec::new() },
        ];
        let ids: Vec<String> = generate_findings(&signals, &DependencyGraph::default(), &BTreeMap::new())
            .into_iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(ids, vec!["RG-COMPLEX-001", "RG-COMPLEX-002"]);
    }

    #[test]
    fn test_failures_route_but_produce_nothing() {
        let signal = Signal::TestFailure { failed: 3, files: Vec::new() };
        assert!(generate_findings(&[signal], &DependencyGraph::default(), &BTreeMap::new()).is_empty());
    }

    #[test]
    fn breaking_changes_name_their_files() {
        let signal = Signal::ApiBreakingChange {
            changes: vec!["Public API file deleted: src/index.ts".into()],
        };
        let findings = generate_findings(&[signal], &DependencyGraph::default(), &BTreeMap::new());
        assert_eq!(findings[0].evidence.paths(), vec!["src/index.ts"]);
        assert_eq!(findings[0].blast_radius, BlastRadius::App);
        assert_eq!(findings[0].id, "RG-API-001");
    }

    #[test]
    fn default_exports_are_info_per_file() {
        let mut exports = crate::scan::api_surface::extract_exports(
            "src/ui/Card.tsx",
            "export default function Card() {}\nexport default Card;\n",
        );
        exports.extend(crate::scan::api_surface::extract_exports("src/ui/List.tsx", "export default List;\n"));
        let signal = Signal::DefaultExportOveruse { exports };

        let findings = generate_findings(&[signal], &DependencyGraph::default(), &BTreeMap::new());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Info);
        assert_eq!(findings[0].automatable, Automatable::No);
        assert_eq!(findings[0].evidence.paths(), vec!["src/ui/Card.tsx", "src/ui/List.tsx"]);
    }
}
