// src/fix/mod.rs
//! Narrow, idempotent source transformations for findings.
//!
//! Each finding gets exactly one [`FixResult`]. Failures are values: one
//! finding's failure never stops the others.

pub mod commit;
pub mod marker;
pub mod type_only;
pub mod writer;

pub use commit::{commit_fixes, CommitOutcome, COMMIT_SUBJECT};

use anyhow::{anyhow, bail, Result};
use std::path::Path;
use tracing::debug;

use crate::graph::ImportResolver;
use crate::types::{Area, Finding, FixResult};

pub struct AutoFixer<'a> {
    root: &'a Path,
    resolver: &'a dyn ImportResolver,
}

impl<'a> AutoFixer<'a> {
    #[must_use]
    pub fn new(root: &'a Path, resolver: &'a dyn ImportResolver) -> Self {
        Self { root, resolver }
    }

    #[must_use]
    pub fn apply_fixes(&self, findings: &[Finding]) -> Vec<FixResult> {
        findings.iter().map(|f| self.apply_fix(f)).collect()
    }

    #[must_use]
    pub fn apply_fix(&self, finding: &Finding) -> FixResult {
        match self.fix(finding) {
            Ok(files) => FixResult::success(&finding.id, files),
            Err(e) => {
                debug!(finding = %finding.id, error = %e, "fix not applied");
                FixResult::failure(&finding.id, format!("{e:#}"))
            }
        }
    }

    fn fix(&self, finding: &Finding) -> Result<Vec<String>> {
        match finding.area {
            Area::Layer => self.fix_layer(finding),
            Area::Dep => self.fix_cycle(finding),
            Area::Pure => self.fix_purity(finding),
            Area::Api => bail!("No structural auto-fix available for API issues"),
            Area::Complex => bail!("No structural auto-fix available for complexity issues"),
        }
    }

    fn fix_layer(&self, finding: &Finding) -> Result<Vec<String>> {
        let [importer, target, ..] = finding.evidence.chain() else {
            bail!("No dependency chain available");
        };
        let file = type_only::convert(self.root, self.resolver, importer, target)?;
        Ok(vec![file])
    }

    /// Tries each edge of the cycle until one converts.
    fn fix_cycle(&self, finding: &Finding) -> Result<Vec<String>> {
        let chain = finding.evidence.chain();
        if chain.len() < 2 {
            bail!("No cycle file list available");
        }
        for edge in chain.windows(2) {
            match type_only::convert(self.root, self.resolver, &edge[0], &edge[1]) {
                Ok(file) => return Ok(vec![file]),
                Err(e) => debug!(from = %edge[0], to = %edge[1], error = %e, "cycle edge not converted"),
            }
        }
        Err(anyhow!("Could not break cycle with type-only import conversion"))
    }

    fn fix_purity(&self, finding: &Finding) -> Result<Vec<String>> {
        let Some(path) = finding.evidence.paths().first().copied() else {
            bail!("No file recorded for side-effect finding");
        };
        let file = marker::insert(self.root, path, &finding.title)?;
        Ok(vec![file])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GraphConfig, ResolverConfig};
    use crate::engine::{generate_findings, Signal};
    use crate::graph::{build_scoped_graph, FsResolver};
    use crate::layers;
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

    fn review(dir: &TempDir, paths: &[&str]) -> Vec<Finding> {
        let resolver = FsResolver::new(dir.path(), &ResolverConfig::default());
        let changed: Vec<ChangedFile> =
            paths.iter().map(|p| ChangedFile::new(p, ChangeStatus::Modified)).collect();
        let graph = build_scoped_graph(dir.path(), &changed, &resolver, &GraphConfig::default());
        let map = layers::classify_batch(paths);
        let mut signals: Vec<Signal> = paths
            .iter()
            .map(|p| Signal::LayerClassification { file: (*p).to_string(), info: layers::classify(p) })
            .collect();
        if graph.has_cycles() {
            signals.push(Signal::CircularDependency { cycles: graph.cycles.len() });
        }
        generate_findings(&signals, &graph, &map)
    }

    #[test]
    fn breaks_a_domain_cycle_with_one_type_import() -> Result<()> {
        let dir = TempDir::new()?;
        write(&dir, "src/domain/a.ts", "import { B } from './b';\nexport type A = B;\n")?;
        write(&dir, "src/domain/b.ts", "import { A } from './a';\nexport type B = A;\n")?;

        let findings = review(&dir, &["src/domain/a.ts", "src/domain/b.ts"]);
        assert_eq!(findings.len(), 1);

        let resolver = FsResolver::new(dir.path(), &ResolverConfig::default());
        let results = AutoFixer::new(dir.path(), &resolver).apply_fixes(&findings);
        assert_eq!(results, vec![FixResult::success("RG-DEP-001", vec!["src/domain/a.ts".into()])]);
        assert!(fs::read_to_string(dir.path().join("src/domain/a.ts"))?.starts_with("import type { B }"));
        assert!(fs::read_to_string(dir.path().join("src/domain/b.ts"))?.starts_with("import { A }"));
        Ok(())
    }

    #[test]
    fn layer_violation_is_converted() -> Result<()> {
        let dir = TempDir::new()?;
        write(&dir, "src/domain/order.ts", "import { Db } from '../infra/db';\n")?;
        write(&dir, "src/infra/db.ts", "export class Db {}\n")?;

        let findings = review(&dir, &["src/domain/order.ts"]);
        let resolver = FsResolver::new(dir.path(), &ResolverConfig::default());
        let results = AutoFixer::new(dir.path(), &resolver).apply_fixes(&findings);
        assert!(results[0].success);
        assert_eq!(results[0].finding_id, "RG-LAYER-001");
        Ok(())
    }

    #[test]
    fn unsupported_areas_fail_without_touching_files() -> Result<()> {
        let dir = TempDir::new()?;
        let resolver = FsResolver::new(dir.path(), &ResolverConfig::default());
        let signals = vec![
            Signal::ComplexityIssue { file: "src/a.ts".into(), issues: Vec::new() },
            Signal::DeepIndexFiles { files: vec!["src/a/b/index.ts".into()] },
        ];
        let findings = generate_findings(&signals, &Default::default(), &Default::default());
        let results = AutoFixer::new(dir.path(), &resolver).apply_fixes(&findings);
        let errors: Vec<Option<&str>> = results.iter().map(|r| r.error.as_deref()).collect();
        assert_eq!(
            errors,
            vec![
                Some("No structural auto-fix available for complexity issues"),
                Some("No structural auto-fix available for API issues"),
            ]
        );
        Ok(())
    }

    #[test]
    fn purity_marker_applies_once() -> Result<()> {
        let dir = TempDir::new()?;
        write(&dir, "domain/order.ts", "export const load = (url: string) => fetch(url);\n")?;
        let resolver = FsResolver::new(dir.path(), &ResolverConfig::default());
        let signal = Signal::SideEffectViolation { file: "domain/order.ts".into(), violations: Vec::new() };
        let findings = generate_findings(&[signal], &Default::default(), &Default::default());
        let fixer = AutoFixer::new(dir.path(), &resolver);

        assert!(fixer.apply_fixes(&findings)[0].success);
        let again = fixer.apply_fixes(&findings);
        assert_eq!(again[0].error.as_deref(), Some("marker already present"));
        Ok(())
    }
}
