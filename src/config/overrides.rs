//! Layered check overrides read from the review system directory.
//!
//! Resolution order is global (`MASTER.md`), then `stacks/<stack>.md`, then
//! `packages/<pkg>.md`, then `paths/<path>.md`. A later layer replaces the
//! keys it sets and leaves the others untouched.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::catalog::Check;
use crate::types::{Automatable, Severity};

pub type OverrideLayer = BTreeMap<String, BTreeMap<String, String>>;

/// Read-only view of the override files on disk.
#[derive(Debug, Clone)]
pub struct OverrideStore {
    dir: PathBuf,
}

impl OverrideStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Folds every applicable layer into one immutable value.
    #[must_use]
    pub fn resolve(&self, stack: Option<&str>, packages: &[String], paths: &[String]) -> ResolvedOverrides {
        let mut files = vec![self.dir.join("MASTER.md")];
        if let Some(stack) = stack {
            files.push(self.dir.join("stacks").join(format!("{stack}.md")));
        }
        for pkg in packages {
            files.push(self.dir.join("packages").join(format!("{pkg}.md")));
        }
        for path in paths {
            let flat = path.replace('/', "_");
            files.push(self.dir.join("paths").join(format!("{flat}.md")));
        }

        let mut resolved = ResolvedOverrides::default();
        for file in files {
            if let Some(layer) = read_layer(&file) {
                debug!(file = %file.display(), checks = layer.len(), "override layer");
                resolved.merge(layer);
            }
        }
        resolved
    }
}

fn read_layer(path: &Path) -> Option<OverrideLayer> {
    if !path.is_file() {
        return None;
    }
    match fs::read_to_string(path) {
        Ok(content) => Some(parse_override_markdown(&content)),
        Err(e) => {
            warn!(file = %path.display(), error = %e, "unreadable override file skipped");
            None
        }
    }
}

/// Parses `## CHECK-ID` sections followed by `key: value` lines.
#[must_use]
pub fn parse_override_markdown(content: &str) -> OverrideLayer {
    let mut layer = OverrideLayer::new();
    let mut current: Option<String> = None;

    for line in content.lines() {
        if let Some(heading) = line.strip_prefix("## ") {
            let id = heading.trim_matches(|c: char| c == '#' || c.is_whitespace());
            // Check ids look like `C-AREA-01`; other headings end the section.
            current = (id.matches('-').count() >= 2).then(|| id.to_string());
            if let Some(id) = &current {
                layer.entry(id.clone()).or_default();
            }
            continue;
        }
        let Some(id) = &current else { continue };
        let Some((key, value)) = line.split_once(':') else { continue };

        let key = clean(key).to_ascii_lowercase();
        if key.is_empty() {
            continue;
        }
        layer
            .entry(id.clone())
            .or_default()
            .insert(key, clean(value).to_string());
    }
    layer
}

fn clean(text: &str) -> &str {
    text.trim_start_matches(|c: char| c == '-' || c.is_whitespace())
        .trim_matches(|c: char| c == '*' || c.is_whitespace())
}

/// Check overrides after cascading every layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedOverrides {
    entries: OverrideLayer,
}

impl ResolvedOverrides {
    /// Builds overrides from already-cascaded layers, lowest priority first.
    #[must_use]
    pub fn from_layers(layers: impl IntoIterator<Item = OverrideLayer>) -> Self {
        let mut resolved = Self::default();
        for layer in layers {
            resolved.merge(layer);
        }
        resolved
    }

    fn merge(&mut self, layer: OverrideLayer) {
        for (id, keys) in layer {
            self.entries.entry(id).or_default().extend(keys);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, check_id: &str, key: &str) -> Option<&str> {
        self.entries.get(check_id)?.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn severity(&self, check_id: &str) -> Option<Severity> {
        self.get(check_id, "severity").map(Severity::parse)
    }

    #[must_use]
    pub fn automatable(&self, check_id: &str) -> Option<Automatable> {
        self.get(check_id, "automatable").map(Automatable::parse)
    }

    /// Copy of `check` with its overridden keys applied.
    #[must_use]
    pub fn apply(&self, check: &Check) -> Check {
        let mut out = check.clone();
        if let Some(severity) = self.severity(&check.id) {
            out.severity = severity;
        }
        if let Some(automatable) = self.automatable(&check.id) {
            out.automatable = automatable;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn parses_plain_and_bold_keys() {
        let layer = parse_override_markdown(
            "# Overrides\n\n## C-DEP-01\nseverity: INFO\n- **Automatable**: NO\n\n## Notes\nseverity: BLOCKER\n",
        );
        assert_eq!(layer.len(), 1);
        let dep = &layer["C-DEP-01"];
        assert_eq!(dep["severity"], "INFO");
        assert_eq!(dep["automatable"], "NO");
    }

    #[test]
    fn path_layer_beats_every_other_layer() -> std::io::Result<()> {
        let dir = TempDir::new()?;
        let root = dir.path();
        for sub in ["stacks", "packages", "paths"] {
            fs::create_dir_all(root.join(sub))?;
        }
        fs::write(root.join("MASTER.md"), "## C-LAYER-01\nseverity: INFO\nautomatable: NO\n")?;
        fs::write(root.join("stacks/react.md"), "## C-LAYER-01\nseverity: RECOMMENDATION\n")?;
        fs::write(root.join("packages/web.md"), "## C-LAYER-01\nseverity: INFO\n")?;
        fs::write(root.join("paths/src_domain_a.ts.md"), "## C-LAYER-01\nseverity: BLOCKER\n")?;

        let resolved = OverrideStore::new(root).resolve(
            Some("react"),
            &["web".to_string()],
            &["src/domain/a.ts".to_string()],
        );
        assert_eq!(resolved.severity("C-LAYER-01"), Some(Severity::Blocker));
        // Untouched keys survive from the global layer.
        assert_eq!(resolved.automatable("C-LAYER-01"), Some(Automatable::No));
        Ok(())
    }

    #[test]
    fn missing_store_resolves_empty() {
        let resolved = OverrideStore::new("/nonexistent/review-system").resolve(None, &[], &[]);
        assert!(resolved.is_empty());
    }
}
