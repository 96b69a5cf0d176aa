//! Export surface of changed modules.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::types::ChangedFile;

const INDEX_SUFFIXES: [&str; 4] = ["index.ts", "index.tsx", "index.js", "index.jsx"];
const PUBLIC_MARKERS: [&str; 4] = ["index.ts", "index.js", "/api/", "/public/"];
const BREAKING_MARKERS: [&str; 2] = ["// BREAKING:", "// @deprecated"];

static DEFAULT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*export\s+default\s+(?:(function|class|const)\b)?\s*(\w+)?")
        .unwrap_or_else(|_| panic!("Invalid Regex"))
});

static NAMED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*export\s+(function|class|const|let|var|interface|type|enum)\s+(\w+)")
        .unwrap_or_else(|_| panic!("Invalid Regex"))
});

static LIST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"export\s*\{([^}]+)\}").unwrap_or_else(|_| panic!("Invalid Regex"))
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportInfo {
    pub name: String,
    /// `function`, `class`, `const`, ... or `unknown`.
    pub kind: String,
    pub is_default: bool,
    pub file: String,
    pub line: usize,
}

/// Export surface touched by a changeset.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApiSurface {
    /// `package.json` `exports`, entry point to targets.
    pub package_exports: BTreeMap<String, Vec<String>>,
    pub index_exports: Vec<ExportInfo>,
    pub deep_exports: Vec<ExportInfo>,
    pub breaking_changes: Vec<String>,
    pub deep_index_files: Vec<String>,
}

impl ApiSurface {
    /// Collects the surface of `changed` under `root`.
    #[must_use]
    pub fn analyze(root: &Path, changed: &[ChangedFile], max_index_depth: usize) -> Self {
        let mut surface = Self {
            package_exports: package_exports(root),
            breaking_changes: breaking_changes(root, changed),
            deep_index_files: deep_index_files(changed, max_index_depth),
            ..Self::default()
        };

        for file in changed.iter().filter(|f| !f.is_deleted()) {
            let path = file.path();
            if !crate::lang::is_graph_source(path) {
                continue;
            }
            let Ok(content) = fs::read_to_string(root.join(path)) else {
                debug!(file = %path, "export scan skipped unreadable file");
                continue;
            };
            let exports = extract_exports(path, &content);
            if is_index_file(path) {
                surface.index_exports.extend(exports);
            } else {
                surface.deep_exports.extend(exports);
            }
        }
        surface
    }

    /// Default exports outside page modules.
    #[must_use]
    pub fn default_export_overuse(&self) -> Vec<&ExportInfo> {
        default_export_overuse(self.index_exports.iter().chain(&self.deep_exports))
    }
}

fn is_index_file(path: &str) -> bool {
    INDEX_SUFFIXES.iter().any(|s| path.ends_with(s))
}

/// Changed index files nested deeper than `max_depth` separators.
#[must_use]
pub fn deep_index_files(changed: &[ChangedFile], max_depth: usize) -> Vec<String> {
    changed
        .iter()
        .map(ChangedFile::path)
        .filter(|p| is_index_file(p) && p.matches('/').count() > max_depth)
        .map(str::to_string)
        .collect()
}

/// Export statements in `content`, one entry per exported name.
#[must_use]
pub fn extract_exports(path: &str, content: &str) -> Vec<ExportInfo> {
    let mut exports = Vec::new();
    let mut push = |name: &str, kind: &str, is_default: bool, line: usize| {
        exports.push(ExportInfo {
            name: name.to_string(),
            kind: kind.to_string(),
            is_default,
            file: path.to_string(),
            line,
        });
    };

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        if let Some(caps) = DEFAULT_RE.captures(line) {
            let kind = caps.get(1).map_or("unknown", |m| m.as_str());
            let name = caps.get(2).map_or("default", |m| m.as_str());
            push(name, kind, true, line_no);
        }
        if let Some(caps) = NAMED_RE.captures(line) {
            let kind = caps.get(1).map_or("unknown", |m| m.as_str());
            let name = caps.get(2).map_or("", |m| m.as_str());
            push(name, kind, false, line_no);
        }
        if let Some(list) = LIST_RE.captures(line).and_then(|c| c.get(1)) {
            for item in list.as_str().split(',') {
                let original = item.split(" as ").next().unwrap_or_default().trim();
                if !original.is_empty() {
                    push(original, "unknown", false, line_no);
                }
            }
        }
    }
    exports
}

/// Public-looking files that were deleted or carry a breaking marker.
#[must_use]
pub fn breaking_changes(root: &Path, changed: &[ChangedFile]) -> Vec<String> {
    let mut out = Vec::new();
    for file in changed {
        let path = file.path();
        if !PUBLIC_MARKERS.iter().any(|m| path.contains(m)) {
            continue;
        }
        let full = root.join(path);
        if file.is_deleted() || !full.exists() {
            out.push(format!("Public API file deleted: {path}"));
            continue;
        }
        if let Ok(content) = fs::read_to_string(&full) {
            if BREAKING_MARKERS.iter().any(|m| content.contains(m)) {
                out.push(format!("Breaking change marker in: {path}"));
            }
        }
    }
    out
}

/// Default exports, except in files whose path mentions `page`.
pub fn default_export_overuse<'a>(exports: impl IntoIterator<Item = &'a ExportInfo>) -> Vec<&'a ExportInfo> {
    exports
        .into_iter()
        .filter(|e| e.is_default && !e.file.to_lowercase().contains("page"))
        .collect()
}

/// Reads the `exports` field of `package.json`, if any.
#[must_use]
pub fn package_exports(root: &Path) -> BTreeMap<String, Vec<String>> {
    let Ok(text) = fs::read_to_string(root.join("package.json")) else {
        return BTreeMap::new();
    };
    let Ok(manifest) = serde_json::from_str::<Value>(&text) else {
        debug!("package.json is not valid JSON");
        return BTreeMap::new();
    };

    let mut out = BTreeMap::new();
    match manifest.get("exports") {
        Some(Value::String(target)) => {
            out.insert(".".to_string(), vec![target.clone()]);
        }
        Some(Value::Object(entries)) => {
            for (key, value) in entries {
                let targets = match value {
                    Value::String(s) => vec![s.clone()],
                    Value::Object(conditions) => conditions
                        .values()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect(),
                    _ => continue,
                };
                out.insert(key.clone(), targets);
            }
        }
        _ => {}
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChangeStatus;
    use tempfile::TempDir;

    fn modified(paths: &[&str]) -> Vec<ChangedFile> {
        paths.iter().map(|p| ChangedFile::new(p, ChangeStatus::Modified)).collect()
    }

    #[test]
    fn deep_index_depth_is_strict() {
        let changed = modified(&["src/index.ts", "src/mod/index.ts", "src/mod/sub/index.tsx", "src/a/b/c.ts"]);
        assert_eq!(deep_index_files(&changed, 2), vec!["src/mod/sub/index.tsx"]);
    }

    #[test]
    fn exports_of_every_form() {
        let content = "export default class Widget {}\nexport const a = 1;\nexport { b, c as d };\nexport default 42;\n";
        let found: Vec<(String, String, bool)> = extract_exports("src/w.ts", content)
            .into_iter()
            .map(|e| (e.name, e.kind, e.is_default))
            .collect();
        assert_eq!(
            found,
            vec![
                ("Widget".to_string(), "class".to_string(), true),
                ("a".to_string(), "const".to_string(), false),
                ("b".to_string(), "unknown".to_string(), false),
                ("c".to_string(), "unknown".to_string(), false),
                ("42".to_string(), "unknown".to_string(), true),
            ]
        );
    }

    #[test]
    fn breaking_markers_and_deletions() -> std::io::Result<()> {
        let dir = TempDir::new()?;
        fs::create_dir_all(dir.path().join("src/api"))?;
        fs::write(dir.path().join("src/api/users.ts"), "// BREAKING: renamed\n")?;
        fs::write(dir.path().join("src/internal.ts"), "// BREAKING: ignored\n")?;
        let mut changed = modified(&["src/api/users.ts", "src/internal.ts"]);
        changed.push(ChangedFile::new("src/index.ts", ChangeStatus::Deleted));

        assert_eq!(
            breaking_changes(dir.path(), &changed),
            vec![
                "Breaking change marker in: src/api/users.ts".to_string(),
                "Public API file deleted: src/index.ts".to_string(),
            ]
        );
        Ok(())
    }

    #[test]
    fn default_exports_in_pages_are_fine() {
        let exports = extract_exports("src/pages/Home.tsx", "export default function Home() {}\n");
        assert!(default_export_overuse(&exports).is_empty());
        let exports = extract_exports("src/ui/Card.tsx", "export default function Card() {}\n");
        assert_eq!(default_export_overuse(&exports).len(), 1);
    }

    #[test]
    fn package_exports_string_and_map() -> std::io::Result<()> {
        let dir = TempDir::new()?;
        fs::write(
            dir.path().join("package.json"),
            r#"{"exports": {".": "./dist/index.js", "./util": {"import": "./dist/util.mjs"}}}"#,
        )?;
        let exports = package_exports(dir.path());
        assert_eq!(exports["."], vec!["./dist/index.js"]);
        assert_eq!(exports["./util"], vec!["./dist/util.mjs"]);
        Ok(())
    }
}
