// src/graph/resolver.rs
use std::path::{Path, PathBuf};

use crate::config::ResolverConfig;

const EXTENSIONS: [&str; 4] = ["ts", "tsx", "js", "jsx"];

/// Maps an import specifier to a repository file.
///
/// Paths on both sides are repository-relative with forward slashes.
pub trait ImportResolver {
    /// Returns the resolved file, or `None` for external or missing modules.
    fn resolve(&self, importer: &str, specifier: &str) -> Option<String>;
}

/// Resolves against files on disk under a repository root.
#[derive(Debug, Clone)]
pub struct FsResolver {
    root: PathBuf,
    alias_prefix: String,
    alias_root: String,
}

impl FsResolver {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, config: &ResolverConfig) -> Self {
        Self {
            root: root.into(),
            alias_prefix: config.alias_prefix.clone(),
            alias_root: config.alias_root.trim_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Repository-relative path the specifier points at, before extension probing.
    fn rebase(&self, importer: &str, specifier: &str) -> Option<String> {
        let aliased = specifier
            .strip_prefix(self.alias_prefix.as_str())
            .filter(|_| !self.alias_prefix.is_empty());
        let (base, rest) = match aliased {
            Some(rest) => (self.alias_root.as_str(), rest),
            None if specifier.starts_with('.') => (parent_dir(importer), specifier),
            None => return None,
        };
        join_lexically(base, rest)
    }

    fn first_existing(&self, rel: &str) -> Option<String> {
        candidates(rel).into_iter().find(|c| self.root.join(c).is_file())
    }
}

impl ImportResolver for FsResolver {
    fn resolve(&self, importer: &str, specifier: &str) -> Option<String> {
        let rel = self.rebase(importer, specifier)?;
        self.first_existing(&rel)
    }
}

fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// Joins `rest` onto `base`, folding `.` and `..`. `None` if it escapes the root.
fn join_lexically(base: &str, rest: &str) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    for segment in base.split('/').chain(rest.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            s => parts.push(s),
        }
    }
    Some(parts.join("/"))
}

/// Probe order: literal, each extension appended, each directory index.
fn candidates(rel: &str) -> Vec<String> {
    let mut out = Vec::with_capacity(1 + EXTENSIONS.len() * 2);
    if !rel.is_empty() {
        out.push(rel.to_string());
        out.extend(EXTENSIONS.iter().map(|ext| format!("{rel}.{ext}")));
    }
    let dir = if rel.is_empty() { String::new() } else { format!("{rel}/") };
    out.extend(EXTENSIONS.iter().map(|ext| format!("{dir}index.{ext}")));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) -> std::io::Result<()> {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, "")
    }

    fn resolver(root: &Path) -> FsResolver {
        FsResolver::new(root, &ResolverConfig::default())
    }

    #[test]
    fn alias_resolves_under_alias_root() -> std::io::Result<()> {
        let dir = TempDir::new()?;
        touch(dir.path(), "src/shared/util.ts")?;
        let r = resolver(dir.path());
        assert_eq!(
            r.resolve("src/app/main.ts", "@/shared/util").as_deref(),
            Some("src/shared/util.ts")
        );
        Ok(())
    }

    #[test]
    fn relative_resolution_with_parent_segments() -> std::io::Result<()> {
        let dir = TempDir::new()?;
        touch(dir.path(), "src/domain/order.ts")?;
        let r = resolver(dir.path());
        assert_eq!(
            r.resolve("src/app/main.ts", "../domain/order").as_deref(),
            Some("src/domain/order.ts")
        );
        assert_eq!(r.resolve("src/app/main.ts", "../../../outside"), None);
        Ok(())
    }

    #[test]
    fn literal_file_beats_extension_probe() -> std::io::Result<()> {
        let dir = TempDir::new()?;
        touch(dir.path(), "src/a.js")?;
        touch(dir.path(), "src/a.js.ts")?;
        let r = resolver(dir.path());
        assert_eq!(r.resolve("src/b.ts", "./a.js").as_deref(), Some("src/a.js"));
        Ok(())
    }

    #[test]
    fn directory_falls_through_to_index() -> std::io::Result<()> {
        let dir = TempDir::new()?;
        touch(dir.path(), "src/widgets/index.tsx")?;
        let r = resolver(dir.path());
        assert_eq!(
            r.resolve("src/main.ts", "./widgets").as_deref(),
            Some("src/widgets/index.tsx")
        );
        Ok(())
    }

    #[test]
    fn bare_and_missing_specifiers_yield_no_edge() -> std::io::Result<()> {
        let dir = TempDir::new()?;
        touch(dir.path(), "src/react.ts")?;
        let r = resolver(dir.path());
        assert_eq!(r.resolve("src/main.ts", "react"), None);
        assert_eq!(r.resolve("src/main.ts", "./missing"), None);
        Ok(())
    }

    #[test]
    fn candidate_order_is_fixed() {
        assert_eq!(
            candidates("src/a"),
            vec![
                "src/a", "src/a.ts", "src/a.tsx", "src/a.js", "src/a.jsx",
                "src/a/index.ts", "src/a/index.tsx", "src/a/index.js", "src/a/index.jsx",
            ]
        );
    }
}
