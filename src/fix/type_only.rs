// src/fix/type_only.rs
//! Turns a runtime `import … from` into `import type … from`.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use super::writer::write_atomic;
use crate::graph::{imports, ImportKind, ImportResolver};
use crate::lang;

/// Converts the first runtime import of `target` in `importer` to a type-only
/// import. Returns the modified file.
///
/// Exactly one line changes, or nothing is written.
///
/// # Errors
/// Fails for non-TypeScript importers, unreadable files, or when no runtime
/// import of `target` remains.
pub fn convert(
    root: &Path,
    resolver: &dyn ImportResolver,
    importer: &str,
    target: &str,
) -> Result<String> {
    if !lang::is_type_script(importer) {
        bail!("Only TypeScript supports import type: {importer}");
    }

    let full = root.join(importer);
    let content =
        fs::read_to_string(&full).with_context(|| format!("Failed to read {importer}"))?;

    let Some(updated) = rewrite(&content, |specifier| {
        resolver.resolve(importer, specifier).as_deref() == Some(target)
    }) else {
        bail!("Could not locate import statement to convert");
    };

    write_atomic(&full, &updated)?;
    Ok(importer.to_string())
}

/// Rewrites the first runtime `import … from` statement whose specifier
/// satisfies `targets`. `None` when there is none.
pub(crate) fn rewrite(content: &str, targets: impl Fn(&str) -> bool) -> Option<String> {
    let statement = imports::extract(content).into_iter().find(|r| {
        r.kind == ImportKind::From && r.is_runtime() && targets(&r.specifier)
    })?;

    let idx = statement.line.checked_sub(1)?;
    let line = content.split('\n').nth(idx)?;
    let indent_len = line.len() - line.trim_start().len();
    let (indent, rest) = line.split_at(indent_len);
    let converted = format!("{indent}import type{}", rest.strip_prefix("import")?);

    let mut lines: Vec<&str> = content.split('\n').collect();
    lines[idx] = &converted;
    Some(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::graph::FsResolver;
    use tempfile::TempDir;

    fn is_b(specifier: &str) -> bool {
        specifier == "./b"
    }

    #[test]
    fn inserts_type_after_import() {
        let src = "import { B } from './b';\nconst x = 1;\n";
        assert_eq!(
            rewrite(src, is_b).as_deref(),
            Some("import type { B } from './b';\nconst x = 1;\n")
        );
    }

    #[test]
    fn preserves_indent_quotes_and_line_endings() {
        let src = "  import Default from \"./b\"\r\nrest\r\n";
        assert_eq!(
            rewrite(src, is_b).as_deref(),
            Some("  import type Default from \"./b\"\r\nrest\r\n")
        );
    }

    #[test]
    fn multi_line_clause_rewrites_first_line_only() {
        let src = "import {\n  A,\n  B,\n} from './b';\n";
        assert_eq!(
            rewrite(src, is_b).as_deref(),
            Some("import type {\n  A,\n  B,\n} from './b';\n")
        );
    }

    #[test]
    fn type_imports_and_other_targets_are_ignored() {
        assert!(rewrite("import type { B } from './b';\n", is_b).is_none());
        assert!(rewrite("import { C } from './c';\n", is_b).is_none());
        assert!(rewrite("export { B } from './b';\n", is_b).is_none());
        assert!(rewrite("import './b';\n", is_b).is_none());
    }

    #[test]
    fn second_conversion_fails() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("a.ts"), "import { B } from './b';\n")?;
        fs::write(dir.path().join("b.ts"), "export type B = number;\n")?;
        let resolver = FsResolver::new(dir.path(), &ResolverConfig::default());

        assert_eq!(convert(dir.path(), &resolver, "a.ts", "b.ts")?, "a.ts");
        assert_eq!(fs::read_to_string(dir.path().join("a.ts"))?, "import type { B } from './b';\n");

        let err = convert(dir.path(), &resolver, "a.ts", "b.ts").map(|_| ()).unwrap_err();
        assert_eq!(err.to_string(), "Could not locate import statement to convert");
        Ok(())
    }

    #[test]
    fn javascript_importers_are_rejected() -> Result<()> {
        let dir = TempDir::new()?;
        let resolver = FsResolver::new(dir.path(), &ResolverConfig::default());
        let err = convert(dir.path(), &resolver, "a.js", "b.js").map(|_| ()).unwrap_err();
        assert_eq!(err.to_string(), "Only TypeScript supports import type: a.js");
        Ok(())
    }
}
