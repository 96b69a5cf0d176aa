// src/graph/imports.rs
//! Lexical import extraction for TypeScript / JavaScript sources.
//!
//! This is a line-anchored pattern matcher, not a parser. It recognises
//! `import … from`, bare `import "x"`, `export … from`, `require("x")` and
//! dynamic `import("x")`. Multi-line brace clauses are joined before matching.

use regex::Regex;
use std::sync::LazyLock;

/// Lines a brace clause may span before the extractor gives up on it.
const MAX_CLAUSE_LINES: usize = 64;

static FROM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)^\s*(import|export)\s*(.*?)\s*\bfrom\s*['"]([^'"]+)['"]"#)
        .unwrap_or_else(|_| panic!("Invalid Regex"))
});

static OPEN_CLAUSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(import|export)(\s+type)?\s*([\w$]+\s*,\s*)?\{[^}]*$")
        .unwrap_or_else(|_| panic!("Invalid Regex"))
});

static BARE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*import\s*['"]([^'"]+)['"]"#).unwrap_or_else(|_| panic!("Invalid Regex"))
});

static REQUIRE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\brequire\s*\(\s*['"]([^'"]+)['"]\s*\)"#)
        .unwrap_or_else(|_| panic!("Invalid Regex"))
});

static DYNAMIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bimport\s*\(\s*['"]([^'"]+)['"]\s*\)"#)
        .unwrap_or_else(|_| panic!("Invalid Regex"))
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// `import … from "x"`
    From,
    /// `import "x"`
    Bare,
    /// `export … from "x"`
    ReExport,
    /// `require("x")`
    Require,
    /// `import("x")`
    Dynamic,
}

/// One import reference found in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRef {
    pub specifier: String,
    /// 1-based line of the statement's first line.
    pub line: usize,
    pub kind: ImportKind,
    /// Erased at runtime: contributes no dependency edge.
    pub type_only: bool,
}

impl ImportRef {
    /// Whether this reference imposes a runtime edge.
    #[must_use]
    pub fn is_runtime(&self) -> bool {
        !self.type_only
    }
}

/// Extracts every import reference in `content`, in source order.
#[must_use]
pub fn extract(content: &str) -> Vec<ImportRef> {
    let lines: Vec<&str> = content.lines().collect();
    let mut refs = Vec::new();
    let mut idx = 0;

    while idx < lines.len() {
        let line = lines[idx];
        let trimmed = line.trim_start();
        if is_comment(trimmed) {
            idx += 1;
            continue;
        }

        let consumed = if starts_statement(trimmed) {
            let (statement, span) = join_clause(&lines[idx..]);
            push_statement(&statement, idx + 1, &mut refs);
            span
        } else {
            1
        };

        for offset in 0..consumed {
            let Some(text) = lines.get(idx + offset) else { break };
            push_calls(text, idx + offset + 1, &mut refs);
        }
        idx += consumed;
    }
    refs
}

fn is_comment(trimmed: &str) -> bool {
    trimmed.starts_with("//") || trimmed.starts_with('*') || trimmed.starts_with("/*")
}

fn starts_statement(trimmed: &str) -> bool {
    ["import ", "import{", "import\"", "import'", "export "]
        .iter()
        .any(|p| trimmed.starts_with(p))
}

/// Joins an open `{ … }` clause with its continuation lines.
fn join_clause(lines: &[&str]) -> (String, usize) {
    let Some(first) = lines.first() else {
        return (String::new(), 0);
    };
    if !OPEN_CLAUSE_RE.is_match(first) {
        return ((*first).to_string(), 1);
    }

    let mut joined = (*first).to_string();
    for (offset, next) in lines.iter().enumerate().skip(1).take(MAX_CLAUSE_LINES) {
        joined.push(' ');
        joined.push_str(next.trim());
        if next.contains('}') {
            return (joined, offset + 1);
        }
    }
    ((*first).to_string(), 1)
}

fn push_statement(statement: &str, line: usize, refs: &mut Vec<ImportRef>) {
    if let Some(caps) = FROM_RE.captures(statement) {
        let keyword = caps.get(1).map_or("", |m| m.as_str());
        let clause = caps.get(2).map_or("", |m| m.as_str());
        let specifier = caps.get(3).map_or("", |m| m.as_str());
        // `import("x").then(...)` style lines are handled as calls.
        if clause.starts_with('(') {
            return;
        }
        refs.push(ImportRef {
            specifier: specifier.to_string(),
            line,
            kind: if keyword == "import" { ImportKind::From } else { ImportKind::ReExport },
            type_only: is_type_only_clause(clause),
        });
    } else if let Some(caps) = BARE_RE.captures(statement) {
        if let Some(m) = caps.get(1) {
            refs.push(ImportRef {
                specifier: m.as_str().to_string(),
                line,
                kind: ImportKind::Bare,
                type_only: false,
            });
        }
    }
}

fn push_calls(text: &str, line: usize, refs: &mut Vec<ImportRef>) {
    let code = text.split_once("//").map_or(text, |(code, _)| code);
    for (re, kind) in [(&*REQUIRE_RE, ImportKind::Require), (&*DYNAMIC_RE, ImportKind::Dynamic)] {
        for caps in re.captures_iter(code) {
            if let Some(m) = caps.get(1) {
                refs.push(ImportRef {
                    specifier: m.as_str().to_string(),
                    line,
                    kind,
                    type_only: false,
                });
            }
        }
    }
}

/// `type X`, `type { X }`, or a brace group where every specifier is `type`.
#[must_use]
pub fn is_type_only_clause(clause: &str) -> bool {
    let clause = clause.trim();
    if clause.starts_with("type ") || clause.starts_with("type{") {
        return true;
    }
    let Some(inner) = clause.strip_prefix('{').and_then(|c| c.strip_suffix('}')) else {
        return false;
    };
    let specifiers: Vec<&str> = inner.split(',').map(str::trim).filter(|s| !s.is_empty()).collect();
    !specifiers.is_empty() && specifiers.iter().all(|s| s.starts_with("type "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specifiers(refs: &[ImportRef]) -> Vec<&str> {
        refs.iter().map(|r| r.specifier.as_str()).collect()
    }

    #[test]
    fn recognises_every_statement_form() {
        let code = r#"
import { Foo } from "./components";
import './polyfill';
export * from "./utils";
const fs = require('fs');
const lazy = () => import("./lazy");
"#;
        let refs = extract(code);
        assert_eq!(
            specifiers(&refs),
            vec!["./components", "./polyfill", "./utils", "fs", "./lazy"]
        );
        assert_eq!(refs[0].kind, ImportKind::From);
        assert_eq!(refs[0].line, 2);
        assert_eq!(refs[1].kind, ImportKind::Bare);
        assert_eq!(refs[2].kind, ImportKind::ReExport);
        assert_eq!(refs[3].kind, ImportKind::Require);
        assert_eq!(refs[4].kind, ImportKind::Dynamic);
    }

    #[test]
    fn multi_line_clause_reports_first_line() {
        let code = "import {\n  a,\n  b,\n} from './ab';\nimport c from './c';\n";
        let refs = extract(code);
        assert_eq!(specifiers(&refs), vec!["./ab", "./c"]);
        assert_eq!(refs[0].line, 1);
        assert_eq!(refs[1].line, 5);
    }

    #[test]
    fn type_only_forms_are_marked() {
        let code = r#"
import type { A } from "./a";
import { type B, type C } from "./bc";
import { type D, E } from "./de";
export type { F } from "./f";
"#;
        let flags: Vec<bool> = extract(code).iter().map(|r| r.type_only).collect();
        assert_eq!(flags, vec![true, true, false, true]);
    }

    #[test]
    fn commented_imports_are_ignored() {
        let code = "// import x from './x';\n * import y from './y';\nimport z from './z'; // require('./w')\n";
        assert_eq!(specifiers(&extract(code)), vec!["./z"]);
    }

    #[test]
    fn local_export_list_is_not_an_import() {
        assert!(extract("export { a, b };\nexport const c = 1;\n").is_empty());
    }

    #[test]
    fn exported_bodies_are_not_joined() {
        let code = "export function load() {\n  return require('./data');\n}\nimport x from './x';\n";
        let refs = extract(code);
        assert_eq!(specifiers(&refs), vec!["./data", "./x"]);
        assert_eq!(refs[0].line, 2);
    }
}
