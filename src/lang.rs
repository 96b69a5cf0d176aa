use std::path::Path;

/// Source families the engine knows how to treat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lang {
    TypeScript,
    JavaScript,
    CLike,
    Rust,
    Python,
    Shell,
    Config,
}

impl Lang {
    #[must_use]
    pub fn from_ext(ext: &str) -> Option<Self> {
        match ext {
            "ts" | "tsx" => Some(Self::TypeScript),
            "js" | "jsx" | "mjs" | "cjs" => Some(Self::JavaScript),
            "c" | "cc" | "cpp" | "h" | "hpp" | "java" | "cs" | "go" => Some(Self::CLike),
            "rs" => Some(Self::Rust),
            "py" => Some(Self::Python),
            "sh" | "bash" => Some(Self::Shell),
            "yml" | "yaml" | "toml" | "ini" => Some(Self::Config),
            _ => None,
        }
    }

    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|e| Self::from_ext(&e.to_ascii_lowercase()))
    }

    /// Line-comment token, if the language has a safe one.
    #[must_use]
    pub fn line_comment(self) -> Option<&'static str> {
        match self {
            Self::TypeScript | Self::JavaScript | Self::CLike | Self::Rust => Some("//"),
            Self::Python | Self::Shell | Self::Config => Some("#"),
        }
    }

    /// Whether files of this language take part in the import graph.
    #[must_use]
    pub fn is_graph_source(self) -> bool {
        matches!(self, Self::TypeScript | Self::JavaScript)
    }
}

/// Line-comment token for `path`; `None` for data formats and unknown files.
#[must_use]
pub fn comment_prefix(path: &str) -> Option<&'static str> {
    Lang::from_path(path).and_then(Lang::line_comment)
}

/// `.ts` / `.tsx` files, the only ones that accept `import type`.
#[must_use]
pub fn is_type_script(path: &str) -> bool {
    Lang::from_path(path) == Some(Lang::TypeScript)
}

/// Scannable source extensions (`ts tsx js jsx mjs cjs`).
#[must_use]
pub fn is_graph_source(path: &str) -> bool {
    Lang::from_path(path).is_some_and(Lang::is_graph_source)
}

/// `.test.` / `.spec.` files and anything under `__tests__`.
#[must_use]
pub fn is_test_file(path: &str) -> bool {
    path.contains(".test.")
        || path.contains(".spec.")
        || path.split('/').any(|segment| segment == "__tests__")
}
