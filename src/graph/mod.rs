// src/graph/mod.rs
pub mod builder;
pub mod cycles;
pub mod imports;
pub mod resolver;
pub mod types;

pub use builder::{build_scoped_graph, GraphBuilder};
pub use cycles::{detect_cycles, Cycle};
pub use imports::{ImportKind, ImportRef};
pub use resolver::{FsResolver, ImportResolver};
pub use types::{DependencyGraph, DependencyNode, GraphStats};
