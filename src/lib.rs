//! Changeset-scoped architecture review.
//!
//! Builds the dependency graph around a change, classifies files into
//! layers, scans for side effects and complexity, turns the results into
//! prioritized findings and applies the few fixes that are safe to automate.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod exit;
pub mod fix;
pub mod graph;
pub mod lang;
pub mod layers;
pub mod review;
pub mod scan;
pub mod types;
pub mod vcs;
pub mod verification;
