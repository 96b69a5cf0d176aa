// src/cli/mod.rs
//! Command-line driver.

pub mod args;
pub mod report;
pub mod review;

pub use args::Cli;
pub use review::execute;
