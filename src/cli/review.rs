// src/cli/review.rs
//! The `reviewgate` command: wires the collaborators and runs the pipeline.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use tracing::warn;

use super::args::Cli;
use super::report;
use crate::config::{load_catalog, Catalog, ReviewConfig};
use crate::error::ReviewError;
use crate::exit::ReviewExit;
use crate::graph::FsResolver;
use crate::review::{Collaborators, ReviewOptions, Reviewer};
use crate::types::{Area, Changeset, Confidence};
use crate::verification::{CommandSuite, TestSuite};
use crate::vcs::{DiffSource, Git, GitDiff, VersionControl, WorkspaceTree};

/// Runs one review and maps the outcome to an exit status.
///
/// # Errors
/// Returns error for a bad `--domain`, a missing repository, or a failed diff.
pub fn execute(cli: &Cli) -> Result<ReviewExit> {
    let root = repo_root(cli)?;
    let config = ReviewConfig::load_or_default(&root);
    let catalog = load_catalog(&config.catalog_path(&root)).unwrap_or_else(|e| {
        warn!(error = %e, "ignoring check catalog, using built-in checks");
        Catalog::builtin()
    });

    let git = Git::new(&root);
    let in_repo = git.in_repo();
    let base = cli.base_branch.clone().unwrap_or_else(|| config.review.base_branch.clone());
    let changeset = collect_changeset(cli, &config, &git, in_repo, &base)?;

    let mut options = build_options(cli, &config)?;
    options.branch = review_branch(cli, &git, in_repo);

    let suite = CommandSuite::from_config(&root, &config.tests);
    let collaborators = Collaborators {
        tests: cli.ensure_tests_pass.then_some(&suite as &dyn TestSuite),
        vcs: (in_repo && !cli.no_commit && !cli.no_fix).then_some(&git as &dyn VersionControl),
    };

    let resolver = FsResolver::new(&root, &config.resolver);
    let outcome = Reviewer::new(&root, &config, &catalog, &resolver).run(&changeset, &options, collaborators);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        report::print_outcome(&outcome, &base);
    }
    Ok(outcome.exit())
}

fn repo_root(cli: &Cli) -> Result<PathBuf> {
    let root = match &cli.repo_path {
        Some(p) => p.clone(),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    if !root.is_dir() {
        bail!("Repository path is not a directory: {}", root.display());
    }
    Ok(root)
}

fn collect_changeset(
    cli: &Cli,
    config: &ReviewConfig,
    git: &Git,
    in_repo: bool,
    base: &str,
) -> Result<Changeset> {
    if cli.all {
        return Ok(WorkspaceTree::new(git.root(), &config.graph.vendored_dirs).collect()?);
    }
    if !in_repo {
        return Err(ReviewError::NotInGitRepo.into());
    }
    GitDiff::new(git, base)
        .collect()
        .with_context(|| format!("Failed to diff against {base}"))
}

/// Creates the review branch when asked; otherwise names the current one.
fn review_branch(cli: &Cli, git: &Git, in_repo: bool) -> String {
    if !in_repo {
        return "unknown".to_string();
    }
    if cli.branch && !cli.no_fix {
        match git.create_review_branch() {
            Ok(branch) => return branch,
            Err(e) => warn!(error = %e, "could not create review branch, continuing on current branch"),
        }
    }
    git.current_branch().unwrap_or_else(|_| "unknown".to_string())
}

/// # Errors
/// Returns error if `--domain` names no known area.
pub fn build_options(cli: &Cli, config: &ReviewConfig) -> Result<ReviewOptions> {
    let mut options = ReviewOptions::from_settings(&config.review);
    options.stack.clone_from(&cli.stack);
    options.packages.clone_from(&cli.packages);
    options.apply_fixes = !cli.no_fix;

    if let Some(domain) = &cli.domain {
        let Some(area) = parse_area(domain) else {
            bail!("Unknown domain '{domain}' (expected layer, dep, pure, complex or api)");
        };
        options.areas = vec![area];
    }
    if let Some(max) = cli.max_results {
        options.max_results = max;
    }
    if let Some(min) = &cli.min_confidence {
        options.min_confidence = Confidence::parse(min);
    }
    Ok(options)
}

/// Area label, or the name of the domain that produces it.
fn parse_area(text: &str) -> Option<Area> {
    Area::from_label(text).or_else(|| match text.trim().to_ascii_lowercase().as_str() {
        "dependencies" | "dependency" => Some(Area::Dep),
        "purity" => Some(Area::Pure),
        "complexity" => Some(Area::Complex),
        _ => None,
    })
}
