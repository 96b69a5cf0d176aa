use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "reviewgate",
    version,
    about = "Architecture review for a changeset: layers, cycles, purity, complexity"
)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Repository path (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub repo_path: Option<PathBuf>,
    /// Base branch for comparison [default: review.base_branch]
    #[arg(long)]
    pub base_branch: Option<String>,
    /// Stack-specific overrides (react, nextjs, node, ...)
    #[arg(long)]
    pub stack: Option<String>,
    /// Package-level overrides; repeatable
    #[arg(long = "package", value_name = "NAME")]
    pub packages: Vec<String>,
    /// Focus on one area (layer, dep, pure, complex, api)
    #[arg(long)]
    pub domain: Option<String>,
    /// Maximum findings to report [default: review.max_results]
    #[arg(long)]
    pub max_results: Option<usize>,
    /// Minimum confidence to report (low, medium, high)
    #[arg(long)]
    pub min_confidence: Option<String>,
    /// Run the configured test command and feed failures into routing
    #[arg(long)]
    pub ensure_tests_pass: bool,
    /// Report findings without touching any file
    #[arg(long)]
    pub no_fix: bool,
    /// Apply fixes but leave them uncommitted
    #[arg(long)]
    pub no_commit: bool,
    /// Create a `review-gate/<secs>-<sha>` branch before fixing
    #[arg(long)]
    pub branch: bool,
    /// Review every source file instead of the diff against the base branch
    #[arg(long)]
    pub all: bool,
    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,
    /// Debug logging (overrides RUST_LOG)
    #[arg(long, short)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn packages_repeat() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from(["reviewgate", "--package", "ui", "--package", "core", "--no-fix"])?;
        assert_eq!(cli.packages, vec!["ui", "core"]);
        assert!(cli.no_fix);
        assert!(cli.base_branch.is_none());
        Ok(())
    }
}
