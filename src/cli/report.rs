// src/cli/report.rs
//! Console rendering of a review outcome.

use colored::Colorize;

use crate::engine::group_by_severity;
use crate::fix::CommitOutcome;
use crate::review::ReviewOutcome;
use crate::types::{Finding, FixResult, Severity, TestOutcome};

const FIX_LIST_LIMIT: usize = 20;
const FAILED_FIX_LIMIT: usize = 10;

/// Prints the summary, findings, fixes and verdict.
pub fn print_outcome(outcome: &ReviewOutcome, base: &str) {
    println!("{}", "REVIEW GATE".cyan().bold());
    println!("{}", "========================================".dimmed());
    println!("Base: {}", base.white());
    println!(
        "Changeset: {} files, +{}/-{}",
        outcome.changeset.total_files, outcome.changeset.additions, outcome.changeset.deletions
    );
    println!(
        "Graph: {} nodes, {} edges, {} cycles",
        outcome.graph.nodes, outcome.graph.edges, outcome.graph.cycles
    );
    println!(
        "Routing: {} checks from {} domains",
        outcome.routing.selected_checks.len(),
        outcome.routing.triggered_domains.len()
    );
    println!(
        "API: {} exports ({} from index files), {} package entry points",
        outcome.api.index_exports.len() + outcome.api.deep_exports.len(),
        outcome.api.index_exports.len(),
        outcome.api.package_exports.len()
    );
    if let Some(tests) = &outcome.tests {
        print_tests(tests);
    }

    println!();
    print_findings(outcome);
    print_fixes(&outcome.fixes);
    if let Some(commit) = &outcome.commit {
        print_commit(commit, &outcome.branch);
    }
    if outcome.cycles_remaining > 0 {
        println!(
            "\n{} {} import cycle(s) remain after auto-fix",
            "⚠".yellow().bold(),
            outcome.cycles_remaining
        );
    }
    print_verdict(&outcome.remaining_blockers);
}

fn print_tests(tests: &TestOutcome) {
    if tests.passed() {
        println!("Tests: {} ({} total)", "PASS".green().bold(), tests.total_tests());
    } else if tests.is_timed_out() {
        println!("Tests: {}", "TIMED OUT".red().bold());
    } else {
        println!("Tests: {} ({} failed files)", "FAIL".red().bold(), tests.failed_tests());
    }
}

fn print_findings(outcome: &ReviewOutcome) {
    if outcome.findings.is_empty() {
        println!("{} No findings.", "✓".green().bold());
        return;
    }
    println!(
        "{} (showing {} of {})",
        "FINDINGS".cyan().bold(),
        outcome.findings.len(),
        outcome.total_findings
    );
    let groups = group_by_severity(outcome.findings.clone());
    for (label, group) in [
        ("Blockers", &groups.blockers),
        ("Recommendations", &groups.recommendations),
        ("Info", &groups.info),
    ] {
        if group.is_empty() {
            continue;
        }
        println!("  {} ({})", label.bold(), group.len());
        for finding in group {
            print_finding(finding);
        }
    }
}

fn print_finding(finding: &Finding) {
    let tag = match finding.severity {
        Severity::Blocker => finding.severity.label().red().bold(),
        Severity::Recommendation => finding.severity.label().yellow().bold(),
        Severity::Info => finding.severity.label().blue(),
    };
    println!("    [{tag}] {} {}", finding.id.white().bold(), finding.title);
    let location = location(finding);
    if !location.is_empty() {
        println!("        {}", location.dimmed());
    }
    if let Some(step) = finding.proposed_fix.first() {
        println!("        fix: {step}");
    }
}

/// Dependency chain when present, otherwise the evidence files.
#[must_use]
pub fn location(finding: &Finding) -> String {
    let chain = finding.evidence.chain();
    if chain.is_empty() {
        finding.evidence.paths().join(", ")
    } else {
        chain.join(" → ")
    }
}

fn print_fixes(fixes: &[FixResult]) {
    let (ok, failed): (Vec<&FixResult>, Vec<&FixResult>) = fixes.iter().partition(|r| r.success);

    if !ok.is_empty() {
        println!("\n{} Applied {} fix(es)", "✓".green().bold(), ok.len());
        for result in ok.iter().take(FIX_LIST_LIMIT) {
            println!("    - {}: {}", result.finding_id, result.files_modified.join(", "));
        }
        if ok.len() > FIX_LIST_LIMIT {
            println!("    ... and {} more", ok.len() - FIX_LIST_LIMIT);
        }
    }

    if !failed.is_empty() {
        println!("\n{} {} issue(s) were not auto-fixable", "~".yellow().bold(), failed.len());
        for result in failed.iter().take(FAILED_FIX_LIMIT) {
            println!("    - {}: {}", result.finding_id, result.error.as_deref().unwrap_or_default());
        }
        if failed.len() > FAILED_FIX_LIMIT {
            println!("    ... and {} more", failed.len() - FAILED_FIX_LIMIT);
        }
    }
}

fn print_commit(commit: &CommitOutcome, branch: &str) {
    match commit {
        CommitOutcome::Committed { files, .. } => {
            println!("{} Committed {} file(s) to {}", "✓".green().bold(), files.len(), branch.white());
        }
        CommitOutcome::NothingToCommit => {}
        CommitOutcome::Failed { warning } => {
            println!("{} Could not commit fixes: {}", "⚠".yellow().bold(), warning.yellow());
        }
    }
}

fn print_verdict(blockers: &[Finding]) {
    println!();
    if blockers.is_empty() {
        println!("{} No blockers remain", "✓".green().bold());
    } else {
        println!(
            "{} {} BLOCKER(S) remain - review required before merge",
            "✗".red().bold(),
            blockers.len()
        );
        for finding in blockers {
            println!("  {} {}", finding.id.red(), finding.title);
        }
    }
}
