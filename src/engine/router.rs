// src/engine/router.rs
//! Routes signals to review domains and their checks.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use super::signal::Signal;
use crate::config::{Catalog, Check, ResolvedOverrides};

#[derive(Debug, Clone, Default, Serialize)]
pub struct RoutingResult {
    /// Checks of the triggered domains, overrides applied.
    pub selected_checks: Vec<Check>,
    pub triggered_domains: BTreeSet<String>,
    /// Conditions that fired, once per matching signal.
    pub reasoning_applied: Vec<String>,
}

pub struct Router<'a> {
    catalog: &'a Catalog,
    overrides: &'a ResolvedOverrides,
}

impl<'a> Router<'a> {
    #[must_use]
    pub fn new(catalog: &'a Catalog, overrides: &'a ResolvedOverrides) -> Self {
        Self { catalog, overrides }
    }

    #[must_use]
    pub fn route(&self, signals: &[Signal]) -> RoutingResult {
        let mut result = RoutingResult::default();

        for signal in signals {
            for rule in self.catalog.reasoning() {
                if matches_condition(signal, &rule.condition) {
                    result.triggered_domains.extend(rule.domains.iter().cloned());
                    result.reasoning_applied.push(rule.condition.clone());
                }
            }
        }

        for domain in &result.triggered_domains {
            result
                .selected_checks
                .extend(self.catalog.checks_for(domain).map(|c| self.overrides.apply(c)));
        }

        debug!(
            domains = result.triggered_domains.len(),
            checks = result.selected_checks.len(),
            "signals routed"
        );
        result
    }
}

/// Case-insensitive, bidirectional substring test between a signal and a
/// condition. An empty condition is contained in every signal and matches all.
#[must_use]
pub fn matches_condition(signal: &Signal, condition: &str) -> bool {
    let condition = condition.trim().to_lowercase();
    condition.contains(signal.kind()) || signal.describe().to_lowercase().contains(&condition)
}
