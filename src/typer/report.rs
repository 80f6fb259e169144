use super::context::CandidateSets;
use super::precedence::PatternKey;
use super::rule::RuleId;
use crate::model::compound::AtomId;
use std::collections::BTreeMap;
use thiserror::Error;

fn join(ids: &[RuleId]) -> String {
    let parts: Vec<&str> = ids.iter().map(RuleId::as_str).collect();
    format!("[{}]", parts.join(", "))
}

/// Non-fatal problem found while building a catalog or typing a structure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    #[error("rule graph is not connected for {pattern}: {}", join(.rules))]
    DisconnectedPrecedence { pattern: PatternKey, rules: Vec<RuleId> },

    #[error("rule graph is not a DAG for {pattern}: {}", join(.rules))]
    CyclicPrecedence { pattern: PatternKey, rules: Vec<RuleId> },

    #[error("rule graph for {pattern} has multiple sinks: {}", join(.sinks))]
    MultipleSinks { pattern: PatternKey, sinks: Vec<RuleId> },

    #[error("rule '{rule}' blacklists unknown rule '{target}'")]
    UnknownBlacklistTarget { rule: RuleId, target: RuleId },

    #[error("no rule for atom kind '{kind}' (atom {atom})")]
    NoRulesForKind { atom: AtomId, kind: String },

    #[error("no rule for {degree}-neighbor '{kind}' (atom {atom})")]
    NoRulesForDegree {
        atom: AtomId,
        kind: String,
        degree: usize,
    },

    #[error("reached maximum of {passes} passes without a fixed point; typing probably went wrong")]
    NotConverged { passes: usize },

    #[error(
        "no unique type for atom {atom} ('{kind}'): whitelist {}, blacklist {}; CHECK YOUR TOPOLOGY",
        join(.whitelist),
        join(.blacklist)
    )]
    Unresolved {
        atom: AtomId,
        kind: String,
        whitelist: Vec<RuleId>,
        blacklist: Vec<RuleId>,
    },
}

impl Warning {
    /// Problems in the rule catalog itself, independent of any structure.
    pub fn is_catalog(&self) -> bool {
        matches!(
            self,
            Warning::DisconnectedPrecedence { .. }
                | Warning::CyclicPrecedence { .. }
                | Warning::MultipleSinks { .. }
                | Warning::UnknownBlacklistTarget { .. }
        )
    }

    pub fn is_coverage_gap(&self) -> bool {
        matches!(
            self,
            Warning::NoRulesForKind { .. } | Warning::NoRulesForDegree { .. }
        )
    }
}

/// Collects warnings and forwards each to the `log` facade.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn emit(&mut self, warning: Warning) {
        log::warn!("{warning}");
        self.warnings.push(warning);
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

/// Outcome of reduction for one atom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Ghost atom; never typed.
    Skipped,
    Typed(RuleId),
    /// Zero or several candidates survived reduction.
    Unresolved(Vec<RuleId>),
}

impl Resolution {
    pub fn rule_id(&self) -> Option<&RuleId> {
        match self {
            Resolution::Typed(id) => Some(id),
            _ => None,
        }
    }
}

/// Everything one typing run produced.
#[derive(Debug, Clone, Default)]
pub struct TypingReport {
    /// Per-atom outcome, indexed by atom id.
    pub resolutions: Vec<Resolution>,
    /// Per-atom candidate sets at the end of resolution.
    pub candidates: Vec<CandidateSets>,
    pub passes: usize,
    pub converged: bool,
    pub warnings: Vec<Warning>,
}

impl TypingReport {
    pub fn type_of(&self, atom: AtomId) -> Option<&str> {
        self.resolutions
            .get(atom)
            .and_then(Resolution::rule_id)
            .map(RuleId::as_str)
    }

    pub fn typed_count(&self) -> usize {
        self.resolutions
            .iter()
            .filter(|r| matches!(r, Resolution::Typed(_)))
            .count()
    }

    pub fn unresolved_count(&self) -> usize {
        self.resolutions
            .iter()
            .filter(|r| matches!(r, Resolution::Unresolved(_)))
            .count()
    }

    /// Number of atoms resolved to each type.
    pub fn type_counts(&self) -> BTreeMap<&RuleId, usize> {
        let mut counts = BTreeMap::new();
        for id in self.resolutions.iter().filter_map(Resolution::rule_id) {
            *counts.entry(id).or_insert(0) += 1;
        }
        counts
    }

    pub fn coverage_gaps(&self) -> impl Iterator<Item = &Warning> {
        self.warnings.iter().filter(|w| w.is_coverage_gap())
    }
}
