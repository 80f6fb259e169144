//! Declarative typing rules.
//!
//! A [`Rule`] is plain data: the element and degree it applies to, a list of
//! neighbor-count [`Constraint`]s, a list of structural [`Check`]s, and the
//! identifiers it whitelists and blacklists when it fires. Rules are built
//! either in code with the builder methods or from a TOML rule table (see
//! [`RuleCatalog::from_toml`](super::RuleCatalog::from_toml)).

use super::context::TypingContext;
use super::graph::AtomGraph;
use super::rings::{self, RingSpec};
use crate::model::compound::AtomId;
use serde::Deserialize;
use std::borrow::Borrow;
use std::fmt;

/// Opaque rule identifier such as `"135"` or `"145B"`.
///
/// Identifiers compare and sort as strings. Rule tables may spell numeric
/// identifiers as bare integers; they are stored in their decimal form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(from = "RawRuleId")]
pub struct RuleId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRuleId {
    Text(String),
    Number(i64),
}

impl From<RawRuleId> for RuleId {
    fn from(raw: RawRuleId) -> Self {
        match raw {
            RawRuleId::Text(s) => RuleId(s),
            RawRuleId::Number(n) => RuleId(n.to_string()),
        }
    }
}

impl RuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RuleId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RuleId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for RuleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bound on the number of neighbors of one element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
pub enum Constraint {
    Exactly { kind: String, count: usize },
    AtLeast { kind: String, count: usize },
    AtMost { kind: String, count: usize },
}

impl Constraint {
    pub fn kind(&self) -> &str {
        match self {
            Constraint::Exactly { kind, .. }
            | Constraint::AtLeast { kind, .. }
            | Constraint::AtMost { kind, .. } => kind,
        }
    }

    /// Whether `count` neighbors of [`kind`](Self::kind) satisfy the bound.
    pub fn admits(&self, count: usize) -> bool {
        match *self {
            Constraint::Exactly { count: n, .. } => count == n,
            Constraint::AtLeast { count: n, .. } => count >= n,
            Constraint::AtMost { count: n, .. } => count <= n,
        }
    }
}

/// Structural condition evaluated after the cheap element/degree/neighbor
/// filters pass.
///
/// The `*carries` variants read candidate sets of the current run, which is
/// why resolution iterates to a fixed point. An atom "carries" an identifier
/// when it is whitelisted and not blacklisted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum Check {
    /// The atom lies in exactly one ring matching the spec.
    InRing(RingSpec),
    /// The atom lies in a matching ring and bonds to another matching ring.
    BridgesRings(RingSpec),
    /// The atom itself carries one of `ids`.
    Carries { ids: Vec<RuleId> },
    /// The first bonded neighbor carries one of `ids`.
    FirstNeighborCarries { ids: Vec<RuleId> },
    /// Some neighbor (of `kind`, when given) carries one of `ids`.
    NeighborCarries {
        #[serde(default)]
        kind: Option<String>,
        ids: Vec<RuleId>,
    },
}

impl Check {
    pub(crate) fn holds<G: AtomGraph + ?Sized>(
        &self,
        atom: AtomId,
        ctx: &TypingContext<'_, G>,
    ) -> bool {
        let graph = ctx.graph();
        match self {
            Check::InRing(spec) => rings::single_ring(graph, atom, spec).is_some(),
            Check::BridgesRings(spec) => rings::bridges_rings(graph, atom, spec),
            Check::Carries { ids } => ctx.carries(atom, ids),
            Check::FirstNeighborCarries { ids } => graph
                .neighbors(atom)
                .first()
                .is_some_and(|&n| ctx.carries(n, ids)),
            Check::NeighborCarries { kind, ids } => graph.neighbors(atom).iter().any(|&n| {
                kind.as_deref().is_none_or(|k| graph.kind(n) == k) && ctx.carries(n, ids)
            }),
        }
    }
}

/// One atom-typing rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    pub id: RuleId,
    /// Element the rule applies to; `None` applies to every element.
    #[serde(default)]
    pub element: Option<String>,
    /// Required neighbor count; `None` accepts any.
    #[serde(default)]
    pub degree: Option<usize>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub neighbors: Vec<Constraint>,
    #[serde(default)]
    pub checks: Vec<Check>,
    /// Identifiers added to the whitelist on firing; empty means `[id]`.
    #[serde(default)]
    pub whitelist: Vec<RuleId>,
    #[serde(default)]
    pub blacklist: Vec<RuleId>,
}

impl Rule {
    pub fn new(id: impl Into<RuleId>) -> Self {
        let id = id.into();
        Self {
            whitelist: vec![id.clone()],
            id,
            element: None,
            degree: None,
            description: None,
            neighbors: Vec::new(),
            checks: Vec::new(),
            blacklist: Vec::new(),
        }
    }

    pub fn with_element(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }

    pub fn with_degree(mut self, degree: usize) -> Self {
        self.degree = Some(degree);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn exactly(mut self, kind: impl Into<String>, count: usize) -> Self {
        self.neighbors.push(Constraint::Exactly {
            kind: kind.into(),
            count,
        });
        self
    }

    pub fn at_least(mut self, kind: impl Into<String>, count: usize) -> Self {
        self.neighbors.push(Constraint::AtLeast {
            kind: kind.into(),
            count,
        });
        self
    }

    pub fn at_most(mut self, kind: impl Into<String>, count: usize) -> Self {
        self.neighbors.push(Constraint::AtMost {
            kind: kind.into(),
            count,
        });
        self
    }

    pub fn with_check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    pub fn whitelisting<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<RuleId>,
    {
        self.whitelist = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn blacklisting<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<RuleId>,
    {
        self.blacklist = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Element and degree gate, checked before anything else.
    #[inline]
    pub fn applies_to(&self, kind: &str, degree: usize) -> bool {
        self.element.as_deref().is_none_or(|e| e == kind)
            && self.degree.is_none_or(|d| d == degree)
    }

    /// Whether the rule's neighbor constraints admit a neighbor multiset.
    pub fn admits_pattern(&self, pattern: &[String]) -> bool {
        self.neighbors.iter().all(|c| {
            let count = pattern.iter().filter(|k| k.as_str() == c.kind()).count();
            c.admits(count)
        })
    }

    pub(crate) fn matches<G: AtomGraph + ?Sized>(
        &self,
        atom: AtomId,
        ctx: &mut TypingContext<'_, G>,
    ) -> bool {
        let graph = ctx.graph();
        if !self.applies_to(graph.kind(atom), graph.degree(atom)) {
            return false;
        }

        let profile = ctx.profile(atom);
        if !self.neighbors.iter().all(|c| c.admits(profile.count(c.kind()))) {
            return false;
        }

        self.checks.iter().all(|check| check.holds(atom, ctx))
    }

    /// Sorts and deduplicates the id lists, filling the default whitelist.
    pub(crate) fn normalize(&mut self) {
        if self.whitelist.is_empty() {
            self.whitelist.push(self.id.clone());
        }
        self.whitelist.sort();
        self.whitelist.dedup();
        self.blacklist.sort();
        self.blacklist.dedup();
    }
}
