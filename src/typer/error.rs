//! Error types for OPLS-AA atom typing.
//!
//! Hard errors only arise while building a rule catalog. Problems found
//! while typing a structure are never fatal; they are reported as
//! [`Warning`](super::Warning)s on the [`TypingReport`](super::TypingReport).

use super::rule::RuleId;
use thiserror::Error;

/// Errors that can occur while preparing a typing run.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to parse a TOML rule table.
    #[error("failed to parse typing rules: {0}")]
    RuleParse(#[from] toml::de::Error),

    /// Two rules in one table share an identifier.
    #[error("duplicate rule identifier '{0}'")]
    DuplicateRule(RuleId),

    /// A rule declaration is structurally unusable.
    ///
    /// Occurs for empty identifiers, zero ring sizes, and check lists that
    /// can never be satisfied.
    #[error("invalid rule '{id}': {detail}")]
    InvalidRule {
        /// The offending rule.
        id: RuleId,
        /// Description of the problem.
        detail: String,
    },
}

impl Error {
    /// Creates an [`InvalidRule`](Error::InvalidRule) error.
    pub fn invalid_rule(id: &RuleId, detail: impl Into<String>) -> Self {
        Self::InvalidRule {
            id: id.clone(),
            detail: detail.into(),
        }
    }
}
