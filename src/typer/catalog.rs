use super::error::Error;
use super::precedence;
use super::report::Warning;
use super::rule::{Check, Rule, RuleId};
use crate::model::atom::GHOST_KIND;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

const BUILTIN_RULES_TOML: &str = include_str!("../../resources/oplsaa.rules.toml");

static BUILTIN_CATALOG: OnceLock<RuleCatalog> = OnceLock::new();

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleTable {
    #[serde(rename = "rule", default)]
    rules: Vec<Rule>,
}

/// Rules registered for one element.
#[derive(Debug, Clone, Default)]
pub struct ElementBucket {
    any_degree: Vec<RuleId>,
    by_degree: BTreeMap<usize, Vec<RuleId>>,
}

impl ElementBucket {
    /// Rules that declare no degree.
    pub fn any_degree(&self) -> &[RuleId] {
        &self.any_degree
    }

    pub fn degree(&self, degree: usize) -> Option<&[RuleId]> {
        self.by_degree.get(&degree).map(Vec::as_slice)
    }

    pub fn degrees(&self) -> impl Iterator<Item = usize> + '_ {
        self.by_degree.keys().copied()
    }
}

/// Immutable, validated set of typing rules indexed for dispatch.
///
/// Rules are bucketed by element and degree. Rules without an element go
/// into a wildcard bucket tried for every atom. Precedence problems found at
/// build time are kept as [`warnings`](Self::warnings).
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    rules: BTreeMap<RuleId, Rule>,
    buckets: BTreeMap<String, ElementBucket>,
    wildcard: Vec<RuleId>,
    warnings: Vec<Warning>,
}

impl RuleCatalog {
    pub fn new(rules: impl IntoIterator<Item = Rule>) -> Result<Self, Error> {
        let mut by_id = BTreeMap::new();
        for mut rule in rules {
            check_rule(&rule)?;
            rule.normalize();
            if by_id.contains_key(&rule.id) {
                return Err(Error::DuplicateRule(rule.id));
            }
            by_id.insert(rule.id.clone(), rule);
        }

        let mut buckets: BTreeMap<String, ElementBucket> = BTreeMap::new();
        let mut wildcard = Vec::new();
        for rule in by_id.values() {
            match (&rule.element, rule.degree) {
                (Some(element), Some(degree)) => buckets
                    .entry(element.clone())
                    .or_default()
                    .by_degree
                    .entry(degree)
                    .or_default()
                    .push(rule.id.clone()),
                (Some(element), None) => buckets
                    .entry(element.clone())
                    .or_default()
                    .any_degree
                    .push(rule.id.clone()),
                (None, _) => wildcard.push(rule.id.clone()),
            }
        }

        let warnings = precedence::validate(&by_id);
        for warning in &warnings {
            log::warn!("{warning}");
        }
        log::debug!(
            "built rule catalog: {} rules over {} elements, {} wildcard",
            by_id.len(),
            buckets.len(),
            wildcard.len()
        );

        Ok(Self {
            rules: by_id,
            buckets,
            wildcard,
            warnings,
        })
    }

    /// Parses a TOML document of `[[rule]]` tables.
    pub fn from_toml(toml_str: &str) -> Result<Self, Error> {
        let table: RuleTable = toml::from_str(toml_str)?;
        Self::new(table.rules)
    }

    /// The shipped OPLS-AA rule set, parsed on first use.
    pub fn builtin() -> &'static RuleCatalog {
        BUILTIN_CATALOG.get_or_init(|| {
            Self::from_toml(BUILTIN_RULES_TOML)
                .expect("Failed to parse embedded OPLS-AA rules. This is a library bug.")
        })
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.get(id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in identifier order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Elements with at least one element-specific rule.
    pub fn elements(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    pub fn bucket(&self, element: &str) -> Option<&ElementBucket> {
        self.buckets.get(element)
    }

    pub fn wildcard(&self) -> &[RuleId] {
        &self.wildcard
    }
}

fn check_rule(rule: &Rule) -> Result<(), Error> {
    if rule.id.as_str().trim().is_empty() {
        return Err(Error::invalid_rule(&rule.id, "identifier is empty"));
    }
    if rule.element.as_deref() == Some(GHOST_KIND) {
        return Err(Error::invalid_rule(
            &rule.id,
            "ghost atoms cannot be typed",
        ));
    }
    for check in &rule.checks {
        match check {
            Check::InRing(spec) | Check::BridgesRings(spec) if spec.size < 3 => {
                return Err(Error::invalid_rule(
                    &rule.id,
                    format!("ring size {} is below 3", spec.size),
                ));
            }
            Check::Carries { ids }
            | Check::FirstNeighborCarries { ids }
            | Check::NeighborCarries { ids, .. }
                if ids.is_empty() =>
            {
                return Err(Error::invalid_rule(
                    &rule.id,
                    "candidate check lists no identifiers",
                ));
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typer::rings::RingSpec;

    #[test]
    fn builtin_catalog_is_consistent() {
        let catalog = RuleCatalog::builtin();
        assert_eq!(catalog.len(), 22);
        assert!(catalog.warnings().is_empty(), "{:?}", catalog.warnings());
        assert_eq!(catalog.elements().collect::<Vec<_>>(), vec!["C", "H", "O"]);
        assert!(catalog.wildcard().is_empty());

        let carbon = catalog.bucket("C").unwrap();
        assert_eq!(carbon.degrees().collect::<Vec<_>>(), vec![3, 4]);
        assert!(carbon.degree(3).unwrap().iter().any(|id| id.as_str() == "145B"));
        assert!(carbon.degree(2).is_none());
    }

    #[test]
    fn builtin_rules_default_whitelist_to_own_id() {
        let rule = RuleCatalog::builtin().get("145B").unwrap();
        assert_eq!(rule.whitelist, vec![RuleId::from("145B")]);
        let black: Vec<&str> = rule.blacklist.iter().map(RuleId::as_str).collect();
        assert_eq!(black, vec!["141", "145"]);
        assert_eq!(rule.checks, vec![Check::BridgesRings(RingSpec::benzene())]);
    }

    #[test]
    fn numeric_ids_are_accepted() {
        let catalog = RuleCatalog::from_toml(
            r#"
            [[rule]]
            id = 500
            element = "N"
            degree = 3
            blacklist = [501]

            [[rule]]
            id = "501"
            element = "N"
            degree = 3
            "#,
        )
        .unwrap();
        assert!(catalog.get("500").is_some());
        assert!(catalog.warnings().is_empty());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = RuleCatalog::from_toml(
            r#"
            [[rule]]
            id = "1"
            element = "C"

            [[rule]]
            id = 1
            element = "H"
            "#,
        );
        assert!(matches!(result, Err(Error::DuplicateRule(id)) if id.as_str() == "1"));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            RuleCatalog::from_toml("not valid [[[ toml rules"),
            Err(Error::RuleParse(_))
        ));
        assert!(matches!(
            RuleCatalog::from_toml("[[rule]]\nid = \"1\"\nunknown = 3\n"),
            Err(Error::RuleParse(_))
        ));
    }

    #[test]
    fn invalid_rules_are_rejected() {
        let tiny_ring = Rule::new("x").with_check(Check::InRing(RingSpec::new(2)));
        assert!(matches!(
            RuleCatalog::new([tiny_ring]),
            Err(Error::InvalidRule { .. })
        ));

        let ghost = Rule::new("g").with_element(GHOST_KIND);
        assert!(matches!(
            RuleCatalog::new([ghost]),
            Err(Error::InvalidRule { .. })
        ));

        let empty = Rule::new("e").with_check(Check::Carries { ids: Vec::new() });
        assert!(matches!(
            RuleCatalog::new([empty]),
            Err(Error::InvalidRule { .. })
        ));
    }

    #[test]
    fn buckets_rules_by_element_and_degree() {
        let catalog = RuleCatalog::new([
            Rule::new("a").with_element("C").with_degree(4),
            Rule::new("b").with_element("C"),
            Rule::new("c"),
        ])
        .unwrap();
        let carbon = catalog.bucket("C").unwrap();
        assert_eq!(carbon.degree(4), Some(&[RuleId::from("a")][..]));
        assert_eq!(carbon.any_degree(), &[RuleId::from("b")]);
        assert_eq!(catalog.wildcard(), &[RuleId::from("c")]);
    }

    #[test]
    fn two_cycle_catalog_warns_at_build_time() {
        let catalog = RuleCatalog::new([
            Rule::new("A").with_element("C").with_degree(2).blacklisting(["B"]),
            Rule::new("B").with_element("C").with_degree(2).blacklisting(["A"]),
        ])
        .unwrap();
        assert!(
            catalog
                .warnings()
                .iter()
                .any(|w| matches!(w, Warning::CyclicPrecedence { .. }))
        );
    }
}
