//! Static consistency check of blacklist precedence.
//!
//! Rules that can fire on the same local pattern must agree on a single
//! winner. For every pattern key matched by more than one rule, the blacklist
//! edges among exactly those rules must form a weakly connected DAG with one
//! sink.

use super::report::Warning;
use super::rule::{Constraint, Rule, RuleId};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

/// An element together with a sorted multiset of neighbor elements.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PatternKey {
    pub element: String,
    pub neighbors: Vec<String>,
}

impl fmt::Display for PatternKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.element, self.neighbors.join(","))
    }
}

/// All sorted multisets of `len` items drawn from `pool`.
///
/// `pool` must be sorted and free of duplicates for the output to be sorted.
pub(crate) fn combinations_with_replacement(pool: &[String], len: usize) -> Vec<Vec<String>> {
    fn extend(
        pool: &[String],
        from: usize,
        len: usize,
        current: &mut Vec<String>,
        out: &mut Vec<Vec<String>>,
    ) {
        if current.len() == len {
            out.push(current.clone());
            return;
        }
        for i in from..pool.len() {
            current.push(pool[i].clone());
            extend(pool, i, len, current, out);
            current.pop();
        }
    }

    let mut out = Vec::new();
    extend(pool, 0, len, &mut Vec::with_capacity(len), &mut out);
    out
}

/// Groups rules by every pattern key they can match.
pub(crate) fn pattern_groups(rules: &BTreeMap<RuleId, Rule>) -> BTreeMap<PatternKey, BTreeSet<RuleId>> {
    let declared: BTreeSet<&str> = rules.values().filter_map(|r| r.element.as_deref()).collect();

    // Kinds constrained as neighbors need not have rules of their own.
    let neighbor_pool: Vec<String> = rules
        .values()
        .flat_map(|r| r.neighbors.iter().map(Constraint::kind))
        .chain(declared.iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut degrees: BTreeMap<&str, BTreeSet<usize>> = BTreeMap::new();
    for rule in rules.values() {
        if let (Some(element), Some(degree)) = (rule.element.as_deref(), rule.degree) {
            degrees.entry(element).or_default().insert(degree);
        }
    }

    let mut groups: BTreeMap<PatternKey, BTreeSet<RuleId>> = BTreeMap::new();
    for rule in rules.values() {
        let elements: Vec<&str> = match rule.element.as_deref() {
            Some(e) => vec![e],
            None => declared.iter().copied().collect(),
        };
        for element in elements {
            let element_degrees: Vec<usize> = match rule.degree {
                Some(d) => vec![d],
                None => degrees
                    .get(element)
                    .map(|set| set.iter().copied().collect())
                    .unwrap_or_default(),
            };
            for degree in element_degrees {
                for pattern in combinations_with_replacement(&neighbor_pool, degree) {
                    if rule.admits_pattern(&pattern) {
                        let key = PatternKey {
                            element: element.to_string(),
                            neighbors: pattern,
                        };
                        groups.entry(key).or_default().insert(rule.id.clone());
                    }
                }
            }
        }
    }
    groups
}

/// Runs every precedence check over a catalog's rules.
pub fn validate(rules: &BTreeMap<RuleId, Rule>) -> Vec<Warning> {
    let mut warnings = Vec::new();

    for rule in rules.values() {
        for target in &rule.blacklist {
            if !rules.contains_key(target) {
                warnings.push(Warning::UnknownBlacklistTarget {
                    rule: rule.id.clone(),
                    target: target.clone(),
                });
            }
        }
    }

    for (pattern, members) in pattern_groups(rules) {
        if members.len() > 1 {
            check_group(&pattern, &members, rules, &mut warnings);
        }
    }
    warnings
}

fn check_group(
    pattern: &PatternKey,
    members: &BTreeSet<RuleId>,
    rules: &BTreeMap<RuleId, Rule>,
    warnings: &mut Vec<Warning>,
) {
    let nodes: Vec<&RuleId> = members.iter().collect();
    let index: BTreeMap<&RuleId, usize> = nodes.iter().enumerate().map(|(i, &id)| (id, i)).collect();

    // Edges point from a rule to the rules it blacklists.
    let mut out_edges: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for (from, id) in nodes.iter().enumerate() {
        for target in &rules[*id].blacklist {
            if let Some(&to) = index.get(target) {
                if to != from && !out_edges[from].contains(&to) {
                    out_edges[from].push(to);
                }
            }
        }
    }

    let rule_list = || nodes.iter().map(|&id| id.clone()).collect::<Vec<_>>();

    if !is_weakly_connected(&out_edges) {
        warnings.push(Warning::DisconnectedPrecedence {
            pattern: pattern.clone(),
            rules: rule_list(),
        });
    }

    if !is_acyclic(&out_edges) {
        warnings.push(Warning::CyclicPrecedence {
            pattern: pattern.clone(),
            rules: rule_list(),
        });
    }

    let sinks: Vec<RuleId> = out_edges
        .iter()
        .enumerate()
        .filter(|(_, edges)| edges.is_empty())
        .map(|(i, _)| nodes[i].clone())
        .collect();
    if sinks.len() > 1 {
        warnings.push(Warning::MultipleSinks {
            pattern: pattern.clone(),
            sinks,
        });
    }
}

fn is_weakly_connected(out_edges: &[Vec<usize>]) -> bool {
    let n = out_edges.len();
    if n == 0 {
        return true;
    }
    let mut undirected: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (from, targets) in out_edges.iter().enumerate() {
        for &to in targets {
            undirected[from].push(to);
            undirected[to].push(from);
        }
    }

    let mut seen = vec![false; n];
    let mut queue = VecDeque::from([0]);
    seen[0] = true;
    while let Some(node) = queue.pop_front() {
        for &next in &undirected[node] {
            if !seen[next] {
                seen[next] = true;
                queue.push_back(next);
            }
        }
    }
    seen.into_iter().all(|s| s)
}

fn is_acyclic(out_edges: &[Vec<usize>]) -> bool {
    let n = out_edges.len();
    let mut in_degree = vec![0usize; n];
    for targets in out_edges {
        for &to in targets {
            in_degree[to] += 1;
        }
    }

    let mut queue: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut visited = 0;
    while let Some(node) = queue.pop_front() {
        visited += 1;
        for &to in &out_edges[node] {
            in_degree[to] -= 1;
            if in_degree[to] == 0 {
                queue.push_back(to);
            }
        }
    }
    visited == n
}
