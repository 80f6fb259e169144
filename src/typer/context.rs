use super::graph::AtomGraph;
use super::profile::{NeighborProfile, NeighborProfiles};
use super::rule::{Rule, RuleId};
use crate::model::compound::AtomId;
use std::collections::{BTreeSet, HashSet};

/// Accumulated whitelist and blacklist of one atom.
///
/// Both sets only grow during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSets {
    whitelist: BTreeSet<RuleId>,
    blacklist: BTreeSet<RuleId>,
}

impl CandidateSets {
    pub fn whitelist(&self) -> &BTreeSet<RuleId> {
        &self.whitelist
    }

    pub fn blacklist(&self) -> &BTreeSet<RuleId> {
        &self.blacklist
    }

    /// Combined cardinality of both sets.
    #[inline]
    pub fn len(&self) -> usize {
        self.whitelist.len() + self.blacklist.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.whitelist.is_empty() && self.blacklist.is_empty()
    }

    /// Whether `id` appears in either set.
    pub fn contains(&self, id: &RuleId) -> bool {
        self.whitelist.contains(id) || self.blacklist.contains(id)
    }

    /// Whitelist minus blacklist, in identifier order.
    pub fn candidates(&self) -> Vec<RuleId> {
        self.whitelist.difference(&self.blacklist).cloned().collect()
    }

    /// True when some of `ids` is whitelisted and not blacklisted.
    pub fn carries(&self, ids: &[RuleId]) -> bool {
        ids.iter()
            .any(|id| self.whitelist.contains(id) && !self.blacklist.contains(id))
    }

    /// Whether both sets are subsets of the corresponding sets of `other`.
    pub fn is_subset_of(&self, other: &CandidateSets) -> bool {
        self.whitelist.is_subset(&other.whitelist) && self.blacklist.is_subset(&other.blacklist)
    }

    fn record(&mut self, rule: &Rule) {
        self.whitelist.extend(rule.whitelist.iter().cloned());
        self.blacklist.extend(rule.blacklist.iter().cloned());
    }
}

/// Mutable state of one typing run over one graph.
///
/// Owns the neighbor-profile cache, the per-atom candidate sets, and the
/// record of atoms already reported as coverage gaps. A context is built
/// fresh for each run and dropped afterwards.
#[derive(Debug)]
pub struct TypingContext<'g, G: AtomGraph + ?Sized> {
    graph: &'g G,
    profiles: NeighborProfiles,
    states: Vec<CandidateSets>,
    gaps: HashSet<AtomId>,
}

impl<'g, G: AtomGraph + ?Sized> TypingContext<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        Self::resume(graph, vec![CandidateSets::default(); graph.atom_count()])
    }

    /// Starts a run from previously accumulated candidate sets.
    ///
    /// Missing trailing entries are filled with empty sets.
    pub fn resume(graph: &'g G, mut states: Vec<CandidateSets>) -> Self {
        states.resize(graph.atom_count(), CandidateSets::default());
        Self {
            graph,
            profiles: NeighborProfiles::default(),
            states,
            gaps: HashSet::new(),
        }
    }

    #[inline]
    pub fn graph(&self) -> &'g G {
        self.graph
    }

    pub fn profile(&mut self, atom: AtomId) -> &NeighborProfile {
        self.profiles.profile(self.graph, atom)
    }

    #[inline]
    pub fn state(&self, atom: AtomId) -> &CandidateSets {
        &self.states[atom]
    }

    #[inline]
    pub fn carries(&self, atom: AtomId, ids: &[RuleId]) -> bool {
        self.states[atom].carries(ids)
    }

    /// Records a fired rule's whitelist and blacklist on `atom`.
    pub fn apply(&mut self, atom: AtomId, rule: &Rule) {
        self.states[atom].record(rule);
    }

    /// Sum of whitelist and blacklist sizes over every atom.
    pub fn total_len(&self) -> usize {
        self.states.iter().map(CandidateSets::len).sum()
    }

    /// Marks `atom` as a coverage gap; true only the first time.
    pub fn note_gap(&mut self, atom: AtomId) -> bool {
        self.gaps.insert(atom)
    }

    pub fn into_states(self) -> Vec<CandidateSets> {
        self.states
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::compound::Compound;

    fn ids(list: &[&str]) -> Vec<RuleId> {
        list.iter().map(|&s| RuleId::from(s)).collect()
    }

    #[test]
    fn carries_requires_whitelisted_and_not_blacklisted() {
        let mut sets = CandidateSets::default();
        sets.record(&Rule::new("145").blacklisting(["141"]));
        sets.record(&Rule::new("141"));

        assert!(sets.carries(&ids(&["145"])));
        assert!(!sets.carries(&ids(&["141"])));
        assert!(sets.carries(&ids(&["141", "145"])));
        assert!(!sets.carries(&ids(&["146"])));
        assert_eq!(sets.candidates(), ids(&["145"]));
        assert_eq!(sets.len(), 3);
        assert!(sets.contains(&"141".into()));
    }

    #[test]
    fn subset_compares_both_sets() {
        let mut small = CandidateSets::default();
        small.record(&Rule::new("140"));
        let mut large = small.clone();
        large.record(&Rule::new("144").blacklisting(["140"]));

        assert!(small.is_subset_of(&large));
        assert!(!large.is_subset_of(&small));
        assert!(CandidateSets::default().is_subset_of(&small));
    }

    #[test]
    fn context_tracks_totals_and_gaps() {
        let atoms = vec![Atom::new("C", [0.0; 3]), Atom::new("Xe", [0.0; 3])];
        let c = Compound::from_parts("pair", atoms, [(0, 1)]).unwrap();
        let mut ctx = TypingContext::new(&c);
        assert_eq!(ctx.total_len(), 0);

        ctx.apply(0, &Rule::new("135").blacklisting(["136"]));
        assert_eq!(ctx.total_len(), 2);
        assert_eq!(ctx.profile(0).count("Xe"), 1);

        assert!(ctx.note_gap(1));
        assert!(!ctx.note_gap(1));

        let states = ctx.into_states();
        let resumed = TypingContext::resume(&c, states[..1].to_vec());
        assert_eq!(resumed.state(0), &states[0]);
        assert!(resumed.state(1).is_empty());
        assert_eq!(resumed.into_states(), states);
    }
}
