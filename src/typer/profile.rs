use super::graph::AtomGraph;
use crate::model::compound::AtomId;
use std::collections::{BTreeMap, HashMap};

/// Count of bonded neighbors per element label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeighborProfile {
    counts: BTreeMap<String, usize>,
}

impl NeighborProfile {
    pub fn of<G: AtomGraph + ?Sized>(graph: &G, atom: AtomId) -> Self {
        let mut counts = BTreeMap::new();
        for &n in graph.neighbors(atom) {
            *counts.entry(graph.kind(n).to_string()).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Number of neighbors of `kind`; absent kinds count zero.
    #[inline]
    pub fn count(&self, kind: &str) -> usize {
        self.counts.get(kind).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }
}

/// Per-run memo of [`NeighborProfile`]s keyed by atom id.
///
/// Assumes the bond graph does not change while the cache is alive.
#[derive(Debug, Default)]
pub struct NeighborProfiles {
    cache: HashMap<AtomId, NeighborProfile>,
}

impl NeighborProfiles {
    pub fn profile<G: AtomGraph + ?Sized>(&mut self, graph: &G, atom: AtomId) -> &NeighborProfile {
        self.cache
            .entry(atom)
            .or_insert_with(|| NeighborProfile::of(graph, atom))
    }
}
