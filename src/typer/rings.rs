//! Bounded ring search over the bond graph.
//!
//! [`find_rings`] enumerates every simple cycle of one exact length that
//! passes through a start atom. The search never explores paths longer than
//! the requested length, so larger rings are invisible to it. Each ring is
//! found once per traversal direction, i.e. twice.

use super::graph::AtomGraph;
use crate::model::compound::AtomId;
use serde::Deserialize;

/// Shape of the ring a structural check asks for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RingSpec {
    pub size: usize,
    /// Required kind of every ring member.
    #[serde(default)]
    pub kind: Option<String>,
    /// Required neighbor count of every ring member.
    #[serde(default)]
    pub degree: Option<usize>,
}

impl RingSpec {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            kind: None,
            degree: None,
        }
    }

    /// Six-membered ring of three-connected carbons.
    pub fn benzene() -> Self {
        Self {
            size: 6,
            kind: Some("C".to_string()),
            degree: Some(3),
        }
    }

    fn admits<G: AtomGraph + ?Sized>(&self, graph: &G, atom: AtomId) -> bool {
        self.kind.as_deref().is_none_or(|k| graph.kind(atom) == k)
            && self.degree.is_none_or(|d| graph.degree(atom) == d)
    }
}

/// Returns every closed path of exactly `target_length` atoms starting at `start`.
///
/// Each path begins with `start`; the closing bond back to `start` is implied.
pub fn find_rings<G: AtomGraph + ?Sized>(
    graph: &G,
    start: AtomId,
    target_length: usize,
) -> Vec<Vec<AtomId>> {
    let mut rings = Vec::new();
    let mut path = vec![start];
    step(graph, &mut path, target_length, &mut rings);
    rings
}

fn step<G: AtomGraph + ?Sized>(
    graph: &G,
    path: &mut Vec<AtomId>,
    target_length: usize,
    rings: &mut Vec<Vec<AtomId>>,
) {
    let Some(&atom) = path.last() else {
        return;
    };
    let neighbors = graph.neighbors(atom);
    // Dead end.
    if neighbors.len() < 2 {
        return;
    }

    for &n in neighbors {
        let len = path.len();
        if len > 2 && n == path[0] {
            if len == target_length {
                rings.push(path.clone());
            }
        } else if path.contains(&n) {
            continue;
        } else if len < target_length {
            path.push(n);
            step(graph, path, target_length, rings);
            path.pop();
        }
    }
}

/// The ring through `start` when it lies in exactly one ring of `spec.size`
/// and every member satisfies `spec`.
pub fn single_ring<G: AtomGraph + ?Sized>(
    graph: &G,
    start: AtomId,
    spec: &RingSpec,
) -> Option<Vec<AtomId>> {
    let mut rings = find_rings(graph, start, spec.size);
    // One ring, seen from both directions.
    if rings.len() != 2 {
        return None;
    }
    let ring = rings.swap_remove(0);
    ring.iter()
        .all(|&a| spec.admits(graph, a))
        .then_some(ring)
}

/// True when `start` sits in a qualifying ring and one of its neighbors
/// outside that ring sits in another (the biphenyl bridge).
pub fn bridges_rings<G: AtomGraph + ?Sized>(graph: &G, start: AtomId, spec: &RingSpec) -> bool {
    let Some(ring) = single_ring(graph, start, spec) else {
        return false;
    };
    graph
        .neighbors(start)
        .iter()
        .filter(|&&n| !ring.contains(&n))
        .any(|&n| single_ring(graph, n, spec).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::compound::Compound;

    fn ring_of(kind: &str, size: usize) -> Compound {
        let atoms = (0..size).map(|_| Atom::new(kind, [0.0; 3])).collect();
        Compound::from_parts("ring", atoms, (0..size).map(|i| (i, (i + 1) % size))).unwrap()
    }

    fn benzene_ring() -> Compound {
        let mut c = ring_of("C", 6);
        for i in 0..6 {
            let h = c
                .add_atom(crate::model::compound::ROOT, Atom::new("H", [0.0; 3]), None)
                .unwrap();
            c.add_bond(i, h).unwrap();
        }
        c
    }

    fn canonical(ring: &[AtomId]) -> Vec<AtomId> {
        let mut sorted = ring.to_vec();
        sorted.sort_unstable();
        sorted
    }

    #[test]
    fn finds_each_ring_twice_in_opposite_directions() {
        let c = ring_of("C", 6);
        let rings = find_rings(&c, 0, 6);
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0][0], 0);
        assert_eq!(rings[1][0], 0);

        let mut reversed = rings[1][1..].to_vec();
        reversed.reverse();
        assert_eq!(rings[0][1..], reversed[..]);
        assert_eq!(canonical(&rings[0]), canonical(&rings[1]));
    }

    #[test]
    fn ignores_rings_of_other_lengths() {
        let c = ring_of("C", 5);
        assert!(find_rings(&c, 0, 6).is_empty());
        assert!(find_rings(&c, 0, 4).is_empty());
        assert_eq!(find_rings(&c, 0, 5).len(), 2);
    }

    #[test]
    fn dead_end_start_has_no_rings() {
        let c = benzene_ring();
        // Hydrogen 6 hangs off carbon 0.
        assert!(find_rings(&c, 6, 6).is_empty());
        assert_eq!(find_rings(&c, 0, 6).len(), 2);
    }

    #[test]
    fn chains_have_no_rings() {
        let atoms = (0..6).map(|_| Atom::new("C", [0.0; 3])).collect();
        let chain = Compound::from_parts("hexane", atoms, (0..5).map(|i| (i, i + 1))).unwrap();
        for start in 0..6 {
            assert!(find_rings(&chain, start, 6).is_empty());
        }
    }

    #[test]
    fn fused_rings_report_more_than_one_ring() {
        // Naphthalene skeleton: two six-rings sharing the 0-5 edge.
        let atoms = (0..10).map(|_| Atom::new("C", [0.0; 3])).collect();
        #[rustfmt::skip]
        let bonds = [
            (0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0),
            (5, 6), (6, 7), (7, 8), (8, 9), (9, 0),
        ];
        let c = Compound::from_parts("naphthalene", atoms, bonds).unwrap();
        assert_eq!(find_rings(&c, 0, 6).len(), 4);
        assert_eq!(find_rings(&c, 2, 6).len(), 2);
        assert!(single_ring(&c, 0, &RingSpec::new(6)).is_none());
    }

    #[test]
    fn single_ring_checks_member_shape() {
        let c = benzene_ring();
        let ring = single_ring(&c, 3, &RingSpec::benzene()).unwrap();
        assert_eq!(canonical(&ring), vec![0, 1, 2, 3, 4, 5]);

        let bare = ring_of("C", 6);
        assert!(single_ring(&bare, 0, &RingSpec::benzene()).is_none());
        assert!(single_ring(&bare, 0, &RingSpec::new(6)).is_some());

        let wrong_kind = RingSpec {
            kind: Some("N".into()),
            ..RingSpec::benzene()
        };
        assert!(single_ring(&c, 0, &wrong_kind).is_none());
    }

    #[test]
    fn bridges_rings_detects_biphenyl_link() {
        let root = crate::model::compound::ROOT;
        let mut biphenyl = Compound::new("biphenyl");
        for _ in 0..12 {
            biphenyl.add_atom(root, Atom::new("C", [0.0; 3]), None).unwrap();
        }
        for base in [0, 6] {
            for i in 0..6 {
                biphenyl.add_bond(base + i, base + (i + 1) % 6).unwrap();
            }
        }
        biphenyl.add_bond(0, 6).unwrap();
        for atom in (1..6).chain(7..12) {
            let h = biphenyl.add_atom(root, Atom::new("H", [0.0; 3]), None).unwrap();
            biphenyl.add_bond(atom, h).unwrap();
        }

        let spec = RingSpec::benzene();
        assert!(bridges_rings(&biphenyl, 0, &spec));
        assert!(bridges_rings(&biphenyl, 6, &spec));
        assert!(!bridges_rings(&biphenyl, 1, &spec));

        assert!(!bridges_rings(&benzene_ring(), 0, &spec));
    }
}
