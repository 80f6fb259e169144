use crate::model::atom::GHOST_KIND;
use crate::model::compound::{AtomId, Compound};

/// Read-only view of a molecular graph consumed by the typing engine.
///
/// Atom ids are dense in `0..atom_count()`. Neighbor order is the order in
/// which bonds were added and is otherwise insignificant.
pub trait AtomGraph {
    fn atom_count(&self) -> usize;

    /// Element label of an atom, or [`GHOST_KIND`] for port placeholders.
    fn kind(&self, atom: AtomId) -> &str;

    fn neighbors(&self, atom: AtomId) -> &[AtomId];

    #[inline]
    fn degree(&self, atom: AtomId) -> usize {
        self.neighbors(atom).len()
    }

    #[inline]
    fn is_ghost(&self, atom: AtomId) -> bool {
        self.kind(atom) == GHOST_KIND
    }
}

impl AtomGraph for Compound {
    #[inline]
    fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    fn kind(&self, atom: AtomId) -> &str {
        &self.atoms[atom].kind
    }

    #[inline]
    fn neighbors(&self, atom: AtomId) -> &[AtomId] {
        Compound::neighbors(self, atom)
    }
}
