use super::atom::Atom;
use std::collections::BTreeMap;
use thiserror::Error;

pub type AtomId = usize;
pub type CompoundId = usize;

/// Id of the root node of every [`Compound`].
pub const ROOT: CompoundId = 0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("atom {0} does not exist in this compound")]
    UnknownAtom(AtomId),

    #[error("sub-compound {0} does not exist in this compound")]
    UnknownCompound(CompoundId),

    #[error("cannot bond atom {0} to itself")]
    SelfBond(AtomId),

    #[error("atoms {0} and {1} are already bonded")]
    DuplicateBond(AtomId, AtomId),

    #[error("label '{label}' already exists in sub-compound {compound}")]
    DuplicateLabel { compound: CompoundId, label: String },

    #[error("sub-compound {0} is not a port")]
    NotAPort(CompoundId),

    #[error("port {0} has no anchor atom")]
    MissingAnchor(CompoundId),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bond {
    pub i: AtomId,
    pub j: AtomId,
    pub kind: String,
}

impl Bond {
    pub fn new(idx1: AtomId, idx2: AtomId, kind: impl Into<String>) -> Self {
        let kind = kind.into();
        if idx1 <= idx2 {
            Self { i: idx1, j: idx2, kind }
        } else {
            Self { i: idx2, j: idx1, kind }
        }
    }

    pub fn other(&self, atom: AtomId) -> Option<AtomId> {
        if self.i == atom {
            Some(self.j)
        } else if self.j == atom {
            Some(self.i)
        } else {
            None
        }
    }
}

/// Something a compound node contains or labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    Atom(AtomId),
    Compound(CompoundId),
}

impl Part {
    fn shifted(self, atom_offset: usize, node_offset: usize) -> Self {
        match self {
            Part::Atom(id) => Part::Atom(id + atom_offset),
            Part::Compound(id) => Part::Compound(id + node_offset),
        }
    }
}

/// Connection point between fragments.
///
/// Both halves hold four ghost atoms (`middle`, `top`, `left`, `right`); `down`
/// is `up` rotated by π about z. Bonding two ports bonds their anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Port {
    pub anchor: Option<AtomId>,
    pub up: CompoundId,
    pub down: CompoundId,
}

const PORT_GHOSTS: [(&str, [f64; 3]); 4] = [
    ("middle", [0.0, 0.0, 0.0]),
    ("top", [0.0, 0.02, 0.0]),
    ("left", [-0.02, -0.01, 0.0]),
    ("right", [0.0, -0.02, 0.01]),
];

#[derive(Debug, Clone)]
struct Node {
    kind: String,
    parent: Option<CompoundId>,
    parts: Vec<Part>,
    labels: BTreeMap<String, Part>,
    groups: BTreeMap<String, Vec<Part>>,
    port: Option<Port>,
}

impl Node {
    fn new(kind: impl Into<String>, parent: Option<CompoundId>) -> Self {
        Self {
            kind: kind.into(),
            parent,
            parts: Vec::new(),
            labels: BTreeMap::new(),
            groups: BTreeMap::new(),
            port: None,
        }
    }
}

/// Hierarchical molecular structure.
///
/// Atoms and bonds live in flat arenas indexed by [`AtomId`]; sub-compounds
/// form a containment tree rooted at [`ROOT`]. Parts are kept in insertion
/// order so atom enumeration is stable. Labels ending in `[$]` are numbered
/// automatically (`"C[$]"` becomes `"C[0]"`, `"C[1]"`, ...) and collected into
/// a group under the bare name.
#[derive(Debug, Clone)]
pub struct Compound {
    /// Atoms may be edited in place; grow the arena with `add_atom`.
    pub atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    adjacency: Vec<Vec<AtomId>>,
    nodes: Vec<Node>,
}

impl Default for Compound {
    fn default() -> Self {
        Self::new("Compound")
    }
}

impl Compound {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            atoms: Vec::new(),
            bonds: Vec::new(),
            adjacency: Vec::new(),
            nodes: vec![Node::new(kind, None)],
        }
    }

    /// Builds a flat compound from atoms and index pairs.
    pub fn from_parts(
        kind: impl Into<String>,
        atoms: Vec<Atom>,
        bonds: impl IntoIterator<Item = (AtomId, AtomId)>,
    ) -> Result<Self, Error> {
        let mut compound = Self::new(kind);
        for atom in atoms {
            compound.add_atom(ROOT, atom, None)?;
        }
        for (i, j) in bonds {
            compound.add_bond(i, j)?;
        }
        Ok(compound)
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    /// Bonds in insertion order. Use [`add_bond`](Self::add_bond) to add one.
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn kind(&self, compound: CompoundId) -> Option<&str> {
        self.nodes.get(compound).map(|n| n.kind.as_str())
    }

    pub fn parent(&self, compound: CompoundId) -> Option<CompoundId> {
        self.nodes.get(compound).and_then(|n| n.parent)
    }

    pub fn parts(&self, compound: CompoundId) -> &[Part] {
        self.nodes
            .get(compound)
            .map(|n| n.parts.as_slice())
            .unwrap_or(&[])
    }

    pub fn label(&self, compound: CompoundId, label: &str) -> Option<Part> {
        self.nodes.get(compound)?.labels.get(label).copied()
    }

    pub fn group(&self, compound: CompoundId, label: &str) -> &[Part] {
        self.nodes
            .get(compound)
            .and_then(|n| n.groups.get(label))
            .map(|g| g.as_slice())
            .unwrap_or(&[])
    }

    pub fn port(&self, compound: CompoundId) -> Option<&Port> {
        self.nodes.get(compound)?.port.as_ref()
    }

    pub fn neighbors(&self, atom: AtomId) -> &[AtomId] {
        self.adjacency
            .get(atom)
            .map(|n| n.as_slice())
            .unwrap_or(&[])
    }

    pub fn add_compound(
        &mut self,
        parent: CompoundId,
        kind: impl Into<String>,
        label: Option<&str>,
    ) -> Result<CompoundId, Error> {
        self.check_compound(parent)?;
        self.check_label(parent, label)?;

        let id = self.nodes.len();
        self.nodes.push(Node::new(kind, Some(parent)));
        self.attach(parent, Part::Compound(id), label);
        Ok(id)
    }

    pub fn add_atom(
        &mut self,
        parent: CompoundId,
        atom: Atom,
        label: Option<&str>,
    ) -> Result<AtomId, Error> {
        self.check_compound(parent)?;
        self.check_label(parent, label)?;

        let id = self.atoms.len();
        self.atoms.push(atom);
        self.adjacency.push(Vec::new());
        self.attach(parent, Part::Atom(id), label);
        Ok(id)
    }

    /// Bonds two atoms; the bond kind is `"<kind i>-<kind j>"`.
    pub fn add_bond(&mut self, i: AtomId, j: AtomId) -> Result<(), Error> {
        self.check_atom(i)?;
        self.check_atom(j)?;
        if i == j {
            return Err(Error::SelfBond(i));
        }
        if self.adjacency[i].contains(&j) {
            return Err(Error::DuplicateBond(i.min(j), i.max(j)));
        }

        let kind = format!("{}-{}", self.atoms[i].kind, self.atoms[j].kind);
        self.bonds.push(Bond::new(i, j, kind));
        self.adjacency[i].push(j);
        self.adjacency[j].push(i);
        Ok(())
    }

    /// Adds a port of eight ghost atoms beneath `parent`.
    pub fn add_port(
        &mut self,
        parent: CompoundId,
        anchor: Option<AtomId>,
        label: Option<&str>,
    ) -> Result<CompoundId, Error> {
        if let Some(a) = anchor {
            self.check_atom(a)?;
        }
        let port = self.add_compound(parent, "Port", label)?;
        let up = self.add_compound(port, "Compound", Some("up"))?;
        let down = self.add_compound(port, "Compound", Some("down"))?;

        for (name, [x, y, z]) in PORT_GHOSTS {
            self.add_atom(up, Atom::ghost([x, y, z]), Some(name))?;
            self.add_atom(down, Atom::ghost([-x, -y, z]), Some(name))?;
        }

        self.nodes[port].port = Some(Port { anchor, up, down });
        Ok(port)
    }

    /// Bonds the anchors of two ports.
    pub fn bond_ports(&mut self, a: CompoundId, b: CompoundId) -> Result<(), Error> {
        let anchor_a = self.port_anchor(a)?;
        let anchor_b = self.port_anchor(b)?;
        self.add_bond(anchor_a, anchor_b)
    }

    fn port_anchor(&self, port: CompoundId) -> Result<AtomId, Error> {
        self.check_compound(port)?;
        let port_data = self.nodes[port].port.ok_or(Error::NotAPort(port))?;
        port_data.anchor.ok_or(Error::MissingAnchor(port))
    }

    /// Copies `other` beneath `parent` and returns the id of its new root node.
    pub fn merge(
        &mut self,
        parent: CompoundId,
        other: &Compound,
        label: Option<&str>,
    ) -> Result<CompoundId, Error> {
        self.check_compound(parent)?;
        self.check_label(parent, label)?;

        let atom_offset = self.atoms.len();
        let node_offset = self.nodes.len();

        self.atoms.extend(other.atoms.iter().cloned());
        self.adjacency.extend(
            other
                .adjacency
                .iter()
                .map(|ns| ns.iter().map(|n| n + atom_offset).collect()),
        );
        self.bonds.extend(other.bonds.iter().map(|b| Bond {
            i: b.i + atom_offset,
            j: b.j + atom_offset,
            kind: b.kind.clone(),
        }));

        for node in &other.nodes {
            let shift = |p: &Part| p.shifted(atom_offset, node_offset);
            self.nodes.push(Node {
                kind: node.kind.clone(),
                parent: node.parent.map(|p| p + node_offset).or(Some(parent)),
                parts: node.parts.iter().map(shift).collect(),
                labels: node
                    .labels
                    .iter()
                    .map(|(k, p)| (k.clone(), shift(p)))
                    .collect(),
                groups: node
                    .groups
                    .iter()
                    .map(|(k, ps)| (k.clone(), ps.iter().map(shift).collect()))
                    .collect(),
                port: node.port.map(|p| Port {
                    anchor: p.anchor.map(|a| a + atom_offset),
                    up: p.up + node_offset,
                    down: p.down + node_offset,
                }),
            });
        }

        let root = node_offset;
        self.attach(parent, Part::Compound(root), label);
        Ok(root)
    }

    /// Atoms contained in `compound` and its descendants, in insertion order.
    pub fn atoms_in(&self, compound: CompoundId, exclude_ghosts: bool) -> Vec<AtomId> {
        let mut out = Vec::new();
        self.collect_atoms(compound, exclude_ghosts, &mut out);
        out
    }

    /// All non-ghost atoms of the whole hierarchy.
    pub fn real_atoms(&self) -> Vec<AtomId> {
        self.atoms_in(ROOT, true)
    }

    fn collect_atoms(&self, compound: CompoundId, exclude_ghosts: bool, out: &mut Vec<AtomId>) {
        let Some(node) = self.nodes.get(compound) else {
            return;
        };
        for part in &node.parts {
            match *part {
                Part::Atom(id) => {
                    if !(exclude_ghosts && self.atoms[id].is_ghost()) {
                        out.push(id);
                    }
                }
                Part::Compound(child) => self.collect_atoms(child, exclude_ghosts, out),
            }
        }
    }

    pub fn translate(&mut self, compound: CompoundId, by: [f64; 3]) {
        for id in self.atoms_in(compound, false) {
            let p = &mut self.atoms[id].position;
            p[0] += by[0];
            p[1] += by[1];
            p[2] += by[2];
        }
    }

    fn check_atom(&self, atom: AtomId) -> Result<(), Error> {
        if atom < self.atoms.len() {
            Ok(())
        } else {
            Err(Error::UnknownAtom(atom))
        }
    }

    fn check_compound(&self, compound: CompoundId) -> Result<(), Error> {
        if compound < self.nodes.len() {
            Ok(())
        } else {
            Err(Error::UnknownCompound(compound))
        }
    }

    fn check_label(&self, compound: CompoundId, label: Option<&str>) -> Result<(), Error> {
        let Some(label) = label else {
            return Ok(());
        };
        let resolved = self.resolve_label(compound, label);
        if self.nodes[compound].labels.contains_key(&resolved) {
            return Err(Error::DuplicateLabel {
                compound,
                label: resolved,
            });
        }
        Ok(())
    }

    fn resolve_label(&self, compound: CompoundId, label: &str) -> String {
        match label.strip_suffix("[$]") {
            Some(base) => {
                let n = self.nodes[compound].groups.get(base).map_or(0, Vec::len);
                format!("{base}[{n}]")
            }
            None => label.to_string(),
        }
    }

    fn attach(&mut self, parent: CompoundId, part: Part, label: Option<&str>) {
        let resolved = label.map(|l| self.resolve_label(parent, l));
        let node = &mut self.nodes[parent];
        node.parts.push(part);
        if let (Some(label), Some(resolved)) = (label, resolved) {
            if let Some(base) = label.strip_suffix("[$]") {
                node.groups.entry(base.to_string()).or_default().push(part);
            }
            node.labels.insert(resolved, part);
        }
    }
}
