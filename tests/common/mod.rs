#![allow(dead_code)]

use opls_forge::{Atom, Compound, Typer, TyperConfig, TypingReport};

/// Builds a molecule from a heavy-atom skeleton, appending `hydrogens[i]`
/// hydrogens to heavy atom `i`. Heavy atoms keep ids `0..heavy.len()`.
pub fn molecule(
    name: &str,
    heavy: &[&str],
    bonds: &[(usize, usize)],
    hydrogens: &[usize],
) -> Compound {
    let atoms = heavy.iter().map(|&kind| Atom::new(kind, [0.0; 3])).collect();
    let mut compound = Compound::from_parts(name, atoms, bonds.iter().copied()).unwrap();
    for (parent, &count) in hydrogens.iter().enumerate() {
        for _ in 0..count {
            let h = compound
                .add_atom(opls_forge::ROOT, Atom::new("H", [0.0; 3]), None)
                .unwrap();
            compound.add_bond(parent, h).unwrap();
        }
    }
    compound
}

/// Bonds of a six-membered ring over `first..first + 6`.
pub fn ring6(first: usize) -> Vec<(usize, usize)> {
    (0..6).map(|i| (first + i, first + (i + 1) % 6)).collect()
}

pub fn methane() -> Compound {
    molecule("methane", &["C"], &[], &[4])
}

pub fn ethane() -> Compound {
    molecule("ethane", &["C", "C"], &[(0, 1)], &[3, 3])
}

pub fn propane() -> Compound {
    molecule("propane", &["C", "C", "C"], &[(0, 1), (1, 2)], &[3, 2, 3])
}

/// Central CH is atom 0.
pub fn isobutane() -> Compound {
    molecule(
        "isobutane",
        &["C", "C", "C", "C"],
        &[(0, 1), (0, 2), (0, 3)],
        &[1, 3, 3, 3],
    )
}

/// Quaternary carbon is atom 0.
pub fn neopentane() -> Compound {
    molecule(
        "neopentane",
        &["C"; 5],
        &[(0, 1), (0, 2), (0, 3), (0, 4)],
        &[0, 3, 3, 3, 3],
    )
}

/// CH2=CH-CH3 as atoms 0, 1, 2.
pub fn propene() -> Compound {
    molecule("propene", &["C", "C", "C"], &[(0, 1), (1, 2)], &[2, 1, 3])
}

pub fn benzene() -> Compound {
    molecule("benzene", &["C"; 6], &ring6(0), &[1; 6])
}

/// Ring atoms 0..6 with the ipso carbon at 0; methyl carbon is atom 6.
pub fn toluene() -> Compound {
    let mut bonds = ring6(0);
    bonds.push((0, 6));
    molecule("toluene", &["C"; 7], &bonds, &[0, 1, 1, 1, 1, 1, 3])
}

/// Ring atoms 0..6, CH2 at 6, CH3 at 7.
pub fn ethylbenzene() -> Compound {
    let mut bonds = ring6(0);
    bonds.extend([(0, 6), (6, 7)]);
    molecule("ethylbenzene", &["C"; 8], &bonds, &[0, 1, 1, 1, 1, 1, 2, 3])
}

/// Rings over 0..6 and 6..12, bridged by atoms 0 and 6.
pub fn biphenyl() -> Compound {
    let mut bonds = ring6(0);
    bonds.extend(ring6(6));
    bonds.push((0, 6));
    let mut hydrogens = vec![1; 12];
    hydrogens[0] = 0;
    hydrogens[6] = 0;
    molecule("biphenyl", &["C"; 12], &bonds, &hydrogens)
}

/// Ring atoms 0..6 (ipso 0), CH2 at 6, O at 7.
pub fn benzyl_alcohol() -> Compound {
    let mut heavy = vec!["C"; 7];
    heavy.push("O");
    let mut bonds = ring6(0);
    bonds.extend([(0, 6), (6, 7)]);
    molecule("benzyl alcohol", &heavy, &bonds, &[0, 1, 1, 1, 1, 1, 2, 1])
}

/// Ring atoms 0..6 (ipso 0), carbonyl C at 6, O at 7.
pub fn benzaldehyde() -> Compound {
    let mut heavy = vec!["C"; 7];
    heavy.push("O");
    let mut bonds = ring6(0);
    bonds.extend([(0, 6), (6, 7)]);
    molecule("benzaldehyde", &heavy, &bonds, &[0, 1, 1, 1, 1, 1, 1, 0])
}

/// CH3 at 0, CH2 at 1, O at 2.
pub fn ethanol() -> Compound {
    molecule("ethanol", &["C", "C", "O"], &[(0, 1), (1, 2)], &[3, 2, 1])
}

pub fn type_with_defaults(compound: &mut Compound) -> TypingReport {
    Typer::new(&TyperConfig::default()).unwrap().run(compound)
}

/// Type of the first hydrogen bonded to `parent`.
pub fn hydrogen_type<'r>(
    compound: &Compound,
    report: &'r TypingReport,
    parent: usize,
) -> Option<&'r str> {
    let h = compound
        .neighbors(parent)
        .iter()
        .copied()
        .find(|&n| compound.atoms[n].kind == "H")?;
    report.type_of(h)
}
