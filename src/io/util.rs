#[rustfmt::skip]
const ELEMENT_SYMBOLS: [&str; 118] = [
    "H", "He",
    "Li", "Be", "B", "C", "N", "O", "F", "Ne",
    "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar",
    "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn",
    "Ga", "Ge", "As", "Se", "Br", "Kr",
    "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd",
    "In", "Sn", "Sb", "Te", "I", "Xe",
    "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb", "Dy",
    "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt",
    "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At", "Rn",
    "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf",
    "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds",
    "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

fn lookup(candidate: &str) -> Option<&'static str> {
    ELEMENT_SYMBOLS
        .iter()
        .copied()
        .find(|s| s.eq_ignore_ascii_case(candidate))
}

/// Infers an element symbol from a MOL2 atom type (`C.ar`), an atom name
/// (`Cl3`, `H12`) or a bare symbol in any case.
///
/// Two-letter symbols win over one-letter ones, so `CA` reads as calcium.
pub fn guess_element_symbol(token: &str) -> Option<&'static str> {
    let head = token.split('.').next().unwrap_or_default();
    let letters: String = head
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();

    letters
        .get(..2)
        .and_then(lookup)
        .or_else(|| letters.get(..1).and_then(lookup))
}
