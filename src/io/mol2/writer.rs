use crate::io::error::Error;
use crate::model::compound::{Compound, ROOT};
use crate::typer::OPLS_TYPE_KEY;
use std::collections::HashMap;
use std::io::Write;

pub fn write<W: Write>(mut writer: W, compound: &Compound) -> Result<(), Error> {
    let real = compound.real_atoms();
    let index: HashMap<usize, usize> = real.iter().enumerate().map(|(i, &a)| (a, i + 1)).collect();
    let bonds: Vec<(usize, usize)> = compound
        .bonds()
        .iter()
        .filter_map(|b| Some((*index.get(&b.i)?, *index.get(&b.j)?)))
        .collect();

    writeln!(writer, "@<TRIPOS>MOLECULE")?;
    writeln!(writer, "{}", compound.kind(ROOT).unwrap_or("OPLS-FORGE"))?;
    writeln!(writer, "{:>5} {:>5} 0 0 0", real.len(), bonds.len())?;
    writeln!(writer, "SMALL")?;
    writeln!(writer, "USER_CHARGES")?;
    writeln!(writer, "****")?;
    writeln!(writer)?;

    writeln!(writer, "@<TRIPOS>ATOM")?;
    for (i, &atom_id) in real.iter().enumerate() {
        let atom = &compound.atoms[atom_id];
        let name = format!("{}{}", atom.kind, i + 1);
        let atom_type = atom
            .extra(OPLS_TYPE_KEY)
            .map(ToString::to_string)
            .unwrap_or_else(|| atom.kind.clone());
        writeln!(
            writer,
            "{:>7} {:<8} {:>10.4} {:>10.4} {:>10.4} {:<6} {:>3} {:<8} {:>8.4}",
            i + 1,
            name,
            atom.position[0],
            atom.position[1],
            atom.position[2],
            atom_type,
            1,
            "MOL",
            atom.charge
        )?;
    }

    writeln!(writer, "@<TRIPOS>BOND")?;
    for (n, (i, j)) in bonds.iter().enumerate() {
        writeln!(writer, "{:>7} {:>4} {:>4} un", n + 1, i, j)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::{Atom, AttrValue};

    #[test]
    fn writes_opls_types_and_skips_ghosts() {
        let atoms = vec![Atom::new("O", [0.0; 3]), Atom::new("H", [0.96, 0.0, 0.0])];
        let mut c = Compound::from_parts("water", atoms, [(0, 1)]).unwrap();
        c.add_port(ROOT, Some(0), None).unwrap();
        c.atoms[1].set_extra(OPLS_TYPE_KEY, AttrValue::Text("155".into()));

        let mut out = Vec::new();
        write(&mut out, &c).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("@<TRIPOS>MOLECULE\nwater\n    2     1 0 0 0\n"));
        let atom_lines: Vec<&str> = text
            .lines()
            .skip_while(|l| *l != "@<TRIPOS>ATOM")
            .skip(1)
            .take_while(|l| !l.starts_with('@'))
            .collect();
        assert_eq!(atom_lines.len(), 2);
        assert_eq!(atom_lines[0].split_whitespace().nth(5), Some("O"));
        assert_eq!(atom_lines[1].split_whitespace().nth(5), Some("155"));
        assert!(text.ends_with("@<TRIPOS>BOND\n      1    1    2 un\n"));
    }

    #[test]
    fn output_reads_back() {
        let atoms = vec![
            Atom::new("C", [0.0; 3]),
            Atom::new("Cl", [1.77, 0.0, 0.0]),
        ];
        let mut c = Compound::from_parts("CCl", atoms, [(0, 1)]).unwrap();
        c.atoms[0].set_extra(OPLS_TYPE_KEY, AttrValue::Text("XXX".into()));

        let mut out = Vec::new();
        write(&mut out, &c).unwrap();
        let back = super::super::reader::read(std::io::Cursor::new(out)).unwrap();
        let kinds: Vec<&str> = back.atoms.iter().map(|a| a.kind.as_str()).collect();
        assert_eq!(kinds, vec!["C", "Cl"]);
        assert_eq!(back.neighbors(1), &[0]);
    }
}
