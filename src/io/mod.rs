//! Reading and writing small-molecule structure files.
//!
//! MOL2 and SDF (V2000) files are read into a flat [`Compound`]. Typed
//! compounds are written back as MOL2 with the resolved OPLS type in the
//! atom-type column.

use crate::model::compound::Compound;
use std::fmt;
use std::io::{BufRead, Write};

pub mod error;
mod util;

mod mol2;
mod sdf;

pub use error::Error;
pub use util::guess_element_symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Mol2,
    Sdf,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Mol2 => write!(f, "MOL2"),
            Format::Sdf => write!(f, "SDF"),
        }
    }
}

/// Reads the first molecule of `reader` as a flat compound.
pub fn read<R: BufRead>(reader: R, format: Format) -> Result<Compound, Error> {
    match format {
        Format::Mol2 => mol2::read(reader),
        Format::Sdf => sdf::read(reader),
    }
}

/// Writes the non-ghost atoms of `compound` as a MOL2 molecule.
pub fn write_mol2<W: Write>(writer: W, compound: &Compound) -> Result<(), Error> {
    mol2::write(writer, compound)
}
