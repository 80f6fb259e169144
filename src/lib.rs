//! A pure Rust rule engine for assigning OPLS-AA atom types, together with the
//! hierarchical compound model it operates on.
//!
//! # Features
//!
//! - **Declarative rules** — Each OPLS-AA type is a data record: element,
//!   degree, neighbor-count constraints, structural checks, and the type
//!   identifiers it whitelists and blacklists
//! - **Fixed-point resolution** — Rules that depend on the candidates of
//!   neighboring atoms are re-applied until no candidate set grows
//! - **Precedence validation** — Rule catalogs are checked at build time so
//!   that every ambiguous local pattern has a single intended winner
//! - **Best-effort typing** — Problems surface as [`Warning`]s; atoms without a
//!   unique type receive the `XXX` sentinel instead of aborting the run
//! - **Compound model** — Arena-backed hierarchy of atoms, bonds, labels, and
//!   ports
//! - **Flexible I/O** — Read MOL2 and SDF files; write typed MOL2
//!
//! # Quick Start
//!
//! The main entry point is [`assign_types`], which types a [`Compound`] in
//! place and returns a [`TypingReport`]:
//!
//! ```
//! use opls_forge::{Atom, Compound, TyperConfig, TyperError, assign_types};
//!
//! // Ethane (C₂H₆)
//! let atoms = vec![
//!     Atom::new("C", [0.000, 0.000, 0.000]),
//!     Atom::new("C", [1.540, 0.000, 0.000]),
//!     Atom::new("H", [-0.360, 1.030, 0.000]),
//!     Atom::new("H", [-0.360, -0.510, -0.890]),
//!     Atom::new("H", [-0.360, -0.510, 0.890]),
//!     Atom::new("H", [1.900, 1.030, 0.000]),
//!     Atom::new("H", [1.900, -0.510, -0.890]),
//!     Atom::new("H", [1.900, -0.510, 0.890]),
//! ];
//! let bonds = [(0, 1), (0, 2), (0, 3), (0, 4), (1, 5), (1, 6), (1, 7)];
//! let mut ethane = Compound::from_parts("ethane", atoms, bonds).unwrap();
//!
//! let report = assign_types(&mut ethane, &TyperConfig::default())?;
//!
//! // Both carbons are alkane CH3, every hydrogen is alkane H
//! assert_eq!(report.type_of(0), Some("135"));
//! assert_eq!(report.type_of(1), Some("135"));
//! assert!((2..8).all(|h| report.type_of(h) == Some("140")));
//! assert!(report.converged);
//! assert!(report.warnings.is_empty());
//!
//! // Results are also written into each atom's attribute bag
//! let opls_type = ethane.atoms[0].extra("opls_type").and_then(|v| v.as_text());
//! assert_eq!(opls_type, Some("135"));
//! # Ok::<(), TyperError>(())
//! ```
//!
//! # Module Organization
//!
//! - [`io`] — File I/O for small molecules (MOL2, SDF)
//! - [`assign_types`] / [`Typer`] — Typing entry points
//! - [`TyperConfig`] — Custom rule tables, pass cap, and debug output
//!
//! # Data Types
//!
//! ## Structure
//!
//! - [`Compound`] — Atom/bond arena with a tree of labelled sub-compounds
//! - [`Atom`] — Kind label, Cartesian coordinates, charge, and attribute bag
//! - [`Bond`] — Unordered pair of atoms with a kind label
//! - [`Port`] — Ghost-atom attachment point for joining compounds
//! - [`AtomGraph`] — Read-only view the typing engine consumes
//!
//! ## Rules
//!
//! - [`RuleCatalog`] — Validated, bucketed rule set; [`RuleCatalog::builtin`]
//!   holds the shipped OPLS-AA table
//! - [`Rule`] — One typing rule, built in code or read from TOML
//! - [`Constraint`] — Exact, minimum, or maximum neighbor count per element
//! - [`Check`] — Ring membership and neighbor-candidate conditions
//!
//! ## Results
//!
//! - [`TypingReport`] — Per-atom resolutions, candidate sets, and warnings
//! - [`Resolution`] — Typed, unresolved, or skipped (ghost)
//! - [`Warning`] — Catalog, coverage, convergence, and resolution problems

mod model;
mod typer;

pub mod io;

pub use model::atom::{Atom, AttrValue, GHOST_KIND};
pub use model::compound::{AtomId, Bond, Compound, CompoundId, Part, Port, ROOT};

pub use model::compound::Error as CompoundError;

pub use typer::{
    AtomGraph, BLACKLIST_KEY, CandidateSets, Check, Constraint, DEFAULT_MAX_PASSES,
    ElementBucket, NeighborProfile, OPLS_TYPE_KEY, PatternKey, Resolution, RingSpec, Rule,
    RuleCatalog, RuleId, Typer, TyperConfig, TypingReport, UNKNOWN_TYPE, WHITELIST_KEY, Warning,
    assign_types, find_rings,
};

pub use typer::Error as TyperError;
