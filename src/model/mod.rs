//! Core data structures representing hierarchical molecular structures.
//!
//! - [`atom`] – Leaf particles with a kind label, coordinates, and an attribute bag.
//! - [`compound`] – Arena-backed compound hierarchy with bonds, labels, and ports.
//!
//! The typing engine never depends on the hierarchy itself; it reads atoms and
//! neighbor lists through [`crate::AtomGraph`] and writes its results back into
//! each atom's `extras`.

pub mod atom;
pub mod compound;
