//! # Core Models Module
//!
//! Data structures describing a loaded molecular structure: atoms, residues,
//! chains and the [`structure::Structure`] that owns them.
//!
//! ## Key Components
//!
//! - [`atom`] - Atom identity, coordinates and crystallographic columns
//! - [`residue`] - Residue name, number, insertion code and source segment id
//! - [`chain`] - Chain identifier and its ordered residues
//! - [`structure`] - The complete structure plus its tabular atom view
//! - [`ids`] - Arena keys for atoms, residues, and chains
//!
//! ## Usage
//!
//! ```ignore
//! use macha::core::models::{atom::Atom, structure::Structure};
//!
//! let mut structure = Structure::new();
//! let chain_id = structure.add_chain("A");
//! let residue_id = structure.add_residue(chain_id, 1, None, "ALA", "PROA").unwrap();
//! let atom = Atom::new(1, "CA", residue_id, Point3::new(0.0, 0.0, 0.0));
//! structure.add_atom_to_residue(residue_id, atom).unwrap();
//! ```

pub mod atom;
pub mod chain;
pub mod ids;
pub mod residue;
pub mod structure;
