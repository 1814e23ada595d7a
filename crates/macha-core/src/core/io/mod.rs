//! Provides input/output functionality for structure file formats.
//!
//! The PDB reader loads combined protein/ligand/solvent structures; the CRD
//! module writes (and reads back) CHARMM card coordinate files, one per
//! segment.

pub mod crd;
pub mod pdb;
pub mod traits;
