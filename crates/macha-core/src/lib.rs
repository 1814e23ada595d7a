//! # MACHA Core Library
//!
//! Preparation of CHARMM free-energy simulation inputs from combined
//! protein/ligand structure files.
//!
//! For every ligand the library scaffolds a folder with a `complex` and a
//! `waterbox` leg, splits the structure into CHARMM segments and writes one
//! coordinate file per segment, generates the CHARMM command blocks that read
//! and build those segments, and optionally runs CGenFF and CHARMM.
//!
//! ## Layout
//!
//! - **[`core`]**: the structure model and the PDB/CRD readers and writers.
//! - **[`segments`]**: segment classification and per-segment CRD export.
//! - **[`charmm`]**: command blocks, stream files, template patching and log
//!   extraction.
//! - **[`drivers`]**: discovery and invocation of the external CGenFF and
//!   CHARMM binaries.
//! - **[`workflows`]**: the per-ligand preparation procedure built from the
//!   layers above.

pub mod charmm;
pub mod core;
pub mod drivers;
pub mod segments;
pub mod workflows;
