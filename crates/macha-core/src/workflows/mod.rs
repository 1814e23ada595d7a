//! # Workflows Module
//!
//! High-level entry points that tie the structure readers, the segment
//! classifier, the CHARMM block generator and the external tool drivers
//! together into the per-ligand preparation procedure.
//!
//! - [`prepare`] - Discover ligands, scaffold their folders and produce the
//!   complex and waterbox inputs for each of them.
//! - [`config`] - Explicit configuration passed to every step.
//! - [`progress`] - Callback-based progress events for front ends.

pub mod config;
pub mod error;
pub mod prepare;
pub mod progress;
