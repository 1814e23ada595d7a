//! Segment assignment and per-segment coordinate export.
//!
//! A loaded [`Structure`](crate::core::models::structure::Structure) is
//! partitioned into CHARMM segments (`PROA`, `HETA`, `SOLV`, ...) by
//! [`classifier::classify`] and then written out one CRD file per segment by
//! [`export::export_segments`].

pub mod classifier;
pub mod export;
pub mod names;
