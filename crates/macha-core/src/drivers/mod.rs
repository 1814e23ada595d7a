//! Drivers for the external programs used during preparation.
//!
//! Both CGenFF and CHARMM are optional: a driver without a resolvable binary
//! logs guidance and reports `Ok(None)` instead of failing.

pub mod cgenff;
pub mod charmm;
pub mod process;
