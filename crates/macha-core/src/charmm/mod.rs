//! CHARMM input generation and post-processing.
//!
//! [`blocks`] builds command fragments, [`stream`] writes them to a stream
//! file, [`patch`] inserts them into template input scripts and [`log`] pulls
//! the echoed sections back out of CHARMM output.

pub mod blocks;
pub mod log;
pub mod patch;
pub mod stream;
