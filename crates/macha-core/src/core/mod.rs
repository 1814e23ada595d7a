//! # Core Module
//!
//! Fundamental building blocks shared by every preparation step: the
//! structure model ([`models`]) and the file formats used to read and write it
//! ([`io`]).

pub mod io;
pub mod models;
