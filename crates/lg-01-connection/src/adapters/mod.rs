//! # Adapters Layer
//!
//! Filesystem-backed credential source.

pub mod fs_source;

pub use fs_source::*;
