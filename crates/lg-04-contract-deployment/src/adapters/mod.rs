//! # Adapters Layer
//!
//! - [`FsProgramSource`]: reads program sources from the contract root

pub mod fs_programs;

pub use fs_programs::FsProgramSource;
