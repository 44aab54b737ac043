//! # Domain Layer
//!
//! Program rendering and the stateful create call.

pub mod linked;

pub use linked::*;
