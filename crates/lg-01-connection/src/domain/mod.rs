//! # Domain Layer
//!
//! Endpoint value objects and the pure precedence rules for resolving them.

pub mod endpoint;
pub mod resolve;

pub use endpoint::*;
pub use resolve::*;
