//! # Ports
//!
//! The gateway's only driven dependency is the key-custody service.

pub mod outbound;

pub use outbound::*;
