//! # Ports
//!
//! The lifecycle's only driven dependency is the ledger-execution service.

pub mod outbound;

pub use outbound::*;
