//! # Ports
//!
//! Program sources are the orchestrator's only driven dependency besides the
//! ledger, which it reaches through the lifecycle manager.

pub mod outbound;

pub use outbound::*;
