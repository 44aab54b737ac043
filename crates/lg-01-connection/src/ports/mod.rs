//! # Ports
//!
//! The resolver's only driven dependency is the credential source.

pub mod outbound;

pub use outbound::CredentialSource;
