//! # Adapters Layer
//!
//! - [`KmdHttpClient`]: REST client for the key-management daemon
//! - [`InMemoryKeyCustody`]: process-local custody for tests

pub mod in_memory;
pub mod kmd_http;

pub use in_memory::InMemoryKeyCustody;
pub use kmd_http::{KmdHttpClient, KMD_TOKEN_HEADER};
