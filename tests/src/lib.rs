//! # Ledger Gateway Test Suite
//!
//! Cross-crate flows driven through the public session surface, backed by
//! the in-memory ledger and key-custody adapters.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── contract_flow.rs   # deploy → opt-in → subscribe → grant
//!     ├── account_flow.rs    # create → fund → balance → export
//!     └── session_config.rs  # connection string → session
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p lg-tests
//! cargo test -p lg-tests integration::contract_flow
//! ```

#![allow(dead_code)]

pub mod integration;
