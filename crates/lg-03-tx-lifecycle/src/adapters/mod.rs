//! # Adapters Layer
//!
//! - [`AlgodHttpClient`]: REST client for the ledger node
//! - [`InMemoryLedger`]: scripted ledger for tests

pub mod algod_http;
pub mod in_memory;

pub use algod_http::{AlgodHttpClient, ALGOD_TOKEN_HEADER, VALIDITY_WINDOW};
pub use in_memory::{
    ConfirmationScript, InMemoryLedger, LedgerCall, RecordedTransaction, FIRST_APPLICATION_INDEX,
    GENESIS_ROUND,
};
