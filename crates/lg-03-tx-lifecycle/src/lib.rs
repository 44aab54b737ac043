//! # LG-03 Transaction Lifecycle
//!
//! Builds, signs, submits and confirms ledger operations.
//!
//! ## Lifecycle
//!
//! ```text
//! Built → Signed → Submitted → Confirmed | PoolRejected | TimedOut | QueryFailed | Cancelled
//!                ↘ SubmitFailed
//! ```
//!
//! Transactions carry a flat fee of 1000 micro-units and are encoded as
//! canonical msgpack (sorted keys, empty fields omitted). The signature
//! covers `"TX" ‖ encoding`; the operation id is the base32 SHA-512/256 of
//! the same bytes, so it is known before submission.
//!
//! ## Confirmation Poll
//!
//! Starting at the round after the current one, each round the poll queries
//! the pending transaction and, if no verdict yet, waits for the ledger to
//! pass that round. The default budget is
//! [`DEFAULT_CONFIRMATION_ROUNDS`](domain::DEFAULT_CONFIRMATION_ROUNDS)
//! rounds. A [`CancellationSignal`] can end the wait early. Nothing is
//! retried.
//!
//! ## Usage Example
//!
//! ```ignore
//! use lg_03_tx_lifecycle::prelude::*;
//!
//! let ledger = Arc::new(AlgodHttpClient::new(endpoint.base_url(), endpoint.token)?);
//! let lifecycle = TransactionLifecycleManager::new(ledger);
//! let kind = TransactionKind::Payment { receiver, amount: 1_000_000 };
//! let confirmation = lifecycle.execute(&identity, kind, None, None).await?;
//! ```

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::{AlgodHttpClient, ConfirmationScript, InMemoryLedger, LedgerCall};
pub use domain::{
    ApplicationCall, CancellationSignal, ConfirmationOutcome, OnCompletion, PendingOperation,
    SignedTransaction, StateSchema, TransactionKind, TxState, UnsignedTransaction,
    DEFAULT_CONFIRMATION_ROUNDS, FLAT_FEE,
};
pub use error::{FailurePhase, LedgerError, LifecycleError};
pub use ports::{
    AccountInfo, CompiledProgram, LedgerClient, NodeStatus, PendingTransactionInfo,
    SuggestedParams,
};
pub use service::{Confirmation, TransactionLifecycleManager};

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::adapters::{AlgodHttpClient, InMemoryLedger};
    pub use crate::domain::{
        ApplicationCall, CancellationSignal, OnCompletion, StateSchema, TransactionKind,
    };
    pub use crate::error::{LedgerError, LifecycleError};
    pub use crate::ports::LedgerClient;
    pub use crate::service::{Confirmation, TransactionLifecycleManager};
}
