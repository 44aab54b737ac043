//! # Domain Layer
//!
//! Transaction model, canonical encoding, lifecycle states and cancellation.

pub mod cancel;
pub mod encoding;
pub mod outcome;
pub mod transaction;

pub use cancel::CancellationSignal;
pub use encoding::{encode_transaction, operation_id, SignedTransaction, TX_TAG};
pub use outcome::*;
pub use transaction::*;
