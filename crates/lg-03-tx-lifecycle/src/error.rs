//! Error types for ledger access and the transaction lifecycle.

use shared_types::OperationId;
use thiserror::Error;

/// Faults reported by a ledger client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The ledger service could not be reached.
    #[error("Ledger service unreachable: {0}")]
    Connection(String),

    /// The ledger service answered with an error.
    #[error("Ledger service error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The response could not be decoded.
    #[error("Malformed ledger response: {0}")]
    Decode(String),
}

/// Which half of the lifecycle a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePhase {
    /// Building, signing or submitting.
    Submission,
    /// Waiting for finalization.
    Confirmation,
}

/// Failures of a transaction between build and confirmation.
#[derive(Debug, Clone, Error)]
pub enum LifecycleError {
    /// Suggested parameters could not be fetched.
    #[error("Could not fetch suggested parameters: {0}")]
    Params(LedgerError),

    /// The transaction could not be encoded.
    #[error("Could not encode transaction: {0}")]
    Encode(String),

    /// The ledger refused the submission.
    #[error("Submission failed: {0}")]
    Submit(LedgerError),

    /// The transaction was evicted from the pending pool.
    #[error("Operation {id} rejected by the pending pool: {reason}")]
    PoolRejected { id: OperationId, reason: String },

    /// The round budget elapsed without a verdict.
    #[error("Operation {id} not confirmed within {rounds} rounds")]
    TimedOut { id: OperationId, rounds: u64 },

    /// Querying the ledger failed while polling.
    #[error("Confirmation query for {id} failed: {source}")]
    QueryFailed {
        id: OperationId,
        #[source]
        source: LedgerError,
    },

    /// The caller cancelled the wait.
    #[error("Confirmation wait for {id} cancelled")]
    Cancelled { id: OperationId },
}

impl LifecycleError {
    /// Whether the failure happened before or after submission.
    #[must_use]
    pub fn phase(&self) -> FailurePhase {
        match self {
            Self::Params(_) | Self::Encode(_) | Self::Submit(_) => FailurePhase::Submission,
            Self::PoolRejected { .. }
            | Self::TimedOut { .. }
            | Self::QueryFailed { .. }
            | Self::Cancelled { .. } => FailurePhase::Confirmation,
        }
    }

    /// The operation id, when the transaction got that far.
    #[must_use]
    pub fn operation_id(&self) -> Option<&OperationId> {
        match self {
            Self::Params(_) | Self::Encode(_) | Self::Submit(_) => None,
            Self::PoolRejected { id, .. }
            | Self::TimedOut { id, .. }
            | Self::QueryFailed { id, .. }
            | Self::Cancelled { id } => Some(id),
        }
    }
}
