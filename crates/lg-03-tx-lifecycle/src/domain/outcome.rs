//! # Lifecycle States and Outcomes

use std::fmt;

use shared_types::{OperationId, Round};

use crate::error::LedgerError;
use crate::ports::PendingTransactionInfo;

/// Rounds the confirmation poll waits unless configured otherwise.
pub const DEFAULT_CONFIRMATION_ROUNDS: u64 = 4;

/// Where a transaction is in its lifecycle.
///
/// ```text
/// Built → Signed → Submitted → Confirmed | PoolRejected | TimedOut | QueryFailed | Cancelled
///                ↘ SubmitFailed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxState {
    /// Built from suggested parameters.
    Built,
    /// Encoded and signed.
    Signed,
    /// Accepted by the ledger, awaiting finalization.
    Submitted,
    /// Finalized.
    Confirmed,
    /// Evicted from the pending pool.
    PoolRejected,
    /// Round budget exhausted.
    TimedOut,
    /// The ledger refused the submission.
    SubmitFailed,
    /// A status or pending-info query failed while polling.
    QueryFailed,
    /// The caller cancelled the wait.
    Cancelled,
}

impl TxState {
    /// Returns true if no further transition is possible.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Built | Self::Signed | Self::Submitted)
    }
}

impl fmt::Display for TxState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Built => "built",
            Self::Signed => "signed",
            Self::Submitted => "submitted",
            Self::Confirmed => "confirmed",
            Self::PoolRejected => "pool-rejected",
            Self::TimedOut => "timed-out",
            Self::SubmitFailed => "submit-failed",
            Self::QueryFailed => "query-failed",
            Self::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// A submitted transaction awaiting its verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOperation {
    /// Id assigned by the ledger.
    pub id: OperationId,
    /// First round the transaction is valid in: the ledger's last round
    /// when it was built.
    pub first_valid: Round,
}

/// Terminal result of the confirmation poll. Exactly one per poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    /// Finalized; carries the ledger's report.
    Confirmed(PendingTransactionInfo),
    /// Evicted from the pending pool.
    PoolRejected(String),
    /// No verdict within the round budget.
    TimedOut {
        /// Rounds waited.
        rounds: u64,
    },
    /// A ledger query failed.
    QueryFailed(LedgerError),
    /// Cancellation observed.
    Cancelled,
}

impl ConfirmationOutcome {
    /// The terminal state this outcome corresponds to.
    #[must_use]
    pub fn state(&self) -> TxState {
        match self {
            Self::Confirmed(_) => TxState::Confirmed,
            Self::PoolRejected(_) => TxState::PoolRejected,
            Self::TimedOut { .. } => TxState::TimedOut,
            Self::QueryFailed(_) => TxState::QueryFailed,
            Self::Cancelled => TxState::Cancelled,
        }
    }

    /// Returns true for [`ConfirmationOutcome::Confirmed`].
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!TxState::Built.is_terminal());
        assert!(!TxState::Submitted.is_terminal());
        for state in [
            TxState::Confirmed,
            TxState::PoolRejected,
            TxState::TimedOut,
            TxState::SubmitFailed,
            TxState::QueryFailed,
            TxState::Cancelled,
        ] {
            assert!(state.is_terminal(), "{state}");
        }
    }

    #[test]
    fn test_outcome_states() {
        assert_eq!(
            ConfirmationOutcome::Confirmed(PendingTransactionInfo::confirmed(9)).state(),
            TxState::Confirmed
        );
        assert_eq!(
            ConfirmationOutcome::TimedOut { rounds: 4 }.state(),
            TxState::TimedOut
        );
        assert_eq!(ConfirmationOutcome::Cancelled.state(), TxState::Cancelled);
    }
}
