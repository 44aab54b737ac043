//! Error types for subscription calls.

use lg_02_key_gateway::PhraseError;
use lg_03_tx_lifecycle::LifecycleError;
use shared_types::{codes, ErrorCode, OperationId};
use thiserror::Error;

use crate::domain::AppCallKind;

/// Failures of a subscription call.
#[derive(Debug, Clone, Error)]
pub enum SubscriptionError {
    /// The caller's secret phrase is malformed.
    #[error("Malformed secret phrase: {0}")]
    MalformedPhrase(#[from] PhraseError),

    /// The call never reached the ledger.
    #[error("An exception occurred when sending {kind} transaction: {source}")]
    Submit {
        kind: AppCallKind,
        #[source]
        source: LifecycleError,
    },

    /// The call was submitted but not confirmed.
    #[error("An exception occurred while waiting for confirmation of {kind} transaction: {source}")]
    Confirm {
        kind: AppCallKind,
        #[source]
        source: LifecycleError,
    },
}

impl SubscriptionError {
    /// Id of the call, when it reached the ledger.
    #[must_use]
    pub fn operation_id(&self) -> Option<&OperationId> {
        match self {
            Self::Confirm { source, .. } => source.operation_id(),
            _ => None,
        }
    }
}

impl ErrorCode for SubscriptionError {
    fn code(&self) -> u32 {
        match self {
            Self::MalformedPhrase(_) => codes::MALFORMED_SECRET_PHRASE,
            Self::Submit { kind, .. } => kind.submit_code(),
            Self::Confirm { kind, .. } => kind.confirm_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lg_03_tx_lifecycle::LedgerError;

    #[test]
    fn test_codes_follow_call_kind() {
        let submit = SubscriptionError::Submit {
            kind: AppCallKind::Subscribe,
            source: LifecycleError::Submit(LedgerError::Connection("down".into())),
        };
        let confirm = SubscriptionError::Confirm {
            kind: AppCallKind::OptOut,
            source: LifecycleError::PoolRejected {
                id: OperationId::new("TXID"),
                reason: "not opted in".into(),
            },
        };

        assert_eq!(submit.code(), 207);
        assert_eq!(submit.operation_id(), None);
        assert_eq!(confirm.code(), 303);
        assert_eq!(confirm.operation_id(), Some(&OperationId::new("TXID")));
        assert!(confirm.to_string().contains("optout"));
        assert_eq!(
            SubscriptionError::MalformedPhrase(PhraseError::ChecksumMismatch).code(),
            10
        );
    }
}
