//! Session-level errors.
//!
//! Component errors pass through unchanged so their codes survive; the
//! variants added here cover session setup and the operations the session
//! implements itself (balance query, funding payment).

use lg_01_connection::ConnectionError;
use lg_02_key_gateway::{KeyCustodyError, KeyGatewayError, PhraseError};
use lg_03_tx_lifecycle::{FailurePhase, LedgerError, LifecycleError};
use lg_04_contract_deployment::DeploymentError;
use lg_05_subscriptions::SubscriptionError;
use shared_types::{codes, ErrorCode, OperationId};
use thiserror::Error;

/// Failures reported by a [`crate::Session`].
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// The session is closed.
    #[error("Missing value for ledger client")]
    NotConnected,

    /// An endpoint credential could not be resolved.
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// The key-custody service did not answer the liveness probe.
    #[error("An exception occurred while initializing key custody client: {0}")]
    KeystoreInit(KeyCustodyError),

    /// The ledger service did not answer the status probe.
    #[error("Error in initializing ledger client: {0}")]
    LedgerInit(LedgerError),

    /// No owner secret phrase is configured.
    #[error("Owner secret phrase not provided")]
    OwnerSecretMissing,

    /// The owner secret phrase is malformed.
    #[error("Malformed owner secret phrase: {0}")]
    MalformedOwnerPhrase(#[from] PhraseError),

    /// The balance query failed.
    #[error("An exception occurred while getting account balance: {0}")]
    Balance(LedgerError),

    /// The funding payment failed.
    #[error("Funding payment failed: {0}")]
    Payment(LifecycleError),

    /// Key gateway failure.
    #[error(transparent)]
    Keys(#[from] KeyGatewayError),

    /// Deployment failure.
    #[error(transparent)]
    Deployment(#[from] DeploymentError),

    /// Subscription call failure.
    #[error(transparent)]
    Subscription(#[from] SubscriptionError),
}

impl SessionError {
    /// Id of the operation the failure concerns, when it reached the ledger.
    #[must_use]
    pub fn operation_id(&self) -> Option<&OperationId> {
        match self {
            Self::Payment(e) => e.operation_id(),
            Self::Deployment(e) => e.operation_id(),
            Self::Subscription(e) => e.operation_id(),
            _ => None,
        }
    }
}

impl ErrorCode for SessionError {
    fn code(&self) -> u32 {
        match self {
            Self::NotConnected => codes::LEDGER_NOT_CONNECTED,
            Self::Connection(e) => e.code(),
            Self::KeystoreInit(_) => codes::KEYSTORE_INIT_FAILED,
            Self::LedgerInit(_) => codes::LEDGER_INIT_FAILED,
            Self::OwnerSecretMissing => codes::OWNER_SECRET_MISSING,
            Self::MalformedOwnerPhrase(_) => codes::MALFORMED_SECRET_PHRASE,
            Self::Balance(_) => codes::BALANCE_QUERY_FAILED,
            Self::Payment(e) => match e.phase() {
                FailurePhase::Submission => codes::PAYMENT_SUBMIT_FAILED,
                FailurePhase::Confirmation => codes::PAYMENT_CONFIRM_FAILED,
            },
            Self::Keys(e) => e.code(),
            Self::Deployment(e) => e.code(),
            Self::Subscription(e) => e.code(),
        }
    }
}
