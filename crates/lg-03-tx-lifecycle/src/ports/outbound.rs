//! # Driven Ports (SPI - Outbound)
//!
//! The ledger-execution service compiles programs, accepts signed
//! transactions and reports round progress. Responses are typed records; an
//! adapter decodes the wire format before anything reaches the lifecycle.

use async_trait::async_trait;
use shared_types::{Address, ApplicationIndex, OperationId, Round};

use crate::error::LedgerError;

/// Network parameters a new transaction is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestedParams {
    /// Suggested fee per byte.
    pub fee: u64,
    /// Minimum fee per transaction.
    pub min_fee: u64,
    /// First valid round.
    pub first_valid: Round,
    /// Last valid round.
    pub last_valid: Round,
    /// Network genesis id.
    pub genesis_id: String,
    /// Network genesis hash.
    pub genesis_hash: [u8; 32],
}

/// A compiled program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledProgram {
    /// Address of the program (hash of its bytecode).
    pub hash: String,
    /// Bytecode.
    pub program: Vec<u8>,
}

/// Round progress of the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeStatus {
    /// Last round the node has seen finalized.
    pub last_round: Round,
}

/// State of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PendingTransactionInfo {
    /// Round the transaction was finalized in; 0 while pending.
    pub confirmed_round: Round,
    /// Reason the pending pool evicted it; empty unless rejected.
    pub pool_error: String,
    /// Index of the application the transaction created, if any.
    pub application_index: Option<ApplicationIndex>,
}

impl PendingTransactionInfo {
    /// A still-pending transaction.
    #[must_use]
    pub fn pending() -> Self {
        Self::default()
    }

    /// A transaction finalized in `round`.
    #[must_use]
    pub fn confirmed(round: Round) -> Self {
        Self {
            confirmed_round: round,
            ..Self::default()
        }
    }

    /// A transaction evicted with `reason`.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            pool_error: reason.into(),
            ..Self::default()
        }
    }

    /// Sets the created application index.
    #[must_use]
    pub fn with_application_index(mut self, index: ApplicationIndex) -> Self {
        self.application_index = Some(index);
        self
    }

    /// Returns true if the transaction is finalized.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.confirmed_round > 0
    }

    /// Returns true if the pending pool rejected the transaction.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        !self.pool_error.is_empty()
    }
}

/// Account state relevant to the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    /// The account.
    pub address: Address,
    /// Balance in micro-units.
    pub amount: u64,
    /// Round the balance was read at.
    pub round: Round,
}

/// Interface to the ledger-execution service.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Parameters for building a new transaction.
    async fn suggested_params(&self) -> Result<SuggestedParams, LedgerError>;

    /// Compiles program source text.
    async fn compile(&self, source: &str) -> Result<CompiledProgram, LedgerError>;

    /// Submits signed transaction bytes and returns the assigned id.
    async fn submit(&self, signed: &[u8]) -> Result<OperationId, LedgerError>;

    /// Current round progress.
    async fn status(&self) -> Result<NodeStatus, LedgerError>;

    /// Waits until the ledger has passed `round`.
    async fn status_after_round(&self, round: Round) -> Result<NodeStatus, LedgerError>;

    /// State of a submitted transaction.
    async fn pending_transaction_info(
        &self,
        id: &OperationId,
    ) -> Result<PendingTransactionInfo, LedgerError>;

    /// Balance of an account.
    async fn account_info(&self, address: &Address) -> Result<AccountInfo, LedgerError>;
}
