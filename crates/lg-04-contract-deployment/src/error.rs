//! Error types for linked contract deployment.

use std::path::PathBuf;

use lg_02_key_gateway::PhraseError;
use lg_03_tx_lifecycle::{LedgerError, LifecycleError};
use shared_types::{codes, ErrorCode, OperationId};
use thiserror::Error;

use crate::domain::DeploymentPhase;

/// Failures of a linked contract deployment.
#[derive(Debug, Clone, Error)]
pub enum DeploymentError {
    /// The creator's secret phrase is malformed.
    #[error("Malformed secret phrase: {0}")]
    MalformedPhrase(#[from] PhraseError),

    /// The stateless template could not be read.
    #[error("Stateless template {path:?} not found: {reason}")]
    TemplateNotFound { path: PathBuf, reason: String },

    /// The ledger rejected the rendered stateless program.
    #[error("Stateless program compilation failed: {0}")]
    TemplateCompile(LedgerError),

    /// The clear program could not be read.
    #[error("Clear program {path:?} not found: {reason}")]
    ClearProgramNotFound { path: PathBuf, reason: String },

    /// The approval program could not be read.
    #[error("Approval program {path:?} not found: {reason}")]
    ApprovalProgramNotFound { path: PathBuf, reason: String },

    /// The ledger rejected the clear program.
    #[error("Clear program compilation failed: {0}")]
    ClearProgramCompile(LedgerError),

    /// The ledger rejected the approval program.
    #[error("Approval program compilation failed: {0}")]
    ApprovalProgramCompile(LedgerError),

    /// The stateful create call never reached the ledger.
    #[error("An error occurred while creating the stateful contract linked to {stateless_address}: {source}")]
    StatefulSubmit {
        stateless_address: String,
        #[source]
        source: LifecycleError,
    },

    /// The stateful create call was submitted but not confirmed.
    #[error("Stateful contract linked to {stateless_address} not confirmed: {source}")]
    StatefulConfirm {
        stateless_address: String,
        #[source]
        source: LifecycleError,
    },

    /// The confirmation carried no application index.
    #[error("Operation {id} confirmed without an application index (stateless half {stateless_address})")]
    MissingApplicationIndex {
        id: OperationId,
        stateless_address: String,
    },
}

impl DeploymentError {
    /// Phase the failure happened in.
    #[must_use]
    pub fn phase(&self) -> DeploymentPhase {
        match self {
            Self::MalformedPhrase(_) | Self::TemplateNotFound { .. } | Self::TemplateCompile(_) => {
                DeploymentPhase::Stateless
            }
            _ => DeploymentPhase::Stateful,
        }
    }

    /// Stateless address left behind by a failed second phase.
    #[must_use]
    pub fn stateless_address(&self) -> Option<&str> {
        match self {
            Self::StatefulSubmit {
                stateless_address, ..
            }
            | Self::StatefulConfirm {
                stateless_address, ..
            }
            | Self::MissingApplicationIndex {
                stateless_address, ..
            } => Some(stateless_address),
            _ => None,
        }
    }

    /// Id of the create call, when it reached the ledger.
    #[must_use]
    pub fn operation_id(&self) -> Option<&OperationId> {
        match self {
            Self::StatefulConfirm { source, .. } => source.operation_id(),
            Self::MissingApplicationIndex { id, .. } => Some(id),
            _ => None,
        }
    }
}

impl ErrorCode for DeploymentError {
    fn code(&self) -> u32 {
        match self {
            Self::MalformedPhrase(_) => codes::MALFORMED_SECRET_PHRASE,
            Self::TemplateNotFound { .. } => codes::TEMPLATE_NOT_FOUND,
            Self::TemplateCompile(_) => codes::TEMPLATE_COMPILE_FAILED,
            Self::ClearProgramNotFound { .. } => codes::CLEAR_PROGRAM_NOT_FOUND,
            Self::ApprovalProgramNotFound { .. } => codes::APPROVAL_PROGRAM_NOT_FOUND,
            Self::ClearProgramCompile(_) => codes::CLEAR_PROGRAM_COMPILE_FAILED,
            Self::ApprovalProgramCompile(_) => codes::APPROVAL_PROGRAM_COMPILE_FAILED,
            Self::StatefulSubmit { .. } => codes::STATEFUL_CREATE_SUBMIT_FAILED,
            Self::StatefulConfirm { .. } | Self::MissingApplicationIndex { .. } => {
                codes::STATEFUL_CREATE_CONFIRM_FAILED
            }
        }
    }
}
