//! # Error Types
//!
//! The operation result every public gateway call returns, the stable code
//! taxonomy upstream callers branch on, and parse errors for shared entities.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::OperationId;

/// Stable numeric result codes, partitioned by originating component.
///
/// Upstream callers branch on these values; never renumber an existing code.
pub mod codes {
    /// Success.
    pub const OK: u32 = 0;

    // Precondition failures
    pub const LEDGER_NOT_CONNECTED: u32 = 1;
    pub const KEYSTORE_NOT_CONFIGURED: u32 = 2;
    pub const OWNER_SECRET_MISSING: u32 = 201;

    // Program / template failures
    pub const TEMPLATE_NOT_FOUND: u32 = 3;
    pub const TEMPLATE_COMPILE_FAILED: u32 = 4;
    pub const CLEAR_PROGRAM_NOT_FOUND: u32 = 5;
    pub const APPROVAL_PROGRAM_NOT_FOUND: u32 = 6;
    pub const CLEAR_PROGRAM_COMPILE_FAILED: u32 = 7;
    pub const APPROVAL_PROGRAM_COMPILE_FAILED: u32 = 8;

    // Key-custody failures
    pub const MALFORMED_SECRET_PHRASE: u32 = 10;
    pub const WALLET_NOT_FOUND: u32 = 101;
    pub const KEY_EXPORT_FAILED: u32 = 102;
    pub const CREATE_ACCOUNT_FAILED: u32 = 203;

    // Configuration / credential resolution failures
    pub const TOKEN_UNREADABLE: u32 = 20;
    pub const PORT_UNREADABLE: u32 = 21;
    pub const KEYSTORE_INIT_FAILED: u32 = 22;
    pub const LEDGER_INIT_FAILED: u32 = 23;
    pub const PORT_INVALID: u32 = 24;

    // Submission failures (one per operation kind)
    pub const STATEFUL_CREATE_SUBMIT_FAILED: u32 = 120;
    pub const PAYMENT_SUBMIT_FAILED: u32 = 200;
    pub const OPT_IN_SUBMIT_FAILED: u32 = 205;
    pub const OPT_OUT_SUBMIT_FAILED: u32 = 206;
    pub const SUBSCRIBE_SUBMIT_FAILED: u32 = 207;
    pub const UNSUBSCRIBE_SUBMIT_FAILED: u32 = 208;
    pub const GRANT_SUBMIT_FAILED: u32 = 209;
    pub const REVOKE_SUBMIT_FAILED: u32 = 210;

    // Queries
    pub const BALANCE_QUERY_FAILED: u32 = 204;

    // Confirmation failures (one per operation kind)
    pub const PAYMENT_CONFIRM_FAILED: u32 = 301;
    pub const OPT_IN_CONFIRM_FAILED: u32 = 302;
    pub const OPT_OUT_CONFIRM_FAILED: u32 = 303;
    pub const SUBSCRIBE_CONFIRM_FAILED: u32 = 304;
    pub const UNSUBSCRIBE_CONFIRM_FAILED: u32 = 305;
    pub const GRANT_CONFIRM_FAILED: u32 = 306;
    pub const REVOKE_CONFIRM_FAILED: u32 = 307;
    pub const STATEFUL_CREATE_CONFIRM_FAILED: u32 = 308;
}

/// Implemented by every component error that crosses the public boundary.
pub trait ErrorCode: fmt::Display {
    /// The stable code from [`codes`] for this failure.
    fn code(&self) -> u32;
}

/// Outcome status of a public operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationStatus {
    /// The operation succeeded.
    Ok,
    /// The operation failed; see the code.
    Failed,
}

/// Structured result returned by every public operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    /// Success or failure.
    pub status: OperationStatus,
    /// Zero on success, a value from [`codes`] otherwise.
    pub code: u32,
    /// Human-readable detail (empty on success).
    pub message: String,
    /// Ledger operation id, when one was assigned.
    pub operation_id: Option<String>,
}

impl OperationResult {
    /// A success without an operation id.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: OperationStatus::Ok,
            code: codes::OK,
            message: String::new(),
            operation_id: None,
        }
    }

    /// A success carrying the confirmed operation id.
    #[must_use]
    pub fn ok_with_operation(id: &OperationId) -> Self {
        Self {
            operation_id: Some(id.to_string()),
            ..Self::ok()
        }
    }

    /// A failure with an explicit code.
    pub fn failed(code: u32, message: impl Into<String>) -> Self {
        debug_assert_ne!(code, codes::OK, "code 0 is reserved for success");
        Self {
            status: OperationStatus::Failed,
            code,
            message: message.into(),
            operation_id: None,
        }
    }

    /// A failure built from a component error.
    pub fn from_error<E: ErrorCode + ?Sized>(err: &E) -> Self {
        Self::failed(err.code(), err.to_string())
    }

    /// Attaches the operation id the failure relates to.
    #[must_use]
    pub fn with_operation(mut self, id: Option<&OperationId>) -> Self {
        self.operation_id = id.map(ToString::to_string);
        self
    }

    /// Returns true if the operation succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == OperationStatus::Ok
    }

    /// Returns true if the operation failed.
    #[must_use]
    pub fn is_error(&self) -> bool {
        !self.is_ok()
    }
}

impl Default for OperationResult {
    fn default() -> Self {
        Self::ok()
    }
}

impl fmt::Display for OperationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            OperationStatus::Ok => write!(f, "ok"),
            OperationStatus::Failed => write!(f, "failed [{}]: {}", self.code, self.message),
        }
    }
}

/// Errors parsing the textual form of an address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Text has the wrong length.
    #[error("Invalid address length: {actual} characters")]
    InvalidLength { actual: usize },

    /// Text is not valid base32.
    #[error("Invalid address encoding: {0}")]
    InvalidEncoding(String),

    /// Embedded checksum does not match the key.
    #[error("Address checksum mismatch")]
    ChecksumMismatch,
}

/// Errors parsing the external form of a linked contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkedContractParseError {
    /// No `@` separator present.
    #[error("Linked contract is missing the '@' separator")]
    MissingSeparator,

    /// Nothing before the separator.
    #[error("Linked contract has an empty stateless address")]
    EmptyAddress,

    /// The part after the separator is not a decimal index.
    #[error("Linked contract has an invalid stateful index: {0}")]
    InvalidIndex(String),
}
