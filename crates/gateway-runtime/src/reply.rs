//! # Gateway Replies
//!
//! Every public operation answers with exactly one [`OperationResult`],
//! plus the artifact it produced when it succeeded.

use shared_types::{OperationId, OperationResult};

use crate::error::SessionError;

/// Result of a public gateway operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayReply<T> {
    /// Artifact produced; `None` on failure.
    pub value: Option<T>,
    /// Outcome of the operation.
    pub result: OperationResult,
}

impl<T> GatewayReply<T> {
    /// A successful reply.
    pub fn ok(value: T, operation: Option<&OperationId>) -> Self {
        Self {
            value: Some(value),
            result: OperationResult::ok().with_operation(operation),
        }
    }

    /// A failed reply carrying the error's code and message.
    pub fn failed(error: &SessionError) -> Self {
        Self {
            value: None,
            result: OperationResult::from_error(error).with_operation(error.operation_id()),
        }
    }

    /// Returns true if the operation succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Numeric result code; 0 on success.
    #[must_use]
    pub fn code(&self) -> u32 {
        self.result.code
    }

    /// Splits the reply into its artifact and result.
    pub fn into_parts(self) -> (Option<T>, OperationResult) {
        (self.value, self.result)
    }
}

impl<T> From<Result<T, SessionError>> for GatewayReply<T> {
    fn from(outcome: Result<T, SessionError>) -> Self {
        match outcome {
            Ok(value) => Self::ok(value, None),
            Err(e) => Self::failed(&e),
        }
    }
}
