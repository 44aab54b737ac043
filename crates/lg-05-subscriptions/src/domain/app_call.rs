//! # Application Call Kinds
//!
//! The six calls a participant makes against a deployed contract, each
//! mapped to one shape of [`ApplicationCall`] by a single builder.
//!
//! | Kind | On-completion | Argument | Account reference |
//! |------|---------------|----------|-------------------|
//! | opt-in | `OptIn` | - | - |
//! | opt-out | `CloseOut` | - | - |
//! | subscribe | `NoOp` | `subscribe` | - |
//! | unsubscribe | `NoOp` | `unsubscribe` | - |
//! | grant | `NoOp` | `grant` | target |
//! | revoke | `NoOp` | `revoke` | target |

use std::fmt;

use lg_03_tx_lifecycle::{ApplicationCall, OnCompletion};
use shared_types::{codes, Address, ApplicationIndex};

/// Prefix of every call note.
pub const NOTE_PREFIX: &str = "DOP";

/// A call against a deployed contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppCallKind {
    /// Allocate local state for the caller.
    OptIn,
    /// Release the caller's local state.
    OptOut,
    /// Start a subscription.
    Subscribe,
    /// End a subscription.
    Unsubscribe,
    /// Publisher grants access to `target`.
    Grant {
        /// Subscriber being granted.
        target: Address,
    },
    /// Publisher revokes access from `target`.
    Revoke {
        /// Subscriber being revoked.
        target: Address,
    },
}

impl AppCallKind {
    /// Operation name, also the argument of no-op calls.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::OptIn => "optin",
            Self::OptOut => "optout",
            Self::Subscribe => "subscribe",
            Self::Unsubscribe => "unsubscribe",
            Self::Grant { .. } => "grant",
            Self::Revoke { .. } => "revoke",
        }
    }

    /// Completion action of the call.
    #[must_use]
    pub fn on_completion(&self) -> OnCompletion {
        match self {
            Self::OptIn => OnCompletion::OptIn,
            Self::OptOut => OnCompletion::CloseOut,
            _ => OnCompletion::NoOp,
        }
    }

    /// Account the call acts on besides the caller.
    #[must_use]
    pub fn target(&self) -> Option<Address> {
        match self {
            Self::Grant { target } | Self::Revoke { target } => Some(*target),
            _ => None,
        }
    }

    /// Code reported when the call cannot be submitted.
    #[must_use]
    pub fn submit_code(&self) -> u32 {
        match self {
            Self::OptIn => codes::OPT_IN_SUBMIT_FAILED,
            Self::OptOut => codes::OPT_OUT_SUBMIT_FAILED,
            Self::Subscribe => codes::SUBSCRIBE_SUBMIT_FAILED,
            Self::Unsubscribe => codes::UNSUBSCRIBE_SUBMIT_FAILED,
            Self::Grant { .. } => codes::GRANT_SUBMIT_FAILED,
            Self::Revoke { .. } => codes::REVOKE_SUBMIT_FAILED,
        }
    }

    /// Code reported when the call is submitted but not confirmed.
    #[must_use]
    pub fn confirm_code(&self) -> u32 {
        match self {
            Self::OptIn => codes::OPT_IN_CONFIRM_FAILED,
            Self::OptOut => codes::OPT_OUT_CONFIRM_FAILED,
            Self::Subscribe => codes::SUBSCRIBE_CONFIRM_FAILED,
            Self::Unsubscribe => codes::UNSUBSCRIBE_CONFIRM_FAILED,
            Self::Grant { .. } => codes::GRANT_CONFIRM_FAILED,
            Self::Revoke { .. } => codes::REVOKE_CONFIRM_FAILED,
        }
    }

    /// Note attached to the transaction, e.g. `DOP SUBSCRIBE`.
    #[must_use]
    pub fn note(&self) -> Vec<u8> {
        format!("{NOTE_PREFIX} {}", self.name().to_uppercase()).into_bytes()
    }

    /// Builds the application call against `app_id`.
    #[must_use]
    pub fn to_call(&self, app_id: ApplicationIndex) -> ApplicationCall {
        let on_completion = self.on_completion();
        let mut call = ApplicationCall::call(app_id, on_completion);
        if on_completion == OnCompletion::NoOp {
            call = call.with_arg(self.name().as_bytes());
        }
        if let Some(target) = self.target() {
            call = call.with_account(target);
        }
        call
    }
}

impl fmt::Display for AppCallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
