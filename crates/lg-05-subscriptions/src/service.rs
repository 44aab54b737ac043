//! # Subscription Service
//!
//! Every call takes the same path: derive the caller's identity, build the
//! call from its [`AppCallKind`], then submit and confirm it through the
//! lifecycle manager.

use lg_02_key_gateway::SigningIdentity;
use lg_03_tx_lifecycle::{
    CancellationSignal, FailurePhase, LedgerClient, TransactionKind, TransactionLifecycleManager,
};
use shared_types::{Address, ApplicationIndex, OperationId};
use tracing::{info, instrument, warn};

use crate::domain::AppCallKind;
use crate::error::SubscriptionError;

/// Calls against deployed contracts.
pub struct SubscriptionOperations<L: LedgerClient> {
    lifecycle: TransactionLifecycleManager<L>,
}

impl<L: LedgerClient> Clone for SubscriptionOperations<L> {
    fn clone(&self) -> Self {
        Self {
            lifecycle: self.lifecycle.clone(),
        }
    }
}

impl<L: LedgerClient> SubscriptionOperations<L> {
    /// Creates the operations over `lifecycle`.
    pub fn new(lifecycle: TransactionLifecycleManager<L>) -> Self {
        Self { lifecycle }
    }

    /// Signs `kind` against `app_id` with the holder of `secret_phrase` and
    /// waits for confirmation.
    ///
    /// # Errors
    ///
    /// [`SubscriptionError::MalformedPhrase`], then
    /// [`SubscriptionError::Submit`] or [`SubscriptionError::Confirm`]
    /// carrying the kind's code.
    #[instrument(skip(self, secret_phrase, cancel), fields(kind = %kind))]
    pub async fn execute(
        &self,
        secret_phrase: &str,
        app_id: ApplicationIndex,
        kind: AppCallKind,
        cancel: Option<&CancellationSignal>,
    ) -> Result<OperationId, SubscriptionError> {
        let caller = SigningIdentity::from_secret_phrase(secret_phrase)?;
        let call = kind.to_call(app_id);
        let note = kind.note();

        let confirmation = self
            .lifecycle
            .execute(
                &caller,
                TransactionKind::ApplicationCall(call),
                Some(note.as_slice()),
                cancel,
            )
            .await
            .map_err(|source| match source.phase() {
                FailurePhase::Submission => SubscriptionError::Submit { kind, source },
                FailurePhase::Confirmation => SubscriptionError::Confirm { kind, source },
            })
            .inspect_err(|e| warn!(error = %e, "Application call failed"))?;

        info!(id = %confirmation.id, caller = %caller.address(), "Application call confirmed");
        Ok(confirmation.id)
    }

    /// Opts the caller into `app_id`.
    ///
    /// # Errors
    ///
    /// See [`SubscriptionOperations::execute`]; codes 205 / 302.
    pub async fn opt_in(
        &self,
        secret_phrase: &str,
        app_id: ApplicationIndex,
    ) -> Result<OperationId, SubscriptionError> {
        self.execute(secret_phrase, app_id, AppCallKind::OptIn, None)
            .await
    }

    /// Opts the caller out of `app_id`.
    ///
    /// # Errors
    ///
    /// See [`SubscriptionOperations::execute`]; codes 206 / 303.
    pub async fn opt_out(
        &self,
        secret_phrase: &str,
        app_id: ApplicationIndex,
    ) -> Result<OperationId, SubscriptionError> {
        self.execute(secret_phrase, app_id, AppCallKind::OptOut, None)
            .await
    }

    /// Subscribes the caller to `app_id`.
    ///
    /// # Errors
    ///
    /// See [`SubscriptionOperations::execute`]; codes 207 / 304.
    pub async fn subscribe(
        &self,
        secret_phrase: &str,
        app_id: ApplicationIndex,
    ) -> Result<OperationId, SubscriptionError> {
        self.execute(secret_phrase, app_id, AppCallKind::Subscribe, None)
            .await
    }

    /// Ends the caller's subscription to `app_id`.
    ///
    /// # Errors
    ///
    /// See [`SubscriptionOperations::execute`]; codes 208 / 305.
    pub async fn unsubscribe(
        &self,
        secret_phrase: &str,
        app_id: ApplicationIndex,
    ) -> Result<OperationId, SubscriptionError> {
        self.execute(secret_phrase, app_id, AppCallKind::Unsubscribe, None)
            .await
    }

    /// Grants `target` access to `app_id`.
    ///
    /// # Errors
    ///
    /// See [`SubscriptionOperations::execute`]; codes 209 / 306.
    pub async fn grant(
        &self,
        secret_phrase: &str,
        app_id: ApplicationIndex,
        target: Address,
    ) -> Result<OperationId, SubscriptionError> {
        self.execute(secret_phrase, app_id, AppCallKind::Grant { target }, None)
            .await
    }

    /// Revokes access to `app_id` from `target`.
    ///
    /// # Errors
    ///
    /// See [`SubscriptionOperations::execute`]; codes 210 / 307.
    pub async fn revoke(
        &self,
        secret_phrase: &str,
        app_id: ApplicationIndex,
        target: Address,
    ) -> Result<OperationId, SubscriptionError> {
        self.execute(secret_phrase, app_id, AppCallKind::Revoke { target }, None)
            .await
    }
}
