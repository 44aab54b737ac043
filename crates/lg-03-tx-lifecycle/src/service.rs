//! # Transaction Lifecycle Service
//!
//! Drives one operation from suggested parameters to a terminal verdict:
//!
//! ```text
//! build ──→ sign ──→ submit ──→ await_confirmation
//!   │                  │               │
//!   └─ Params          └─ Submit       └─ Confirmed | PoolRejected | TimedOut
//!                                         | QueryFailed | Cancelled
//! ```
//!
//! The round wait inside the poll is the only suspension point. Nothing is
//! retried.

use std::sync::Arc;

use lg_02_key_gateway::SigningIdentity;
use shared_types::{Address, OperationId};
use tracing::{debug, info, instrument, warn};

use crate::domain::{
    CancellationSignal, ConfirmationOutcome, PendingOperation, SignedTransaction, TransactionKind,
    UnsignedTransaction, DEFAULT_CONFIRMATION_ROUNDS,
};
use crate::error::LifecycleError;
use crate::ports::{LedgerClient, PendingTransactionInfo};

/// A finalized operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    /// Id of the operation.
    pub id: OperationId,
    /// The ledger's report on it.
    pub info: PendingTransactionInfo,
}

/// Builds, signs, submits and confirms ledger operations.
pub struct TransactionLifecycleManager<L: LedgerClient> {
    ledger: Arc<L>,
    confirmation_rounds: u64,
}

impl<L: LedgerClient> Clone for TransactionLifecycleManager<L> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
            confirmation_rounds: self.confirmation_rounds,
        }
    }
}

impl<L: LedgerClient> TransactionLifecycleManager<L> {
    /// Creates a manager with the default round budget.
    pub fn new(ledger: Arc<L>) -> Self {
        Self {
            ledger,
            confirmation_rounds: DEFAULT_CONFIRMATION_ROUNDS,
        }
    }

    /// Sets the number of rounds the confirmation poll waits.
    #[must_use]
    pub fn with_confirmation_rounds(mut self, rounds: u64) -> Self {
        self.confirmation_rounds = rounds;
        self
    }

    /// The ledger client.
    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    /// Rounds the confirmation poll waits.
    #[must_use]
    pub fn confirmation_rounds(&self) -> u64 {
        self.confirmation_rounds
    }

    /// Builds a transaction from the ledger's suggested parameters.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::Params`] if the parameters cannot be fetched.
    pub async fn build(
        &self,
        sender: Address,
        kind: TransactionKind,
    ) -> Result<UnsignedTransaction, LifecycleError> {
        let params = self
            .ledger
            .suggested_params()
            .await
            .map_err(LifecycleError::Params)?;
        Ok(UnsignedTransaction::new(sender, &params, kind))
    }

    /// Encodes and signs a transaction.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::Encode`] if the transaction cannot be encoded.
    pub fn sign(
        &self,
        tx: &UnsignedTransaction,
        identity: &SigningIdentity,
    ) -> Result<SignedTransaction, LifecycleError> {
        SignedTransaction::sign(tx, identity)
    }

    /// Submits a signed transaction. One attempt.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::Submit`] on any ledger fault.
    #[instrument(skip(self, signed), fields(id = %signed.id))]
    pub async fn submit(&self, signed: &SignedTransaction) -> Result<PendingOperation, LifecycleError> {
        let id = self
            .ledger
            .submit(&signed.bytes)
            .await
            .inspect_err(|e| warn!(error = %e, "Submission failed"))
            .map_err(LifecycleError::Submit)?;

        if id != signed.id {
            warn!(assigned = %id, "Ledger assigned a different operation id");
        }
        info!(id = %id, "Transaction submitted");

        Ok(PendingOperation {
            id,
            first_valid: signed.first_valid,
        })
    }

    /// Polls the ledger until the operation reaches a verdict, the round
    /// budget runs out, a query fails or `cancel` is raised.
    #[instrument(skip(self, cancel), fields(rounds = self.confirmation_rounds))]
    pub async fn await_confirmation(
        &self,
        id: &OperationId,
        cancel: Option<&CancellationSignal>,
    ) -> ConfirmationOutcome {
        let start = match self.ledger.status().await {
            Ok(status) => status.last_round + 1,
            Err(e) => {
                warn!(error = %e, "Status query failed");
                return ConfirmationOutcome::QueryFailed(e);
            }
        };

        let mut round = start;
        while round < start + self.confirmation_rounds {
            if cancel.is_some_and(CancellationSignal::is_cancelled) {
                info!(round, "Confirmation wait cancelled");
                return ConfirmationOutcome::Cancelled;
            }

            let info = match self.ledger.pending_transaction_info(id).await {
                Ok(info) => info,
                Err(e) => {
                    warn!(round, error = %e, "Pending query failed");
                    return ConfirmationOutcome::QueryFailed(e);
                }
            };

            if info.is_confirmed() {
                info!(confirmed_round = info.confirmed_round, "Transaction confirmed");
                return ConfirmationOutcome::Confirmed(info);
            }
            if info.is_rejected() {
                warn!(reason = %info.pool_error, "Transaction rejected by pending pool");
                return ConfirmationOutcome::PoolRejected(info.pool_error);
            }

            debug!(round, "Still pending, waiting for next round");
            let waited = match cancel {
                Some(signal) => tokio::select! {
                    result = self.ledger.status_after_round(round) => result,
                    () = signal.cancelled() => {
                        info!(round, "Confirmation wait cancelled");
                        return ConfirmationOutcome::Cancelled;
                    }
                },
                None => self.ledger.status_after_round(round).await,
            };
            if let Err(e) = waited {
                warn!(round, error = %e, "Round wait failed");
                return ConfirmationOutcome::QueryFailed(e);
            }

            round += 1;
        }

        warn!("Transaction not confirmed within round budget");
        ConfirmationOutcome::TimedOut {
            rounds: self.confirmation_rounds,
        }
    }

    /// Builds, signs, submits and confirms in one call.
    ///
    /// # Errors
    ///
    /// Any [`LifecycleError`]; [`LifecycleError::phase`] tells whether the
    /// operation reached the ledger.
    #[instrument(skip_all, fields(sender = %identity.address(), kind = kind.type_tag()))]
    pub async fn execute(
        &self,
        identity: &SigningIdentity,
        kind: TransactionKind,
        note: Option<&[u8]>,
        cancel: Option<&CancellationSignal>,
    ) -> Result<Confirmation, LifecycleError> {
        let mut tx = self.build(identity.address(), kind).await?;
        if let Some(note) = note {
            tx = tx.with_note(note);
        }
        let signed = self.sign(&tx, identity)?;
        let pending = self.submit(&signed).await?;

        let id = pending.id;
        match self.await_confirmation(&id, cancel).await {
            ConfirmationOutcome::Confirmed(info) => Ok(Confirmation { id, info }),
            ConfirmationOutcome::PoolRejected(reason) => {
                Err(LifecycleError::PoolRejected { id, reason })
            }
            ConfirmationOutcome::TimedOut { rounds } => Err(LifecycleError::TimedOut { id, rounds }),
            ConfirmationOutcome::QueryFailed(source) => {
                Err(LifecycleError::QueryFailed { id, source })
            }
            ConfirmationOutcome::Cancelled => Err(LifecycleError::Cancelled { id }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{ConfirmationScript, InMemoryLedger, LedgerCall, GENESIS_ROUND};
    use crate::domain::{ApplicationCall, OnCompletion, TxState};
    use crate::error::{FailurePhase, LedgerError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    fn identity(fill: u8) -> SigningIdentity {
        SigningIdentity::from_seed(&[fill; 32])
    }

    fn setup() -> (Arc<InMemoryLedger>, TransactionLifecycleManager<InMemoryLedger>) {
        let ledger = Arc::new(InMemoryLedger::new());
        let manager = TransactionLifecycleManager::new(Arc::clone(&ledger));
        (ledger, manager)
    }

    fn payment(amount: u64) -> TransactionKind {
        TransactionKind::Payment {
            receiver: identity(2).address(),
            amount,
        }
    }

    async fn submitted(
        manager: &TransactionLifecycleManager<InMemoryLedger>,
    ) -> PendingOperation {
        let sender = identity(1);
        let tx = manager.build(sender.address(), payment(5)).await.unwrap();
        let signed = manager.sign(&tx, &sender).unwrap();
        manager.submit(&signed).await.unwrap()
    }

    #[tokio::test]
    async fn test_build_uses_flat_fee_and_params() {
        let (_, manager) = setup();
        let tx = manager
            .build(identity(1).address(), payment(10))
            .await
            .unwrap();

        assert_eq!(tx.fee, 1000);
        assert_eq!(tx.first_valid, GENESIS_ROUND);
        assert_eq!(tx.last_valid, GENESIS_ROUND + 1000);
    }

    #[tokio::test]
    async fn test_build_params_fault() {
        let (ledger, manager) = setup();
        ledger.set_fault(
            LedgerCall::SuggestedParams,
            LedgerError::Connection("down".into()),
        );
        let result = manager.build(identity(1).address(), payment(10)).await;
        assert!(matches!(result, Err(LifecycleError::Params(_))));
    }

    #[tokio::test]
    async fn test_submit_returns_local_id() {
        let (ledger, manager) = setup();
        let sender = identity(1);
        let tx = manager.build(sender.address(), payment(5)).await.unwrap();
        let signed = manager.sign(&tx, &sender).unwrap();

        let pending = manager.submit(&signed).await.unwrap();
        assert_eq!(pending.id, signed.id);
        assert_eq!(pending.first_valid, GENESIS_ROUND);
        assert_eq!(pending.first_valid, tx.first_valid);
        assert_eq!(ledger.submissions().len(), 1);
    }

    #[tokio::test]
    async fn test_confirmed_after_one_round() {
        let (ledger, manager) = setup();
        let pending = submitted(&manager).await;

        let outcome = manager.await_confirmation(&pending.id, None).await;
        assert_eq!(outcome.state(), TxState::Confirmed);
        assert_eq!(ledger.round_waits(), vec![GENESIS_ROUND + 1]);
    }

    #[tokio::test]
    async fn test_already_confirmed_needs_no_wait() {
        let (ledger, manager) = setup();
        ledger.script_next(ConfirmationScript::ConfirmAfter(0));
        let pending = submitted(&manager).await;

        let outcome = manager.await_confirmation(&pending.id, None).await;
        assert!(outcome.is_confirmed());
        assert!(ledger.round_waits().is_empty());
    }

    #[tokio::test]
    async fn test_timeout_waits_exactly_budget_rounds() {
        let (ledger, manager) = setup();
        ledger.script_next(ConfirmationScript::Never);
        let pending = submitted(&manager).await;

        let outcome = manager.await_confirmation(&pending.id, None).await;
        assert_eq!(outcome, ConfirmationOutcome::TimedOut { rounds: 4 });
        assert_eq!(
            ledger.round_waits(),
            vec![
                GENESIS_ROUND + 1,
                GENESIS_ROUND + 2,
                GENESIS_ROUND + 3,
                GENESIS_ROUND + 4
            ]
        );
    }

    #[tokio::test]
    async fn test_custom_round_budget() {
        let (ledger, manager) = setup();
        let manager = manager.with_confirmation_rounds(2);
        ledger.script_next(ConfirmationScript::Never);
        let pending = submitted(&manager).await;

        let outcome = manager.await_confirmation(&pending.id, None).await;
        assert_eq!(outcome, ConfirmationOutcome::TimedOut { rounds: 2 });
        assert_eq!(ledger.round_waits().len(), 2);
    }

    #[tokio::test]
    async fn test_confirmation_on_last_budget_round() {
        let (ledger, manager) = setup();
        // Confirmed once the ledger reaches GENESIS_ROUND + 3, observed at
        // the fourth query.
        ledger.script_next(ConfirmationScript::ConfirmAfter(3));
        let pending = submitted(&manager).await;

        let outcome = manager.await_confirmation(&pending.id, None).await;
        assert!(outcome.is_confirmed());
        assert_eq!(ledger.round_waits().len(), 3);
    }

    #[tokio::test]
    async fn test_pool_rejection() {
        let (ledger, manager) = setup();
        ledger.script_next(ConfirmationScript::Reject("overspend".into()));
        let pending = submitted(&manager).await;

        let outcome = manager.await_confirmation(&pending.id, None).await;
        assert_eq!(outcome, ConfirmationOutcome::PoolRejected("overspend".into()));
        assert!(ledger.round_waits().is_empty());
    }

    #[tokio::test]
    async fn test_pending_query_fault() {
        let (ledger, manager) = setup();
        let pending = submitted(&manager).await;
        ledger.set_fault(
            LedgerCall::PendingTransactionInfo,
            LedgerError::Connection("reset".into()),
        );

        let outcome = manager.await_confirmation(&pending.id, None).await;
        assert_eq!(outcome.state(), TxState::QueryFailed);
    }

    #[tokio::test]
    async fn test_round_wait_fault() {
        let (ledger, manager) = setup();
        ledger.script_next(ConfirmationScript::Never);
        let pending = submitted(&manager).await;
        ledger.set_fault(
            LedgerCall::StatusAfterRound,
            LedgerError::Connection("reset".into()),
        );

        let outcome = manager.await_confirmation(&pending.id, None).await;
        assert_eq!(outcome.state(), TxState::QueryFailed);
    }

    #[tokio::test]
    async fn test_raised_signal_stops_before_query() {
        let (ledger, manager) = setup();
        let pending = submitted(&manager).await;
        let signal = CancellationSignal::new();
        signal.cancel();

        let outcome = manager.await_confirmation(&pending.id, Some(&signal)).await;
        assert_eq!(outcome, ConfirmationOutcome::Cancelled);
        assert!(ledger.round_waits().is_empty());
    }

    /// Delegates to an in-memory ledger but never completes a round wait.
    struct StalledLedger {
        inner: InMemoryLedger,
        waits: parking_lot::Mutex<Vec<shared_types::Round>>,
        queries: AtomicUsize,
        waiting: Notify,
    }

    impl StalledLedger {
        fn new() -> Self {
            Self {
                inner: InMemoryLedger::new(),
                waits: parking_lot::Mutex::new(Vec::new()),
                queries: AtomicUsize::new(0),
                waiting: Notify::new(),
            }
        }
    }

    #[async_trait::async_trait]
    impl LedgerClient for StalledLedger {
        async fn suggested_params(&self) -> Result<crate::ports::SuggestedParams, LedgerError> {
            self.inner.suggested_params().await
        }

        async fn compile(&self, source: &str) -> Result<crate::ports::CompiledProgram, LedgerError> {
            self.inner.compile(source).await
        }

        async fn submit(&self, signed: &[u8]) -> Result<OperationId, LedgerError> {
            self.inner.submit(signed).await
        }

        async fn status(&self) -> Result<crate::ports::NodeStatus, LedgerError> {
            self.inner.status().await
        }

        async fn status_after_round(
            &self,
            round: shared_types::Round,
        ) -> Result<crate::ports::NodeStatus, LedgerError> {
            self.waits.lock().push(round);
            self.waiting.notify_one();
            std::future::pending().await
        }

        async fn pending_transaction_info(
            &self,
            id: &OperationId,
        ) -> Result<PendingTransactionInfo, LedgerError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.inner.pending_transaction_info(id).await
        }

        async fn account_info(
            &self,
            address: &Address,
        ) -> Result<crate::ports::AccountInfo, LedgerError> {
            self.inner.account_info(address).await
        }
    }

    #[tokio::test]
    async fn test_signal_raised_during_round_wait() {
        let ledger = Arc::new(StalledLedger::new());
        let manager = TransactionLifecycleManager::new(Arc::clone(&ledger));
        let sender = identity(1);
        let tx = manager.build(sender.address(), payment(5)).await.unwrap();
        let signed = manager.sign(&tx, &sender).unwrap();
        let pending = manager.submit(&signed).await.unwrap();

        let signal = CancellationSignal::new();
        let poll = {
            let manager = manager.clone();
            let signal = signal.clone();
            tokio::spawn(async move { manager.await_confirmation(&pending.id, Some(&signal)).await })
        };

        ledger.waiting.notified().await;
        signal.cancel();
        let outcome = tokio::time::timeout(Duration::from_secs(1), poll)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(outcome, ConfirmationOutcome::Cancelled);
        assert_eq!(*ledger.waits.lock(), vec![GENESIS_ROUND + 1]);
        assert_eq!(ledger.queries.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_submit_fault_skips_poll() {
        let (ledger, manager) = setup();
        ledger.set_fault(LedgerCall::Submit, LedgerError::Connection("down".into()));

        let err = manager
            .execute(&identity(1), payment(5), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, LifecycleError::Submit(_)));
        assert_eq!(err.phase(), FailurePhase::Submission);
        assert!(ledger.round_waits().is_empty());
    }

    #[tokio::test]
    async fn test_execute_confirmed() {
        let (ledger, manager) = setup();
        let confirmation = manager
            .execute(&identity(1), payment(5), Some(&b"hello"[..]), None)
            .await
            .unwrap();

        assert!(confirmation.info.is_confirmed());
        let recorded = ledger.submissions();
        assert_eq!(recorded[0].id, confirmation.id);
        assert_eq!(recorded[0].note, b"hello");
    }

    #[tokio::test]
    async fn test_execute_timeout_carries_id() {
        let (ledger, manager) = setup();
        ledger.script_next(ConfirmationScript::Never);

        let err = manager
            .execute(&identity(1), payment(5), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, LifecycleError::TimedOut { rounds: 4, .. }));
        assert_eq!(err.phase(), FailurePhase::Confirmation);
        assert_eq!(err.operation_id(), Some(&ledger.submissions()[0].id));
    }

    #[tokio::test]
    async fn test_execute_create_reports_application_index() {
        let (_, manager) = setup();
        let create = ApplicationCall::create(
            vec![1],
            vec![2],
            crate::domain::StateSchema::new(5, 5),
            crate::domain::StateSchema::new(5, 5),
        );
        let confirmation = manager
            .execute(&identity(1), TransactionKind::ApplicationCall(create), None, None)
            .await
            .unwrap();
        assert!(confirmation.info.application_index.is_some());

        let call = ApplicationCall::call(1, OnCompletion::OptIn);
        let confirmation = manager
            .execute(&identity(1), TransactionKind::ApplicationCall(call), None, None)
            .await
            .unwrap();
        assert_eq!(confirmation.info.application_index, None);
    }
}
