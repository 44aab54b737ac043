//! # Gateway Session
//!
//! An open session owns the ledger and key-custody clients and the
//! components built on them. Operations are methods on the session; after
//! [`Session::close`] every operation answers with code 1.
//!
//! ## Opening
//!
//! ```text
//! resolve ledger endpoint (20/21/24) → probe status (23)
//!   → resolve key-custody endpoint (20/21/24) → probe versions (22)
//! ```

use std::sync::Arc;

use lg_01_connection::{ConnectionResolver, GatewayConfig, ServiceKind};
use lg_02_key_gateway::{KeyCustodyClient, KeyGateway, KmdHttpClient, NewAccount, SigningIdentity};
use lg_03_tx_lifecycle::{
    AlgodHttpClient, CancellationSignal, LedgerClient, TransactionKind, TransactionLifecycleManager,
};
use lg_04_contract_deployment::ContractDeploymentOrchestrator;
use lg_05_subscriptions::{AppCallKind, SubscriptionOperations};
use shared_types::{Address, ApplicationIndex, LinkedContract, OperationId, OperationResult};
use tracing::{info, instrument, warn};
use zeroize::Zeroizing;

use crate::error::SessionError;
use crate::reply::GatewayReply;

/// Note attached to funding payments.
pub const FUNDING_NOTE: &[u8] = b"DOP funds";

struct Connected<L: LedgerClient, K: KeyCustodyClient> {
    lifecycle: TransactionLifecycleManager<L>,
    keys: KeyGateway<K>,
    deployment: ContractDeploymentOrchestrator<L>,
    subscriptions: SubscriptionOperations<L>,
}

/// A gateway session.
pub struct Session<L: LedgerClient = AlgodHttpClient, K: KeyCustodyClient = KmdHttpClient> {
    config: GatewayConfig,
    connected: Option<Connected<L, K>>,
}

impl Session {
    /// Resolves both endpoints, probes both services and opens a session
    /// over HTTP.
    ///
    /// # Errors
    ///
    /// Credential failures (20, 21, 24), [`SessionError::LedgerInit`] (23)
    /// or [`SessionError::KeystoreInit`] (22).
    #[instrument(skip_all)]
    pub async fn open(config: GatewayConfig) -> Result<Self, SessionError> {
        let ledger_endpoint =
            ConnectionResolver::new(ServiceKind::Ledger, config.ledger.clone()).resolve_endpoint()?;
        let ledger = AlgodHttpClient::new(ledger_endpoint.base_url(), ledger_endpoint.token.clone())
            .map_err(SessionError::LedgerInit)?;
        probe_ledger(&ledger).await?;

        let keystore_endpoint =
            ConnectionResolver::new(ServiceKind::Keystore, config.keystore.clone())
                .resolve_endpoint()?;
        let custody =
            KmdHttpClient::new(keystore_endpoint.base_url(), keystore_endpoint.token.clone())
                .map_err(SessionError::KeystoreInit)?;
        probe_keystore(&custody).await?;

        info!(
            ledger = %ledger_endpoint.base_url(),
            keystore = %keystore_endpoint.base_url(),
            "Session opened"
        );
        Ok(Self::from_parts(config, Arc::new(ledger), Some(Arc::new(custody))))
    }
}

async fn probe_ledger<L: LedgerClient>(ledger: &L) -> Result<(), SessionError> {
    ledger
        .status()
        .await
        .map(|_| ())
        .inspect_err(|e| warn!(error = %e, "Ledger status probe failed"))
        .map_err(SessionError::LedgerInit)
}

async fn probe_keystore<K: KeyCustodyClient>(custody: &K) -> Result<(), SessionError> {
    custody
        .versions()
        .await
        .map(|_| ())
        .inspect_err(|e| warn!(error = %e, "Key custody probe failed"))
        .map_err(SessionError::KeystoreInit)
}

impl<L: LedgerClient, K: KeyCustodyClient> Session<L, K> {
    /// Probes the given clients and opens a session over them.
    ///
    /// # Errors
    ///
    /// [`SessionError::LedgerInit`] or [`SessionError::KeystoreInit`].
    pub async fn connect(
        config: GatewayConfig,
        ledger: Arc<L>,
        custody: Option<Arc<K>>,
    ) -> Result<Self, SessionError> {
        probe_ledger(ledger.as_ref()).await?;
        if let Some(custody) = &custody {
            probe_keystore(custody.as_ref()).await?;
        }
        Ok(Self::from_parts(config, ledger, custody))
    }

    /// Opens a session over already-checked clients. Without a custody
    /// client, key operations answer with code 2.
    pub fn from_parts(config: GatewayConfig, ledger: Arc<L>, custody: Option<Arc<K>>) -> Self {
        let lifecycle = TransactionLifecycleManager::new(ledger)
            .with_confirmation_rounds(config.confirmation_rounds);
        let keys = custody.map_or_else(KeyGateway::unconfigured, KeyGateway::new);
        let deployment =
            ContractDeploymentOrchestrator::new(lifecycle.clone(), config.contracts.clone());
        let subscriptions = SubscriptionOperations::new(lifecycle.clone());

        Self {
            config,
            connected: Some(Connected {
                lifecycle,
                keys,
                deployment,
                subscriptions,
            }),
        }
    }

    /// Releases the clients. Further operations answer with code 1.
    pub fn close(&mut self) -> OperationResult {
        if self.connected.take().is_some() {
            info!("Session closed");
        }
        OperationResult::ok()
    }

    /// Returns true until [`Session::close`] is called.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.connected.is_some()
    }

    /// Configuration the session was opened with.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn connected(&self) -> Result<&Connected<L, K>, SessionError> {
        self.connected.as_ref().ok_or(SessionError::NotConnected)
    }

    // =========================================================================
    // ACCOUNTS
    // =========================================================================

    /// Balance of `address` in micro-units.
    ///
    /// Codes: 1, 204.
    #[instrument(skip(self), fields(address = %address))]
    pub async fn account_balance(&self, address: &Address) -> GatewayReply<u64> {
        let outcome = async {
            let connected = self.connected()?;
            let info = connected
                .lifecycle
                .ledger()
                .account_info(address)
                .await
                .map_err(SessionError::Balance)?;
            Ok::<_, SessionError>(info.amount)
        };
        outcome.await.into()
    }

    /// Pays `amount` micro-units from the owner account to `receiver`.
    ///
    /// Codes: 1, 201, 10, 200, 301.
    #[instrument(skip(self), fields(receiver = %receiver))]
    pub async fn fund_account(&self, receiver: &Address, amount: u64) -> GatewayReply<OperationId> {
        let outcome = async {
            let connected = self.connected()?;
            let phrase = self
                .config
                .owner_secret_phrase
                .as_deref()
                .ok_or(SessionError::OwnerSecretMissing)?;
            let owner = SigningIdentity::from_secret_phrase(phrase)?;

            let payment = TransactionKind::Payment {
                receiver: *receiver,
                amount,
            };
            let confirmation = connected
                .lifecycle
                .execute(&owner, payment, Some(FUNDING_NOTE), None)
                .await
                .map_err(SessionError::Payment)?;
            Ok::<_, SessionError>(confirmation.id)
        };
        operation_reply(outcome.await)
    }

    /// Creates an account in the configured user wallet.
    ///
    /// Codes: 1, 2, 101, 102, 203.
    #[instrument(skip(self))]
    pub async fn create_account(&self) -> GatewayReply<NewAccount> {
        let outcome = async {
            let connected = self.connected()?;
            let wallet = &self.config.user_wallet;
            let account = connected
                .keys
                .create_account(&wallet.name, &wallet.password)
                .await?;
            info!(address = %account.address, "Account created");
            Ok::<_, SessionError>(account)
        };
        outcome.await.into()
    }

    /// Exports the secret phrase of `address` from the named wallet.
    ///
    /// Codes: 1, 2, 101, 102.
    #[instrument(skip(self, password, address), fields(address = %address))]
    pub async fn export_account_secret_phrase(
        &self,
        wallet_name: &str,
        password: &str,
        address: &Address,
    ) -> GatewayReply<Zeroizing<String>> {
        let outcome = async {
            let connected = self.connected()?;
            Ok::<_, SessionError>(
                connected
                    .keys
                    .export_account_secret_phrase(wallet_name, password, address)
                    .await?,
            )
        };
        outcome.await.into()
    }

    // =========================================================================
    // CONTRACTS
    // =========================================================================

    /// Deploys a linked contract owned by the holder of `secret_phrase`.
    ///
    /// Codes: 1, 10, 3 to 8, 120, 308.
    pub async fn deploy_contract(&self, secret_phrase: &str) -> GatewayReply<LinkedContract> {
        self.deploy_contract_with_cancel(secret_phrase, None).await
    }

    /// [`Session::deploy_contract`] with a cancellation signal for the
    /// confirmation wait.
    #[instrument(skip_all)]
    pub async fn deploy_contract_with_cancel(
        &self,
        secret_phrase: &str,
        cancel: Option<&CancellationSignal>,
    ) -> GatewayReply<LinkedContract> {
        let outcome = async {
            let connected = self.connected()?;
            Ok::<_, SessionError>(connected.deployment.deploy(secret_phrase, cancel).await?)
        };
        match outcome.await {
            Ok(deployment) => GatewayReply::ok(deployment.contract, Some(&deployment.operation_id)),
            Err(e) => GatewayReply::failed(&e),
        }
    }

    /// Signs and confirms `kind` against `app_id`.
    ///
    /// Codes: 1, 10, and the kind's submit and confirm codes.
    #[instrument(skip(self, secret_phrase, cancel), fields(kind = %kind))]
    pub async fn call_contract(
        &self,
        secret_phrase: &str,
        app_id: ApplicationIndex,
        kind: AppCallKind,
        cancel: Option<&CancellationSignal>,
    ) -> GatewayReply<OperationId> {
        let outcome = async {
            let connected = self.connected()?;
            Ok::<_, SessionError>(
                connected
                    .subscriptions
                    .execute(secret_phrase, app_id, kind, cancel)
                    .await?,
            )
        };
        operation_reply(outcome.await)
    }

    /// Opts the caller into `app_id` (205 / 302).
    pub async fn opt_in(&self, secret_phrase: &str, app_id: ApplicationIndex) -> GatewayReply<OperationId> {
        self.call_contract(secret_phrase, app_id, AppCallKind::OptIn, None)
            .await
    }

    /// Opts the caller out of `app_id` (206 / 303).
    pub async fn opt_out(&self, secret_phrase: &str, app_id: ApplicationIndex) -> GatewayReply<OperationId> {
        self.call_contract(secret_phrase, app_id, AppCallKind::OptOut, None)
            .await
    }

    /// Subscribes the caller to `app_id` (207 / 304).
    pub async fn subscribe(&self, secret_phrase: &str, app_id: ApplicationIndex) -> GatewayReply<OperationId> {
        self.call_contract(secret_phrase, app_id, AppCallKind::Subscribe, None)
            .await
    }

    /// Ends the caller's subscription to `app_id` (208 / 305).
    pub async fn unsubscribe(
        &self,
        secret_phrase: &str,
        app_id: ApplicationIndex,
    ) -> GatewayReply<OperationId> {
        self.call_contract(secret_phrase, app_id, AppCallKind::Unsubscribe, None)
            .await
    }

    /// Grants `target` access to `app_id` (209 / 306).
    pub async fn grant(
        &self,
        secret_phrase: &str,
        app_id: ApplicationIndex,
        target: Address,
    ) -> GatewayReply<OperationId> {
        self.call_contract(secret_phrase, app_id, AppCallKind::Grant { target }, None)
            .await
    }

    /// Revokes access to `app_id` from `target` (210 / 307).
    pub async fn revoke(
        &self,
        secret_phrase: &str,
        app_id: ApplicationIndex,
        target: Address,
    ) -> GatewayReply<OperationId> {
        self.call_contract(secret_phrase, app_id, AppCallKind::Revoke { target }, None)
            .await
    }
}

fn operation_reply(outcome: Result<OperationId, SessionError>) -> GatewayReply<OperationId> {
    match outcome {
        Ok(id) => {
            let operation = id.clone();
            GatewayReply::ok(id, Some(&operation))
        }
        Err(e) => GatewayReply::failed(&e),
    }
}
