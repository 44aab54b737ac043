//! # Key Gateway Service
//!
//! Wallet lookups and key export against the key-custody port. The custody
//! client is optional: a gateway without one rejects every custody operation
//! with [`KeyGatewayError::CustodyNotConfigured`].

use std::fmt;
use std::sync::Arc;

use shared_types::Address;
use tracing::{info, instrument, warn};
use zeroize::Zeroizing;

use crate::domain::encode_seed;
use crate::error::{KeyCustodyError, KeyGatewayError};
use crate::ports::KeyCustodyClient;

/// A freshly created account.
pub struct NewAccount {
    /// Address of the account.
    pub address: Address,
    /// Secret phrase controlling the account.
    pub secret_phrase: Zeroizing<String>,
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Access to accounts held by the key-custody service.
pub struct KeyGateway<K: KeyCustodyClient> {
    custody: Option<Arc<K>>,
}

impl<K: KeyCustodyClient> Clone for KeyGateway<K> {
    fn clone(&self) -> Self {
        Self {
            custody: self.custody.clone(),
        }
    }
}

impl<K: KeyCustodyClient> KeyGateway<K> {
    /// Creates a gateway backed by `custody`.
    pub fn new(custody: Arc<K>) -> Self {
        Self {
            custody: Some(custody),
        }
    }

    /// Creates a gateway with no custody service.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { custody: None }
    }

    /// Returns true if a custody client is present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.custody.is_some()
    }

    fn custody(&self) -> Result<&K, KeyGatewayError> {
        self.custody
            .as_deref()
            .ok_or(KeyGatewayError::CustodyNotConfigured)
    }

    /// Id of the first wallet named exactly `wallet_name`.
    async fn wallet_id(
        custody: &K,
        wallet_name: &str,
    ) -> Result<Option<String>, KeyCustodyError> {
        let wallets = custody.list_wallets().await?;
        Ok(wallets
            .into_iter()
            .find(|w| w.name == wallet_name)
            .map(|w| w.id))
    }

    async fn export_phrase(
        custody: &K,
        wallet_id: &str,
        password: &str,
        address: &Address,
    ) -> Result<Zeroizing<String>, KeyCustodyError> {
        let handle = custody.init_wallet_handle(wallet_id, password).await?;
        let seed = custody.export_key(&handle, password, address).await?;
        Ok(encode_seed(&seed))
    }

    /// Exports the secret phrase of `address` from the named wallet.
    ///
    /// # Errors
    ///
    /// - [`KeyGatewayError::CustodyNotConfigured`] without a custody client
    /// - [`KeyGatewayError::WalletNotFound`] if no wallet has that name
    /// - [`KeyGatewayError::KeyExport`] on any custody fault
    #[instrument(skip(self, password, address), fields(address = %address))]
    pub async fn export_account_secret_phrase(
        &self,
        wallet_name: &str,
        password: &str,
        address: &Address,
    ) -> Result<Zeroizing<String>, KeyGatewayError> {
        let custody = self.custody()?;

        let wallet_id = Self::wallet_id(custody, wallet_name)
            .await
            .map_err(KeyGatewayError::KeyExport)?
            .ok_or_else(|| KeyGatewayError::WalletNotFound {
                name: wallet_name.to_string(),
            })?;

        Self::export_phrase(custody, &wallet_id, password, address)
            .await
            .inspect_err(|e| warn!(error = %e, "Key export failed"))
            .map_err(KeyGatewayError::KeyExport)
    }

    /// Generates a new account in the named wallet and exports its phrase.
    ///
    /// # Errors
    ///
    /// - [`KeyGatewayError::CustodyNotConfigured`] without a custody client
    /// - [`KeyGatewayError::WalletNotFound`] if no wallet has that name
    /// - [`KeyGatewayError::CreateAccount`] on any other custody fault,
    ///   typically a wrong password
    #[instrument(skip(self, password))]
    pub async fn create_account(
        &self,
        wallet_name: &str,
        password: &str,
    ) -> Result<NewAccount, KeyGatewayError> {
        let custody = self.custody()?;

        let wallet_id = Self::wallet_id(custody, wallet_name)
            .await
            .map_err(KeyGatewayError::CreateAccount)?
            .ok_or_else(|| KeyGatewayError::WalletNotFound {
                name: wallet_name.to_string(),
            })?;

        let create = async {
            let handle = custody.init_wallet_handle(&wallet_id, password).await?;
            let address = custody.generate_key(&handle).await?;
            let secret_phrase = Self::export_phrase(custody, &wallet_id, password, &address).await?;
            Ok::<_, KeyCustodyError>(NewAccount {
                address,
                secret_phrase,
            })
        };

        let account = create.await.map_err(|e| {
            warn!(error = %e, "Account creation failed");
            KeyGatewayError::CreateAccount(e)
        })?;

        info!(address = %account.address, "Account created");
        Ok(account)
    }
}
