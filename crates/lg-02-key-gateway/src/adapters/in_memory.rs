//! # In-Memory Key Custody
//!
//! Key-custody implementation for testing. Wallets, keys and handles live in
//! process memory; the service can be switched offline to exercise faults.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use rand::rngs::OsRng;
use rand::RngCore;
use shared_types::Address;
use zeroize::Zeroizing;

use crate::domain::{SigningIdentity, SEED_LEN};
use crate::error::KeyCustodyError;
use crate::ports::{KeyCustodyClient, WalletHandle, WalletSummary};

struct Wallet {
    name: String,
    password: String,
    keys: HashMap<Address, Zeroizing<[u8; SEED_LEN]>>,
}

/// In-memory key custody for testing.
#[derive(Default)]
pub struct InMemoryKeyCustody {
    wallets: RwLock<HashMap<String, Wallet>>,
    /// Handle token -> wallet id.
    handles: RwLock<HashMap<String, String>>,
    next_id: AtomicU64,
    offline: AtomicBool,
}

impl InMemoryKeyCustody {
    /// Creates a service with no wallets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a wallet and returns its id.
    pub fn add_wallet(&self, name: &str, password: &str) -> String {
        let id = format!("wallet-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.wallets.write().insert(
            id.clone(),
            Wallet {
                name: name.to_string(),
                password: password.to_string(),
                keys: HashMap::new(),
            },
        );
        id
    }

    /// Stores a known seed in a wallet and returns its address.
    pub fn import_seed(&self, wallet_id: &str, seed: [u8; SEED_LEN]) -> Option<Address> {
        let address = SigningIdentity::from_seed(&seed).address();
        let mut wallets = self.wallets.write();
        let wallet = wallets.get_mut(wallet_id)?;
        wallet.keys.insert(address, Zeroizing::new(seed));
        Some(address)
    }

    /// Number of keys held by a wallet.
    #[must_use]
    pub fn key_count(&self, wallet_id: &str) -> usize {
        self.wallets
            .read()
            .get(wallet_id)
            .map_or(0, |w| w.keys.len())
    }

    /// Makes every call fail with a connection error while `offline`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<(), KeyCustodyError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(KeyCustodyError::Connection("service offline".into()));
        }
        Ok(())
    }

    fn wallet_for(&self, handle: &WalletHandle) -> Result<String, KeyCustodyError> {
        self.handles
            .read()
            .get(handle.as_str())
            .cloned()
            .ok_or_else(|| KeyCustodyError::Api {
                status: 401,
                message: "invalid wallet handle".into(),
            })
    }
}

#[async_trait]
impl KeyCustodyClient for InMemoryKeyCustody {
    async fn versions(&self) -> Result<Vec<String>, KeyCustodyError> {
        self.ensure_online()?;
        Ok(vec!["v1".to_string()])
    }

    async fn list_wallets(&self) -> Result<Vec<WalletSummary>, KeyCustodyError> {
        self.ensure_online()?;
        let mut wallets: Vec<WalletSummary> = self
            .wallets
            .read()
            .iter()
            .map(|(id, w)| WalletSummary {
                id: id.clone(),
                name: w.name.clone(),
            })
            .collect();
        wallets.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(wallets)
    }

    async fn init_wallet_handle(
        &self,
        wallet_id: &str,
        password: &str,
    ) -> Result<WalletHandle, KeyCustodyError> {
        self.ensure_online()?;
        {
            let wallets = self.wallets.read();
            let wallet = wallets.get(wallet_id).ok_or_else(|| KeyCustodyError::Api {
                status: 404,
                message: format!("wallet {wallet_id} not found"),
            })?;
            if wallet.password != password {
                return Err(KeyCustodyError::WrongPassword);
            }
        }

        let token = format!("handle-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.handles
            .write()
            .insert(token.clone(), wallet_id.to_string());
        Ok(WalletHandle::new(token))
    }

    async fn export_key(
        &self,
        handle: &WalletHandle,
        password: &str,
        address: &Address,
    ) -> Result<Zeroizing<[u8; SEED_LEN]>, KeyCustodyError> {
        self.ensure_online()?;
        let wallet_id = self.wallet_for(handle)?;
        let wallets = self.wallets.read();
        let wallet = wallets
            .get(&wallet_id)
            .ok_or_else(|| KeyCustodyError::KeyNotFound(address.encode()))?;
        if wallet.password != password {
            return Err(KeyCustodyError::WrongPassword);
        }
        wallet
            .keys
            .get(address)
            .cloned()
            .ok_or_else(|| KeyCustodyError::KeyNotFound(address.encode()))
    }

    async fn generate_key(&self, handle: &WalletHandle) -> Result<Address, KeyCustodyError> {
        self.ensure_online()?;
        let wallet_id = self.wallet_for(handle)?;

        let mut seed = [0u8; SEED_LEN];
        OsRng.fill_bytes(&mut seed);
        self.import_seed(&wallet_id, seed)
            .ok_or_else(|| KeyCustodyError::Api {
                status: 404,
                message: format!("wallet {wallet_id} not found"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generate_then_export() {
        let custody = InMemoryKeyCustody::new();
        let id = custody.add_wallet("users", "pw");

        let handle = custody.init_wallet_handle(&id, "pw").await.unwrap();
        let address = custody.generate_key(&handle).await.unwrap();
        let seed = custody.export_key(&handle, "pw", &address).await.unwrap();

        assert_eq!(SigningIdentity::from_seed(&seed).address(), address);
        assert_eq!(custody.key_count(&id), 1);
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let custody = InMemoryKeyCustody::new();
        let id = custody.add_wallet("users", "pw");
        let err = custody.init_wallet_handle(&id, "nope").await.unwrap_err();
        assert_eq!(err, KeyCustodyError::WrongPassword);
    }

    #[tokio::test]
    async fn test_offline() {
        let custody = InMemoryKeyCustody::new();
        custody.set_offline(true);
        assert!(matches!(
            custody.versions().await,
            Err(KeyCustodyError::Connection(_))
        ));
        custody.set_offline(false);
        assert_eq!(custody.versions().await.unwrap(), vec!["v1".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_handle() {
        let custody = InMemoryKeyCustody::new();
        let err = custody
            .generate_key(&WalletHandle::new("forged"))
            .await
            .unwrap_err();
        assert!(matches!(err, KeyCustodyError::Api { status: 401, .. }));
    }
}
