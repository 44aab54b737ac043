//! # Driven Ports (SPI - Outbound)
//!
//! The key-custody service holds named, password-protected wallets. Every
//! key operation first unlocks a wallet, which yields a short-lived handle.

use std::fmt;

use async_trait::async_trait;
use shared_types::Address;
use zeroize::Zeroizing;

use crate::domain::SEED_LEN;
use crate::error::KeyCustodyError;

/// A wallet as listed by the custody service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletSummary {
    /// Opaque wallet id used to unlock the wallet.
    pub id: String,
    /// Human-readable wallet name.
    pub name: String,
}

/// Token proving a wallet was unlocked.
#[derive(Clone, PartialEq, Eq)]
pub struct WalletHandle(String);

impl WalletHandle {
    /// Wraps a handle token returned by the custody service.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw handle token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for WalletHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WalletHandle(<redacted>)")
    }
}

/// Interface to the key-custody service.
#[async_trait]
pub trait KeyCustodyClient: Send + Sync {
    /// API versions supported by the service. Used as a liveness probe.
    async fn versions(&self) -> Result<Vec<String>, KeyCustodyError>;

    /// All wallets known to the service.
    async fn list_wallets(&self) -> Result<Vec<WalletSummary>, KeyCustodyError>;

    /// Unlocks a wallet.
    async fn init_wallet_handle(
        &self,
        wallet_id: &str,
        password: &str,
    ) -> Result<WalletHandle, KeyCustodyError>;

    /// Exports the seed of `address` from an unlocked wallet.
    async fn export_key(
        &self,
        handle: &WalletHandle,
        password: &str,
        address: &Address,
    ) -> Result<Zeroizing<[u8; SEED_LEN]>, KeyCustodyError>;

    /// Generates a new key in an unlocked wallet and returns its address.
    async fn generate_key(&self, handle: &WalletHandle) -> Result<Address, KeyCustodyError>;
}
