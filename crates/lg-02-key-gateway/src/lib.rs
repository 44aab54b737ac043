//! # LG-02 Key Gateway
//!
//! Turns secret phrases into signing identities and reaches accounts held by
//! the key-custody service.
//!
//! ## Secret Phrases
//!
//! A 25-word phrase over the BIP-39 English list encodes a 32-byte Ed25519
//! seed plus a checksum word. Addresses are the checksummed base32 form of
//! the public key (see [`shared_types::Address`]).
//!
//! ## Failure Codes
//!
//! | Failure | Code |
//! |---------|------|
//! | No custody client configured | 2 |
//! | Malformed secret phrase | 10 |
//! | No wallet with the requested name | 101 |
//! | Key export fault | 102 |
//! | Account creation fault | 203 |
//!
//! ## Usage Example
//!
//! ```ignore
//! use lg_02_key_gateway::prelude::*;
//!
//! let custody = Arc::new(KmdHttpClient::new(endpoint.base_url(), endpoint.token)?);
//! let keys = KeyGateway::new(custody);
//! let account = keys.create_account("unencrypted-default-wallet", "").await?;
//! let identity = SigningIdentity::from_secret_phrase(&account.secret_phrase)?;
//! assert_eq!(identity.address(), account.address);
//! ```

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::{InMemoryKeyCustody, KmdHttpClient};
pub use domain::{
    decode_phrase, derive_address, encode_seed, secret_phrase_to_signing_key, PhraseError,
    SigningIdentity,
};
pub use error::{KeyCustodyError, KeyGatewayError};
pub use ports::{KeyCustodyClient, WalletHandle, WalletSummary};
pub use service::{KeyGateway, NewAccount};

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::adapters::{InMemoryKeyCustody, KmdHttpClient};
    pub use crate::domain::{derive_address, secret_phrase_to_signing_key, SigningIdentity};
    pub use crate::error::{KeyCustodyError, KeyGatewayError};
    pub use crate::ports::KeyCustodyClient;
    pub use crate::service::{KeyGateway, NewAccount};
}
