//! Error types for key handling and key-custody access.

use shared_types::{codes, ErrorCode};
use thiserror::Error;

use crate::domain::PhraseError;

/// Faults reported by a key-custody client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyCustodyError {
    /// The service could not be reached.
    #[error("Key custody service unreachable: {0}")]
    Connection(String),

    /// The service answered with an error.
    #[error("Key custody service error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The response could not be decoded.
    #[error("Malformed key custody response: {0}")]
    Decode(String),

    /// The wallet password was rejected.
    #[error("Wallet password rejected")]
    WrongPassword,

    /// The wallet holds no key for the address.
    #[error("Key not found in wallet: {0}")]
    KeyNotFound(String),
}

/// Failures of [`crate::KeyGateway`] operations.
#[derive(Debug, Clone, Error)]
pub enum KeyGatewayError {
    /// No key-custody client is configured.
    #[error("Missing value for key custody client")]
    CustodyNotConfigured,

    /// The secret phrase is malformed.
    #[error("Malformed secret phrase: {0}")]
    MalformedPhrase(#[from] PhraseError),

    /// No wallet carries the requested name.
    #[error("The wallet id for wallet {name:?} could not be retrieved")]
    WalletNotFound { name: String },

    /// Unlocking the wallet or exporting the key failed.
    #[error("An error occurred while exporting the key: {0}")]
    KeyExport(KeyCustodyError),

    /// Generating the account failed.
    #[error("An error occurred while creating the account: {0}")]
    CreateAccount(KeyCustodyError),
}

impl ErrorCode for KeyGatewayError {
    fn code(&self) -> u32 {
        match self {
            Self::CustodyNotConfigured => codes::KEYSTORE_NOT_CONFIGURED,
            Self::MalformedPhrase(_) => codes::MALFORMED_SECRET_PHRASE,
            Self::WalletNotFound { .. } => codes::WALLET_NOT_FOUND,
            Self::KeyExport(_) => codes::KEY_EXPORT_FAILED,
            Self::CreateAccount(_) => codes::CREATE_ACCOUNT_FAILED,
        }
    }
}
