//! # Core Ledger Entities
//!
//! Identifiers the gateway exchanges with the ledger and with its upstream
//! caller.
//!
//! ## Clusters
//!
//! - **Accounts**: `Address`, `PublicKey`
//! - **Operations**: `OperationId`, `Round`
//! - **Contracts**: `ApplicationIndex`, `LinkedContract`

use std::fmt;
use std::str::FromStr;

use data_encoding::BASE32_NOPAD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha512_256};

use crate::errors::{AddressError, LinkedContractParseError};

// =============================================================================
// CLUSTER A: ACCOUNTS
// =============================================================================

/// A 32-byte Ed25519 public key.
pub type PublicKey = [u8; 32];

/// Length of the address checksum appended before base32 encoding.
pub const ADDRESS_CHECKSUM_LEN: usize = 4;

/// Length of the textual (base32) form of an address.
pub const ADDRESS_TEXT_LEN: usize = 58;

/// A ledger account address.
///
/// The raw form is the account's Ed25519 public key. The textual form is the
/// base32 encoding (no padding) of the key followed by the last four bytes of
/// its SHA-512/256 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Address(pub PublicKey);

impl Address {
    /// The all-zero address.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Creates an address from a public key.
    #[must_use]
    pub const fn from_public_key(key: PublicKey) -> Self {
        Self(key)
    }

    /// Returns the underlying public key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns the checksum bytes that are appended to the textual form.
    #[must_use]
    pub fn checksum(&self) -> [u8; ADDRESS_CHECKSUM_LEN] {
        let digest = Sha512_256::digest(self.0);
        let mut checksum = [0u8; ADDRESS_CHECKSUM_LEN];
        checksum.copy_from_slice(&digest[digest.len() - ADDRESS_CHECKSUM_LEN..]);
        checksum
    }

    /// Renders the checksummed base32 textual form.
    #[must_use]
    pub fn encode(&self) -> String {
        let mut buf = Vec::with_capacity(32 + ADDRESS_CHECKSUM_LEN);
        buf.extend_from_slice(&self.0);
        buf.extend_from_slice(&self.checksum());
        BASE32_NOPAD.encode(&buf)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.encode())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != ADDRESS_TEXT_LEN {
            return Err(AddressError::InvalidLength { actual: s.len() });
        }
        let decoded = BASE32_NOPAD
            .decode(s.as_bytes())
            .map_err(|e| AddressError::InvalidEncoding(e.to_string()))?;
        if decoded.len() != 32 + ADDRESS_CHECKSUM_LEN {
            return Err(AddressError::InvalidLength { actual: s.len() });
        }

        let mut key = [0u8; 32];
        key.copy_from_slice(&decoded[..32]);
        let address = Self(key);
        if address.checksum()[..] != decoded[32..] {
            return Err(AddressError::ChecksumMismatch);
        }
        Ok(address)
    }
}

impl From<PublicKey> for Address {
    fn from(key: PublicKey) -> Self {
        Self(key)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// CLUSTER B: OPERATIONS
// =============================================================================

/// The ledger's discrete unit of progress.
pub type Round = u64;

/// Ledger-assigned identifier of a submitted operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(String);

impl OperationId {
    /// Wraps an identifier returned by the ledger.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// CLUSTER C: CONTRACTS
// =============================================================================

/// Numeric index the ledger assigns to a stateful contract.
pub type ApplicationIndex = u64;

/// Separator between the two halves of a linked contract's external form.
pub const LINKED_CONTRACT_SEPARATOR: char = '@';

/// A stateless contract bound to the stateful contract that carries its logic.
///
/// Only constructed once both halves exist on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkedContract {
    /// Address of the stateless half (hash of its compiled program).
    pub stateless_address: String,
    /// Index of the stateful half.
    pub stateful_index: ApplicationIndex,
}

impl LinkedContract {
    /// Binds a stateless address to a stateful index.
    pub fn new(stateless_address: impl Into<String>, stateful_index: ApplicationIndex) -> Self {
        Self {
            stateless_address: stateless_address.into(),
            stateful_index,
        }
    }
}

impl fmt::Display for LinkedContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.stateless_address, LINKED_CONTRACT_SEPARATOR, self.stateful_index
        )
    }
}

impl FromStr for LinkedContract {
    type Err = LinkedContractParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (address, index) = s
            .rsplit_once(LINKED_CONTRACT_SEPARATOR)
            .ok_or(LinkedContractParseError::MissingSeparator)?;
        if address.is_empty() {
            return Err(LinkedContractParseError::EmptyAddress);
        }
        let stateful_index = index
            .parse::<ApplicationIndex>()
            .map_err(|_| LinkedContractParseError::InvalidIndex(index.to_string()))?;
        Ok(Self::new(address, stateful_index))
    }
}

// =============================================================================
// TESTS
// =============================================================================
