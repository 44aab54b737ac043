//! # Signing Identity
//!
//! A signing key, its ledger address and the phrase it came from. Derived on
//! demand and never persisted; key material is wiped on drop.

use std::fmt;

use ed25519_dalek::{Signer, SigningKey};
use shared_types::Address;
use zeroize::Zeroizing;

use super::secret_phrase::{decode_phrase, encode_seed, PhraseError, SEED_LEN};

/// Decodes a secret phrase into its Ed25519 signing key.
///
/// # Errors
///
/// [`PhraseError`] if the phrase is malformed.
pub fn secret_phrase_to_signing_key(phrase: &str) -> Result<SigningKey, PhraseError> {
    let seed = decode_phrase(phrase)?;
    Ok(SigningKey::from_bytes(&seed))
}

/// The ledger address controlled by `key`.
#[must_use]
pub fn derive_address(key: &SigningKey) -> Address {
    Address::from_public_key(key.verifying_key().to_bytes())
}

/// Key material for one account.
pub struct SigningIdentity {
    key: SigningKey,
    address: Address,
    phrase: Zeroizing<String>,
}

impl SigningIdentity {
    /// Derives the identity behind a secret phrase.
    ///
    /// # Errors
    ///
    /// [`PhraseError`] if the phrase is malformed.
    pub fn from_secret_phrase(phrase: &str) -> Result<Self, PhraseError> {
        let seed = decode_phrase(phrase)?;
        Ok(Self::from_seed(&seed))
    }

    /// Builds the identity for a raw 32-byte seed.
    #[must_use]
    pub fn from_seed(seed: &[u8; SEED_LEN]) -> Self {
        let key = SigningKey::from_bytes(seed);
        let address = derive_address(&key);
        Self {
            key,
            address,
            phrase: encode_seed(seed),
        }
    }

    /// The account address.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// The canonical 25-word phrase of this identity.
    #[must_use]
    pub fn secret_phrase(&self) -> &str {
        &self.phrase
    }

    /// The underlying signing key.
    #[must_use]
    pub fn signing_key(&self) -> &SigningKey {
        &self.key
    }

    /// Ed25519 signature over `message`.
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.key.sign(message).to_bytes()
    }
}

impl fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningIdentity")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signature, Verifier};

    const ZERO_SEED_ADDRESS: &str = "HNVCPPGOW2SC2YVDVDICU3YNONSTEFLXDXREHJR2YBEKDC2Z3IUZSC6YGI";
    const COUNTING_SEED_ADDRESS: &str = "AOQQPP7TZYIL4HLQ3UMOOS6ATFT6JVRQTOSQ2XY53SDGIESVGG4MPFYUMQ";

    fn counting_seed() -> [u8; SEED_LEN] {
        let mut seed = [0u8; SEED_LEN];
        for (i, b) in seed.iter_mut().enumerate() {
            *b = i as u8;
        }
        seed
    }

    #[test]
    fn test_known_addresses() {
        assert_eq!(
            SigningIdentity::from_seed(&[0u8; SEED_LEN]).address().to_string(),
            ZERO_SEED_ADDRESS
        );
        assert_eq!(
            SigningIdentity::from_seed(&counting_seed()).address().to_string(),
            COUNTING_SEED_ADDRESS
        );
    }

    #[test]
    fn test_phrase_and_seed_agree() {
        let from_seed = SigningIdentity::from_seed(&counting_seed());
        let from_phrase = SigningIdentity::from_secret_phrase(from_seed.secret_phrase()).unwrap();
        assert_eq!(from_seed.address(), from_phrase.address());
        assert_eq!(
            derive_address(&secret_phrase_to_signing_key(from_seed.secret_phrase()).unwrap()),
            from_seed.address()
        );
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let a = SigningIdentity::from_seed(&[7u8; SEED_LEN]);
        let b = SigningIdentity::from_seed(&[7u8; SEED_LEN]);
        assert_eq!(a.address(), b.address());
        assert_eq!(a.secret_phrase(), b.secret_phrase());
    }

    #[test]
    fn test_signature_verifies() {
        let identity = SigningIdentity::from_seed(&counting_seed());
        let signature = Signature::from_bytes(&identity.sign(b"TXpayload"));
        assert!(identity
            .signing_key()
            .verifying_key()
            .verify(b"TXpayload", &signature)
            .is_ok());
    }

    #[test]
    fn test_debug_hides_phrase() {
        let identity = SigningIdentity::from_seed(&[0u8; SEED_LEN]);
        let rendered = format!("{identity:?}");
        assert!(!rendered.contains("abandon"));
    }

    #[test]
    fn test_malformed_phrase_rejected() {
        assert!(matches!(
            SigningIdentity::from_secret_phrase("one two three"),
            Err(PhraseError::WordCount { actual: 3 })
        ));
    }
}
