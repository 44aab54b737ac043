//! # Secret Phrase Codec
//!
//! A 32-byte Ed25519 seed is written as 25 words from the BIP-39 English
//! list: 24 words carry the seed as little-endian 11-bit groups, the 25th is
//! a checksum word taken from the first 11 bits of `SHA-512/256(seed)`.

use bip39::Language;
use sha2::{Digest, Sha512_256};
use thiserror::Error;
use zeroize::Zeroizing;

/// Words in a complete phrase.
pub const PHRASE_WORDS: usize = 25;

/// Bytes in a seed.
pub const SEED_LEN: usize = 32;

const BITS_PER_WORD: u32 = 11;
const WORD_MASK: u32 = (1 << BITS_PER_WORD) - 1;

/// Ways a secret phrase can be malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhraseError {
    /// Not exactly 25 words.
    #[error("Secret phrase must have {PHRASE_WORDS} words, found {actual}")]
    WordCount { actual: usize },

    /// A word is not on the list.
    #[error("Unknown word in secret phrase at position {position}")]
    UnknownWord { position: usize },

    /// The 24 data words leave non-zero trailing bits.
    #[error("Secret phrase has non-zero padding bits")]
    NonZeroPadding,

    /// The checksum word does not match the seed.
    #[error("Secret phrase checksum mismatch")]
    ChecksumMismatch,
}

/// Writes `seed` as a 25-word phrase.
#[must_use]
pub fn encode_seed(seed: &[u8; SEED_LEN]) -> Zeroizing<String> {
    let words = Language::English.word_list();
    let mut phrase = Zeroizing::new(String::with_capacity(PHRASE_WORDS * 9));

    for index in to_11_bit(seed) {
        phrase.push_str(words[usize::from(index)]);
        phrase.push(' ');
    }
    phrase.push_str(words[usize::from(checksum_word(seed))]);
    phrase
}

/// Recovers the seed from a 25-word phrase.
///
/// Words are matched case-insensitively and may be separated by any
/// whitespace.
///
/// # Errors
///
/// See [`PhraseError`].
pub fn decode_phrase(phrase: &str) -> Result<Zeroizing<[u8; SEED_LEN]>, PhraseError> {
    let lowered = Zeroizing::new(phrase.to_lowercase());
    let words: Vec<&str> = lowered.split_whitespace().collect();
    if words.len() != PHRASE_WORDS {
        return Err(PhraseError::WordCount {
            actual: words.len(),
        });
    }

    let mut indices = Zeroizing::new(Vec::with_capacity(PHRASE_WORDS));
    for (position, word) in words.iter().enumerate() {
        let index = Language::English
            .find_word(word)
            .ok_or(PhraseError::UnknownWord { position })?;
        indices.push(index);
    }

    let (checksum, data) = indices.split_last().ok_or(PhraseError::WordCount { actual: 0 })?;
    let bytes = Zeroizing::new(from_11_bit(data));
    // 24 words are 264 bits: the seed plus one byte of padding.
    if bytes.len() != SEED_LEN + 1 || bytes[SEED_LEN] != 0 {
        return Err(PhraseError::NonZeroPadding);
    }

    let mut seed = Zeroizing::new([0u8; SEED_LEN]);
    seed.copy_from_slice(&bytes[..SEED_LEN]);

    if checksum_word(&seed) != *checksum {
        return Err(PhraseError::ChecksumMismatch);
    }
    Ok(seed)
}

fn checksum_word(seed: &[u8; SEED_LEN]) -> u16 {
    let digest = Sha512_256::digest(seed);
    to_11_bit(&digest[..2])[0]
}

/// Packs bytes into little-endian 11-bit groups; a partial tail becomes one
/// more group.
fn to_11_bit(data: &[u8]) -> Vec<u16> {
    let mut out = Vec::with_capacity(data.len() * 8 / 11 + 1);
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;

    for &byte in data {
        buffer |= u32::from(byte) << bits;
        bits += 8;
        if bits >= BITS_PER_WORD {
            out.push((buffer & WORD_MASK) as u16);
            buffer >>= BITS_PER_WORD;
            bits -= BITS_PER_WORD;
        }
    }
    if bits != 0 {
        out.push((buffer & WORD_MASK) as u16);
    }
    out
}

/// Inverse of [`to_11_bit`].
fn from_11_bit(groups: &[u16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(groups.len() * 11 / 8 + 1);
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;

    for &group in groups {
        buffer |= u32::from(group) << bits;
        bits += BITS_PER_WORD;
        while bits >= 8 {
            out.push((buffer & 0xff) as u8);
            buffer >>= 8;
            bits -= 8;
        }
    }
    if bits != 0 {
        out.push((buffer & 0xff) as u8);
    }
    out
}
