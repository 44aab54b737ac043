//! # Domain Layer
//!
//! Pure key handling: the secret-phrase codec and signing identities.

pub mod identity;
pub mod secret_phrase;

pub use identity::*;
pub use secret_phrase::{decode_phrase, encode_seed, PhraseError, PHRASE_WORDS, SEED_LEN};
