//! # duet-keys — key material for both chain families.
//!
//! # Modules
//!
//! - [`error`] — `KeyError` enum
//! - [`address`] — checksummed account addresses, base58check script-hash addresses
//! - [`keys`] — `KeyPair` over secp256k1 or P-256, WIF import/export
//! - [`keystore`] — v3 JSON keystore with pluggable KDF providers
//! - [`mnemonic`] — wordlist mnemonics and the shared dictionary registry

pub mod address;
pub mod error;
pub mod keys;
pub mod keystore;
pub mod mnemonic;

pub use error::KeyError;
pub use keys::{CurveProfile, KeyPair};
pub use keystore::{KdfConfig, KdfProvider, KeystoreFile, ScryptParams};
pub use mnemonic::{Dictionary, DictionaryRegistry};
