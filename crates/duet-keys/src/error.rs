//! Key handling error types.

use duet_core::error::{CodecError, CryptoError};
use thiserror::Error;

/// Errors from key import/export, keystores and mnemonics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// Malformed wallet import format string.
    #[error("invalid import format: {0}")]
    InvalidImportFormat(String),

    /// Keystore MAC did not verify for the supplied password.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Keystore names a KDF or cipher no provider handles.
    #[error("unsupported keystore format: {0}")]
    UnsupportedKeystoreFormat(String),

    /// Unknown word, bad word count or checksum mismatch.
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// No dictionary registered under this name.
    #[error("unknown dictionary: {0}")]
    UnknownDictionary(String),

    /// Word list with the wrong size or duplicate words.
    #[error("invalid dictionary: {0}")]
    InvalidDictionary(String),

    /// Keystore JSON could not be parsed or produced.
    #[error("serialization: {0}")]
    Serialization(String),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl From<serde_json::Error> for KeyError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
