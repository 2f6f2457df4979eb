//! Account-model error types.

use duet_core::error::{CodecError, CryptoError};
use duet_keys::KeyError;
use thiserror::Error;

/// Errors from building, signing or decoding account-model transactions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EthError {
    /// Recipient is not hex or is longer than 20 bytes.
    #[error("invalid recipient: {0}")]
    InvalidRecipient(String),

    /// Malformed RLP while decoding.
    #[error("invalid rlp: {0}")]
    InvalidRlp(String),

    /// Recovery id or signature components out of range.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// Call object could not be rendered as JSON.
    #[error("serialization: {0}")]
    Serialization(String),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Key(#[from] KeyError),
}
