//! UTXO-model error types.

use duet_core::error::{CodecError, CryptoError};
use duet_core::{Fixed8, Hash256};
use duet_keys::KeyError;
use thiserror::Error;

/// Errors recorded by [`ScriptBuilder`](crate::script::ScriptBuilder).
///
/// The first one sticks; it surfaces when the script is finalized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("application call target must be 20 bytes, got {0}")] InvalidScriptHash(usize),
    #[error("opcode 0x{0:02x} requires an argument")] NullArgument(u8),
    #[error("opcode 0x{0:02x} is not a jump")] InvalidOpcode(u8),
    #[error("invalid syscall: {0}")] InvalidSyscall(String),
}

/// Errors from building, signing or decoding UTXO-model transactions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NeoError {
    /// Coin selection ran out of candidates before reaching the target.
    #[error("insufficient funds in asset {asset}: have {have}, need {need}")]
    InsufficientFunds {
        /// Asset being selected.
        asset: Hash256,
        /// Sum of every candidate in that asset.
        have: Fixed8,
        /// Amount requested.
        need: Fixed8,
    },

    /// No UTXO qualifies for the operation (e.g. nothing to claim).
    #[error("no usable inputs: {0}")]
    NoUsableInputs(String),

    /// Address failed base58check decoding or has the wrong version.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Unspent list could not be parsed as JSON.
    #[error("serialization: {0}")]
    Serialization(String),

    #[error(transparent)]
    Script(#[from] ScriptError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Key(#[from] KeyError),
}

impl From<serde_json::Error> for NeoError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_insufficient_funds() {
        let e = NeoError::InsufficientFunds {
            asset: Hash256::ZERO,
            have: Fixed8::ONE,
            need: Fixed8::from_raw(150_000_000),
        };
        assert_eq!(
            e.to_string(),
            format!(
                "insufficient funds in asset {}: have 1.00000000, need 1.50000000",
                "0".repeat(64)
            )
        );
    }

    #[test]
    fn script_error_wraps() {
        let e: NeoError = ScriptError::InvalidScriptHash(19).into();
        assert_eq!(e.to_string(), "application call target must be 20 bytes, got 19");
        assert!(matches!(e, NeoError::Script(ScriptError::InvalidScriptHash(19))));
    }

    #[test]
    fn codec_is_transparent() {
        let e: NeoError = CodecError::InvalidInput("txid".into()).into();
        assert_eq!(e.to_string(), "invalid input: txid");
    }

    #[test]
    fn json_errors_become_serialization() {
        let err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        assert!(matches!(NeoError::from(err), NeoError::Serialization(_)));
    }
}
