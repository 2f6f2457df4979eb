//! Wallet error types.

use duet_core::error::{CodecError, CryptoError};
use duet_eth::EthError;
use duet_keys::{CurveProfile, KeyError};
use duet_neo::NeoError;
use thiserror::Error;

/// Errors that can occur in wallet operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// Unknown keystore preset name.
    #[error("unknown keystore preset: {0}")]
    UnknownPreset(String),

    /// Key belongs to the other chain's curve.
    #[error("wallet requires a {expected} key, got {actual}")]
    WrongCurve {
        expected: CurveProfile,
        actual: CurveProfile,
    },

    /// Keystore file is missing, unreadable or not valid UTF-8.
    #[error("I/O error: {0}")]
    IoError(String),

    /// Key import, keystore or mnemonic failure.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// Account-model transaction error from duet-eth.
    #[error(transparent)]
    Eth(#[from] EthError),

    /// UTXO-model transaction error from duet-neo.
    #[error(transparent)]
    Neo(#[from] NeoError),

    /// Malformed hex, amount or address input.
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unknown_preset() {
        let e = WalletError::UnknownPreset("heavy".into());
        assert_eq!(e.to_string(), "unknown keystore preset: heavy");
    }

    #[test]
    fn display_wrong_curve() {
        let e = WalletError::WrongCurve {
            expected: CurveProfile::P256,
            actual: CurveProfile::Secp256k1,
        };
        assert!(e.to_string().starts_with("wallet requires a "));
    }

    #[test]
    fn key_error_is_transparent() {
        let e: WalletError = KeyError::AuthenticationFailed.into();
        assert_eq!(e.to_string(), "authentication failed");
    }

    #[test]
    fn neo_error_wraps() {
        let e: WalletError = NeoError::NoUsableInputs("claim".into()).into();
        assert!(matches!(e, WalletError::Neo(NeoError::NoUsableInputs(_))));
    }
}
