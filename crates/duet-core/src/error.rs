//! Error types shared across the Duet crates.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("invalid input: {0}")] InvalidInput(String),
    #[error("invalid amount: {0}")] InvalidAmount(String),
    #[error("invalid checksum")] InvalidChecksum,
    #[error("encoding failure: {0}")] EncodingFailure(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid private key: {0}")] InvalidPrivateKey(String),
    #[error("invalid public key")] InvalidPublicKey,
    #[error("crypto failure: {0}")] CryptoFailure(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_amount() {
        let e = CodecError::InvalidAmount("0xzz".into());
        assert_eq!(e.to_string(), "invalid amount: 0xzz");
    }

    #[test]
    fn display_checksum() {
        assert_eq!(CodecError::InvalidChecksum.to_string(), "invalid checksum");
    }

    #[test]
    fn display_crypto_failure() {
        let e = CryptoError::CryptoFailure("rng".into());
        assert_eq!(e.to_string(), "crypto failure: rng");
    }
}
