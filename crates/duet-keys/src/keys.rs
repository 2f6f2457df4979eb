//! Key pairs over the two supported curves.
//!
//! A [`KeyPair`] owns one private scalar and the address derived from it.
//! The address is computed once at construction and never set independently.

use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use zeroize::Zeroizing;

use duet_core::base58::{decode_check, encode_check};
use duet_core::constants::{PRIVATE_KEY_LEN, WIF_COMPRESSED_SUFFIX, WIF_VERSION};
use duet_core::error::{CodecError, CryptoError};

use crate::address::{verification_script, EthAddress, NeoAddress, ScriptHash};
use crate::error::KeyError;

/// Which curve, and therefore which address scheme, a key belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveProfile {
    /// secp256k1 with checksummed hex addresses.
    Secp256k1,
    /// NIST P-256 with base58check script-hash addresses.
    P256,
}

impl CurveProfile {
    pub fn name(self) -> &'static str {
        match self {
            Self::Secp256k1 => "secp256k1",
            Self::P256 => "p256",
        }
    }
}

impl fmt::Display for CurveProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone)]
enum Secret {
    Secp256k1(k256::ecdsa::SigningKey),
    P256(p256::ecdsa::SigningKey),
}

/// A private key together with its derived address and a stable id.
///
/// The signing keys of both curve crates zeroize their scalar on drop.
#[derive(Clone)]
pub struct KeyPair {
    id: Uuid,
    secret: Secret,
    address: String,
}

impl KeyPair {
    /// Generate a fresh key from the OS RNG.
    pub fn generate(profile: CurveProfile) -> Self {
        let secret = match profile {
            CurveProfile::Secp256k1 => Secret::Secp256k1(k256::ecdsa::SigningKey::random(&mut OsRng)),
            CurveProfile::P256 => Secret::P256(p256::ecdsa::SigningKey::random(&mut OsRng)),
        };
        Self::from_secret(Uuid::new_v4(), secret)
    }

    /// Import a raw 32-byte big-endian scalar.
    pub fn from_private_scalar(profile: CurveProfile, bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != PRIVATE_KEY_LEN {
            return Err(CodecError::InvalidInput(format!(
                "private key must be {PRIVATE_KEY_LEN} bytes, got {}",
                bytes.len()
            ))
            .into());
        }
        let secret = match profile {
            CurveProfile::Secp256k1 => k256::ecdsa::SigningKey::from_slice(bytes)
                .map(Secret::Secp256k1)
                .map_err(|e| CryptoError::InvalidPrivateKey(e.to_string()))?,
            CurveProfile::P256 => p256::ecdsa::SigningKey::from_slice(bytes)
                .map(Secret::P256)
                .map_err(|e| CryptoError::InvalidPrivateKey(e.to_string()))?,
        };
        Ok(Self::from_secret(Uuid::new_v4(), secret))
    }

    /// Import a wallet import format string as a P-256 key.
    ///
    /// Accepts both the 32-byte and the compressed (`0x01`-suffixed) payload.
    pub fn from_wif(wif: &str) -> Result<Self, KeyError> {
        let (version, payload) = decode_check(wif.trim())
            .map_err(|e| KeyError::InvalidImportFormat(e.to_string()))?;
        let payload = Zeroizing::new(payload);
        if version != WIF_VERSION {
            return Err(KeyError::InvalidImportFormat(format!(
                "version byte 0x{version:02x}"
            )));
        }
        let scalar = match payload.len() {
            PRIVATE_KEY_LEN => &payload[..],
            33 if payload[32] == WIF_COMPRESSED_SUFFIX => &payload[..PRIVATE_KEY_LEN],
            n => {
                return Err(KeyError::InvalidImportFormat(format!(
                    "unexpected payload length {n}"
                )));
            }
        };
        Self::from_private_scalar(CurveProfile::P256, scalar)
    }

    /// Export as compressed-form WIF.
    pub fn to_wif(&self) -> Zeroizing<String> {
        let scalar = self.private_key_bytes();
        let mut payload = Zeroizing::new(Vec::with_capacity(PRIVATE_KEY_LEN + 1));
        payload.extend_from_slice(&scalar[..]);
        payload.push(WIF_COMPRESSED_SUFFIX);
        Zeroizing::new(encode_check(WIF_VERSION, &payload))
    }

    /// Replace the id, used when restoring from a keystore.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn profile(&self) -> CurveProfile {
        match self.secret {
            Secret::Secp256k1(_) => CurveProfile::Secp256k1,
            Secret::P256(_) => CurveProfile::P256,
        }
    }

    /// Chain-encoded address string.
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn private_key_bytes(&self) -> Zeroizing<[u8; 32]> {
        let mut out = Zeroizing::new([0u8; 32]);
        match &self.secret {
            Secret::Secp256k1(k) => out.copy_from_slice(&k.to_bytes()),
            Secret::P256(k) => out.copy_from_slice(&k.to_bytes()),
        }
        out
    }

    /// SEC1 compressed public key.
    pub fn public_key_compressed(&self) -> [u8; 33] {
        let mut out = [0u8; 33];
        match &self.secret {
            Secret::Secp256k1(k) => {
                out.copy_from_slice(k.verifying_key().to_encoded_point(true).as_bytes())
            }
            Secret::P256(k) => {
                out.copy_from_slice(k.verifying_key().to_encoded_point(true).as_bytes())
            }
        }
        out
    }

    /// SEC1 uncompressed public key (`0x04 ‖ X ‖ Y`).
    pub fn public_key_uncompressed(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        match &self.secret {
            Secret::Secp256k1(k) => {
                out.copy_from_slice(k.verifying_key().to_encoded_point(false).as_bytes())
            }
            Secret::P256(k) => {
                out.copy_from_slice(k.verifying_key().to_encoded_point(false).as_bytes())
            }
        }
        out
    }

    /// `PUSHBYTES33 ‖ pubkey ‖ CHECKSIG` for this key.
    pub fn verification_script(&self) -> Vec<u8> {
        verification_script(&self.public_key_compressed())
    }

    pub fn script_hash(&self) -> ScriptHash {
        ScriptHash::from_script(&self.verification_script())
    }

    pub fn secp256k1_signing_key(&self) -> Result<&k256::ecdsa::SigningKey, KeyError> {
        match &self.secret {
            Secret::Secp256k1(k) => Ok(k),
            Secret::P256(_) => Err(wrong_curve(CurveProfile::Secp256k1)),
        }
    }

    pub fn p256_signing_key(&self) -> Result<&p256::ecdsa::SigningKey, KeyError> {
        match &self.secret {
            Secret::P256(k) => Ok(k),
            Secret::Secp256k1(_) => Err(wrong_curve(CurveProfile::P256)),
        }
    }

    fn from_secret(id: Uuid, secret: Secret) -> Self {
        let mut pair = Self {
            id,
            secret,
            address: String::new(),
        };
        pair.address = match pair.profile() {
            CurveProfile::Secp256k1 => {
                EthAddress::from_public_key(&pair.public_key_uncompressed()).to_checksum()
            }
            CurveProfile::P256 => NeoAddress::from_public_key(&pair.public_key_compressed()).encode(),
        };
        pair
    }
}

fn wrong_curve(expected: CurveProfile) -> KeyError {
    CryptoError::CryptoFailure(format!("operation requires a {expected} key")).into()
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("id", &self.id)
            .field("profile", &self.profile())
            .field("address", &self.address)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
