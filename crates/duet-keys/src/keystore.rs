//! Version 3 JSON keystore.
//!
//! The private scalar is encrypted with AES-128-CTR under the first half of
//! a password-derived key; the second half authenticates the ciphertext.
//!
//! # Container
//! ```text
//! {"address", "crypto": {"cipher", "ciphertext", "cipherparams": {"iv"},
//!  "kdf", "kdfparams", "mac"}, "id", "version": 3}
//! ```
//!
//! KDFs are handled by the closed set of [`KdfProvider`]s: scrypt and
//! PBKDF2-HMAC-SHA256.

use ctr::cipher::{KeyIvInit, StreamCipher};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};
use uuid::Uuid;
use zeroize::Zeroizing;

use duet_core::codec::{decode_hex, strip_hex_prefix};
use duet_core::error::CryptoError;
use duet_core::hash::keccak256;

use crate::error::KeyError;
use crate::keys::{CurveProfile, KeyPair};

type Aes128Ctr = ctr::Ctr128BE<aes::Aes128>;

/// Container format version.
pub const KEYSTORE_VERSION: u32 = 3;

/// The only supported cipher.
pub const CIPHER_AES_128_CTR: &str = "aes-128-ctr";

const SALT_LEN: usize = 32;
const IV_LEN: usize = 16;
const DK_LEN: usize = 32;
const PBKDF2_PRF: &str = "hmac-sha256";

/// Iteration count used for newly written PBKDF2 keystores.
pub const PBKDF2_DEFAULT_ROUNDS: u32 = 262_144;

/// On-disk keystore container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeystoreFile {
    #[serde(default)]
    pub address: String,
    #[serde(alias = "Crypto")]
    pub crypto: CryptoSection,
    pub id: String,
    pub version: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoSection {
    pub cipher: String,
    pub ciphertext: String,
    pub cipherparams: CipherParams,
    pub kdf: String,
    /// Provider-specific; parsed once the provider is known.
    pub kdfparams: serde_json::Value,
    pub mac: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherParams {
    pub iv: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ScryptKdfParams {
    dklen: usize,
    n: u64,
    p: u32,
    r: u32,
    salt: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Pbkdf2KdfParams {
    c: u32,
    dklen: usize,
    prf: String,
    salt: String,
}

/// scrypt cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScryptParams {
    pub n: u64,
    pub r: u32,
    pub p: u32,
}

impl ScryptParams {
    /// N = 2^18, P = 1.
    pub const STANDARD: Self = Self {
        n: 1 << 18,
        r: 8,
        p: 1,
    };

    /// N = 2^12, P = 6. Used for mobile-class devices.
    pub const LIGHT: Self = Self {
        n: 1 << 12,
        r: 8,
        p: 6,
    };

    fn log_n(&self) -> Result<u8, KeyError> {
        if self.n < 2 || !self.n.is_power_of_two() {
            return Err(KeyError::UnsupportedKeystoreFormat(format!(
                "scrypt n={} is not a power of two",
                self.n
            )));
        }
        Ok(self.n.trailing_zeros() as u8)
    }

    fn derive(&self, password: &[u8], salt: &[u8], dklen: usize) -> Result<Zeroizing<Vec<u8>>, KeyError> {
        let params = scrypt::Params::new(self.log_n()?, self.r, self.p, dklen)
            .map_err(|e| KeyError::UnsupportedKeystoreFormat(format!("scrypt params: {e}")))?;
        let mut dk = Zeroizing::new(vec![0u8; dklen]);
        scrypt::scrypt(password, salt, &params, &mut dk)
            .map_err(|e| CryptoError::CryptoFailure(e.to_string()))?;
        Ok(dk)
    }
}

/// KDF choice for newly written keystores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KdfConfig {
    Scrypt(ScryptParams),
    Pbkdf2 { c: u32 },
}

impl KdfConfig {
    pub const STANDARD: Self = Self::Scrypt(ScryptParams::STANDARD);
    pub const LIGHT: Self = Self::Scrypt(ScryptParams::LIGHT);

    pub fn provider(&self) -> KdfProvider {
        match self {
            Self::Scrypt(_) => KdfProvider::Scrypt,
            Self::Pbkdf2 { .. } => KdfProvider::Pbkdf2,
        }
    }
}

impl Default for KdfConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Key derivation backends understood by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KdfProvider {
    Scrypt,
    Pbkdf2,
}

impl KdfProvider {
    pub const ALL: [Self; 2] = [Self::Scrypt, Self::Pbkdf2];

    /// Values of the container's `kdf` field this provider handles.
    pub fn supported_kdf_names(self) -> &'static [&'static str] {
        match self {
            Self::Scrypt => &["scrypt"],
            Self::Pbkdf2 => &["pbkdf2"],
        }
    }

    /// Find the provider for a `kdf` name.
    pub fn for_kdf(name: &str) -> Result<Self, KeyError> {
        Self::ALL
            .into_iter()
            .find(|p| p.supported_kdf_names().contains(&name))
            .ok_or_else(|| KeyError::UnsupportedKeystoreFormat(format!("kdf {name:?}")))
    }

    /// Encrypt `key` into a new container.
    pub fn write(self, key: &KeyPair, password: &[u8], config: &KdfConfig) -> Result<KeystoreFile, KeyError> {
        let mut salt = [0u8; SALT_LEN];
        let mut iv = [0u8; IV_LEN];
        rand::rngs::OsRng.fill_bytes(&mut salt);
        rand::rngs::OsRng.fill_bytes(&mut iv);

        let (dk, kdfparams) = match (self, config) {
            (Self::Scrypt, KdfConfig::Scrypt(params)) => {
                let dk = params.derive(password, &salt, DK_LEN)?;
                let kdfparams = ScryptKdfParams {
                    dklen: DK_LEN,
                    n: params.n,
                    p: params.p,
                    r: params.r,
                    salt: hex::encode(salt),
                };
                (dk, serde_json::to_value(kdfparams)?)
            }
            (Self::Pbkdf2, KdfConfig::Pbkdf2 { c }) => {
                let dk = pbkdf2_derive(password, &salt, *c, DK_LEN)?;
                let kdfparams = Pbkdf2KdfParams {
                    c: *c,
                    dklen: DK_LEN,
                    prf: PBKDF2_PRF.to_string(),
                    salt: hex::encode(salt),
                };
                (dk, serde_json::to_value(kdfparams)?)
            }
            (provider, config) => {
                return Err(KeyError::UnsupportedKeystoreFormat(format!(
                    "{provider:?} provider cannot write {config:?}"
                )));
            }
        };

        let mut ciphertext = Zeroizing::new(key.private_key_bytes().to_vec());
        apply_aes_ctr(&dk[..16], &iv, &mut ciphertext)?;
        let mac = keystore_mac(&dk, &ciphertext);

        debug!(kdf = self.supported_kdf_names()[0], id = %key.id(), "keystore encrypted");

        Ok(KeystoreFile {
            address: container_address(key),
            crypto: CryptoSection {
                cipher: CIPHER_AES_128_CTR.to_string(),
                ciphertext: hex::encode(&ciphertext[..]),
                cipherparams: CipherParams { iv: hex::encode(iv) },
                kdf: self.supported_kdf_names()[0].to_string(),
                kdfparams,
                mac: hex::encode(mac),
            },
            id: key.id().to_string(),
            version: KEYSTORE_VERSION,
        })
    }

    /// Authenticate and decrypt a container, rebuilding the key on `profile`.
    pub fn read(self, file: &KeystoreFile, password: &[u8], profile: CurveProfile) -> Result<KeyPair, KeyError> {
        let crypto = &file.crypto;
        if !self.supported_kdf_names().contains(&crypto.kdf.as_str()) {
            return Err(KeyError::UnsupportedKeystoreFormat(format!(
                "{self:?} provider cannot read kdf {:?}",
                crypto.kdf
            )));
        }
        if crypto.cipher != CIPHER_AES_128_CTR {
            return Err(KeyError::UnsupportedKeystoreFormat(format!("cipher {:?}", crypto.cipher)));
        }

        let dk = match self {
            Self::Scrypt => {
                let params: ScryptKdfParams = serde_json::from_value(crypto.kdfparams.clone())?;
                check_dklen(params.dklen)?;
                let salt = decode_hex(&params.salt)?;
                ScryptParams {
                    n: params.n,
                    r: params.r,
                    p: params.p,
                }
                .derive(password, &salt, params.dklen)?
            }
            Self::Pbkdf2 => {
                let params: Pbkdf2KdfParams = serde_json::from_value(crypto.kdfparams.clone())?;
                check_dklen(params.dklen)?;
                if params.prf != PBKDF2_PRF {
                    return Err(KeyError::UnsupportedKeystoreFormat(format!("prf {:?}", params.prf)));
                }
                let salt = decode_hex(&params.salt)?;
                pbkdf2_derive(password, &salt, params.c, params.dklen)?
            }
        };

        let ciphertext = decode_hex(&crypto.ciphertext)?;
        let stored_mac = decode_hex(&crypto.mac)?;
        let expected = keystore_mac(&dk, &ciphertext);
        if !bool::from(stored_mac.as_slice().ct_eq(&expected[..])) {
            return Err(KeyError::AuthenticationFailed);
        }

        let iv = decode_hex(&crypto.cipherparams.iv)?;
        let mut plaintext = Zeroizing::new(ciphertext);
        apply_aes_ctr(&dk[..16], &iv, &mut plaintext)?;

        let id = Uuid::parse_str(&file.id)
            .map_err(|e| KeyError::Serialization(format!("keystore id: {e}")))?;
        let key = KeyPair::from_private_scalar(profile, &plaintext)?.with_id(id);

        if !file.address.is_empty() && !same_address(&file.address, &container_address(&key)) {
            warn!(
                stored = %file.address,
                derived = %key.address(),
                "keystore address does not match decrypted key; using derived address"
            );
        }
        debug!(kdf = %crypto.kdf, id = %key.id(), "keystore decrypted");
        Ok(key)
    }
}

/// Encrypt `key` with the provider selected by `config`, returning JSON bytes.
pub fn write(key: &KeyPair, password: &[u8], config: &KdfConfig) -> Result<Vec<u8>, KeyError> {
    let file = config.provider().write(key, password, config)?;
    Ok(serde_json::to_vec(&file)?)
}

/// Parse, authenticate and decrypt keystore JSON.
pub fn read(data: &[u8], password: &[u8], profile: CurveProfile) -> Result<KeyPair, KeyError> {
    let file: KeystoreFile = serde_json::from_slice(data)?;
    if file.version != KEYSTORE_VERSION {
        return Err(KeyError::UnsupportedKeystoreFormat(format!("version {}", file.version)));
    }
    KdfProvider::for_kdf(&file.crypto.kdf)?.read(&file, password, profile)
}

fn pbkdf2_derive(password: &[u8], salt: &[u8], rounds: u32, dklen: usize) -> Result<Zeroizing<Vec<u8>>, KeyError> {
    if rounds == 0 {
        return Err(KeyError::UnsupportedKeystoreFormat("pbkdf2 c=0".into()));
    }
    let mut dk = Zeroizing::new(vec![0u8; dklen]);
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, rounds, &mut dk);
    Ok(dk)
}

fn check_dklen(dklen: usize) -> Result<(), KeyError> {
    if dklen < DK_LEN {
        return Err(KeyError::UnsupportedKeystoreFormat(format!("dklen {dklen} < {DK_LEN}")));
    }
    Ok(())
}

fn apply_aes_ctr(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<(), KeyError> {
    let mut cipher = Aes128Ctr::new_from_slices(key, iv)
        .map_err(|e| CryptoError::CryptoFailure(format!("aes-128-ctr: {e}")))?;
    cipher.apply_keystream(buf);
    Ok(())
}

fn keystore_mac(dk: &[u8], ciphertext: &[u8]) -> [u8; 32] {
    let mut data = Vec::with_capacity(16 + ciphertext.len());
    data.extend_from_slice(&dk[16..32]);
    data.extend_from_slice(ciphertext);
    keccak256(&data)
}

/// Account-model addresses are stored lowercase without `0x`.
fn container_address(key: &KeyPair) -> String {
    match key.profile() {
        CurveProfile::Secp256k1 => strip_hex_prefix(key.address()).to_ascii_lowercase(),
        CurveProfile::P256 => key.address().to_string(),
    }
}

fn same_address(stored: &str, derived: &str) -> bool {
    strip_hex_prefix(stored).eq_ignore_ascii_case(strip_hex_prefix(derived))
}
