//! Key backup: keystore presets, keystore files and mnemonic phrases.
//!
//! Both wallets export v3 keystore JSON. The preset picks the scrypt cost:
//! `light` for interactive devices, `standard` for cold storage. A wallet's
//! mnemonic encodes its raw 32-byte private scalar (24 words).

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use zeroize::Zeroizing;

use duet_keys::{keystore, mnemonic, CurveProfile, DictionaryRegistry, KdfConfig, KeyError, KeyPair};

use crate::error::WalletError;

/// Named scrypt cost for keystore export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeystorePreset {
    /// N=2¹², P=6.
    #[default]
    Light,
    /// N=2¹⁸, P=1.
    Standard,
}

impl KeystorePreset {
    pub fn kdf(self) -> KdfConfig {
        match self {
            Self::Light => KdfConfig::LIGHT,
            Self::Standard => KdfConfig::STANDARD,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Standard => "standard",
        }
    }
}

impl fmt::Display for KeystorePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KeystorePreset {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "standard" => Ok(Self::Standard),
            other => Err(WalletError::UnknownPreset(other.to_string())),
        }
    }
}

/// Encrypt `key` into keystore JSON text.
pub(crate) fn export(key: &KeyPair, password: &str, preset: KeystorePreset) -> Result<String, WalletError> {
    let json = keystore::write(key, password.as_bytes(), &preset.kdf())?;
    String::from_utf8(json).map_err(|e| KeyError::Serialization(e.to_string()).into())
}

pub(crate) fn import(json: &str, password: &str, profile: CurveProfile) -> Result<KeyPair, WalletError> {
    Ok(keystore::read(json.as_bytes(), password.as_bytes(), profile)?)
}

/// Write keystore JSON for `key` to `path`, replacing any existing file.
pub(crate) fn save(key: &KeyPair, path: &Path, password: &str, preset: KeystorePreset) -> Result<(), WalletError> {
    let json = export(key, password, preset)?;
    std::fs::write(path, json.as_bytes()).map_err(|e| WalletError::IoError(e.to_string()))?;
    debug!(path = %path.display(), address = %key.address(), %preset, "keystore saved");
    Ok(())
}

pub(crate) fn load(path: &Path, password: &str, profile: CurveProfile) -> Result<KeyPair, WalletError> {
    let json = std::fs::read_to_string(path).map_err(|e| WalletError::IoError(e.to_string()))?;
    let key = import(&json, password, profile)?;
    debug!(path = %path.display(), address = %key.address(), "keystore loaded");
    Ok(key)
}

/// Phrase for the private scalar of `key` in dictionary `lang`.
pub(crate) fn to_phrase(key: &KeyPair, lang: &str, registry: &DictionaryRegistry) -> Result<Zeroizing<String>, WalletError> {
    let dictionary = registry.get(lang)?;
    let scalar = key.private_key_bytes();
    let phrase = mnemonic::to_mnemonic(&scalar[..], &dictionary)?;
    Ok(Zeroizing::new(phrase))
}

pub(crate) fn from_phrase(
    profile: CurveProfile,
    phrase: &str,
    lang: &str,
    registry: &DictionaryRegistry,
) -> Result<KeyPair, WalletError> {
    let dictionary = registry.get(lang)?;
    let scalar = mnemonic::from_mnemonic(phrase, &dictionary)?;
    Ok(KeyPair::from_private_scalar(profile, &scalar)?)
}
