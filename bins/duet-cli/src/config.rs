//! CLI configuration loaded from environment variables.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use duet_keys::mnemonic::EN_US;
use duet_wallet::KeystorePreset;

#[derive(Clone)]
pub struct CliConfig {
    /// Mnemonic dictionary name.
    pub lang: String,
    /// Scrypt cost for newly written keystores.
    pub keystore_preset: KeystorePreset,
    /// Directory holding `eth.json` / `neo.json` keystores.
    pub keystore_dir: PathBuf,
    /// Keystore password for unattended use; prompted for when unset.
    pub password: Option<String>,
}

impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliConfig")
            .field("lang", &self.lang)
            .field("keystore_preset", &self.keystore_preset)
            .field("keystore_dir", &self.keystore_dir)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl CliConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let lang = lookup("DUET_LANG").unwrap_or_else(|| EN_US.to_string());

        let keystore_preset = lookup("DUET_KEYSTORE_PRESET")
            .map(|s| s.parse::<KeystorePreset>())
            .transpose()
            .context("DUET_KEYSTORE_PRESET must be 'light' or 'standard'")?
            .unwrap_or_default();

        let keystore_dir = lookup("DUET_KEYSTORE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".duet")
            });

        let password = lookup("DUET_PASSWORD");

        Ok(CliConfig {
            lang,
            keystore_preset,
            keystore_dir,
            password,
        })
    }

    /// Keystore path for `chain`, or `explicit` when given.
    pub fn keystore_path(&self, chain: &str, explicit: Option<&Path>) -> PathBuf {
        match explicit {
            Some(p) => p.to_path_buf(),
            None => self.keystore_dir.join(format!("{chain}.json")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<CliConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CliConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.lang, "en_US");
        assert_eq!(config.keystore_preset, KeystorePreset::Light);
        assert!(config.keystore_dir.ends_with(".duet"));
        assert!(config.password.is_none());
    }

    #[test]
    fn overrides() {
        let config = load(&[
            ("DUET_LANG", "zh_CN"),
            ("DUET_KEYSTORE_PRESET", "standard"),
            ("DUET_KEYSTORE_DIR", "/tmp/keys"),
            ("DUET_PASSWORD", "hunter2"),
        ])
        .unwrap();
        assert_eq!(config.lang, "zh_CN");
        assert_eq!(config.keystore_preset, KeystorePreset::Standard);
        assert_eq!(config.keystore_dir, PathBuf::from("/tmp/keys"));
        assert_eq!(config.password.as_deref(), Some("hunter2"));
    }

    #[test]
    fn bad_preset_rejected() {
        let err = load(&[("DUET_KEYSTORE_PRESET", "heavy")]).unwrap_err();
        assert!(err.to_string().contains("DUET_KEYSTORE_PRESET"));
    }

    #[test]
    fn keystore_path_defaults_per_chain() {
        let config = load(&[("DUET_KEYSTORE_DIR", "/tmp/keys")]).unwrap();
        assert_eq!(config.keystore_path("neo", None), PathBuf::from("/tmp/keys/neo.json"));
        assert_eq!(
            config.keystore_path("eth", Some(Path::new("/x/y.json"))),
            PathBuf::from("/x/y.json")
        );
    }

    #[test]
    fn debug_redacts_password() {
        let config = load(&[("DUET_PASSWORD", "hunter2")]).unwrap();
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
