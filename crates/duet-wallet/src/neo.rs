//! UTXO-model wallet.
//!
//! Callers pass the unspent outputs they fetched from an indexer, either
//! already parsed or as the raw JSON array (see [`Utxo::parse_list`]).
//! Amounts are decimal strings with up to eight places, parsed exactly.

use std::path::Path;

use tracing::info;
use zeroize::Zeroizing;

use duet_core::codec::decode_hex;
use duet_core::{Fixed8, Hash256};
use duet_keys::address::ScriptHash;
use duet_keys::{CurveProfile, DictionaryRegistry, KeyPair};
use duet_neo::address::{parse_address, NEO_ASSET};
use duet_neo::{nep5, sign, NeoBuildConfig, NeoTxBuilder, SignedNeoTransaction, Transaction, Utxo};

use crate::error::WalletError;
use crate::storage::{self, KeystorePreset};

/// A signed transaction ready for `sendrawtransaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeoTx {
    /// Lowercase hex of the raw bytes.
    pub data: String,
    /// Transaction id in display order.
    pub id: String,
}

impl From<SignedNeoTransaction> for NeoTx {
    fn from(signed: SignedNeoTransaction) -> Self {
        Self {
            data: signed.raw_hex(),
            id: signed.txid.to_string(),
        }
    }
}

/// A single P-256 key and the transactions it can sign.
#[derive(Debug, Clone)]
pub struct NeoWallet {
    key: KeyPair,
    builder: NeoTxBuilder,
}

impl NeoWallet {
    pub fn generate() -> Self {
        Self {
            key: KeyPair::generate(CurveProfile::P256),
            builder: NeoTxBuilder::new(),
        }
    }

    /// Wrap an existing key. Fails for secp256k1 keys.
    pub fn from_key(key: KeyPair) -> Result<Self, WalletError> {
        if key.profile() != CurveProfile::P256 {
            return Err(WalletError::WrongCurve {
                expected: CurveProfile::P256,
                actual: key.profile(),
            });
        }
        Ok(Self {
            key,
            builder: NeoTxBuilder::new(),
        })
    }

    /// Build against non-default asset ids or free-gas threshold.
    pub fn with_config(mut self, config: NeoBuildConfig) -> Self {
        self.builder = NeoTxBuilder::with_config(config);
        self
    }

    pub fn from_private_key(hex: &str) -> Result<Self, WalletError> {
        let scalar = Zeroizing::new(decode_hex(hex)?);
        Self::from_key(KeyPair::from_private_scalar(CurveProfile::P256, &scalar)?)
    }

    pub fn from_wif(wif: &str) -> Result<Self, WalletError> {
        Self::from_key(KeyPair::from_wif(wif)?)
    }

    pub fn from_mnemonic(phrase: &str, lang: &str, registry: &DictionaryRegistry) -> Result<Self, WalletError> {
        Self::from_key(storage::from_phrase(CurveProfile::P256, phrase, lang, registry)?)
    }

    pub fn from_keystore(json: &str, password: &str) -> Result<Self, WalletError> {
        Self::from_key(storage::import(json, password, CurveProfile::P256)?)
    }

    pub fn load_keystore(path: &Path, password: &str) -> Result<Self, WalletError> {
        Self::from_key(storage::load(path, password, CurveProfile::P256)?)
    }

    /// Base58check address.
    pub fn address(&self) -> &str {
        self.key.address()
    }

    pub fn script_hash(&self) -> ScriptHash {
        self.key.script_hash()
    }

    pub fn key(&self) -> &KeyPair {
        &self.key
    }

    pub fn to_wif(&self) -> Zeroizing<String> {
        self.key.to_wif()
    }

    pub fn mnemonic(&self, lang: &str, registry: &DictionaryRegistry) -> Result<Zeroizing<String>, WalletError> {
        storage::to_phrase(&self.key, lang, registry)
    }

    pub fn to_keystore(&self, password: &str, preset: KeystorePreset) -> Result<String, WalletError> {
        storage::export(&self.key, password, preset)
    }

    pub fn save_keystore(&self, path: &Path, password: &str, preset: KeystorePreset) -> Result<(), WalletError> {
        storage::save(&self.key, path, password, preset)
    }

    /// Send `amount` of native `asset` (display-order hex id) to `to`.
    pub fn transfer_asset(&self, asset: &str, to: &str, amount: &str, utxos: &[Utxo]) -> Result<NeoTx, WalletError> {
        let asset = Hash256::from_hex(asset)?;
        let to = parse_address(to)?;
        let amount = Fixed8::from_decimal_str(amount)?;

        let mut builder = self.builder.clone();
        builder.add_recipient(asset, to, amount);
        let tx = builder.build_transfer(utxos)?;
        self.finish(tx, "transfer")
    }

    /// Claim `amount` of gas to `to` against the unclaimed outputs in `utxos`.
    pub fn claim(&self, amount: &str, to: &str, utxos: &[Utxo]) -> Result<NeoTx, WalletError> {
        let amount = Fixed8::from_decimal_str(amount)?;
        let to = parse_address(to)?;
        let tx = self.builder.build_claim(amount, &to, utxos)?;
        self.finish(tx, "claim")
    }

    /// Buy tokens from the sale contract `asset` (display-order script hash)
    /// by paying it `amount` of the governing token.
    pub fn mint_token(&self, asset: &str, gas: &str, amount: &str, utxos: &[Utxo]) -> Result<NeoTx, WalletError> {
        let contract = ScriptHash::from_reversed_hex(asset)?;
        let gas = Fixed8::from_decimal_str(gas)?;
        let amount = Fixed8::from_decimal_str(amount)?;

        let mut builder = self.builder.clone();
        builder.add_recipient(NEO_ASSET, contract.to_address(), amount);
        let tx = builder.build_invocation(nep5::mint_tokens(&contract)?, gas, utxos)?;
        self.finish(tx, "mint")
    }

    /// Move `amount` token base units of contract `asset` from this wallet
    /// to address `to`.
    pub fn transfer_nep5(&self, asset: &str, to: &str, gas: &str, amount: i64, utxos: &[Utxo]) -> Result<NeoTx, WalletError> {
        let contract = ScriptHash::from_reversed_hex(asset)?;
        let to = parse_address(to)?.script_hash();
        let gas = Fixed8::from_decimal_str(gas)?;
        let from = self.script_hash();

        let mut builder = self.builder.clone();
        builder.add_script_attribute(&from);
        let script = nep5::transfer(&contract, &from, &to, amount)?;
        let tx = builder.build_invocation(script, gas, utxos)?;
        self.finish(tx, "token transfer")
    }

    fn finish(&self, tx: Transaction, what: &str) -> Result<NeoTx, WalletError> {
        let signed = sign::sign(tx, &self.key)?;
        info!(
            from = %self.key.address(),
            txid = %signed.txid,
            inputs = signed.tx.inputs.len(),
            outputs = signed.tx.outputs.len(),
            "{what} signed"
        );
        Ok(signed.into())
    }
}
