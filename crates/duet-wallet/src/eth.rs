//! Account-model wallet.
//!
//! Every transaction method takes the chain state the caller fetched from a
//! node ([`TxParams`]) and returns the signed raw transaction as lowercase
//! hex without a `0x` prefix, ready for `eth_sendRawTransaction`.

use std::path::Path;

use tracing::info;
use zeroize::Zeroizing;

use duet_core::codec::decode_hex;
use duet_eth::{erc20, erc721, land, EthTransaction};
use duet_keys::{CurveProfile, DictionaryRegistry, KeyPair};

use crate::error::WalletError;
use crate::storage::{self, KeystorePreset};

/// Nonce and gas settings shared by every account-model transaction.
///
/// All three are hex quantities with an optional `0x` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxParams<'a> {
    pub nonce: &'a str,
    pub gas_price: &'a str,
    pub gas_limit: &'a str,
}

impl<'a> TxParams<'a> {
    pub fn new(nonce: &'a str, gas_price: &'a str, gas_limit: &'a str) -> Self {
        Self {
            nonce,
            gas_price,
            gas_limit,
        }
    }
}

/// A single secp256k1 key and the transactions it can sign.
#[derive(Debug, Clone)]
pub struct EthWallet {
    key: KeyPair,
}

impl EthWallet {
    pub fn generate() -> Self {
        Self {
            key: KeyPair::generate(CurveProfile::Secp256k1),
        }
    }

    /// Wrap an existing key. Fails for P-256 keys.
    pub fn from_key(key: KeyPair) -> Result<Self, WalletError> {
        if key.profile() != CurveProfile::Secp256k1 {
            return Err(WalletError::WrongCurve {
                expected: CurveProfile::Secp256k1,
                actual: key.profile(),
            });
        }
        Ok(Self { key })
    }

    /// Import a 32-byte private key given as hex.
    pub fn from_private_key(hex: &str) -> Result<Self, WalletError> {
        let scalar = Zeroizing::new(decode_hex(hex)?);
        Self::from_key(KeyPair::from_private_scalar(CurveProfile::Secp256k1, &scalar)?)
    }

    pub fn from_mnemonic(phrase: &str, lang: &str, registry: &DictionaryRegistry) -> Result<Self, WalletError> {
        Self::from_key(storage::from_phrase(CurveProfile::Secp256k1, phrase, lang, registry)?)
    }

    pub fn from_keystore(json: &str, password: &str) -> Result<Self, WalletError> {
        Self::from_key(storage::import(json, password, CurveProfile::Secp256k1)?)
    }

    pub fn load_keystore(path: &Path, password: &str) -> Result<Self, WalletError> {
        Self::from_key(storage::load(path, password, CurveProfile::Secp256k1)?)
    }

    /// EIP-55 checksummed address.
    pub fn address(&self) -> &str {
        self.key.address()
    }

    pub fn key(&self) -> &KeyPair {
        &self.key
    }

    /// The private key as a 24-word phrase in dictionary `lang`.
    pub fn mnemonic(&self, lang: &str, registry: &DictionaryRegistry) -> Result<Zeroizing<String>, WalletError> {
        storage::to_phrase(&self.key, lang, registry)
    }

    pub fn to_keystore(&self, password: &str, preset: KeystorePreset) -> Result<String, WalletError> {
        storage::export(&self.key, password, preset)
    }

    pub fn save_keystore(&self, path: &Path, password: &str, preset: KeystorePreset) -> Result<(), WalletError> {
        storage::save(&self.key, path, password, preset)
    }

    /// Plain value transfer of `value` wei to `to`.
    pub fn transfer(&self, params: TxParams<'_>, to: &str, value: &str) -> Result<String, WalletError> {
        self.sign(params, to, value, Vec::new())
    }

    /// ERC20 `transfer(to, amount)` sent to `contract`.
    pub fn transfer_erc20(
        &self,
        params: TxParams<'_>,
        contract: &str,
        to: &str,
        amount: &str,
    ) -> Result<String, WalletError> {
        self.sign(params, contract, "0x0", erc20::transfer(to, amount)?)
    }

    /// ERC721 `transferFrom(from, to, token_id)` sent to `contract`.
    pub fn transfer_from_erc721(
        &self,
        params: TxParams<'_>,
        contract: &str,
        from: &str,
        to: &str,
        token_id: &str,
    ) -> Result<String, WalletError> {
        self.sign(params, contract, "0x0", erc721::transfer_from(from, to, token_id)?)
    }

    /// Land parcel `transferLand(x, y, to)` sent to `contract`.
    pub fn transfer_land(
        &self,
        params: TxParams<'_>,
        contract: &str,
        to: &str,
        x: &str,
        y: &str,
    ) -> Result<String, WalletError> {
        self.sign(params, contract, "0x0", land::transfer_land(to, x, y)?)
    }

    /// Arbitrary call data (hex, optional `0x`) with an attached value.
    ///
    /// An empty `contract` deploys `data` as contract creation code.
    pub fn contract_call(
        &self,
        params: TxParams<'_>,
        contract: &str,
        value: &str,
        data: &str,
    ) -> Result<String, WalletError> {
        self.sign(params, contract, value, decode_hex(data)?)
    }

    fn sign(&self, params: TxParams<'_>, to: &str, value: &str, payload: Vec<u8>) -> Result<String, WalletError> {
        let tx = EthTransaction::new(params.nonce, to, value, params.gas_price, params.gas_limit, payload)?;
        let signed = tx.sign(&self.key)?;
        info!(
            from = %self.key.address(),
            nonce = tx.nonce,
            hash = %hex::encode(signed.hash()),
            "account-model transaction signed"
        );
        Ok(signed.to_hex())
    }
}
