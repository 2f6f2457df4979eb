//! # duet-wallet — one key, one chain, ready-to-broadcast transactions.
//!
//! Each wallet owns a single [`KeyPair`](duet_keys::KeyPair) and turns
//! transfer intents plus externally fetched chain state (nonce, gas price,
//! unspent outputs) into signed raw transactions encoded as hex.
//!
//! # Modules
//!
//! - [`error`] — `WalletError` enum
//! - [`storage`] — keystore presets and keystore file persistence
//! - [`eth`] — `EthWallet` for the account-model chain
//! - [`neo`] — `NeoWallet` for the UTXO-model chain

pub mod error;
pub mod eth;
pub mod neo;
pub mod storage;

pub use error::WalletError;
pub use eth::{EthWallet, TxParams};
pub use neo::{NeoTx, NeoWallet};
pub use storage::KeystorePreset;
