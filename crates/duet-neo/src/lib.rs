//! # duet-neo — UTXO-model transaction engine.
//!
//! # Modules
//!
//! - [`error`] — `NeoError` and the assembler's `ScriptError`
//! - [`opcode`] — VM opcode bytes
//! - [`script`] — `ScriptBuilder`, the append-only VM script assembler
//! - [`tx`] — transaction model and its binary wire codec
//! - [`utxo`] — unspent outputs as supplied by an indexer
//! - [`coin_selection`] — smallest-first greedy selection per asset
//! - [`builder`] — transfer, claim and invocation construction
//! - [`sign`] — deterministic P-256 witnesses and final encoding
//! - [`nep5`] — token contract invocation scripts
//! - [`address`] — asset ids and address/script-hash conversions

pub mod address;
pub mod builder;
pub mod coin_selection;
pub mod error;
pub mod nep5;
pub mod opcode;
pub mod script;
pub mod sign;
pub mod tx;
pub mod utxo;

pub use builder::{NeoBuildConfig, NeoTxBuilder, Recipient};
pub use coin_selection::{CoinSelection, CoinSelector};
pub use error::{NeoError, ScriptError};
pub use script::ScriptBuilder;
pub use sign::SignedNeoTransaction;
pub use tx::{Attribute, Input, Output, Transaction, TxKind, TxType, Witness};
pub use utxo::Utxo;
