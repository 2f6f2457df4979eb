//! # duet-core
//! Codec primitives shared by the account-model and UTXO-model chain crates.
//!
//! - [`codec`] — hex helpers, byte reversal, ABI word packing, quantity parsing
//! - [`varint`] — the variable-length integer used on the UTXO-model wire
//! - [`reader`] — bounds-checked cursor for decoding wire bytes
//! - [`fixed8`] — 8-decimal fixed-point amounts
//! - [`base58`] — base58check with a double-SHA-256 checksum
//! - [`hash`] — keccak-256, SHA-256, hash160
//! - [`types`] — `Hash256` with wire-order conversions

pub mod base58;
pub mod codec;
pub mod constants;
pub mod error;
pub mod fixed8;
pub mod hash;
pub mod reader;
pub mod types;
pub mod varint;

pub use error::{CodecError, CryptoError};
pub use fixed8::Fixed8;
pub use reader::ByteReader;
pub use types::Hash256;
pub use varint::Varint;
