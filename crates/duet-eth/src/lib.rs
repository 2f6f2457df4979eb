//! # duet-eth — account-model transaction engine.
//!
//! # Modules
//!
//! - [`error`] — `EthError` enum
//! - [`rlp`] — recursive length prefix encoding and decoding
//! - [`tx`] — legacy transactions: build, sign, encode, recover sender
//! - [`units`] — denomination and token-decimal conversions
//! - [`abi`] — selectors and word packing shared by the encoders below
//! - [`erc20`], [`erc721`], [`land`], [`red_packet`] — contract call data
//! - [`call`] — JSON bodies for read-only contract calls

pub mod abi;
pub mod call;
pub mod erc20;
pub mod erc721;
pub mod error;
pub mod land;
pub mod red_packet;
pub mod rlp;
pub mod tx;
pub mod units;

pub use abi::CallData;
pub use call::EthCall;
pub use error::EthError;
pub use tx::{EthTransaction, SignedEthTransaction};
pub use units::Unit;
