//! Native asset ids and conversions between addresses and script hashes.
//!
//! Contract calls take script hashes in VM byte order, while explorers and
//! wallets show them byte-reversed as hex. The helpers here convert between
//! base58check addresses and both forms.

use duet_core::Hash256;
use duet_keys::address::{NeoAddress, ScriptHash};

use crate::error::NeoError;

/// Governing token; the asset whose holdings accrue claimable gas.
pub const NEO_ASSET: Hash256 = Hash256([
    0xc5, 0x6f, 0x33, 0xfc, 0x6e, 0xcf, 0xcd, 0x0c, 0x22, 0x5c, 0x4a, 0xb3, 0x56, 0xfe, 0xe5, 0x93,
    0x90, 0xaf, 0x85, 0x60, 0xbe, 0x0e, 0x93, 0x0f, 0xae, 0xbe, 0x74, 0xa6, 0xda, 0xff, 0x7c, 0x9b,
]);

/// Utility token that pays network and system fees.
pub const GAS_ASSET: Hash256 = Hash256([
    0x60, 0x2c, 0x79, 0x71, 0x8b, 0x16, 0xe4, 0x42, 0xde, 0x58, 0x77, 0x8e, 0x14, 0x8d, 0x0b, 0x10,
    0x84, 0xe3, 0xb2, 0xdf, 0xfd, 0x5d, 0xe6, 0xb7, 0xb1, 0x6c, 0xee, 0x79, 0x69, 0x28, 0x2d, 0xe7,
]);

pub fn parse_address(address: &str) -> Result<NeoAddress, NeoError> {
    NeoAddress::decode(address).map_err(|e| NeoError::InvalidAddress(format!("{address}: {e}")))
}

pub fn address_to_script_hash(address: &str) -> Result<ScriptHash, NeoError> {
    parse_address(address).map(|a| a.script_hash())
}

pub fn script_hash_to_address(script_hash: &ScriptHash) -> String {
    script_hash.to_address().encode()
}

/// Address → byte-reversed script hash hex, the form contract arguments
/// are usually written in.
pub fn address_to_invocation_hex(address: &str) -> Result<String, NeoError> {
    address_to_script_hash(address).map(|h| h.to_reversed_hex())
}

/// Inverse of [`address_to_invocation_hex`]; also maps a contract's
/// displayed script hash to the address that receives its deposits.
pub fn invocation_hex_to_address(hex: &str) -> Result<String, NeoError> {
    Ok(script_hash_to_address(&ScriptHash::from_reversed_hex(hex)?))
}
