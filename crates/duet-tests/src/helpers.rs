//! Shared fixtures for the integration suites.

use duet_core::{Fixed8, Hash256};
use duet_keys::address::{NeoAddress, ScriptHash};
use duet_keys::{CurveProfile, KeyPair};
use duet_neo::Utxo;

/// secp256k1 scalar 1; its address is a well-known vector.
pub const ETH_KEY_ONE: &str = "0000000000000000000000000000000000000000000000000000000000000001";

/// Checksummed address of [`ETH_KEY_ONE`].
pub const ETH_KEY_ONE_ADDRESS: &str = "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf";

/// 39-digit recipient; the odd trailing digit is dropped and the last
/// address byte stays zero.
pub const FIXTURE_RECIPIENT: &str = "00112233445566778899aabbccddeeff0011223";

/// Deterministic P-256 key from a repeated byte.
pub fn neo_key(seed: u8) -> KeyPair {
    KeyPair::from_private_scalar(CurveProfile::P256, &[seed; 32]).unwrap()
}

pub fn eth_key_one() -> KeyPair {
    KeyPair::from_private_scalar(CurveProfile::Secp256k1, &hex_scalar(ETH_KEY_ONE)).unwrap()
}

fn hex_scalar(s: &str) -> Vec<u8> {
    duet_core::codec::decode_hex(s).unwrap()
}

/// Address derived from a repeated byte script hash.
pub fn addr(seed: u8) -> NeoAddress {
    ScriptHash([seed; 20]).to_address()
}

/// Transaction id whose display form ends in `tag`.
pub fn txid(tag: u8) -> Hash256 {
    let mut bytes = [0u8; 32];
    bytes[31] = tag;
    Hash256(bytes)
}

/// An unspent output of `units` whole units owned by `owner`.
pub fn utxo(tag: u8, asset: Hash256, units: i64, owner: NeoAddress) -> Utxo {
    Utxo::new(
        txid(tag),
        u16::from(tag),
        asset,
        Fixed8::from_units(units).unwrap(),
        owner,
    )
}

/// Indexer-style JSON for `utxos`, in the flat shape.
pub fn utxo_json(utxos: &[Utxo]) -> String {
    let entries: Vec<String> = utxos
        .iter()
        .map(|u| {
            format!(
                r#"{{"txid":"0x{}","n":{},"asset":"0x{}","value":"{}","address":"{}"}}"#,
                u.txid, u.n, u.asset, u.value, u.address
            )
        })
        .collect();
    format!("[{}]", entries.join(","))
}
