//! Unspent outputs as returned by an address indexer.
//!
//! Indexers send a list of `{txid, vout: {n, asset, value, address}}`
//! objects; a flat `{txid, n, asset, value, address}` shape is accepted too.
//! Every entry is validated while parsing, so one malformed UTXO fails the
//! whole list instead of being skipped.

use serde::{Deserialize, Serialize};

use duet_core::{CodecError, Fixed8, Hash256};
use duet_keys::address::NeoAddress;

use crate::error::NeoError;
use crate::tx::Input;

/// A spendable output owned by some address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Utxo {
    pub txid: Hash256,
    pub n: u16,
    pub asset: Hash256,
    pub value: Fixed8,
    pub address: NeoAddress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at_block: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spent_at_block: Option<u64>,
    pub claimed: bool,
}

impl Utxo {
    pub fn new(txid: Hash256, n: u16, asset: Hash256, value: Fixed8, address: NeoAddress) -> Self {
        Self {
            txid,
            n,
            asset,
            value,
            address,
            created_at_block: None,
            spent_at_block: None,
            claimed: false,
        }
    }

    /// The input that spends this output.
    pub fn outpoint(&self) -> Input {
        Input {
            prev_hash: self.txid,
            prev_index: self.n,
        }
    }

    /// Parse an indexer response, failing on the first malformed entry.
    pub fn parse_list(json: &str) -> Result<Vec<Self>, NeoError> {
        let raw: Vec<RawUtxo> = serde_json::from_str(json)?;
        raw.into_iter()
            .enumerate()
            .map(|(i, r)| {
                r.validate().map_err(|e| match e {
                    NeoError::Codec(CodecError::InvalidInput(msg)) => {
                        CodecError::InvalidInput(format!("utxo #{i}: {msg}")).into()
                    }
                    other => other,
                })
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct RawVout {
    #[serde(alias = "N")]
    n: u16,
    #[serde(alias = "Asset")]
    asset: String,
    #[serde(alias = "Value")]
    value: String,
    #[serde(alias = "Address")]
    address: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUtxo {
    #[serde(alias = "Txid")]
    txid: String,
    #[serde(default)]
    vout: Option<RawVout>,
    #[serde(default)]
    n: Option<u16>,
    #[serde(default)]
    asset: Option<String>,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default, alias = "block")]
    created_at_block: Option<u64>,
    #[serde(default, alias = "spentBlock")]
    spent_at_block: Option<u64>,
    #[serde(default)]
    claimed: bool,
}

impl RawUtxo {
    fn validate(self) -> Result<Utxo, NeoError> {
        let missing = |field: &str| CodecError::InvalidInput(format!("missing field {field:?}"));
        let vout = match self.vout {
            Some(v) => v,
            None => RawVout {
                n: self.n.ok_or_else(|| missing("n"))?,
                asset: self.asset.ok_or_else(|| missing("asset"))?,
                value: self.value.ok_or_else(|| missing("value"))?,
                address: self.address.ok_or_else(|| missing("address"))?,
            },
        };

        let txid = Hash256::from_hex(&self.txid)
            .map_err(|e| CodecError::InvalidInput(format!("txid: {e}")))?;
        let asset = Hash256::from_hex(&vout.asset)
            .map_err(|e| CodecError::InvalidInput(format!("asset: {e}")))?;
        let value = Fixed8::from_decimal_str(&vout.value)
            .map_err(|e| CodecError::InvalidInput(format!("value: {e}")))?;
        if value.raw() < 0 {
            return Err(CodecError::InvalidInput(format!("value: negative {value}")).into());
        }
        let address = NeoAddress::decode(&vout.address)
            .map_err(|e| NeoError::InvalidAddress(format!("{}: {e}", vout.address)))?;

        Ok(Utxo {
            txid,
            n: vout.n,
            asset,
            value,
            address,
            created_at_block: self.created_at_block,
            spent_at_block: self.spent_at_block,
            claimed: self.claimed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{GAS_ASSET, NEO_ASSET};
    use duet_keys::address::ScriptHash;

    fn owner() -> NeoAddress {
        ScriptHash([0x21; 20]).to_address()
    }

    fn nested(txid: &str, value: &str) -> String {
        format!(
            r#"{{"txid":"{txid}","vout":{{"N":1,"Asset":"0x{GAS_ASSET}","Value":"{value}","Address":"{}"}},"block":12}}"#,
            owner()
        )
    }

    #[test]
    fn parses_nested_indexer_shape() {
        let txid = "ab".repeat(32);
        let json = format!("[{}]", nested(&txid, "1.5"));
        let utxos = Utxo::parse_list(&json).unwrap();
        assert_eq!(utxos.len(), 1);
        let u = &utxos[0];
        assert_eq!(u.txid.to_string(), txid);
        assert_eq!(u.n, 1);
        assert_eq!(u.asset, GAS_ASSET);
        assert_eq!(u.value, Fixed8::from_raw(150_000_000));
        assert_eq!(u.address, owner());
        assert_eq!(u.created_at_block, Some(12));
        assert!(!u.claimed);
    }

    #[test]
    fn parses_flat_shape() {
        let json = format!(
            r#"[{{"txid":"0x{}","n":0,"asset":"{NEO_ASSET}","value":"10","address":"{}","claimed":true}}]"#,
            "01".repeat(32),
            owner()
        );
        let utxos = Utxo::parse_list(&json).unwrap();
        assert_eq!(utxos[0].asset, NEO_ASSET);
        assert_eq!(utxos[0].value, Fixed8::from_raw(1_000_000_000));
        assert!(utxos[0].claimed);
        assert_eq!(utxos[0].outpoint().prev_index, 0);
    }

    #[test]
    fn one_bad_entry_fails_the_list() {
        let good = nested(&"ab".repeat(32), "1");
        for bad in [
            nested(&"ab".repeat(31), "1"),
            nested(&"zz".repeat(32), "1"),
            nested(&"ab".repeat(32), "1.5e3"),
            nested(&"ab".repeat(32), "abc"),
            nested(&"ab".repeat(32), "0.000000001"),
        ] {
            let json = format!("[{good},{bad}]");
            let err = Utxo::parse_list(&json).unwrap_err();
            assert!(
                matches!(err, NeoError::Codec(CodecError::InvalidInput(ref m)) if m.starts_with("utxo #1")),
                "{err}"
            );
        }
    }

    #[test]
    fn bad_address_and_missing_fields() {
        let json = format!(
            r#"[{{"txid":"{}","n":0,"asset":"{GAS_ASSET}","value":"1","address":"not-an-address"}}]"#,
            "01".repeat(32)
        );
        assert!(matches!(Utxo::parse_list(&json), Err(NeoError::InvalidAddress(_))));

        let json = format!(r#"[{{"txid":"{}","n":0}}]"#, "01".repeat(32));
        assert!(matches!(Utxo::parse_list(&json), Err(NeoError::Codec(_))));

        assert!(matches!(Utxo::parse_list("{"), Err(NeoError::Serialization(_))));
    }

    #[test]
    fn serializes_camel_case() {
        let utxo = Utxo::new(Hash256::ZERO, 3, GAS_ASSET, Fixed8::ONE, owner());
        let json = serde_json::to_value(&utxo).unwrap();
        assert_eq!(json["n"], 3);
        assert_eq!(json["value"], "1.00000000");
        assert!(json.get("createdAtBlock").is_none());
    }
}
