//! Address encodings for both chain families.
//!
//! Account-model addresses are the low 20 bytes of keccak-256 over the
//! uncompressed public key, rendered with the mixed-case checksum of
//! [EIP-55]. UTXO-model addresses are base58check (version `0x17`) of the
//! hash160 of a single-signature verification script.
//!
//! [EIP-55]: https://eips.ethereum.org/EIPS/eip-55

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use duet_core::base58::{decode_check, encode_check};
use duet_core::codec::{decode_hex_array, reverse_bytes, strip_hex_prefix};
use duet_core::constants::NEO_ADDRESS_VERSION;
use duet_core::error::CodecError;
use duet_core::hash::{hash160, keccak256};

/// PUSHBYTES33 opcode that opens a verification script.
const PUSH_PUBKEY: u8 = 0x21;
/// CHECKSIG opcode that closes a verification script.
const CHECKSIG: u8 = 0xAC;

/// 20-byte account-model address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EthAddress(pub [u8; 20]);

impl EthAddress {
    /// Derive from a 65-byte SEC1 uncompressed public key (`0x04 ‖ X ‖ Y`).
    pub fn from_public_key(uncompressed: &[u8; 65]) -> Self {
        let digest = keccak256(&uncompressed[1..]);
        let mut out = [0u8; 20];
        out.copy_from_slice(&digest[12..]);
        Self(out)
    }

    /// Parse 40 hex digits with an optional `0x` prefix.
    ///
    /// All-lowercase and all-uppercase inputs are accepted as-is; mixed-case
    /// input must carry a valid checksum.
    pub fn parse(s: &str) -> Result<Self, CodecError> {
        let digits = strip_hex_prefix(s.trim());
        if digits.len() != 40 {
            return Err(CodecError::InvalidInput(format!(
                "address {s:?}: expected 40 hex digits"
            )));
        }
        let address = Self(decode_hex_array::<20>(digits)?);
        let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
        let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
        if has_lower && has_upper && address.to_checksum()[2..] != *digits {
            return Err(CodecError::InvalidChecksum);
        }
        Ok(address)
    }

    /// Lowercase hex without prefix.
    pub fn to_lower_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// `0x`-prefixed mixed-case checksum form.
    pub fn to_checksum(&self) -> String {
        let lower = self.to_lower_hex();
        let hash = keccak256(lower.as_bytes());
        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if c.is_ascii_alphabetic() && nibble > 7 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl FromStr for EthAddress {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Apply the checksum transform to a hex address string.
pub fn to_checksum_address(s: &str) -> Result<String, CodecError> {
    let digits = strip_hex_prefix(s.trim()).to_ascii_lowercase();
    EthAddress::parse(&digits).map(|a| a.to_checksum())
}

/// hash160 of a UTXO-model script, in the byte order the VM uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScriptHash(pub [u8; 20]);

impl ScriptHash {
    pub fn from_script(script: &[u8]) -> Self {
        Self(hash160(script))
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, CodecError> {
        <[u8; 20]>::try_from(bytes).map(Self).map_err(|_| {
            CodecError::InvalidInput(format!("script hash must be 20 bytes, got {}", bytes.len()))
        })
    }

    /// Parse the conventional display form (`0x` hex, byte-reversed).
    pub fn from_reversed_hex(s: &str) -> Result<Self, CodecError> {
        let mut bytes = decode_hex_array::<20>(s)?;
        bytes.reverse();
        Ok(Self(bytes))
    }

    /// Display form: reversed bytes as lowercase hex, no prefix.
    pub fn to_reversed_hex(&self) -> String {
        hex::encode(reverse_bytes(&self.0))
    }

    pub fn to_address(&self) -> NeoAddress {
        NeoAddress(*self)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl AsRef<[u8]> for ScriptHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Single-signature verification script: `PUSHBYTES33 ‖ pubkey ‖ CHECKSIG`.
pub fn verification_script(compressed: &[u8; 33]) -> Vec<u8> {
    let mut script = Vec::with_capacity(35);
    script.push(PUSH_PUBKEY);
    script.extend_from_slice(compressed);
    script.push(CHECKSIG);
    script
}

/// Base58check UTXO-model address wrapping a [`ScriptHash`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NeoAddress(ScriptHash);

impl NeoAddress {
    pub fn from_public_key(compressed: &[u8; 33]) -> Self {
        Self(ScriptHash::from_script(&verification_script(compressed)))
    }

    pub fn script_hash(&self) -> ScriptHash {
        self.0
    }

    pub fn encode(&self) -> String {
        encode_check(NEO_ADDRESS_VERSION, &self.0.0)
    }

    pub fn decode(s: &str) -> Result<Self, CodecError> {
        let (version, payload) = decode_check(s.trim())?;
        if version != NEO_ADDRESS_VERSION {
            return Err(CodecError::InvalidInput(format!(
                "address {s:?}: version 0x{version:02x}, expected 0x{NEO_ADDRESS_VERSION:02x}"
            )));
        }
        ScriptHash::from_slice(&payload).map(Self)
    }
}

impl fmt::Display for NeoAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for NeoAddress {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl Serialize for NeoAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for NeoAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::decode(&s).map_err(serde::de::Error::custom)
    }
}
