//! Fixed-size hash type with wire-order conversions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codec::{decode_hex_array, strip_hex_prefix};
use crate::error::CodecError;

/// A 32-byte hash in display (big-endian) order.
///
/// Transaction ids and asset ids are shown big-endian but travel
/// byte-reversed on the UTXO-model wire. [`Hash256::to_wire`] and
/// [`Hash256::from_wire`] are the only two places that reversal happens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse display-order hex, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, CodecError> {
        if strip_hex_prefix(s.trim()).len() != 64 {
            return Err(CodecError::InvalidInput(format!(
                "expected 64 hex digits, got {s:?}"
            )));
        }
        decode_hex_array::<32>(s).map(Self)
    }

    /// Bytes as written on the wire (reversed).
    pub fn to_wire(&self) -> [u8; 32] {
        let mut out = self.0;
        out.reverse();
        out
    }

    /// Build from wire-order bytes.
    pub fn from_wire(mut bytes: [u8; 32]) -> Self {
        bytes.reverse();
        Self(bytes)
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for Hash256 {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; 32]> for Hash256 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Hash256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Hash256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&format_args!("0x{self}"))
    }
}

impl<'de> Deserialize<'de> for Hash256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
