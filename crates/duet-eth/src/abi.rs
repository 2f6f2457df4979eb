//! Function selectors and 32-byte word packing.
//!
//! Arguments are taken as hex strings (`0x` optional) and left-padded to the
//! next word boundary; values already a whole number of words pass through.

use duet_core::codec::{decode_hex, pack_numeric, strip_hex_prefix};
use duet_core::constants::ABI_WORD_BYTES;
use duet_core::error::CodecError;
use duet_core::hash::keccak256;

use crate::error::EthError;

/// First four bytes of keccak-256 over the canonical signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let digest = keccak256(signature.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

/// Two's-complement 256-bit word for a signed integer, as hex.
pub fn int256_word(value: i64) -> String {
    let fill = if value < 0 { "ff" } else { "00" };
    format!("{}{}", fill.repeat(ABI_WORD_BYTES - 8), hex::encode(value.to_be_bytes()))
}

/// Call data under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallData {
    hex: String,
}

impl CallData {
    pub fn new(signature: &str) -> Self {
        Self {
            hex: hex::encode(selector(signature)),
        }
    }

    /// Append one argument padded to a single word.
    pub fn arg(&mut self, value: &str) -> Result<&mut Self, EthError> {
        self.arg_padded(value, ABI_WORD_BYTES)
    }

    /// Append an argument padded to a multiple of `width_bytes`.
    pub fn arg_padded(&mut self, value: &str, width_bytes: usize) -> Result<&mut Self, EthError> {
        let digits = strip_hex_prefix(value.trim());
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CodecError::InvalidInput(format!("argument {value:?} is not hex")).into());
        }
        self.hex.push_str(&pack_numeric(digits, width_bytes));
        Ok(self)
    }

    /// Append a word holding an unsigned count or offset.
    pub fn arg_usize(&mut self, value: usize) -> &mut Self {
        self.hex.push_str(&format!("{value:064x}"));
        self
    }

    /// `0x`-prefixed form for read-only calls.
    pub fn to_hex(&self) -> String {
        format!("0x{}", self.hex)
    }

    /// Raw bytes for a transaction payload.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EthError> {
        Ok(decode_hex(&self.hex)?)
    }
}
