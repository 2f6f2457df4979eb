//! Hex and byte-order helpers.
//!
//! Chain inputs arrive as loosely formatted hex strings (`0x` optional,
//! odd digit counts allowed). Everything here normalizes them into bytes or
//! fixed-width hex words without losing the caller's intent.

use crate::constants::MAX_QUANTITY_BYTES;
use crate::error::CodecError;

/// Strip a leading `0x` / `0X` if present.
pub fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Decode a hex string, tolerating a `0x` prefix and an odd digit count
/// (left-padded with a zero nibble).
pub fn decode_hex(s: &str) -> Result<Vec<u8>, CodecError> {
    let digits = strip_hex_prefix(s.trim());
    let decoded = if digits.len() % 2 == 1 {
        hex::decode(format!("0{digits}"))
    } else {
        hex::decode(digits)
    };
    decoded.map_err(|e| CodecError::InvalidInput(format!("hex {s:?}: {e}")))
}

/// Decode a hex string that must be exactly `N` bytes long.
pub fn decode_hex_array<const N: usize>(s: &str) -> Result<[u8; N], CodecError> {
    let bytes = decode_hex(s)?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| {
        CodecError::InvalidInput(format!("expected {N} bytes, got {} in {s:?}", bytes.len()))
    })
}

/// Return a reversed copy of `bytes`.
pub fn reverse_bytes(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().rev().copied().collect()
}

/// Strip leading zero bytes, leaving the minimal big-endian form.
pub fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[first..]
}

/// Left-pad a hex value with `0` nibbles to the next multiple of
/// `width_bytes * 2` characters.
///
/// A `0x` prefix is dropped and an empty value is treated as `0`. Values
/// whose length is already a multiple of the word width pass through
/// unchanged.
pub fn pack_numeric(value: &str, width_bytes: usize) -> String {
    let mut digits = strip_hex_prefix(value);
    if digits.is_empty() {
        digits = "0";
    }
    let chars = width_bytes * 2;
    let rem = digits.len() % chars;
    if rem == 0 {
        return digits.to_string();
    }
    let mut out = "0".repeat(chars - rem);
    out.push_str(digits);
    out
}

/// Parse a non-negative hexadecimal quantity into minimal big-endian bytes.
///
/// Zero is represented by an empty vector, which is also what RLP expects.
pub fn parse_quantity(s: &str) -> Result<Vec<u8>, CodecError> {
    let digits = strip_hex_prefix(s.trim());
    if digits.is_empty() {
        return Ok(Vec::new());
    }
    let padded;
    let even = if digits.len() % 2 == 1 {
        padded = format!("0{digits}");
        padded.as_str()
    } else {
        digits
    };
    let bytes = hex::decode(even).map_err(|_| CodecError::InvalidAmount(s.to_string()))?;
    let minimal = trim_leading_zeros(&bytes);
    if minimal.len() > MAX_QUANTITY_BYTES {
        return Err(CodecError::InvalidAmount(format!(
            "{s}: exceeds {MAX_QUANTITY_BYTES} bytes"
        )));
    }
    Ok(minimal.to_vec())
}

/// Interpret minimal big-endian bytes as a `u64`.
pub fn quantity_to_u64(bytes: &[u8]) -> Result<u64, CodecError> {
    let minimal = trim_leading_zeros(bytes);
    if minimal.len() > 8 {
        return Err(CodecError::InvalidAmount(format!(
            "0x{} does not fit in 64 bits",
            hex::encode(minimal)
        )));
    }
    Ok(minimal.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b)))
}

/// Minimal big-endian bytes of a `u64` (empty for zero).
pub fn u64_to_quantity(value: u64) -> Vec<u8> {
    trim_leading_zeros(&value.to_be_bytes()).to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_prefix_variants() {
        assert_eq!(strip_hex_prefix("0xab"), "ab");
        assert_eq!(strip_hex_prefix("0Xab"), "ab");
        assert_eq!(strip_hex_prefix("ab"), "ab");
    }

    #[test]
    fn decode_hex_odd_length() {
        assert_eq!(decode_hex("0xabc").unwrap(), vec![0x0a, 0xbc]);
        assert_eq!(decode_hex("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn decode_hex_rejects_garbage() {
        assert!(matches!(decode_hex("0xzz"), Err(CodecError::InvalidInput(_))));
    }

    #[test]
    fn decode_hex_array_length_checked() {
        let ok: [u8; 2] = decode_hex_array("0x0102").unwrap();
        assert_eq!(ok, [1, 2]);
        assert!(decode_hex_array::<3>("0x0102").is_err());
    }

    #[test]
    fn pack_numeric_pads_left() {
        assert_eq!(pack_numeric("0x1", 32), format!("{}1", "0".repeat(63)));
        assert_eq!(pack_numeric("", 32), "0".repeat(64));
        assert_eq!(pack_numeric("0x", 1), "00");
    }

    #[test]
    fn pack_numeric_aligned_unchanged() {
        let word = "ab".repeat(32);
        assert_eq!(pack_numeric(&word, 32), word);
        assert_eq!(pack_numeric(&format!("0x{word}"), 32), word);
    }

    #[test]
    fn parse_quantity_forms() {
        assert_eq!(parse_quantity("0x0").unwrap(), Vec::<u8>::new());
        assert_eq!(parse_quantity("0x").unwrap(), Vec::<u8>::new());
        assert_eq!(parse_quantity("0x5208").unwrap(), vec![0x52, 0x08]);
        assert_eq!(parse_quantity("1").unwrap(), vec![0x01]);
        assert_eq!(parse_quantity("0x000100").unwrap(), vec![0x01, 0x00]);
    }

    #[test]
    fn parse_quantity_rejects_non_hex() {
        assert_eq!(
            parse_quantity("12g4"),
            Err(CodecError::InvalidAmount("12g4".into()))
        );
    }

    #[test]
    fn parse_quantity_rejects_oversized() {
        let big = format!("0x1{}", "0".repeat(64));
        assert!(matches!(parse_quantity(&big), Err(CodecError::InvalidAmount(_))));
    }

    #[test]
    fn quantity_u64_roundtrip() {
        assert_eq!(quantity_to_u64(&u64_to_quantity(0)).unwrap(), 0);
        assert_eq!(quantity_to_u64(&u64_to_quantity(u64::MAX)).unwrap(), u64::MAX);
        assert!(quantity_to_u64(&[1; 9]).is_err());
    }

    #[test]
    fn reverse_and_trim() {
        assert_eq!(reverse_bytes(&[1, 2, 3]), vec![3, 2, 1]);
        assert_eq!(trim_leading_zeros(&[0, 0, 5, 0]), &[5, 0]);
        assert_eq!(trim_leading_zeros(&[0, 0]), &[] as &[u8]);
    }

    // --- proptest ---

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn pack_numeric_width_multiple(digits in "[0-9a-f]{0,130}", width in 1usize..=64) {
            let packed = pack_numeric(&digits, width);
            prop_assert_eq!(packed.len() % (width * 2), 0);
            let expected = if digits.is_empty() { "0".to_string() } else { digits.clone() };
            prop_assert!(packed.ends_with(&expected));
            prop_assert!(packed[..packed.len() - expected.len()].chars().all(|c| c == '0'));
        }

        #[test]
        fn parse_quantity_matches_u64(value in any::<u64>()) {
            let parsed = parse_quantity(&format!("0x{value:x}")).unwrap();
            prop_assert_eq!(quantity_to_u64(&parsed).unwrap(), value);
            prop_assert_eq!(parsed, u64_to_quantity(value));
        }
    }
}
