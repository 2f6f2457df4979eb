//! Variable-length integer of the UTXO-model wire format.
//!
//! ```text
//! value < 0xFD            -> 1 byte
//! value <= 0xFFFF         -> 0xFD ‖ u16 LE
//! value <= 0xFFFF_FFFF    -> 0xFE ‖ u32 LE
//! otherwise               -> 0xFF ‖ u64 LE
//! ```

use crate::error::CodecError;
use crate::reader::ByteReader;

const TAG_U16: u8 = 0xFD;
const TAG_U32: u8 = 0xFE;
const TAG_U64: u8 = 0xFF;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Varint(pub u64);

impl Varint {
    /// Number of bytes [`Varint::write`] emits for this value.
    pub fn encoded_len(self) -> usize {
        match self.0 {
            v if v < u64::from(TAG_U16) => 1,
            v if v <= u64::from(u16::MAX) => 3,
            v if v <= u64::from(u32::MAX) => 5,
            _ => 9,
        }
    }

    /// Append the smallest encoding of this value to `out`.
    pub fn write(self, out: &mut Vec<u8>) {
        let v = self.0;
        if v < u64::from(TAG_U16) {
            out.push(v as u8);
        } else if v <= u64::from(u16::MAX) {
            out.push(TAG_U16);
            out.extend_from_slice(&(v as u16).to_le_bytes());
        } else if v <= u64::from(u32::MAX) {
            out.push(TAG_U32);
            out.extend_from_slice(&(v as u32).to_le_bytes());
        } else {
            out.push(TAG_U64);
            out.extend_from_slice(&v.to_le_bytes());
        }
    }

    pub fn to_bytes(self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write(&mut out);
        out
    }

    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        let tag = reader.read_u8()?;
        let value = match tag {
            TAG_U16 => u64::from(reader.read_u16_le()?),
            TAG_U32 => u64::from(reader.read_u32_le()?),
            TAG_U64 => reader.read_u64_le()?,
            small => u64::from(small),
        };
        Ok(Self(value))
    }

    /// Convert to a `usize` length, failing on platforms where it does not fit.
    pub fn as_len(self) -> Result<usize, CodecError> {
        usize::try_from(self.0)
            .map_err(|_| CodecError::EncodingFailure(format!("length {} overflows usize", self.0)))
    }
}

impl From<usize> for Varint {
    fn from(len: usize) -> Self {
        Self(len as u64)
    }
}

/// Write `bytes` prefixed by their varint length.
pub fn write_var_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    Varint::from(bytes.len()).write(out);
    out.extend_from_slice(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(v: u64) -> u64 {
        let bytes = Varint(v).to_bytes();
        let mut r = ByteReader::new(&bytes);
        let out = Varint::read(&mut r).unwrap();
        r.finish().unwrap();
        out.0
    }

    #[test]
    fn boundary_encodings() {
        assert_eq!(Varint(0xFC).to_bytes(), vec![0xFC]);
        assert_eq!(Varint(0xFD).to_bytes(), vec![0xFD, 0xFD, 0x00]);
        assert_eq!(Varint(0xFFFF).to_bytes(), vec![0xFD, 0xFF, 0xFF]);
        assert_eq!(Varint(0x1_0000).to_bytes(), vec![0xFE, 0x00, 0x00, 0x01, 0x00]);
        assert_eq!(
            Varint(0xFFFF_FFFF).to_bytes(),
            vec![0xFE, 0xFF, 0xFF, 0xFF, 0xFF]
        );
        assert_eq!(
            Varint(0x1_0000_0000).to_bytes(),
            vec![0xFF, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn boundary_roundtrips() {
        for v in [
            0,
            0xFC,
            0xFD,
            0xFE,
            0xFFFF,
            0x1_0000,
            0x1_0001,
            0xFFFF_FFFF,
            0x1_0000_0000,
            0x1_0000_0001,
            u64::MAX,
        ] {
            assert_eq!(roundtrip(v), v, "value {v:#x}");
            assert_eq!(Varint(v).encoded_len(), Varint(v).to_bytes().len());
        }
    }

    #[test]
    fn truncated_input_fails() {
        let mut r = ByteReader::new(&[0xFE, 0x01, 0x02]);
        assert!(matches!(Varint::read(&mut r), Err(CodecError::EncodingFailure(_))));
    }

    #[test]
    fn var_bytes_prefix() {
        let mut out = Vec::new();
        write_var_bytes(&mut out, &[7; 3]);
        assert_eq!(out, vec![3, 7, 7, 7]);
    }

    // --- proptest ---

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn varint_roundtrip(v in any::<u64>()) {
            prop_assert_eq!(roundtrip(v), v);
        }
    }
}
