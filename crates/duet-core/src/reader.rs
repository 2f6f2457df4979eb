//! Bounds-checked cursor over a byte slice.

use crate::error::CodecError;
use crate::varint::Varint;

/// Sequential reader used by the wire decoders.
///
/// Every read either consumes exactly the requested bytes or fails with
/// [`CodecError::EncodingFailure`]; a short buffer never yields a partial
/// value.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Borrow the next `len` bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], CodecError> {
        if len > self.remaining() {
            return Err(CodecError::EncodingFailure(format!(
                "unexpected end of input: need {len} bytes at offset {}, have {}",
                self.pos,
                self.remaining()
            )));
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64_le(&mut self) -> Result<u64, CodecError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Read a varint length prefix followed by that many bytes.
    pub fn read_var_bytes(&mut self) -> Result<&'a [u8], CodecError> {
        let len = Varint::read(self)?.as_len()?;
        self.read_bytes(len)
    }

    /// Fail unless every byte has been consumed.
    pub fn finish(&self) -> Result<(), CodecError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CodecError::EncodingFailure(format!(
                "{} trailing bytes after offset {}",
                self.remaining(),
                self.pos
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        let mut r = ByteReader::new(&data);
        assert_eq!(r.read_u8().unwrap(), 0x01);
        assert_eq!(r.read_u16_le().unwrap(), 0x0302);
        assert_eq!(r.read_u32_le().unwrap(), 0x0706_0504);
        assert!(r.is_empty());
        r.finish().unwrap();
    }

    #[test]
    fn short_read_fails_without_consuming() {
        let data = [0xAA];
        let mut r = ByteReader::new(&data);
        assert!(matches!(r.read_u16_le(), Err(CodecError::EncodingFailure(_))));
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn var_bytes() {
        let data = [0x02, 0xDE, 0xAD, 0xFF];
        let mut r = ByteReader::new(&data);
        assert_eq!(r.read_var_bytes().unwrap(), &[0xDE, 0xAD]);
        assert!(r.finish().is_err());
    }

    #[test]
    fn var_bytes_truncated() {
        let data = [0x05, 0x01];
        let mut r = ByteReader::new(&data);
        assert!(r.read_var_bytes().is_err());
    }
}
