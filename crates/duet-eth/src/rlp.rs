//! Recursive length prefix.
//!
//! Integers are encoded as their minimal big-endian bytes, so zero is the
//! empty string (`0x80`).

use duet_core::codec::trim_leading_zeros;
use duet_core::reader::ByteReader;

use crate::error::EthError;

const SHORT_STRING: u8 = 0x80;
const LONG_STRING: u8 = 0xb7;
const SHORT_LIST: u8 = 0xc0;
const LONG_LIST: u8 = 0xf7;
const SHORT_LIMIT: usize = 56;

/// Encode a byte string.
pub fn encode_bytes(bytes: &[u8]) -> Vec<u8> {
    if bytes.len() == 1 && bytes[0] < SHORT_STRING {
        return bytes.to_vec();
    }
    let mut out = encode_header(SHORT_STRING, LONG_STRING, bytes.len());
    out.extend_from_slice(bytes);
    out
}

/// Encode an unsigned integer.
pub fn encode_u64(value: u64) -> Vec<u8> {
    encode_bytes(trim_leading_zeros(&value.to_be_bytes()))
}

/// Encode a list whose items are already encoded.
pub fn encode_list(items: &[Vec<u8>]) -> Vec<u8> {
    let payload_len = items.iter().map(Vec::len).sum();
    let mut out = encode_header(SHORT_LIST, LONG_LIST, payload_len);
    out.reserve(payload_len);
    for item in items {
        out.extend_from_slice(item);
    }
    out
}

fn encode_header(short: u8, long: u8, len: usize) -> Vec<u8> {
    if len < SHORT_LIMIT {
        return vec![short + len as u8];
    }
    let len_bytes = trim_leading_zeros(&(len as u64).to_be_bytes()).to_vec();
    let mut out = Vec::with_capacity(1 + len_bytes.len() + len);
    out.push(long + len_bytes.len() as u8);
    out.extend_from_slice(&len_bytes);
    out
}

/// A decoded RLP value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Bytes(Vec<u8>),
    List(Vec<Item>),
}

impl Item {
    pub fn as_bytes(&self) -> Result<&[u8], EthError> {
        match self {
            Self::Bytes(b) => Ok(b),
            Self::List(_) => Err(EthError::InvalidRlp("expected string, found list".into())),
        }
    }

    pub fn as_list(&self) -> Result<&[Item], EthError> {
        match self {
            Self::List(items) => Ok(items),
            Self::Bytes(_) => Err(EthError::InvalidRlp("expected list, found string".into())),
        }
    }
}

/// Decode exactly one item spanning all of `data`.
pub fn decode(data: &[u8]) -> Result<Item, EthError> {
    let mut reader = ByteReader::new(data);
    let item = decode_item(&mut reader)?;
    if !reader.is_empty() {
        return Err(EthError::InvalidRlp(format!(
            "{} trailing bytes",
            reader.remaining()
        )));
    }
    Ok(item)
}

fn decode_item(reader: &mut ByteReader<'_>) -> Result<Item, EthError> {
    let prefix = reader.read_u8()?;
    match prefix {
        0x00..=0x7f => Ok(Item::Bytes(vec![prefix])),
        0x80..=0xb7 => {
            let bytes = reader.read_bytes((prefix - SHORT_STRING) as usize)?;
            if bytes.len() == 1 && bytes[0] < SHORT_STRING {
                return Err(EthError::InvalidRlp("non-canonical single byte".into()));
            }
            Ok(Item::Bytes(bytes.to_vec()))
        }
        0xb8..=0xbf => {
            let len = decode_long_length(reader, prefix - LONG_STRING)?;
            Ok(Item::Bytes(reader.read_bytes(len)?.to_vec()))
        }
        0xc0..=0xf7 => decode_list_payload(reader.read_bytes((prefix - SHORT_LIST) as usize)?),
        _ => {
            let len = decode_long_length(reader, prefix - LONG_LIST)?;
            decode_list_payload(reader.read_bytes(len)?)
        }
    }
}

fn decode_list_payload(payload: &[u8]) -> Result<Item, EthError> {
    let mut reader = ByteReader::new(payload);
    let mut items = Vec::new();
    while !reader.is_empty() {
        items.push(decode_item(&mut reader)?);
    }
    Ok(Item::List(items))
}

fn decode_long_length(reader: &mut ByteReader<'_>, len_of_len: u8) -> Result<usize, EthError> {
    let bytes = reader.read_bytes(len_of_len as usize)?;
    if bytes.first() == Some(&0) || bytes.len() > 8 {
        return Err(EthError::InvalidRlp("non-canonical length".into()));
    }
    let len = bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
    if len < SHORT_LIMIT as u64 {
        return Err(EthError::InvalidRlp("long form used for short payload".into()));
    }
    usize::try_from(len).map_err(|_| EthError::InvalidRlp(format!("length {len} too large")))
}
