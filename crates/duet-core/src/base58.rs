//! Base58check: `base58(version ‖ payload ‖ sha256d(version ‖ payload)[..4])`.

use crate::error::CodecError;
use crate::hash::sha256d;

const CHECKSUM_LEN: usize = 4;

/// Encode `payload` under `version` with a 4-byte double-SHA-256 checksum.
///
/// Leading zero bytes become leading `1` characters.
pub fn encode_check(version: u8, payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(1 + payload.len() + CHECKSUM_LEN);
    data.push(version);
    data.extend_from_slice(payload);
    let checksum = sha256d(&data);
    data.extend_from_slice(&checksum[..CHECKSUM_LEN]);
    bs58::encode(data).into_string()
}

/// Decode a base58check string into `(version, payload)`.
pub fn decode_check(s: &str) -> Result<(u8, Vec<u8>), CodecError> {
    let data = bs58::decode(s)
        .into_vec()
        .map_err(|e| CodecError::InvalidInput(format!("base58 {s:?}: {e}")))?;
    if data.len() < 1 + CHECKSUM_LEN {
        return Err(CodecError::InvalidInput(format!(
            "base58check {s:?}: too short"
        )));
    }
    let (body, checksum) = data.split_at(data.len() - CHECKSUM_LEN);
    if sha256d(body)[..CHECKSUM_LEN] != *checksum {
        return Err(CodecError::InvalidChecksum);
    }
    Ok((body[0], body[1..].to_vec()))
}
