//! Parcel-registry call data for grid-addressed ERC721 land contracts.
//!
//! Coordinates are signed; pass them through [`abi::int256_word`](crate::abi::int256_word)
//! when starting from integers.

use crate::abi::CallData;
use crate::error::EthError;

pub const TRANSFER_LAND: &str = "transferLand(int,int,address)";
pub const ENCODE_TOKEN_ID: &str = "encodeTokenId(int256,int256)";
pub const DECODE_TOKEN_ID: &str = "decodeTokenId(uint256)";
pub const LAND_DATA: &str = "landData(int256,int256)";
pub const LAND_OF: &str = "landOf(address)";
pub const OWNER_OF_LAND: &str = "ownerOfLand(int,int)";

/// Arguments are written as `x, y, to`.
pub fn transfer_land(to: &str, x: &str, y: &str) -> Result<Vec<u8>, EthError> {
    CallData::new(TRANSFER_LAND)
        .arg(x)?
        .arg(y)?
        .arg(to)?
        .to_bytes()
}

pub fn encode_token_id(x: &str, y: &str) -> Result<String, EthError> {
    Ok(CallData::new(ENCODE_TOKEN_ID).arg(x)?.arg(y)?.to_hex())
}

pub fn decode_token_id(token_id: &str) -> Result<String, EthError> {
    Ok(CallData::new(DECODE_TOKEN_ID).arg(token_id)?.to_hex())
}

pub fn land_data(x: &str, y: &str) -> Result<String, EthError> {
    Ok(CallData::new(LAND_DATA).arg(x)?.arg(y)?.to_hex())
}

pub fn land_of(owner: &str) -> Result<String, EthError> {
    Ok(CallData::new(LAND_OF).arg(owner)?.to_hex())
}

pub fn owner_of_land(x: &str, y: &str) -> Result<String, EthError> {
    Ok(CallData::new(OWNER_OF_LAND).arg(x)?.arg(y)?.to_hex())
}
