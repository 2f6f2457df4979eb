//! ERC721 (draft interface) call data.

use crate::abi::CallData;
use crate::error::EthError;

pub const BALANCE_OF: &str = "balanceOf(address)";
pub const TOTAL_SUPPLY: &str = "totalSupply()";
pub const NAME: &str = "name()";
pub const SYMBOL: &str = "symbol()";
pub const DECIMALS: &str = "decimals()";
pub const DESCRIPTION: &str = "description()";
pub const OWNER_OF: &str = "ownerOf(uint256)";
pub const TOKENS_OF: &str = "tokensOf(address)";
pub const TOKEN_OF_OWNER_BY_INDEX: &str = "tokenOfOwnerByIndex(address,uint256)";
pub const TOKEN_METADATA: &str = "tokenMetadata(uint256)";
pub const EXISTS: &str = "exists(uint256)";
pub const APPROVE: &str = "approve(address,uint256)";
pub const SET_APPROVAL_FOR_ALL: &str = "setApprovalForAll(address,bool)";
pub const GET_APPROVED_ADDRESS: &str = "getApprovedAddress(uint256)";
pub const IS_APPROVED_FOR_ALL: &str = "isApprovedForAll(address,address)";
pub const IS_AUTHORIZED: &str = "isAuthorized(address,uint256)";
pub const TRANSFER: &str = "transfer(address,uint256)";
pub const TRANSFER_FROM: &str = "transferFrom(address,address,uint256)";
pub const TAKE_OWNERSHIP: &str = "takeOwnership(uint256)";
pub const SET_ASSET_HOLDER: &str = "setAssetHolder(address,uint256)";

pub fn balance_of(owner: &str) -> Result<String, EthError> {
    Ok(CallData::new(BALANCE_OF).arg(owner)?.to_hex())
}

pub fn total_supply() -> String {
    CallData::new(TOTAL_SUPPLY).to_hex()
}

pub fn name() -> String {
    CallData::new(NAME).to_hex()
}

pub fn symbol() -> String {
    CallData::new(SYMBOL).to_hex()
}

pub fn decimals() -> String {
    CallData::new(DECIMALS).to_hex()
}

pub fn description() -> String {
    CallData::new(DESCRIPTION).to_hex()
}

pub fn owner_of(token_id: &str) -> Result<String, EthError> {
    Ok(CallData::new(OWNER_OF).arg(token_id)?.to_hex())
}

pub fn tokens_of(owner: &str) -> Result<String, EthError> {
    Ok(CallData::new(TOKENS_OF).arg(owner)?.to_hex())
}

pub fn token_of_owner_by_index(owner: &str, index: &str) -> Result<String, EthError> {
    Ok(CallData::new(TOKEN_OF_OWNER_BY_INDEX)
        .arg(owner)?
        .arg(index)?
        .to_hex())
}

pub fn token_metadata(token_id: &str) -> Result<String, EthError> {
    Ok(CallData::new(TOKEN_METADATA).arg(token_id)?.to_hex())
}

pub fn exists(token_id: &str) -> Result<String, EthError> {
    Ok(CallData::new(EXISTS).arg(token_id)?.to_hex())
}

pub fn get_approved_address(token_id: &str) -> Result<String, EthError> {
    Ok(CallData::new(GET_APPROVED_ADDRESS).arg(token_id)?.to_hex())
}

pub fn is_approved_for_all(owner: &str, operator: &str) -> Result<String, EthError> {
    Ok(CallData::new(IS_APPROVED_FOR_ALL)
        .arg(owner)?
        .arg(operator)?
        .to_hex())
}

pub fn is_authorized(operator: &str, token_id: &str) -> Result<String, EthError> {
    Ok(CallData::new(IS_AUTHORIZED)
        .arg(operator)?
        .arg(token_id)?
        .to_hex())
}

pub fn approve(to: &str, token_id: &str) -> Result<Vec<u8>, EthError> {
    CallData::new(APPROVE).arg(to)?.arg(token_id)?.to_bytes()
}

pub fn set_approval_for_all(operator: &str, approved: bool) -> Result<Vec<u8>, EthError> {
    CallData::new(SET_APPROVAL_FOR_ALL)
        .arg(operator)?
        .arg_usize(usize::from(approved))
        .to_bytes()
}

pub fn transfer(to: &str, token_id: &str) -> Result<Vec<u8>, EthError> {
    CallData::new(TRANSFER).arg(to)?.arg(token_id)?.to_bytes()
}

pub fn transfer_from(from: &str, to: &str, token_id: &str) -> Result<Vec<u8>, EthError> {
    CallData::new(TRANSFER_FROM)
        .arg(from)?
        .arg(to)?
        .arg(token_id)?
        .to_bytes()
}

pub fn take_ownership(token_id: &str) -> Result<Vec<u8>, EthError> {
    CallData::new(TAKE_OWNERSHIP).arg(token_id)?.to_bytes()
}

pub fn set_asset_holder(to: &str, token_id: &str) -> Result<Vec<u8>, EthError> {
    CallData::new(SET_ASSET_HOLDER)
        .arg(to)?
        .arg(token_id)?
        .to_bytes()
}
