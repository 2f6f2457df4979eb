//! ERC20 call data.
//!
//! Read-only queries return `0x`-prefixed hex for `eth_call`; state-changing
//! calls return raw payload bytes.

use crate::abi::CallData;
use crate::error::EthError;

pub const BALANCE_OF: &str = "balanceOf(address)";
pub const TOTAL_SUPPLY: &str = "totalSupply()";
pub const DECIMALS: &str = "decimals()";
pub const NAME: &str = "name()";
pub const SYMBOL: &str = "symbol()";
pub const TRANSFER: &str = "transfer(address,uint256)";
pub const TRANSFER_FROM: &str = "transferFrom(address,address,uint256)";
pub const APPROVE: &str = "approve(address,uint256)";
pub const ALLOWANCE: &str = "allowance(address,address)";
pub const TRANSFER_OWNERSHIP: &str = "transferOwnership(address)";

pub fn balance_of(owner: &str) -> Result<String, EthError> {
    Ok(CallData::new(BALANCE_OF).arg(owner)?.to_hex())
}

pub fn total_supply() -> String {
    CallData::new(TOTAL_SUPPLY).to_hex()
}

pub fn decimals() -> String {
    CallData::new(DECIMALS).to_hex()
}

pub fn name() -> String {
    CallData::new(NAME).to_hex()
}

pub fn symbol() -> String {
    CallData::new(SYMBOL).to_hex()
}

pub fn transfer(to: &str, value: &str) -> Result<Vec<u8>, EthError> {
    CallData::new(TRANSFER).arg(to)?.arg(value)?.to_bytes()
}

pub fn transfer_from(from: &str, to: &str, value: &str) -> Result<Vec<u8>, EthError> {
    CallData::new(TRANSFER_FROM)
        .arg(from)?
        .arg(to)?
        .arg(value)?
        .to_bytes()
}

pub fn approve(spender: &str, value: &str) -> Result<Vec<u8>, EthError> {
    CallData::new(APPROVE).arg(spender)?.arg(value)?.to_bytes()
}

/// Encodes `owner` then `spender`.
pub fn allowance(owner: &str, spender: &str) -> Result<Vec<u8>, EthError> {
    CallData::new(ALLOWANCE).arg(owner)?.arg(spender)?.to_bytes()
}

pub fn transfer_ownership(new_owner: &str) -> Result<Vec<u8>, EthError> {
    CallData::new(TRANSFER_OWNERSHIP).arg(new_owner)?.to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TO: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn transfer_layout() {
        let data = transfer(TO, "0xde0b6b3a7640000").unwrap();
        assert_eq!(data.len(), 68);
        assert_eq!(&data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(&data[4..16], &[0u8; 12]);
        assert_eq!(hex::encode(&data[16..36]), TO[2..].to_lowercase());
        assert_eq!(hex::encode(&data[60..68]), "0de0b6b3a7640000");
    }

    #[test]
    fn read_only_queries_are_prefixed() {
        assert_eq!(total_supply(), "0x18160ddd");
        assert_eq!(decimals(), "0x313ce567");
        assert_eq!(name(), "0x06fdde03");
        assert_eq!(symbol(), "0x95d89b41");
        let balance = balance_of(TO).unwrap();
        assert!(balance.starts_with("0x70a08231"));
        assert_eq!(balance.len(), 2 + 8 + 64);
    }

    #[test]
    fn allowance_keeps_owner_then_spender() {
        let owner = "0x1111111111111111111111111111111111111111";
        let spender = "0x2222222222222222222222222222222222222222";
        let data = allowance(owner, spender).unwrap();
        assert_eq!(hex::encode(&data[..4]), "dd62ed3e");
        assert_eq!(data[35], 0x11);
        assert_eq!(data[67], 0x22);
    }

    #[test]
    fn transfer_from_has_three_words() {
        let data = transfer_from(TO, TO, "0x1").unwrap();
        assert_eq!(data.len(), 4 + 96);
        assert_eq!(hex::encode(&data[..4]), "23b872dd");
    }

    #[test]
    fn approve_and_ownership() {
        assert_eq!(hex::encode(&approve(TO, "0x0").unwrap()[..4]), "095ea7b3");
        assert_eq!(hex::encode(&transfer_ownership(TO).unwrap()[..4]), "f2fde38b");
    }
}
