//! Read-only contract calls.
//!
//! [`EthCall`] is the call object of `eth_call`; the constructors pair a
//! contract address with the matching query from the encoder modules.

use serde::{Deserialize, Serialize};

use crate::error::EthError;
use crate::{erc20, erc721, land, red_packet};

/// JSON call object: `{"to": ..., "data": ...}` plus optional overrides.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    pub to: String,
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,
}

impl EthCall {
    pub fn new(contract: &str, data: impl Into<String>) -> Self {
        Self {
            to: contract.to_string(),
            data: data.into(),
            ..Self::default()
        }
    }

    fn from_bytes(contract: &str, data: &[u8]) -> Self {
        Self::new(contract, format!("0x{}", hex::encode(data)))
    }

    pub fn with_from(mut self, from: &str) -> Self {
        self.from = Some(from.to_string());
        self
    }

    pub fn to_json(&self) -> Result<String, EthError> {
        serde_json::to_string(self).map_err(|e| EthError::Serialization(e.to_string()))
    }

    pub fn erc20_decimals(contract: &str) -> Self {
        Self::new(contract, erc20::decimals())
    }

    pub fn erc20_total_supply(contract: &str) -> Self {
        Self::new(contract, erc20::total_supply())
    }

    pub fn erc20_name(contract: &str) -> Self {
        Self::new(contract, erc20::name())
    }

    pub fn erc20_symbol(contract: &str) -> Self {
        Self::new(contract, erc20::symbol())
    }

    pub fn erc20_balance_of(contract: &str, owner: &str) -> Result<Self, EthError> {
        Ok(Self::new(contract, erc20::balance_of(owner)?))
    }

    pub fn erc20_allowance(contract: &str, owner: &str, spender: &str) -> Result<Self, EthError> {
        Ok(Self::from_bytes(contract, &erc20::allowance(owner, spender)?))
    }

    pub fn erc721_owner_of(contract: &str, token_id: &str) -> Result<Self, EthError> {
        Ok(Self::new(contract, erc721::owner_of(token_id)?))
    }

    pub fn erc721_tokens_of(contract: &str, owner: &str) -> Result<Self, EthError> {
        Ok(Self::new(contract, erc721::tokens_of(owner)?))
    }

    pub fn erc721_exists(contract: &str, token_id: &str) -> Result<Self, EthError> {
        Ok(Self::new(contract, erc721::exists(token_id)?))
    }

    pub fn erc721_token_metadata(contract: &str, token_id: &str) -> Result<Self, EthError> {
        Ok(Self::new(contract, erc721::token_metadata(token_id)?))
    }

    pub fn erc721_token_of_owner_by_index(contract: &str, owner: &str, index: &str) -> Result<Self, EthError> {
        Ok(Self::new(contract, erc721::token_of_owner_by_index(owner, index)?))
    }

    pub fn erc721_description(contract: &str) -> Self {
        Self::new(contract, erc721::description())
    }

    pub fn land_encode_token_id(contract: &str, x: &str, y: &str) -> Result<Self, EthError> {
        Ok(Self::new(contract, land::encode_token_id(x, y)?))
    }

    pub fn land_decode_token_id(contract: &str, token_id: &str) -> Result<Self, EthError> {
        Ok(Self::new(contract, land::decode_token_id(token_id)?))
    }

    pub fn land_data(contract: &str, x: &str, y: &str) -> Result<Self, EthError> {
        Ok(Self::new(contract, land::land_data(x, y)?))
    }

    pub fn land_of(contract: &str, owner: &str) -> Result<Self, EthError> {
        Ok(Self::new(contract, land::land_of(owner)?))
    }

    pub fn land_owner_of(contract: &str, x: &str, y: &str) -> Result<Self, EthError> {
        Ok(Self::new(contract, land::owner_of_land(x, y)?))
    }

    pub fn red_packet_tax_cost(contract: &str) -> Result<Self, EthError> {
        Ok(Self::from_bytes(contract, &red_packet::tax_cost()?))
    }

    pub fn red_packet_max_count(contract: &str) -> Result<Self, EthError> {
        Ok(Self::from_bytes(contract, &red_packet::max_count()?))
    }

    pub fn red_packet_detail(contract: &str, packet_id: &str) -> Result<Self, EthError> {
        Ok(Self::from_bytes(contract, &red_packet::get_red_packet_detail(packet_id)?))
    }
}
