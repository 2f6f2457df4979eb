//! Red-packet (token gift) contract call data.

use crate::abi::CallData;
use crate::error::EthError;

pub const NEW_RED_PACKET: &str = "newRedPacket(address,address,uint256,uint256,uint256)";
pub const OPEN: &str = "open(uint256,address,uint256)";
pub const OPEN_MANY: &str = "openMany(uint256,address[],uint256)";
pub const TAKE_BACK: &str = "takeBack(uint256)";
pub const SET_TAX_COST: &str = "setTaxCost(uint256)";
pub const TAX_COST: &str = "taxCost()";
pub const MAX_COUNT: &str = "maxCount()";
pub const CHANGE_WALLET: &str = "changeWallet(address)";
pub const CHANGE_MAX_COUNT: &str = "changeMaxCount(uint256)";
pub const GET_RED_PACKET_DETAIL: &str = "getRedPacketDetail(uint256)";
pub const SEND_ETHER: &str = "sendEther(uint256)";

/// Head size of `openMany`: three static words precede the array.
const OPEN_MANY_ARRAY_OFFSET: usize = 96;

pub fn new_red_packet(
    token: &str,
    from: &str,
    value: &str,
    count: &str,
    command: &str,
) -> Result<Vec<u8>, EthError> {
    CallData::new(NEW_RED_PACKET)
        .arg(token)?
        .arg(from)?
        .arg(value)?
        .arg(count)?
        .arg(command)?
        .to_bytes()
}

pub fn open(packet_id: &str, recipient: &str, command: &str) -> Result<Vec<u8>, EthError> {
    CallData::new(OPEN)
        .arg(packet_id)?
        .arg(recipient)?
        .arg(command)?
        .to_bytes()
}

/// `packet_id`, array offset, `command`, then the length-prefixed array.
pub fn open_many(packet_id: &str, recipients: &[&str], command: &str) -> Result<Vec<u8>, EthError> {
    let mut call = CallData::new(OPEN_MANY);
    call.arg(packet_id)?
        .arg_usize(OPEN_MANY_ARRAY_OFFSET)
        .arg(command)?
        .arg_usize(recipients.len());
    for recipient in recipients {
        call.arg(recipient)?;
    }
    call.to_bytes()
}

pub fn take_back(packet_id: &str) -> Result<Vec<u8>, EthError> {
    CallData::new(TAKE_BACK).arg(packet_id)?.to_bytes()
}

pub fn set_tax_cost(value: &str) -> Result<Vec<u8>, EthError> {
    CallData::new(SET_TAX_COST).arg(value)?.to_bytes()
}

pub fn tax_cost() -> Result<Vec<u8>, EthError> {
    CallData::new(TAX_COST).to_bytes()
}

pub fn max_count() -> Result<Vec<u8>, EthError> {
    CallData::new(MAX_COUNT).to_bytes()
}

pub fn change_wallet(wallet: &str) -> Result<Vec<u8>, EthError> {
    CallData::new(CHANGE_WALLET).arg(wallet)?.to_bytes()
}

pub fn change_max_count(count: &str) -> Result<Vec<u8>, EthError> {
    CallData::new(CHANGE_MAX_COUNT).arg(count)?.to_bytes()
}

pub fn get_red_packet_detail(packet_id: &str) -> Result<Vec<u8>, EthError> {
    CallData::new(GET_RED_PACKET_DETAIL).arg(packet_id)?.to_bytes()
}

pub fn send_ether(value: &str) -> Result<Vec<u8>, EthError> {
    CallData::new(SEND_ETHER).arg(value)?.to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::selector;

    const A: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const B: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    #[test]
    fn open_many_dynamic_array() {
        let data = open_many("0x5", &[A, B], "0x9").unwrap();
        assert_eq!(data.len(), 4 + 32 * 6);
        assert_eq!(&data[..4], &selector(OPEN_MANY));
        assert_eq!(data[35], 5);
        assert_eq!(data[67], 96);
        assert_eq!(data[99], 9);
        assert_eq!(data[131], 2);
        assert_eq!(data[163], 0xaa);
        assert_eq!(data[195], 0xbb);
    }

    #[test]
    fn open_many_empty_array() {
        let data = open_many("0x1", &[], "0x0").unwrap();
        assert_eq!(data.len(), 4 + 32 * 4);
        assert_eq!(data[131], 0);
    }

    #[test]
    fn new_red_packet_five_words() {
        let data = new_red_packet(A, B, "0x64", "0xa", "0x1").unwrap();
        assert_eq!(data.len(), 4 + 32 * 5);
        assert_eq!(data[35], 0xaa);
        assert_eq!(data[67], 0xbb);
        assert_eq!(data[99], 0x64);
        assert_eq!(data[131], 0x0a);
    }

    #[test]
    fn single_argument_calls() {
        for (data, sig) in [
            (take_back("0x1").unwrap(), TAKE_BACK),
            (set_tax_cost("0x1").unwrap(), SET_TAX_COST),
            (change_wallet(A).unwrap(), CHANGE_WALLET),
            (change_max_count("0x1").unwrap(), CHANGE_MAX_COUNT),
            (get_red_packet_detail("0x1").unwrap(), GET_RED_PACKET_DETAIL),
            (send_ether("0x1").unwrap(), SEND_ETHER),
            (open("0x1", A, "0x2").unwrap(), OPEN),
        ] {
            assert_eq!(&data[..4], &selector(sig), "{sig}");
            assert_eq!((data.len() - 4) % 32, 0);
        }
        assert_eq!(tax_cost().unwrap(), selector(TAX_COST).to_vec());
    }
}
