//! Token contract invocation scripts.
//!
//! A call pushes its arguments last-to-first, then the argument count,
//! `PACK`, the method name and an `APPCALL` to the contract.

use duet_keys::address::ScriptHash;

use crate::error::NeoError;
use crate::opcode::PACK;
use crate::script::ScriptBuilder;

/// One contract argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractArg {
    Integer(i64),
    Bytes(Vec<u8>),
    String(String),
    Bool(bool),
}

impl ContractArg {
    fn push(&self, sb: &mut ScriptBuilder) {
        match self {
            Self::Integer(n) => sb.emit_push_integer(*n),
            Self::Bytes(b) => sb.emit_push_bytes(b),
            Self::String(s) => sb.emit_push_string(s),
            Self::Bool(v) => sb.emit_push_bool(*v),
        };
    }
}

impl From<&ScriptHash> for ContractArg {
    fn from(hash: &ScriptHash) -> Self {
        Self::Bytes(hash.0.to_vec())
    }
}

/// Script calling `method` on `contract` with `args` in declaration order.
pub fn invoke(contract: &ScriptHash, method: &str, args: &[ContractArg]) -> Result<Vec<u8>, NeoError> {
    let mut sb = ScriptBuilder::new();
    for arg in args.iter().rev() {
        arg.push(&mut sb);
    }
    sb.emit_push_integer(args.len() as i64)
        .emit(PACK, &[])
        .emit_push_string(method)
        .emit_app_call(&contract.0, false);
    Ok(sb.to_bytes()?)
}

/// `transfer(from, to, amount)` in token base units.
pub fn transfer(contract: &ScriptHash, from: &ScriptHash, to: &ScriptHash, amount: i64) -> Result<Vec<u8>, NeoError> {
    invoke(
        contract,
        "transfer",
        &[from.into(), to.into(), ContractArg::Integer(amount)],
    )
}

/// `mintTokens()`; the payment travels as an output to the contract.
pub fn mint_tokens(contract: &ScriptHash) -> Result<Vec<u8>, NeoError> {
    invoke(contract, "mintTokens", &[])
}

pub fn balance_of(contract: &ScriptHash, owner: &ScriptHash) -> Result<Vec<u8>, NeoError> {
    invoke(contract, "balanceOf", &[owner.into()])
}

pub fn decimals(contract: &ScriptHash) -> Result<Vec<u8>, NeoError> {
    invoke(contract, "decimals", &[])
}

pub fn symbol(contract: &ScriptHash) -> Result<Vec<u8>, NeoError> {
    invoke(contract, "symbol", &[])
}

pub fn name(contract: &ScriptHash) -> Result<Vec<u8>, NeoError> {
    invoke(contract, "name", &[])
}

pub fn total_supply(contract: &ScriptHash) -> Result<Vec<u8>, NeoError> {
    invoke(contract, "totalSupply", &[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::{APPCALL, PUSH0, PUSH1, PUSHT};

    fn contract() -> ScriptHash {
        ScriptHash::from_reversed_hex("0xecc6b20d3ccac1ee9ef109af5a7cdb85706b1df9").unwrap()
    }

    #[test]
    fn transfer_layout() {
        let from = ScriptHash([0xaa; 20]);
        let to = ScriptHash([0xbb; 20]);
        let script = transfer(&contract(), &from, &to, 100).unwrap();

        let mut expected = vec![0x01, 100];
        expected.push(0x14);
        expected.extend_from_slice(&[0xbb; 20]);
        expected.push(0x14);
        expected.extend_from_slice(&[0xaa; 20]);
        expected.push(PUSH1 + 2);
        expected.push(PACK);
        expected.push(8);
        expected.extend_from_slice(b"transfer");
        expected.push(APPCALL);
        expected.extend_from_slice(&contract().0);
        assert_eq!(script, expected);
    }

    #[test]
    fn transfer_amount_with_high_bit_has_no_sign_byte() {
        let from = ScriptHash([0xaa; 20]);
        let to = ScriptHash([0xbb; 20]);
        let script = transfer(&contract(), &from, &to, 200).unwrap();
        assert_eq!(&script[..3], &[0x01, 0xc8, 0x14]);

        let script = transfer(&contract(), &from, &to, 32_768).unwrap();
        assert_eq!(&script[..4], &[0x02, 0x00, 0x80, 0x14]);
    }

    #[test]
    fn mint_tokens_layout() {
        let script = mint_tokens(&contract()).unwrap();
        assert_eq!(&script[..3], &[PUSH0, PACK, 10]);
        assert_eq!(&script[3..13], b"mintTokens");
        assert_eq!(script[13], APPCALL);
        assert_eq!(&script[14..], &contract().0);
    }

    #[test]
    fn args_pushed_in_reverse() {
        let script = invoke(
            &contract(),
            "m",
            &[ContractArg::Bool(true), ContractArg::String("x".into())],
        )
        .unwrap();
        assert_eq!(&script[..5], &[0x01, b'x', PUSHT, PUSH1 + 1, PACK]);
    }

    #[test]
    fn read_only_methods() {
        let owner = ScriptHash([0x01; 20]);
        let script = balance_of(&contract(), &owner).unwrap();
        assert_eq!(script[0], 0x14);
        assert!(script.windows(9).any(|w| w == b"balanceOf"));
        for (script, method) in [
            (decimals(&contract()).unwrap(), &b"decimals"[..]),
            (symbol(&contract()).unwrap(), &b"symbol"[..]),
            (name(&contract()).unwrap(), &b"name"[..]),
            (total_supply(&contract()).unwrap(), &b"totalSupply"[..]),
        ] {
            assert_eq!(script[2] as usize, method.len());
            assert_eq!(&script[3..3 + method.len()], method);
        }
    }
}
