//! Transaction model and binary wire codec.
//!
//! ```text
//! type u8 ‖ version u8 ‖ extension ‖ varint n ‖ attribute* ‖ varint n ‖ input*
//!   ‖ varint n ‖ output* ‖ [varint n ‖ witness*]
//! ```
//!
//! Everything before the witnesses is the sign data. Hashes are written
//! byte-reversed; amounts are Fixed8 little-endian.

use duet_core::hash::sha256d;
use duet_core::reader::ByteReader;
use duet_core::varint::{write_var_bytes, Varint};
use duet_core::{CodecError, Fixed8, Hash256};
use duet_keys::address::{NeoAddress, ScriptHash};

use crate::error::NeoError;

/// Type tag written as the first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TxType {
    Miner = 0x00,
    Issue = 0x01,
    Claim = 0x02,
    Enrollment = 0x20,
    Register = 0x40,
    Contract = 0x80,
    Publish = 0xd0,
    Invocation = 0xd1,
}

impl TxType {
    pub fn from_byte(b: u8) -> Result<Self, CodecError> {
        Ok(match b {
            0x00 => Self::Miner,
            0x01 => Self::Issue,
            0x02 => Self::Claim,
            0x20 => Self::Enrollment,
            0x40 => Self::Register,
            0x80 => Self::Contract,
            0xd0 => Self::Publish,
            0xd1 => Self::Invocation,
            _ => return Err(CodecError::InvalidInput(format!("unknown transaction type 0x{b:02x}"))),
        })
    }
}

/// Type-specific payload between the version byte and the attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxKind {
    Miner { nonce: u32 },
    Issue,
    Claim { claims: Vec<Input> },
    Contract,
    /// `gas` is only on the wire from version 1.
    Invocation { script: Vec<u8>, gas: Fixed8 },
}

impl TxKind {
    pub fn tx_type(&self) -> TxType {
        match self {
            Self::Miner { .. } => TxType::Miner,
            Self::Issue => TxType::Issue,
            Self::Claim { .. } => TxType::Claim,
            Self::Contract => TxType::Contract,
            Self::Invocation { .. } => TxType::Invocation,
        }
    }

    fn write(&self, version: u8, out: &mut Vec<u8>) {
        match self {
            Self::Miner { nonce } => out.extend_from_slice(&nonce.to_le_bytes()),
            Self::Issue | Self::Contract => {}
            Self::Claim { claims } => {
                Varint::from(claims.len()).write(out);
                for input in claims {
                    input.write(out);
                }
            }
            Self::Invocation { script, gas } => {
                write_var_bytes(out, script);
                if version >= 1 {
                    out.extend_from_slice(&gas.to_le_bytes());
                }
            }
        }
    }

    fn read(tx_type: TxType, version: u8, reader: &mut ByteReader<'_>) -> Result<Self, NeoError> {
        Ok(match tx_type {
            TxType::Miner => Self::Miner {
                nonce: reader.read_u32_le()?,
            },
            TxType::Issue => Self::Issue,
            TxType::Contract => Self::Contract,
            TxType::Claim => {
                let count = Varint::read(reader)?.as_len()?;
                let mut claims = Vec::with_capacity(count.min(reader.remaining() / Input::SIZE));
                for _ in 0..count {
                    claims.push(Input::read(reader)?);
                }
                Self::Claim { claims }
            }
            TxType::Invocation => {
                let script = reader.read_var_bytes()?.to_vec();
                let gas = if version >= 1 {
                    Fixed8::from_le_bytes(reader.read_array()?)
                } else {
                    Fixed8::ZERO
                };
                Self::Invocation { script, gas }
            }
            other => {
                return Err(CodecError::InvalidInput(format!(
                    "decoding {other:?} transactions is not supported"
                ))
                .into());
            }
        })
    }
}

/// Attribute usage bytes.
pub mod usage {
    pub const CONTRACT_HASH: u8 = 0x00;
    pub const ECDH02: u8 = 0x02;
    pub const ECDH03: u8 = 0x03;
    pub const SCRIPT: u8 = 0x20;
    pub const VOTE: u8 = 0x30;
    pub const CERT_URL: u8 = 0x80;
    pub const DESCRIPTION_URL: u8 = 0x81;
    pub const DESCRIPTION: u8 = 0x90;
    pub const HASH1: u8 = 0xa1;
    pub const HASH15: u8 = 0xaf;
    pub const REMARK: u8 = 0xf0;
    pub const REMARK15: u8 = 0xff;
}

/// How an attribute body is framed for a given usage.
enum Framing {
    Fixed(usize),
    ByteLen,
    VarLen,
}

fn framing(usage_byte: u8) -> Result<Framing, CodecError> {
    use usage::*;
    Ok(match usage_byte {
        CONTRACT_HASH | ECDH02 | ECDH03 | VOTE | HASH1..=HASH15 => Framing::Fixed(32),
        SCRIPT => Framing::Fixed(20),
        CERT_URL | DESCRIPTION_URL => Framing::ByteLen,
        DESCRIPTION | REMARK..=REMARK15 => Framing::VarLen,
        _ => {
            return Err(CodecError::InvalidInput(format!(
                "unknown attribute usage 0x{usage_byte:02x}"
            )));
        }
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub usage: u8,
    pub data: Vec<u8>,
}

impl Attribute {
    /// Witness-check attribute naming `script_hash` as an extra verifier.
    pub fn script(script_hash: &ScriptHash) -> Self {
        Self {
            usage: usage::SCRIPT,
            data: script_hash.0.to_vec(),
        }
    }

    pub fn remark(data: impl Into<Vec<u8>>) -> Self {
        Self {
            usage: usage::REMARK,
            data: data.into(),
        }
    }

    pub fn description(text: &str) -> Self {
        Self {
            usage: usage::DESCRIPTION,
            data: text.as_bytes().to_vec(),
        }
    }

    fn write(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
        let mismatch = |what: String| {
            CodecError::EncodingFailure(format!("attribute 0x{:02x}: {what}", self.usage))
        };
        let body_len = self.data.len();
        out.push(self.usage);
        match framing(self.usage)? {
            Framing::Fixed(len) => {
                if body_len != len {
                    return Err(mismatch(format!("expected {len} bytes, got {body_len}")));
                }
                out.extend_from_slice(&self.data);
            }
            Framing::ByteLen => {
                let len = u8::try_from(body_len)
                    .map_err(|_| mismatch(format!("{body_len} bytes exceeds 255")))?;
                out.push(len);
                out.extend_from_slice(&self.data);
            }
            Framing::VarLen => write_var_bytes(out, &self.data),
        }
        Ok(())
    }

    fn read(reader: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        let usage_byte = reader.read_u8()?;
        let data = match framing(usage_byte)? {
            Framing::Fixed(len) => reader.read_bytes(len)?,
            Framing::ByteLen => {
                let len = reader.read_u8()?;
                reader.read_bytes(len as usize)?
            }
            Framing::VarLen => reader.read_var_bytes()?,
        };
        Ok(Self {
            usage: usage_byte,
            data: data.to_vec(),
        })
    }
}

/// Reference to an output of an earlier transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Input {
    pub prev_hash: Hash256,
    pub prev_index: u16,
}

impl Input {
    const SIZE: usize = 34;

    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.prev_hash.to_wire());
        out.extend_from_slice(&self.prev_index.to_le_bytes());
    }

    fn read(reader: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            prev_hash: Hash256::from_wire(reader.read_array()?),
            prev_index: reader.read_u16_le()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Output {
    pub asset: Hash256,
    pub value: Fixed8,
    pub script_hash: ScriptHash,
}

impl Output {
    pub fn new(asset: Hash256, value: Fixed8, address: &NeoAddress) -> Self {
        Self {
            asset,
            value,
            script_hash: address.script_hash(),
        }
    }

    pub fn address(&self) -> NeoAddress {
        self.script_hash.to_address()
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.asset.to_wire());
        out.extend_from_slice(&self.value.to_le_bytes());
        out.extend_from_slice(&self.script_hash.0);
    }

    fn read(reader: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            asset: Hash256::from_wire(reader.read_array()?),
            value: Fixed8::from_le_bytes(reader.read_array()?),
            script_hash: ScriptHash(reader.read_array()?),
        })
    }
}

/// Invocation and verification scripts proving the right to spend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Witness {
    pub invocation: Vec<u8>,
    pub verification: Vec<u8>,
}

impl Witness {
    fn write(&self, out: &mut Vec<u8>) {
        write_var_bytes(out, &self.invocation);
        write_var_bytes(out, &self.verification);
    }

    fn read(reader: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            invocation: reader.read_var_bytes()?.to_vec(),
            verification: reader.read_var_bytes()?.to_vec(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub kind: TxKind,
    pub version: u8,
    pub attributes: Vec<Attribute>,
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
    pub witnesses: Vec<Witness>,
}

impl Transaction {
    /// Empty transaction of `kind`, version 1 for invocations and 0 otherwise.
    pub fn new(kind: TxKind) -> Self {
        let version = match kind {
            TxKind::Invocation { .. } => 1,
            _ => 0,
        };
        Self {
            kind,
            version,
            attributes: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            witnesses: Vec::new(),
        }
    }

    pub fn tx_type(&self) -> TxType {
        self.kind.tx_type()
    }

    /// Append everything but the witnesses.
    pub fn write_sign_data(&self, out: &mut Vec<u8>) -> Result<(), NeoError> {
        out.push(self.tx_type() as u8);
        out.push(self.version);
        self.kind.write(self.version, out);

        Varint::from(self.attributes.len()).write(out);
        for attr in &self.attributes {
            attr.write(out)?;
        }
        Varint::from(self.inputs.len()).write(out);
        for input in &self.inputs {
            input.write(out);
        }
        Varint::from(self.outputs.len()).write(out);
        for output in &self.outputs {
            output.write(out);
        }
        Ok(())
    }

    pub fn sign_data(&self) -> Result<Vec<u8>, NeoError> {
        let mut out = Vec::with_capacity(256);
        self.write_sign_data(&mut out)?;
        Ok(out)
    }

    /// Full encoding: sign data followed by the witness list.
    pub fn to_bytes(&self) -> Result<Vec<u8>, NeoError> {
        let mut out = self.sign_data()?;
        Varint::from(self.witnesses.len()).write(&mut out);
        for witness in &self.witnesses {
            witness.write(&mut out);
        }
        Ok(out)
    }

    /// Double SHA-256 of the sign data, displayed byte-reversed.
    pub fn txid(&self) -> Result<Hash256, NeoError> {
        Ok(Hash256::from_wire(sha256d(&self.sign_data()?)))
    }

    /// Decode a full encoding. A missing witness section reads as none.
    pub fn read(data: &[u8]) -> Result<Self, NeoError> {
        let mut reader = ByteReader::new(data);
        let tx_type = TxType::from_byte(reader.read_u8()?)?;
        let version = reader.read_u8()?;
        let kind = TxKind::read(tx_type, version, &mut reader)?;

        let count = Varint::read(&mut reader)?.as_len()?;
        let mut attributes = Vec::new();
        for _ in 0..count {
            attributes.push(Attribute::read(&mut reader)?);
        }
        let count = Varint::read(&mut reader)?.as_len()?;
        let mut inputs = Vec::with_capacity(count.min(reader.remaining() / Input::SIZE));
        for _ in 0..count {
            inputs.push(Input::read(&mut reader)?);
        }
        let count = Varint::read(&mut reader)?.as_len()?;
        let mut outputs = Vec::new();
        for _ in 0..count {
            outputs.push(Output::read(&mut reader)?);
        }

        let mut witnesses = Vec::new();
        if !reader.is_empty() {
            let count = Varint::read(&mut reader)?.as_len()?;
            for _ in 0..count {
                witnesses.push(Witness::read(&mut reader)?);
            }
        }
        reader.finish()?;

        Ok(Self {
            kind,
            version,
            attributes,
            inputs,
            outputs,
            witnesses,
        })
    }
}
