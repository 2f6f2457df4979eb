//! Legacy (pre-EIP-155) account-model transactions.
//!
//! The signing hash is keccak-256 over the RLP list
//! `[nonce, gasPrice, gasLimit, to, value, data]`; the broadcast form
//! appends `v`, `r` and `s`, where `v` is the recovery id plus 27.

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use tracing::debug;

use duet_core::codec::{parse_quantity, quantity_to_u64, strip_hex_prefix, trim_leading_zeros};
use duet_core::error::CryptoError;
use duet_core::hash::keccak256;
use duet_keys::address::EthAddress;
use duet_keys::KeyPair;

use crate::error::EthError;
use crate::rlp::{self, Item};

/// Offset added to the recovery id to form `v`.
const V_OFFSET: u8 = 27;

/// An unsigned transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthTransaction {
    pub nonce: u64,
    /// Minimal big-endian quantity.
    pub gas_price: Vec<u8>,
    pub gas_limit: Vec<u8>,
    /// `None` creates a contract.
    pub recipient: Option<[u8; 20]>,
    pub value: Vec<u8>,
    pub payload: Vec<u8>,
}

impl EthTransaction {
    /// Build from hex strings as supplied by wallet front ends.
    ///
    /// `nonce`, `value`, `gas_price` and `gas_limit` are hexadecimal with an
    /// optional `0x`. An empty `recipient` creates a contract; a short one
    /// fills the leading bytes of the address and the rest stay zero. Only
    /// whole bytes count, so an odd trailing digit is dropped.
    pub fn new(
        nonce: &str,
        recipient: &str,
        value: &str,
        gas_price: &str,
        gas_limit: &str,
        payload: Vec<u8>,
    ) -> Result<Self, EthError> {
        Ok(Self {
            nonce: quantity_to_u64(&parse_quantity(nonce)?)?,
            gas_price: parse_quantity(gas_price)?,
            gas_limit: parse_quantity(gas_limit)?,
            recipient: parse_recipient(recipient)?,
            value: parse_quantity(value)?,
            payload,
        })
    }

    fn unsigned_fields(&self) -> Vec<Vec<u8>> {
        vec![
            rlp::encode_u64(self.nonce),
            rlp::encode_bytes(&self.gas_price),
            rlp::encode_bytes(&self.gas_limit),
            rlp::encode_bytes(self.recipient.as_ref().map_or(&[][..], |r| &r[..])),
            rlp::encode_bytes(&self.value),
            rlp::encode_bytes(&self.payload),
        ]
    }

    /// RLP of the six unsigned fields.
    pub fn signing_payload(&self) -> Vec<u8> {
        rlp::encode_list(&self.unsigned_fields())
    }

    pub fn signing_hash(&self) -> [u8; 32] {
        keccak256(&self.signing_payload())
    }

    /// Sign with a secp256k1 key (RFC 6979 nonce, low-S).
    pub fn sign(&self, key: &KeyPair) -> Result<SignedEthTransaction, EthError> {
        let signing_key = key.secp256k1_signing_key()?;
        let hash = self.signing_hash();
        let (signature, recovery_id) = signing_key
            .sign_prehash_recoverable(&hash)
            .map_err(|e| CryptoError::CryptoFailure(e.to_string()))?;

        let bytes = signature.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);

        debug!(
            nonce = self.nonce,
            from = %key.address(),
            hash = %hex::encode(hash),
            "signed account-model transaction"
        );

        Ok(SignedEthTransaction {
            tx: self.clone(),
            v: recovery_id.to_byte() + V_OFFSET,
            r,
            s,
        })
    }
}

fn parse_recipient(recipient: &str) -> Result<Option<[u8; 20]>, EthError> {
    let digits = strip_hex_prefix(recipient.trim());
    if digits.is_empty() {
        return Ok(None);
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(EthError::InvalidRecipient(recipient.to_string()));
    }
    let bytes = hex::decode(&digits[..digits.len() & !1])
        .map_err(|_| EthError::InvalidRecipient(recipient.to_string()))?;
    if bytes.len() > 20 {
        return Err(EthError::InvalidRecipient(format!(
            "{recipient}: {} bytes",
            bytes.len()
        )));
    }
    let mut out = [0u8; 20];
    out[..bytes.len()].copy_from_slice(&bytes);
    Ok(Some(out))
}

/// A transaction with its signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEthTransaction {
    pub tx: EthTransaction,
    pub v: u8,
    pub r: [u8; 32],
    pub s: [u8; 32],
}

impl SignedEthTransaction {
    /// RLP of all nine fields.
    pub fn encode(&self) -> Vec<u8> {
        let mut fields = self.tx.unsigned_fields();
        fields.push(rlp::encode_u64(u64::from(self.v)));
        fields.push(rlp::encode_bytes(trim_leading_zeros(&self.r)));
        fields.push(rlp::encode_bytes(trim_leading_zeros(&self.s)));
        rlp::encode_list(&fields)
    }

    /// Lowercase hex of [`encode`](Self::encode), no prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.encode())
    }

    /// Transaction hash: keccak-256 of the encoding.
    pub fn hash(&self) -> [u8; 32] {
        keccak256(&self.encode())
    }

    /// Parse a broadcast encoding.
    pub fn decode(data: &[u8]) -> Result<Self, EthError> {
        let item = rlp::decode(data)?;
        let fields = item.as_list()?;
        if fields.len() != 9 {
            return Err(EthError::InvalidRlp(format!(
                "expected 9 fields, got {}",
                fields.len()
            )));
        }
        let recipient = match fields[3].as_bytes()? {
            [] => None,
            bytes => Some(<[u8; 20]>::try_from(bytes).map_err(|_| {
                EthError::InvalidRecipient(format!("{} bytes", bytes.len()))
            })?),
        };
        let v = quantity_to_u64(fields[6].as_bytes()?)?;
        let v = u8::try_from(v).map_err(|_| EthError::InvalidSignature(format!("v = {v}")))?;
        Ok(Self {
            tx: EthTransaction {
                nonce: quantity_to_u64(fields[0].as_bytes()?)?,
                gas_price: minimal(&fields[1])?,
                gas_limit: minimal(&fields[2])?,
                recipient,
                value: minimal(&fields[4])?,
                payload: fields[5].as_bytes()?.to_vec(),
            },
            v,
            r: word(&fields[7])?,
            s: word(&fields[8])?,
        })
    }

    /// Recover the signer's address from the signature.
    pub fn sender(&self) -> Result<EthAddress, EthError> {
        let recid = self
            .v
            .checked_sub(V_OFFSET)
            .and_then(RecoveryId::from_byte)
            .ok_or_else(|| EthError::InvalidSignature(format!("v = {}", self.v)))?;
        let signature = Signature::from_scalars(self.r, self.s)
            .map_err(|e| EthError::InvalidSignature(e.to_string()))?;
        let key = VerifyingKey::recover_from_prehash(&self.tx.signing_hash(), &signature, recid)
            .map_err(|e| EthError::InvalidSignature(e.to_string()))?;
        let point = key.to_encoded_point(false);
        let mut uncompressed = [0u8; 65];
        uncompressed.copy_from_slice(point.as_bytes());
        Ok(EthAddress::from_public_key(&uncompressed))
    }
}

fn minimal(item: &Item) -> Result<Vec<u8>, EthError> {
    let bytes = item.as_bytes()?;
    if bytes.first() == Some(&0) {
        return Err(EthError::InvalidRlp("integer with leading zero".into()));
    }
    Ok(bytes.to_vec())
}

fn word(item: &Item) -> Result<[u8; 32], EthError> {
    let bytes = item.as_bytes()?;
    if bytes.len() > 32 {
        return Err(EthError::InvalidSignature(format!("{}-byte scalar", bytes.len())));
    }
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(bytes);
    Ok(out)
}
