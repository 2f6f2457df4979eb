//! Single-signature witnesses.
//!
//! The signature is deterministic ECDSA (RFC 6979) on P-256 over
//! SHA-256 of the sign data, written as `r ‖ s` (32 bytes each).

use p256::ecdsa::signature::{Signer, Verifier};
use p256::ecdsa::{Signature, VerifyingKey};
use tracing::debug;

use duet_core::error::CryptoError;
use duet_core::hash::sha256d;
use duet_core::Hash256;
use duet_keys::KeyPair;

use crate::error::NeoError;
use crate::opcode::{CHECKSIG, PUSHBYTES33, PUSHBYTES64};
use crate::script::ScriptBuilder;
use crate::tx::{Transaction, Witness};

/// A signed transaction with its broadcast encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedNeoTransaction {
    pub tx: Transaction,
    pub raw: Vec<u8>,
    pub txid: Hash256,
}

impl SignedNeoTransaction {
    /// Lowercase hex of the raw bytes, as submitted to a node.
    pub fn raw_hex(&self) -> String {
        hex::encode(&self.raw)
    }
}

/// Sign `tx` with a P-256 key, replacing any existing witnesses.
pub fn sign(mut tx: Transaction, key: &KeyPair) -> Result<SignedNeoTransaction, NeoError> {
    let signing_key = key.p256_signing_key()?;
    let sign_data = tx.sign_data()?;
    let signature: Signature = signing_key
        .try_sign(&sign_data)
        .map_err(|e| CryptoError::CryptoFailure(e.to_string()))?;

    let mut invocation = ScriptBuilder::new();
    invocation.emit_push_bytes(&signature.to_bytes());
    tx.witnesses = vec![Witness {
        invocation: invocation.to_bytes()?,
        verification: key.verification_script(),
    }];

    let raw = tx.to_bytes()?;
    let txid = Hash256::from_wire(sha256d(&sign_data));
    debug!(
        %txid,
        kind = ?tx.tx_type(),
        inputs = tx.inputs.len(),
        outputs = tx.outputs.len(),
        bytes = raw.len(),
        "signed utxo transaction"
    );
    Ok(SignedNeoTransaction { tx, raw, txid })
}

/// Check a standard single-signature witness against `sign_data`.
pub fn verify_witness(sign_data: &[u8], witness: &Witness) -> Result<(), NeoError> {
    let inv = &witness.invocation;
    let ver = &witness.verification;
    if inv.len() != 65 || inv[0] != PUSHBYTES64 {
        return Err(CryptoError::CryptoFailure("invocation is not a single signature push".into()).into());
    }
    if ver.len() != 35 || ver[0] != PUSHBYTES33 || ver[34] != CHECKSIG {
        return Err(CryptoError::CryptoFailure("verification is not a single-key check".into()).into());
    }
    let key = VerifyingKey::from_sec1_bytes(&ver[1..34]).map_err(|_| CryptoError::InvalidPublicKey)?;
    let signature =
        Signature::from_slice(&inv[1..]).map_err(|e| CryptoError::CryptoFailure(e.to_string()))?;
    key.verify(sign_data, &signature)
        .map_err(|e| CryptoError::CryptoFailure(e.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::{Output, TxKind};
    use duet_core::Fixed8;
    use duet_keys::address::ScriptHash;
    use duet_keys::CurveProfile;

    fn key() -> KeyPair {
        KeyPair::from_private_scalar(CurveProfile::P256, &[0x11; 32]).unwrap()
    }

    fn tx() -> Transaction {
        let mut tx = Transaction::new(TxKind::Contract);
        tx.outputs.push(Output {
            asset: Hash256([0x60; 32]),
            value: Fixed8::ONE,
            script_hash: ScriptHash([0x05; 20]),
        });
        tx
    }

    #[test]
    fn witness_layout_and_raw_encoding() {
        let k = key();
        let signed = sign(tx(), &k).unwrap();
        let witness = &signed.tx.witnesses[0];
        assert_eq!(witness.invocation.len(), 65);
        assert_eq!(witness.invocation[0], 0x40);
        assert_eq!(witness.verification, k.verification_script());

        let sign_data = tx().sign_data().unwrap();
        assert_eq!(&signed.raw[..sign_data.len()], &sign_data[..]);
        assert_eq!(signed.raw[sign_data.len()], 1);
        assert_eq!(signed.raw.len(), sign_data.len() + 1 + 66 + 36);
        assert_eq!(signed.txid, tx().txid().unwrap());
        assert_eq!(signed.raw_hex(), hex::encode(&signed.raw));
    }

    #[test]
    fn signature_is_deterministic_and_verifies() {
        let a = sign(tx(), &key()).unwrap();
        let b = sign(tx(), &key()).unwrap();
        assert_eq!(a, b);
        let sign_data = tx().sign_data().unwrap();
        verify_witness(&sign_data, &a.tx.witnesses[0]).unwrap();

        let mut tampered = sign_data.clone();
        tampered[1] ^= 1;
        assert!(verify_witness(&tampered, &a.tx.witnesses[0]).is_err());
    }

    #[test]
    fn decoded_raw_matches_signed_tx() {
        let signed = sign(tx(), &key()).unwrap();
        assert_eq!(Transaction::read(&signed.raw).unwrap(), signed.tx);
    }

    #[test]
    fn secp256k1_key_rejected() {
        let k = KeyPair::generate(CurveProfile::Secp256k1);
        assert!(matches!(sign(tx(), &k), Err(NeoError::Key(_))));
    }

    #[test]
    fn malformed_witness_rejected() {
        let w = Witness {
            invocation: vec![0x40; 10],
            verification: key().verification_script(),
        };
        assert!(verify_witness(b"data", &w).is_err());
    }
}
