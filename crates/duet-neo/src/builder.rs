//! Transaction construction over a supplied UTXO list.
//!
//! Three kinds are built here:
//! 1. Transfer (`Contract`): pay each recipient, selecting inputs per output
//! 2. Claim: collect unclaimed gas for spent governing-token outputs
//! 3. Invocation: run a contract script, optionally paying gas for it
//!
//! The result is unsigned; pass it to [`sign`](crate::sign::sign).

use tracing::debug;

use duet_core::{CodecError, Fixed8, Hash256};
use duet_keys::address::{NeoAddress, ScriptHash};

use crate::address::{GAS_ASSET, NEO_ASSET};
use crate::coin_selection::{remove_selected, CoinSelector};
use crate::error::NeoError;
use crate::tx::{Attribute, Output, Transaction, TxKind};
use crate::utxo::Utxo;

/// Chain parameters the builders depend on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeoBuildConfig {
    /// Asset that pays fees and is paid out by claims.
    pub gas_asset: Hash256,
    /// Asset whose spent outputs can be claimed against.
    pub claim_asset: Hash256,
    /// Invocations attaching less gas than this run in the free tier.
    pub free_gas_threshold: Fixed8,
}

impl Default for NeoBuildConfig {
    fn default() -> Self {
        Self {
            gas_asset: GAS_ASSET,
            claim_asset: NEO_ASSET,
            free_gas_threshold: Fixed8::ONE,
        }
    }
}

/// A requested payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub asset: Hash256,
    pub address: NeoAddress,
    pub amount: Fixed8,
}

/// Builder for UTXO-model transactions.
///
/// # Example
/// ```ignore
/// let tx = NeoTxBuilder::new()
///     .add_recipient(GAS_ASSET, to, Fixed8::ONE)
///     .build_transfer(&utxos)?;
/// let signed = sign(tx, &key)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct NeoTxBuilder {
    config: NeoBuildConfig,
    recipients: Vec<Recipient>,
    attributes: Vec<Attribute>,
}

impl NeoTxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: NeoBuildConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &NeoBuildConfig {
        &self.config
    }

    pub fn add_recipient(&mut self, asset: Hash256, address: NeoAddress, amount: Fixed8) -> &mut Self {
        self.recipients.push(Recipient {
            asset,
            address,
            amount,
        });
        self
    }

    pub fn add_attribute(&mut self, attribute: Attribute) -> &mut Self {
        self.attributes.push(attribute);
        self
    }

    /// Require `script_hash` to witness the transaction, so a contract can
    /// check the caller.
    pub fn add_script_attribute(&mut self, script_hash: &ScriptHash) -> &mut Self {
        self.add_attribute(Attribute::script(script_hash))
    }

    fn start(&self, kind: TxKind) -> Transaction {
        let mut tx = Transaction::new(kind);
        tx.attributes = self.attributes.clone();
        tx
    }

    /// Add the requested outputs, then select inputs for each in turn.
    ///
    /// Change outputs follow the requested ones. UTXOs spent for one
    /// recipient are removed from `candidates` before the next.
    fn pay_recipients(&self, tx: &mut Transaction, candidates: &mut Vec<Utxo>) -> Result<(), NeoError> {
        for r in &self.recipients {
            if r.amount.raw() < 0 {
                return Err(CodecError::InvalidAmount(format!("negative amount {}", r.amount)).into());
            }
            tx.outputs.push(Output::new(r.asset, r.amount, &r.address));
        }
        for r in &self.recipients {
            let selection = CoinSelector::select(candidates, &r.asset, r.amount)?;
            tx.inputs.extend(selection.inputs());
            if selection.change.is_positive() {
                if let Some(owner) = selection.change_address() {
                    tx.outputs.push(Output::new(r.asset, selection.change, &owner));
                }
            }
            remove_selected(candidates, &selection);
        }
        Ok(())
    }

    /// Asset transfer paying every added recipient.
    pub fn build_transfer(&self, utxos: &[Utxo]) -> Result<Transaction, NeoError> {
        if self.recipients.is_empty() {
            return Err(CodecError::InvalidInput("transfer has no recipients".into()).into());
        }
        let mut candidates = utxos.to_vec();
        let mut tx = self.start(TxKind::Contract);
        self.pay_recipients(&mut tx, &mut candidates)?;

        debug!(
            inputs = tx.inputs.len(),
            outputs = tx.outputs.len(),
            "built transfer"
        );
        Ok(tx)
    }

    /// Claim `amount` of gas to `to`, referencing every unclaimed output of
    /// the claim asset in `claimable`.
    pub fn build_claim(&self, amount: Fixed8, to: &NeoAddress, claimable: &[Utxo]) -> Result<Transaction, NeoError> {
        if amount.raw() < 0 {
            return Err(CodecError::InvalidAmount(format!("negative claim {amount}")).into());
        }
        let claims: Vec<_> = claimable
            .iter()
            .filter(|u| u.asset == self.config.claim_asset && !u.claimed)
            .map(Utxo::outpoint)
            .collect();
        if claims.is_empty() {
            return Err(NeoError::NoUsableInputs(format!(
                "no unclaimed outputs of asset {}",
                self.config.claim_asset
            )));
        }

        let claim_count = claims.len();
        let mut tx = self.start(TxKind::Claim { claims });
        tx.outputs.push(Output::new(self.config.gas_asset, amount, to));

        debug!(claims = claim_count, %amount, to = %to, "built claim");
        Ok(tx)
    }

    /// Contract invocation running `script`, with `gas` attached.
    ///
    /// Recipients are paid first. Below the free-tier threshold the gas is
    /// zeroed and the first remaining gas UTXO, if any, is spent back to its
    /// owner in full. Otherwise exactly `gas` is selected with change.
    pub fn build_invocation(&self, script: Vec<u8>, gas: Fixed8, utxos: &[Utxo]) -> Result<Transaction, NeoError> {
        if gas.raw() < 0 {
            return Err(CodecError::InvalidAmount(format!("negative gas {gas}")).into());
        }
        let gas_asset = self.config.gas_asset;
        let mut candidates = utxos.to_vec();
        let mut tx = self.start(TxKind::Contract);
        self.pay_recipients(&mut tx, &mut candidates)?;

        let attached = if gas < self.config.free_gas_threshold {
            if let Some(utxo) = candidates.iter().find(|u| u.asset == gas_asset) {
                tx.inputs.push(utxo.outpoint());
                tx.outputs.push(Output::new(gas_asset, utxo.value, &utxo.address));
            }
            Fixed8::ZERO
        } else {
            let selection = CoinSelector::select(&candidates, &gas_asset, gas)?;
            tx.inputs.extend(selection.inputs());
            if selection.change.is_positive() {
                if let Some(owner) = selection.change_address() {
                    tx.outputs.push(Output::new(gas_asset, selection.change, &owner));
                }
            }
            gas
        };

        tx.kind = TxKind::Invocation {
            script,
            gas: attached,
        };
        tx.version = 1;

        debug!(
            gas = %attached,
            inputs = tx.inputs.len(),
            outputs = tx.outputs.len(),
            "built invocation"
        );
        Ok(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::{usage, Input};

    fn owner(tag: u8) -> NeoAddress {
        ScriptHash([tag; 20]).to_address()
    }

    fn utxo(tag: u8, asset: Hash256, raw: i64) -> Utxo {
        let mut txid = [0u8; 32];
        txid[31] = tag;
        Utxo::new(Hash256(txid), u16::from(tag), asset, Fixed8::from_raw(raw), owner(tag))
    }

    fn input(tag: u8) -> Input {
        utxo(tag, GAS_ASSET, 0).outpoint()
    }

    const ONE: i64 = 100_000_000;

    #[test]
    fn single_exact_utxo_transfer() {
        let utxos = vec![utxo(1, NEO_ASSET, ONE)];
        let tx = NeoTxBuilder::new()
            .add_recipient(NEO_ASSET, owner(9), Fixed8::ONE)
            .build_transfer(&utxos)
            .unwrap();
        assert_eq!(tx.kind, TxKind::Contract);
        assert_eq!(tx.version, 0);
        assert_eq!(tx.inputs, vec![input(1)]);
        assert_eq!(tx.outputs, vec![Output::new(NEO_ASSET, Fixed8::ONE, &owner(9))]);
    }

    #[test]
    fn change_follows_requested_outputs() {
        let utxos = vec![utxo(5, GAS_ASSET, 5 * ONE), utxo(1, GAS_ASSET, ONE), utxo(3, GAS_ASSET, 3 * ONE)];
        let tx = NeoTxBuilder::new()
            .add_recipient(GAS_ASSET, owner(9), Fixed8::from_raw(7 * ONE))
            .build_transfer(&utxos)
            .unwrap();
        assert_eq!(tx.inputs, vec![input(1), input(3), input(5)]);
        assert_eq!(
            tx.outputs,
            vec![
                Output::new(GAS_ASSET, Fixed8::from_raw(7 * ONE), &owner(9)),
                Output::new(GAS_ASSET, Fixed8::from_raw(2 * ONE), &owner(5)),
            ]
        );
    }

    #[test]
    fn recipients_do_not_share_inputs() {
        let utxos = vec![utxo(1, GAS_ASSET, ONE), utxo(2, GAS_ASSET, ONE)];
        let tx = NeoTxBuilder::new()
            .add_recipient(GAS_ASSET, owner(8), Fixed8::ONE)
            .add_recipient(GAS_ASSET, owner(9), Fixed8::ONE)
            .build_transfer(&utxos)
            .unwrap();
        assert_eq!(tx.inputs, vec![input(1), input(2)]);

        let err = NeoTxBuilder::new()
            .add_recipient(GAS_ASSET, owner(8), Fixed8::ONE)
            .add_recipient(GAS_ASSET, owner(9), Fixed8::from_raw(2 * ONE))
            .build_transfer(&utxos)
            .unwrap_err();
        assert!(matches!(err, NeoError::InsufficientFunds { .. }));
    }

    #[test]
    fn transfer_needs_recipients() {
        assert!(NeoTxBuilder::new().build_transfer(&[]).is_err());
        let err = NeoTxBuilder::new()
            .add_recipient(GAS_ASSET, owner(1), Fixed8::from_raw(-1))
            .build_transfer(&[])
            .unwrap_err();
        assert!(matches!(err, NeoError::Codec(CodecError::InvalidAmount(_))));
    }

    #[test]
    fn claim_lists_unclaimed_governing_outputs() {
        let mut claimed = utxo(3, NEO_ASSET, ONE);
        claimed.claimed = true;
        let claimable = vec![utxo(1, NEO_ASSET, ONE), utxo(2, GAS_ASSET, ONE), claimed, utxo(4, NEO_ASSET, 2 * ONE)];
        let tx = NeoTxBuilder::new()
            .build_claim(Fixed8::from_raw(12345), &owner(7), &claimable)
            .unwrap();
        assert_eq!(
            tx.kind,
            TxKind::Claim {
                claims: vec![
                    utxo(1, NEO_ASSET, 0).outpoint(),
                    utxo(4, NEO_ASSET, 0).outpoint()
                ]
            }
        );
        assert!(tx.inputs.is_empty());
        assert_eq!(tx.outputs, vec![Output::new(GAS_ASSET, Fixed8::from_raw(12345), &owner(7))]);
    }

    #[test]
    fn claim_without_candidates() {
        let err = NeoTxBuilder::new()
            .build_claim(Fixed8::ONE, &owner(7), &[utxo(1, GAS_ASSET, ONE)])
            .unwrap_err();
        assert!(matches!(err, NeoError::NoUsableInputs(_)));
    }

    #[test]
    fn free_invocation_attaches_one_gas_utxo_whole() {
        let utxos = vec![utxo(1, NEO_ASSET, ONE), utxo(6, GAS_ASSET, 3 * ONE), utxo(2, GAS_ASSET, ONE)];
        let tx = NeoTxBuilder::new()
            .build_invocation(vec![0x66], Fixed8::from_raw(ONE / 2), &utxos)
            .unwrap();
        assert_eq!(tx.version, 1);
        assert_eq!(tx.kind, TxKind::Invocation { script: vec![0x66], gas: Fixed8::ZERO });
        assert_eq!(tx.inputs, vec![input(6)]);
        assert_eq!(tx.outputs, vec![Output::new(GAS_ASSET, Fixed8::from_raw(3 * ONE), &owner(6))]);
    }

    #[test]
    fn free_invocation_without_gas_utxo() {
        let tx = NeoTxBuilder::new()
            .build_invocation(vec![0x66], Fixed8::ZERO, &[utxo(1, NEO_ASSET, ONE)])
            .unwrap();
        assert!(tx.inputs.is_empty());
        assert!(tx.outputs.is_empty());
    }

    #[test]
    fn paid_invocation_selects_gas_with_change() {
        let utxos = vec![utxo(4, GAS_ASSET, 4 * ONE), utxo(1, GAS_ASSET, ONE)];
        let tx = NeoTxBuilder::new()
            .build_invocation(vec![0x66], Fixed8::from_raw(2 * ONE), &utxos)
            .unwrap();
        assert_eq!(tx.kind, TxKind::Invocation { script: vec![0x66], gas: Fixed8::from_raw(2 * ONE) });
        assert_eq!(tx.inputs, vec![input(1), input(4)]);
        assert_eq!(tx.outputs, vec![Output::new(GAS_ASSET, Fixed8::from_raw(3 * ONE), &owner(4))]);

        let err = NeoTxBuilder::new()
            .build_invocation(vec![0x66], Fixed8::from_raw(10 * ONE), &utxos)
            .unwrap_err();
        assert!(matches!(err, NeoError::InsufficientFunds { .. }));
    }

    #[test]
    fn invocation_pays_recipients_before_gas() {
        let utxos = vec![utxo(1, GAS_ASSET, ONE), utxo(2, GAS_ASSET, 2 * ONE), utxo(7, NEO_ASSET, 10 * ONE)];
        let contract = owner(0xcc);
        let tx = NeoTxBuilder::new()
            .add_recipient(NEO_ASSET, contract, Fixed8::from_raw(4 * ONE))
            .add_script_attribute(&ScriptHash([0x11; 20]))
            .build_invocation(vec![0x00, 0xc1], Fixed8::ZERO, &utxos)
            .unwrap();
        assert_eq!(tx.attributes.len(), 1);
        assert_eq!(tx.attributes[0].usage, usage::SCRIPT);
        assert_eq!(tx.inputs, vec![input(7), input(1)]);
        assert_eq!(tx.outputs[0], Output::new(NEO_ASSET, Fixed8::from_raw(4 * ONE), &contract));
        assert_eq!(tx.outputs[1], Output::new(NEO_ASSET, Fixed8::from_raw(6 * ONE), &owner(7)));
        assert_eq!(tx.outputs[2], Output::new(GAS_ASSET, Fixed8::ONE, &owner(1)));
    }

    #[test]
    fn custom_config_changes_assets() {
        let token = Hash256([0x77; 32]);
        let config = NeoBuildConfig {
            gas_asset: token,
            ..NeoBuildConfig::default()
        };
        let builder = NeoTxBuilder::with_config(config);
        let tx = builder
            .build_invocation(vec![0x66], Fixed8::ONE, &[utxo(1, token, ONE)])
            .unwrap();
        assert_eq!(tx.inputs.len(), 1);
        assert_eq!(builder.config().claim_asset, NEO_ASSET);
    }
}
