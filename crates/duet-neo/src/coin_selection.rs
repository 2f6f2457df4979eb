//! Smallest-first coin selection.
//!
//! Candidates in the requested asset are sorted by value ascending (stable,
//! so equal values keep their supplied order) and taken greedily until the
//! running total covers the target. Spending many small outputs first keeps
//! the UTXO set from fragmenting.

use tracing::debug;

use duet_core::{CodecError, Fixed8, Hash256};
use duet_keys::address::NeoAddress;

use crate::error::NeoError;
use crate::tx::Input;
use crate::utxo::Utxo;

/// Result of coin selection for one asset and target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinSelection {
    /// Selected UTXOs in the order they were consumed.
    pub selected: Vec<Utxo>,
    /// Sum of the selected values.
    pub total: Fixed8,
    /// Surplus to return; zero when the total matches the target exactly.
    pub change: Fixed8,
}

impl CoinSelection {
    pub fn inputs(&self) -> impl Iterator<Item = Input> + '_ {
        self.selected.iter().map(Utxo::outpoint)
    }

    /// Owner of the last consumed UTXO, which receives any change.
    pub fn change_address(&self) -> Option<NeoAddress> {
        self.selected.last().map(|u| u.address)
    }
}

pub struct CoinSelector;

impl CoinSelector {
    /// Select UTXOs of `asset` covering `target`.
    ///
    /// A zero target selects nothing. Returns
    /// [`NeoError::InsufficientFunds`] when every candidate together falls
    /// short.
    pub fn select(candidates: &[Utxo], asset: &Hash256, target: Fixed8) -> Result<CoinSelection, NeoError> {
        if target.raw() < 0 {
            return Err(CodecError::InvalidAmount(format!("negative target {target}")).into());
        }
        if target == Fixed8::ZERO {
            return Ok(CoinSelection {
                selected: Vec::new(),
                total: Fixed8::ZERO,
                change: Fixed8::ZERO,
            });
        }

        let mut matching: Vec<&Utxo> = candidates.iter().filter(|u| u.asset == *asset).collect();
        matching.sort_by_key(|u| u.value);

        let mut selected = Vec::new();
        let mut total = Fixed8::ZERO;
        for utxo in matching {
            selected.push(utxo.clone());
            total = total.checked_add(utxo.value).ok_or_else(|| {
                CodecError::InvalidAmount(format!("total of {asset} overflows"))
            })?;

            if total >= target {
                let change = total.checked_sub(target).unwrap_or(Fixed8::ZERO);
                debug!(
                    %asset,
                    %target,
                    inputs = selected.len(),
                    %change,
                    "coin selection satisfied"
                );
                return Ok(CoinSelection {
                    selected,
                    total,
                    change,
                });
            }
        }

        Err(NeoError::InsufficientFunds {
            asset: *asset,
            have: total,
            need: target,
        })
    }
}

/// Drop every candidate that `selection` consumed.
pub fn remove_selected(candidates: &mut Vec<Utxo>, selection: &CoinSelection) {
    candidates.retain(|u| !selection.selected.iter().any(|s| s.txid == u.txid && s.n == u.n));
}
