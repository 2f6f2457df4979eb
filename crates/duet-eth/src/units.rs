//! Denominations and token-decimal conversions.
//!
//! All arithmetic is exact over `u128`; decimal strings are parsed digit by
//! digit rather than through floating point.

use std::fmt;
use std::str::FromStr;

use duet_core::codec::trim_leading_zeros;
use duet_core::error::CodecError;

use crate::error::EthError;

/// Largest decimals count whose scale fits in `u128`.
const MAX_DECIMALS: u32 = 38;

/// Named multiples of one wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Wei,
    Ada,
    Babbage,
    Shannon,
    Szabo,
    Finney,
    Ether,
    Einstein,
    Douglas,
}

impl Unit {
    pub const ALL: [Self; 9] = [
        Self::Wei,
        Self::Ada,
        Self::Babbage,
        Self::Shannon,
        Self::Szabo,
        Self::Finney,
        Self::Ether,
        Self::Einstein,
        Self::Douglas,
    ];

    /// Power of ten relative to wei.
    pub fn decimals(self) -> u32 {
        match self {
            Self::Wei => 0,
            Self::Ada => 3,
            Self::Babbage => 6,
            Self::Shannon => 9,
            Self::Szabo => 12,
            Self::Finney => 15,
            Self::Ether => 18,
            Self::Einstein => 21,
            Self::Douglas => 24,
        }
    }

    pub fn multiplier(self) -> u128 {
        10u128.pow(self.decimals())
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Wei => "wei",
            Self::Ada => "ada",
            Self::Babbage => "babbage",
            Self::Shannon => "shannon",
            Self::Szabo => "szabo",
            Self::Finney => "finney",
            Self::Ether => "ether",
            Self::Einstein => "einstein",
            Self::Douglas => "douglas",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Unit {
    type Err = EthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "gwei" {
            return Ok(Self::Shannon);
        }
        Self::ALL
            .into_iter()
            .find(|u| u.name() == lower)
            .ok_or_else(|| CodecError::InvalidInput(format!("unknown unit {s:?}")).into())
    }
}

/// `"1.5"` ether → `1_500_000_000_000_000_000`.
pub fn to_wei(amount: &str, unit: Unit) -> Result<u128, EthError> {
    to_token_units(amount, unit.decimals())
}

/// Render wei in `unit`, dropping trailing fractional zeros.
pub fn from_wei(wei: u128, unit: Unit) -> String {
    from_token_units(wei, unit.decimals())
}

/// Parse a non-negative decimal string into base units of a token with
/// `decimals` fractional digits.
///
/// Fractional digits beyond `decimals` are accepted only when they are zero.
pub fn to_token_units(amount: &str, decimals: u32) -> Result<u128, EthError> {
    let invalid = |why: &str| EthError::from(CodecError::InvalidAmount(format!("{amount:?}: {why}")));
    if decimals > MAX_DECIMALS {
        return Err(invalid("too many decimals"));
    }
    let trimmed = amount.trim();
    let (int_part, frac_part) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("expected digits before the decimal point"));
    }
    if !frac_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("expected digits after the decimal point"));
    }
    let (kept, dropped) = frac_part.split_at(frac_part.len().min(decimals as usize));
    if dropped.bytes().any(|b| b != b'0') {
        return Err(invalid("more precision than the token supports"));
    }

    let scale = 10u128.pow(decimals);
    let mut whole: u128 = 0;
    for b in int_part.bytes() {
        whole = whole
            .checked_mul(10)
            .and_then(|v| v.checked_add(u128::from(b - b'0')))
            .ok_or_else(|| invalid("overflow"))?;
    }
    let mut frac: u128 = 0;
    for b in kept.bytes() {
        frac = frac * 10 + u128::from(b - b'0');
    }
    frac *= 10u128.pow(decimals - kept.len() as u32);

    whole
        .checked_mul(scale)
        .and_then(|v| v.checked_add(frac))
        .ok_or_else(|| invalid("overflow"))
}

/// Inverse of [`to_token_units`].
pub fn from_token_units(value: u128, decimals: u32) -> String {
    let decimals = decimals.min(MAX_DECIMALS);
    let scale = 10u128.pow(decimals);
    let whole = value / scale;
    let frac = value % scale;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{frac:0width$}", width = decimals as usize);
    format!("{whole}.{}", frac.trim_end_matches('0'))
}

/// `0x`-prefixed minimal hex quantity, `"0x0"` for zero.
pub fn to_quantity_hex(value: u128) -> String {
    let bytes = value.to_be_bytes();
    let minimal = trim_leading_zeros(&bytes);
    if minimal.is_empty() {
        return "0x0".to_string();
    }
    let digits = hex::encode(minimal);
    format!("0x{}", digits.trim_start_matches('0'))
}
