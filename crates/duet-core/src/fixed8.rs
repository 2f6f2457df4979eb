//! 8-decimal fixed-point amounts.
//!
//! A [`Fixed8`] counts 10⁻⁸ units in an `i64`. Decimal strings are parsed
//! digit by digit so `"0.1"` is exactly `10_000_000`, with no binary float in
//! between.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::{FIXED8_DECIMALS, FIXED8_SCALE};
use crate::error::CodecError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fixed8(i64);

impl Fixed8 {
    pub const ZERO: Self = Self(0);
    /// One whole unit.
    pub const ONE: Self = Self(FIXED8_SCALE);

    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> i64 {
        self.0
    }

    /// `units` whole units, or `None` on overflow.
    pub fn from_units(units: i64) -> Option<Self> {
        units.checked_mul(FIXED8_SCALE).map(Self)
    }

    /// Parse a plain decimal string such as `"12.5"` or `"0.00000001"`.
    ///
    /// Digits past the eighth decimal place are accepted only if they are
    /// zero. Signs, exponents, and empty input are rejected.
    pub fn from_decimal_str(s: &str) -> Result<Self, CodecError> {
        let invalid = || CodecError::InvalidAmount(s.to_string());
        let trimmed = s.trim();
        let (int_part, frac_part) = match trimmed.split_once('.') {
            Some((i, f)) => (i, f),
            None => (trimmed, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let decimals = FIXED8_DECIMALS as usize;
        let (kept, dropped) = frac_part.split_at(frac_part.len().min(decimals));
        if dropped.bytes().any(|b| b != b'0') {
            return Err(CodecError::InvalidAmount(format!(
                "{s}: more than {FIXED8_DECIMALS} decimal places"
            )));
        }

        let whole: i64 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| invalid())?
        };
        let mut frac: i64 = 0;
        for (i, b) in kept.bytes().enumerate() {
            let digit = i64::from(b - b'0');
            frac += digit * 10_i64.pow((decimals - 1 - i) as u32);
        }

        whole
            .checked_mul(FIXED8_SCALE)
            .and_then(|w| w.checked_add(frac))
            .map(Self)
            .ok_or_else(invalid)
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Convert to the unsigned value carried on the wire.
    ///
    /// Negative amounts have no chain representation and are rejected.
    pub fn to_chain_value(self) -> Result<u64, CodecError> {
        u64::try_from(self.0)
            .map_err(|_| CodecError::InvalidAmount(format!("negative amount {self}")))
    }

    /// Inverse of [`Fixed8::to_chain_value`]; rejects values above `i64::MAX`.
    pub fn from_chain_value(value: u64) -> Result<Self, CodecError> {
        i64::try_from(value)
            .map(Self)
            .map_err(|_| CodecError::InvalidAmount(format!("chain value {value} overflows Fixed8")))
    }

    pub fn to_le_bytes(self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    pub fn from_le_bytes(bytes: [u8; 8]) -> Self {
        Self(i64::from_le_bytes(bytes))
    }
}

impl fmt::Display for Fixed8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = FIXED8_SCALE as u64;
        write!(
            f,
            "{sign}{}.{:0width$}",
            abs / scale,
            abs % scale,
            width = FIXED8_DECIMALS as usize
        )
    }
}

impl FromStr for Fixed8 {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_decimal_str(s)
    }
}

impl Serialize for Fixed8 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Fixed8 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
