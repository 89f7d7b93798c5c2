//! Fixed-point, non-negative energy quantities.
//!
//! [`EnergyValue`] wraps a [`Decimal`] held at exactly [`ENERGY_PRECISION`]
//! fractional digits. Every value that enters the type is rounded
//! half-down to that scale, so repeated add/subtract cycles never drift.
//!
//! # Invariants
//!
//! - A value is never negative. Direct construction from a negative amount
//!   fails with [`EnergyError::InvalidAmount`]; arithmetic that would go
//!   below zero saturates at [`EnergyValue::ZERO`].
//! - A value never exceeds [`EnergyValue::MAX`]; addition saturates there.
//! - The canonical string form ([`Display`](core::fmt::Display)) is a plain
//!   base-10 decimal with exactly ten fractional digits and no exponent.
//!   [`FromStr`] reads it back exactly.

use core::fmt;
use core::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EnergyError;

/// Number of fractional digits every energy amount is stored with.
pub const ENERGY_PRECISION: u32 = 10;

/// A non-negative energy quantity at a fixed decimal scale.
///
/// Comparison is numeric. [`Ord`] provides `min`/`max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EnergyValue(Decimal);

impl EnergyValue {
    /// `0.0000000000`
    pub const ZERO: Self = Self(Decimal::from_parts(0, 0, 0, false, ENERGY_PRECISION));

    /// `1.0000000000`
    pub const ONE: Self = Self(Decimal::from_parts(0x540B_E400, 0x2, 0, false, ENERGY_PRECISION));

    /// Largest representable amount: 18 integral nines and 10 fractional nines.
    pub const MAX: Self = Self(Decimal::from_parts(
        0x0FFF_FFFF,
        0x3E25_0261,
        0x204F_CE5E,
        false,
        ENERGY_PRECISION,
    ));

    /// Construct an energy value from a raw decimal amount.
    ///
    /// The amount is rounded half-down to [`ENERGY_PRECISION`] digits.
    ///
    /// # Errors
    ///
    /// Returns [`EnergyError::InvalidAmount`] if `amount` is negative.
    pub fn new(amount: Decimal) -> Result<Self, EnergyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(EnergyError::InvalidAmount { amount });
        }
        Ok(Self::clamped(amount))
    }

    /// Construct an energy value from a whole number of units.
    pub fn from_units(units: u64) -> Self {
        Self::clamped(Decimal::from(units))
    }

    /// Bring an arbitrary derived amount into range: negative results become
    /// zero, oversized results become [`EnergyValue::MAX`].
    fn clamped(amount: Decimal) -> Self {
        if amount <= Decimal::ZERO {
            return Self::ZERO;
        }
        if amount >= Self::MAX.0 {
            return Self::MAX;
        }
        let mut rounded =
            amount.round_dp_with_strategy(ENERGY_PRECISION, RoundingStrategy::MidpointTowardZero);
        rounded.rescale(ENERGY_PRECISION);
        Self(rounded)
    }

    /// Add two amounts, saturating at [`EnergyValue::MAX`].
    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        self.0
            .checked_add(other.0)
            .map_or(Self::MAX, Self::clamped)
    }

    /// Subtract `other`, flooring at [`EnergyValue::ZERO`].
    ///
    /// Never fails: energy cannot go negative.
    #[must_use]
    pub fn saturating_sub(self, other: Self) -> Self {
        self.0
            .checked_sub(other.0)
            .map_or(Self::ZERO, Self::clamped)
    }

    /// Whether this amount is exactly zero.
    pub const fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// The underlying decimal, always at [`ENERGY_PRECISION`] scale.
    pub const fn as_decimal(self) -> Decimal {
        self.0
    }

    /// Integral part of the amount; the fraction is truncated.
    pub fn to_units(self) -> u64 {
        self.0.trunc().to_u64().unwrap_or(u64::MAX)
    }
}

impl Default for EnergyValue {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<u32> for EnergyValue {
    fn from(units: u32) -> Self {
        Self::from_units(u64::from(units))
    }
}

impl From<u64> for EnergyValue {
    fn from(units: u64) -> Self {
        Self::from_units(units)
    }
}

impl TryFrom<Decimal> for EnergyValue {
    type Error = EnergyError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl TryFrom<i64> for EnergyValue {
    type Error = EnergyError;

    fn try_from(amount: i64) -> Result<Self, Self::Error> {
        Self::new(Decimal::from(amount))
    }
}

impl fmt::Display for EnergyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for EnergyValue {
    type Err = EnergyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s).map_err(|err| EnergyError::Parse {
            input: s.to_owned(),
            reason: err.to_string(),
        })?;
        Self::new(amount)
    }
}

impl Serialize for EnergyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EnergyValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
