//! Ordered energy capacity bands.
//!
//! Every node that handles energy declares one [`EnergyLevel`]. The upper
//! bound of that band is the largest instantaneous offer the node can take
//! safely; anything above it overloads the node.
//!
//! | Level | Band |
//! |-------|------|
//! | `L1` | `[0, 32)` |
//! | `L2` | `[32, 128)` |
//! | `L3` | `[128, 512)` |
//! | `L4` | `[512, 2048)` |
//! | `L5` | `[2048, 8192)` |

use serde::{Deserialize, Serialize};

use crate::energy::EnergyValue;

/// Half-open capacity band a node is rated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyLevel {
    /// `[0, 32)`
    L1,
    /// `[32, 128)`
    L2,
    /// `[128, 512)`
    L3,
    /// `[512, 2048)`
    L4,
    /// `[2048, 8192)`
    L5,
}

impl EnergyLevel {
    /// All levels in ascending order.
    pub const ALL: [Self; 5] = [Self::L1, Self::L2, Self::L3, Self::L4, Self::L5];

    /// Band bounds in whole units: `(inclusive lower, exclusive upper)`.
    pub const fn bounds(self) -> (u32, u32) {
        match self {
            Self::L1 => (0, 32),
            Self::L2 => (32, 128),
            Self::L3 => (128, 512),
            Self::L4 => (512, 2048),
            Self::L5 => (2048, 8192),
        }
    }

    /// Inclusive lower bound of the band.
    pub fn lower_bound(self) -> EnergyValue {
        EnergyValue::from(self.bounds().0)
    }

    /// Exclusive upper bound of the band; the overload threshold.
    pub fn upper_bound(self) -> EnergyValue {
        EnergyValue::from(self.bounds().1)
    }

    /// Whether `amount` falls inside this band.
    pub fn contains(self, amount: EnergyValue) -> bool {
        self.lower_bound() <= amount && amount < self.upper_bound()
    }

    /// The band containing `amount`, or `None` above the highest band.
    pub fn for_amount(amount: EnergyValue) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.contains(amount))
    }

    /// Whether an offer of `amount` exceeds what a node of this level can
    /// carry.
    ///
    /// The bound itself is still safe: only a strictly larger amount
    /// overloads.
    pub fn is_overloaded_by(self, amount: EnergyValue) -> bool {
        self.upper_bound() < amount
    }
}

impl core::fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let (from, to) = self.bounds();
        write!(f, "{self:?}[{from}, {to})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_are_contiguous_and_ordered() {
        for pair in EnergyLevel::ALL.windows(2) {
            if let [lower, upper] = pair {
                assert!(lower < upper);
                assert_eq!(lower.upper_bound(), upper.lower_bound());
            }
        }
    }

    #[test]
    fn for_amount_picks_half_open_band() {
        assert_eq!(
            EnergyLevel::for_amount(EnergyValue::ZERO),
            Some(EnergyLevel::L1)
        );
        assert_eq!(
            EnergyLevel::for_amount(EnergyValue::from(31_u32)),
            Some(EnergyLevel::L1)
        );
        assert_eq!(
            EnergyLevel::for_amount(EnergyValue::from(32_u32)),
            Some(EnergyLevel::L2)
        );
        assert_eq!(
            EnergyLevel::for_amount(EnergyValue::from(8191_u32)),
            Some(EnergyLevel::L5)
        );
        assert_eq!(EnergyLevel::for_amount(EnergyValue::from(8192_u32)), None);
    }

    #[test]
    fn overload_is_strictly_above_upper_bound() {
        let level = EnergyLevel::L3;
        assert!(!level.is_overloaded_by(EnergyValue::from(511_u32)));
        assert!(!level.is_overloaded_by(EnergyValue::from(512_u32)));
        assert!(level.is_overloaded_by(EnergyValue::from(513_u32)));
        assert!(level.is_overloaded_by(EnergyValue::from(600_u32)));
    }

    #[test]
    fn display_shows_band() {
        assert_eq!(EnergyLevel::L4.to_string(), "L4[512, 2048)");
    }
}
