//! Error types for the `gridcraft-types` crate.

use rust_decimal::Decimal;

/// Errors raised when an energy quantity is constructed from raw input.
///
/// Only the boundary is checked. Values derived through arithmetic are
/// clamped at zero and never produce an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnergyError {
    /// A negative amount was passed to direct construction.
    #[error("energy amount must not be negative, got {amount}")]
    InvalidAmount {
        /// The rejected amount.
        amount: Decimal,
    },

    /// A persisted energy string was not a plain base-10 decimal.
    #[error("invalid energy string {input:?}: {reason}")]
    Parse {
        /// The text that failed to parse.
        input: String,
        /// Why the decimal parser rejected it.
        reason: String,
    },
}
