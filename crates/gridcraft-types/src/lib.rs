//! Shared value types for the Gridcraft energy network.
//!
//! Every crate in the workspace speaks in terms of the types defined here.
//! They carry no behaviour beyond arithmetic, ordering, and conversion.
//!
//! # Modules
//!
//! - [`energy`] -- [`EnergyValue`], the fixed-point non-negative quantity
//! - [`level`] -- [`EnergyLevel`] capacity bands used for overload testing
//! - [`direction`] -- The six axis [`Direction`]s a node can face
//! - [`ids`] -- [`NodeId`], the stable identity of a node across ticks
//! - [`error`] -- [`EnergyError`] for invalid construction and parsing

pub mod direction;
pub mod energy;
pub mod error;
pub mod ids;
pub mod level;

// Re-export all public types at crate root for convenience.
pub use direction::Direction;
pub use energy::{ENERGY_PRECISION, EnergyValue};
pub use error::EnergyError;
pub use ids::NodeId;
pub use level::EnergyLevel;
