//! Reference host for the Gridcraft energy network.
//!
//! `gridcraft-core` defines how offers move; this crate gives them somewhere
//! to move through: concrete nodes, a positioned grid that resolves
//! neighbors and destroys burned-out nodes, and chargeable items.
//!
//! # Modules
//!
//! - [`nodes`] -- [`Generator`], [`Cable`] and [`Accumulator`], plus the
//!   latching [`Inbox`](nodes::Inbox) they buffer offers in.
//! - [`world`] -- [`GridWorld`]: placement, removal, neighbor lookup and the
//!   global tick producing a [`TickSummary`].
//! - [`item`] -- [`ChargeableItem`] over a string-keyed [`ChargeStore`].
//! - [`position`] -- [`BlockPos`] grid coordinates.
//! - [`identifiers`] -- `gridcraft:`-namespaced identifiers.
//! - [`error`] -- [`WorldError`].

pub mod error;
pub mod identifiers;
pub mod item;
pub mod nodes;
pub mod position;
pub mod world;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use item::{CHARGE_KEY, ChargeStore, ChargeableItem, EnergyCell, ItemStack, MemoryChargeStore};
pub use nodes::{
    Accumulator, AccumulatorOutcome, AccumulatorSpec, Cable, CableSpec, Generator, GeneratorSpec,
    NodeKind, PlacedNode, SinkReport,
};
pub use position::BlockPos;
pub use world::{DestroyedNode, GridWorld, TickSummary};
