//! Offer-based energy propagation for the Gridcraft energy network.
//!
//! Energy never moves eagerly. A source publishes its potential output as an
//! [`EnergyOffer`]; conduits coalesce, decay and forward those offers one hop
//! per tick; a terminal sink finally calls [`EnergyOffer::accept`], which is
//! the only operation that debits the source.
//!
//! # Architecture
//!
//! - [`capability`] -- The [`EnergySource`], [`EnergySink`] and
//!   [`EnergyConduit`] roles, plus [`GridNode`] for capability lookup.
//! - [`offer`] -- [`EnergyOffer`]: immutable, forkable claim on a source.
//! - [`buffer`] -- [`OfferBuffer`]: per-node inbox that keeps one claim per
//!   source.
//! - [`resolver`] -- [`NeighborResolver`]: the host's spatial lookup.
//! - [`propagation`] -- [`tick_source`] and [`tick_conduit`], the per-node
//!   tick algorithm.
//!
//! # Tick Flow
//!
//! ```text
//! Source.tick ──offer──▶ Conduit buffer
//!                          │ (next tick)
//!                          ▼
//!             drain ▶ dedup ▶ overload? ──yes──▶ accept ▶ destroyed
//!                              │ no
//!                              ▼
//!                     fork(resistance) ──▶ neighbour buffers
//! ```
//!
//! Everything before `accept` is speculative. A sink that never accepts
//! leaves the source untouched.

pub mod buffer;
pub mod capability;
pub mod offer;
pub mod propagation;
pub mod resolver;

#[cfg(test)]
mod testing;

// Re-export primary types at crate root.
pub use buffer::{OfferBuffer, coalesce};
pub use capability::{EnergyConduit, EnergySink, EnergySource, GridNode};
pub use offer::EnergyOffer;
pub use propagation::{
    ConduitOutcome, ConduitPhase, ConduitReport, Overload, SourceReport, tick_conduit,
    tick_source,
};
pub use resolver::NeighborResolver;
