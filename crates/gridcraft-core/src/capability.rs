//! Capability roles a grid node may implement.
//!
//! These are contracts, not concrete types. A single node can be a source
//! and a sink at once; a conduit is always a sink. The propagation engine
//! only ever talks to nodes through these traits.
//!
//! All methods take `&self`: nodes are shared between the host grid and the
//! offers that reference them, so any mutable state lives behind the node's
//! own lock.

use gridcraft_types::{Direction, EnergyLevel, EnergyValue, NodeId};

use crate::offer::EnergyOffer;

/// Anything that can sit in the grid and be found by a
/// [`NeighborResolver`](crate::NeighborResolver).
pub trait GridNode: Send + Sync {
    /// Stable identity of this node.
    fn node_id(&self) -> NodeId;

    /// Capability test: this node viewed as a sink, if it is one.
    fn as_sink(&self) -> Option<&dyn EnergySink> {
        None
    }
}

/// A node that produces offers every tick and supplies energy on request.
pub trait EnergySource: Send + Sync {
    /// Identity used to coalesce offers from this source.
    fn source_id(&self) -> NodeId;

    /// Faces this source actively pushes offers into.
    fn supplying_directions(&self) -> Vec<Direction>;

    /// Amount a fresh offer from this source carries right now.
    ///
    /// Must be side-effect-free: creating an offer never costs energy.
    fn offer_amount(&self) -> EnergyValue;

    /// Debit `amount` from the internal store.
    ///
    /// Returns `true` only if the whole amount was supplied. Implementations
    /// must check and commit under one lock so two accepts in the same tick
    /// cannot both spend the same energy.
    fn supply_energy(&self, amount: EnergyValue) -> bool;

    /// Whether the source has been removed from the grid.
    fn is_removed(&self) -> bool;
}

/// A node that can be offered energy.
pub trait EnergySink: Send + Sync {
    /// Whether this sink takes offers arriving through `direction`
    /// (the face of this sink they come in through).
    fn is_consume_from(&self, direction: Direction) -> bool;

    /// Buffer an offer for processing on this sink's own next tick.
    ///
    /// Must not evaluate or accept the offer immediately.
    fn receive_offer(&self, offer: EnergyOffer);
}

/// A sink that also forwards: receives, decays and re-offers energy.
///
/// Conduits normally accept from every face, so implementations usually
/// return `true` from [`EnergySink::is_consume_from`].
pub trait EnergyConduit: EnergySink {
    /// Energy an offer loses when forked through this conduit.
    fn resistance(&self) -> EnergyValue;

    /// Capacity band; offers above its upper bound overload the conduit.
    fn energy_level(&self) -> EnergyLevel;

    /// Drain and return all offers buffered since the last drain.
    fn retrieve_upcoming_offers(&self) -> Vec<EnergyOffer>;
}
