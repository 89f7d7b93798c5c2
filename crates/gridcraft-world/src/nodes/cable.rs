//! Cable: the reference conduit.

use gridcraft_core::{
    ConduitOutcome, ConduitPhase, EnergyConduit, EnergyOffer, EnergySink, GridNode,
    NeighborResolver, tick_conduit,
};
use gridcraft_types::{Direction, EnergyLevel, EnergyValue, NodeId};
use parking_lot::Mutex;
use tracing::debug;

use super::Inbox;

/// Static parameters of a [`Cable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CableSpec {
    /// Energy lost by every offer passing through.
    pub resistance: EnergyValue,
    /// Capacity band; larger offers burn the cable.
    pub level: EnergyLevel,
}

impl Default for CableSpec {
    fn default() -> Self {
        Self {
            resistance: EnergyValue::ONE,
            level: EnergyLevel::L1,
        }
    }
}

/// A conduit that accepts from every face and fans out to every face.
#[derive(Debug)]
pub struct Cable {
    id: NodeId,
    spec: CableSpec,
    inbox: Inbox,
    phase: Mutex<ConduitPhase>,
}

impl Cable {
    /// Create a cable in the buffering phase.
    pub fn new(spec: CableSpec) -> Self {
        Self {
            id: NodeId::new(),
            spec,
            inbox: Inbox::new(),
            phase: Mutex::new(ConduitPhase::Buffering),
        }
    }

    /// Parameters this cable was built with.
    pub const fn spec(&self) -> CableSpec {
        self.spec
    }

    /// Current phase.
    pub fn phase(&self) -> ConduitPhase {
        *self.phase.lock()
    }

    /// Whether the cable has burned out.
    pub fn is_destroyed(&self) -> bool {
        self.phase() == ConduitPhase::Destroyed
    }

    /// Offers received since the last latch.
    pub fn pending_offers(&self) -> Vec<EnergyOffer> {
        self.inbox.pending()
    }

    /// Process the latched batch.
    ///
    /// Returns `None` if the cable was already destroyed. On a destroying
    /// outcome the cable drops everything it still buffers; removing it from
    /// the grid is up to the caller.
    pub fn tick<R>(&self, resolver: &R) -> Option<ConduitOutcome>
    where
        R: NeighborResolver + ?Sized,
    {
        {
            let mut phase = self.phase.lock();
            if *phase == ConduitPhase::Destroyed {
                return None;
            }
            *phase = ConduitPhase::Processing;
        }

        let outcome = tick_conduit(self, self.id, resolver, &Direction::ALL);
        *self.phase.lock() = outcome.phase();
        if outcome.is_destroyed() {
            self.inbox.clear();
        }
        Some(outcome)
    }

    pub(crate) fn latch(&self) {
        if !self.is_destroyed() {
            self.inbox.latch();
        }
    }

    pub(crate) fn mark_destroyed(&self) {
        *self.phase.lock() = ConduitPhase::Destroyed;
        self.inbox.clear();
    }
}

impl EnergySink for Cable {
    fn is_consume_from(&self, _direction: Direction) -> bool {
        !self.is_destroyed()
    }

    fn receive_offer(&self, offer: EnergyOffer) {
        if self.is_destroyed() {
            debug!(node = %self.id, source = %offer.source_id(), "Destroyed cable ignored offer");
            return;
        }
        self.inbox.push(offer);
    }
}

impl EnergyConduit for Cable {
    fn resistance(&self) -> EnergyValue {
        self.spec.resistance
    }

    fn energy_level(&self) -> EnergyLevel {
        self.spec.level
    }

    fn retrieve_upcoming_offers(&self) -> Vec<EnergyOffer> {
        self.inbox.take_latched()
    }
}

impl GridNode for Cable {
    fn node_id(&self) -> NodeId {
        self.id
    }

    fn as_sink(&self) -> Option<&dyn EnergySink> {
        Some(self)
    }
}
