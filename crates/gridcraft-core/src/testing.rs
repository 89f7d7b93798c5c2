//! In-memory nodes shared by the unit tests of this crate.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use gridcraft_types::{Direction, EnergyLevel, EnergyValue, NodeId};
use parking_lot::Mutex;

use crate::buffer::OfferBuffer;
use crate::capability::{EnergyConduit, EnergySink, EnergySource, GridNode};
use crate::offer::EnergyOffer;
use crate::resolver::NeighborResolver;

pub struct TestSource {
    id: NodeId,
    stored: Mutex<EnergyValue>,
    directions: Vec<Direction>,
    removed: AtomicBool,
}

impl TestSource {
    pub fn holding(units: u32) -> Arc<Self> {
        Self::facing(units, vec![Direction::Up])
    }

    pub fn facing(units: u32, directions: Vec<Direction>) -> Arc<Self> {
        Arc::new(Self {
            id: NodeId::new(),
            stored: Mutex::new(EnergyValue::from(units)),
            directions,
            removed: AtomicBool::new(false),
        })
    }

    pub fn as_dyn(self: &Arc<Self>) -> Arc<dyn EnergySource> {
        Arc::clone(self) as Arc<dyn EnergySource>
    }

    pub fn stored(&self) -> EnergyValue {
        *self.stored.lock()
    }

    pub fn remove(&self) {
        self.removed.store(true, Ordering::SeqCst);
    }
}

impl EnergySource for TestSource {
    fn source_id(&self) -> NodeId {
        self.id
    }

    fn supplying_directions(&self) -> Vec<Direction> {
        self.directions.clone()
    }

    fn offer_amount(&self) -> EnergyValue {
        self.stored()
    }

    fn supply_energy(&self, amount: EnergyValue) -> bool {
        let mut stored = self.stored.lock();
        if *stored < amount {
            return false;
        }
        *stored = stored.saturating_sub(amount);
        true
    }

    fn is_removed(&self) -> bool {
        self.removed.load(Ordering::SeqCst)
    }
}

impl GridNode for TestSource {
    fn node_id(&self) -> NodeId {
        self.id
    }
}

/// Records every offer it is given; takes offers only through `faces`.
pub struct TestSink {
    id: NodeId,
    faces: Vec<Direction>,
    inbox: Mutex<Vec<EnergyOffer>>,
}

impl TestSink {
    pub fn accepting_all() -> Arc<Self> {
        Self::accepting(Direction::ALL.to_vec())
    }

    pub fn accepting(faces: Vec<Direction>) -> Arc<Self> {
        Arc::new(Self {
            id: NodeId::new(),
            faces,
            inbox: Mutex::new(Vec::new()),
        })
    }

    pub fn inbox(&self) -> Vec<EnergyOffer> {
        self.inbox.lock().clone()
    }
}

impl EnergySink for TestSink {
    fn is_consume_from(&self, direction: Direction) -> bool {
        self.faces.contains(&direction)
    }

    fn receive_offer(&self, offer: EnergyOffer) {
        self.inbox.lock().push(offer);
    }
}

impl GridNode for TestSink {
    fn node_id(&self) -> NodeId {
        self.id
    }

    fn as_sink(&self) -> Option<&dyn EnergySink> {
        Some(self)
    }
}

pub struct TestConduit {
    id: NodeId,
    resistance: EnergyValue,
    level: EnergyLevel,
    buffer: OfferBuffer,
}

impl TestConduit {
    pub fn new(resistance: u32, level: EnergyLevel) -> Arc<Self> {
        Arc::new(Self {
            id: NodeId::new(),
            resistance: EnergyValue::from(resistance),
            level,
            buffer: OfferBuffer::new(),
        })
    }

    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

impl EnergySink for TestConduit {
    fn is_consume_from(&self, _direction: Direction) -> bool {
        true
    }

    fn receive_offer(&self, offer: EnergyOffer) {
        self.buffer.push(offer);
    }
}

impl EnergyConduit for TestConduit {
    fn resistance(&self) -> EnergyValue {
        self.resistance
    }

    fn energy_level(&self) -> EnergyLevel {
        self.level
    }

    fn retrieve_upcoming_offers(&self) -> Vec<EnergyOffer> {
        self.buffer.drain()
    }
}

impl GridNode for TestConduit {
    fn node_id(&self) -> NodeId {
        self.id
    }

    fn as_sink(&self) -> Option<&dyn EnergySink> {
        Some(self)
    }
}

/// Explicit adjacency table standing in for a spatial world.
#[derive(Default)]
pub struct TestGrid {
    links: BTreeMap<(NodeId, Direction), Arc<dyn GridNode>>,
}

impl TestGrid {
    /// Place `neighbor` on the `direction` side of `node`.
    pub fn link(&mut self, node: NodeId, direction: Direction, neighbor: Arc<dyn GridNode>) {
        self.links.insert((node, direction), neighbor);
    }
}

impl NeighborResolver for TestGrid {
    fn neighbor(&self, node: NodeId, direction: Direction) -> Option<Arc<dyn GridNode>> {
        self.links.get(&(node, direction)).cloned()
    }
}
