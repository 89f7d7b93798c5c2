//! Generator: a source with a bounded store that refills every tick.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use gridcraft_core::{EnergySource, GridNode, NeighborResolver, SourceReport, tick_source};
use gridcraft_types::{Direction, EnergyValue, NodeId};
use parking_lot::Mutex;
use tracing::debug;

/// Static parameters of a [`Generator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSpec {
    /// Largest amount the store can hold.
    pub capacity: EnergyValue,
    /// Energy added to the store on every tick.
    pub production: EnergyValue,
    /// Ceiling on a single offer.
    pub max_output: EnergyValue,
    /// Faces offers are pushed into.
    pub directions: Vec<Direction>,
}

impl Default for GeneratorSpec {
    fn default() -> Self {
        Self {
            capacity: EnergyValue::from(10_000_u32),
            production: EnergyValue::from(32_u32),
            max_output: EnergyValue::from(32_u32),
            directions: Direction::ALL.to_vec(),
        }
    }
}

/// An energy source backed by an internal store.
///
/// Offers never touch the store. Debits only happen through
/// [`EnergySource::supply_energy`], which checks and commits under one lock.
#[derive(Debug)]
pub struct Generator {
    id: NodeId,
    spec: GeneratorSpec,
    stored: Mutex<EnergyValue>,
    removed: AtomicBool,
}

impl Generator {
    /// Create an empty generator.
    pub fn new(spec: GeneratorSpec) -> Self {
        Self {
            id: NodeId::new(),
            spec,
            stored: Mutex::new(EnergyValue::ZERO),
            removed: AtomicBool::new(false),
        }
    }

    /// Start with `amount` already stored, capped at capacity.
    #[must_use]
    pub fn with_stored(self, amount: EnergyValue) -> Self {
        *self.stored.lock() = amount.min(self.spec.capacity);
        self
    }

    /// Parameters this generator was built with.
    pub const fn spec(&self) -> &GeneratorSpec {
        &self.spec
    }

    /// Energy currently in the store.
    pub fn stored(&self) -> EnergyValue {
        *self.stored.lock()
    }

    /// Add one tick of production to the store, capped at capacity.
    ///
    /// Returns the amount actually added.
    pub fn generate(&self) -> EnergyValue {
        if self.is_removed() {
            return EnergyValue::ZERO;
        }
        let mut stored = self.stored.lock();
        let before = *stored;
        *stored = before
            .saturating_add(self.spec.production)
            .min(self.spec.capacity);
        stored.saturating_sub(before)
    }

    /// Push a fresh offer to every accepting neighbor.
    pub fn tick<R>(self: &Arc<Self>, resolver: &R) -> SourceReport
    where
        R: NeighborResolver + ?Sized,
    {
        let source: Arc<dyn EnergySource> = Arc::clone(self) as Arc<dyn EnergySource>;
        tick_source(&source, resolver)
    }

    pub(crate) fn mark_removed(&self) {
        self.removed.store(true, Ordering::SeqCst);
    }
}

impl EnergySource for Generator {
    fn source_id(&self) -> NodeId {
        self.id
    }

    fn supplying_directions(&self) -> Vec<Direction> {
        self.spec.directions.clone()
    }

    fn offer_amount(&self) -> EnergyValue {
        self.stored().min(self.spec.max_output)
    }

    fn supply_energy(&self, amount: EnergyValue) -> bool {
        if self.is_removed() {
            return false;
        }
        let mut stored = self.stored.lock();
        if *stored < amount {
            debug!(node = %self.id, stored = %*stored, requested = %amount, "Supply refused");
            return false;
        }
        *stored = stored.saturating_sub(amount);
        true
    }

    fn is_removed(&self) -> bool {
        self.removed.load(Ordering::SeqCst)
    }
}

impl GridNode for Generator {
    fn node_id(&self) -> NodeId {
        self.id
    }
}
