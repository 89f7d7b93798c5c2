//! Accumulator: a terminal sink that banks energy.
//!
//! The accumulator is where offers turn into real energy. On its own tick it
//! looks at the batch latched at tick start and accepts, one by one, the
//! offers whose `remaining` fits its free space. The source pays `original`,
//! the accumulator banks `remaining`; the difference was lost on the way.
//!
//! Like a cable it is rated for an [`EnergyLevel`]. An offer above the band
//! is still accepted, and burns the accumulator.

use std::sync::atomic::{AtomicBool, Ordering};

use gridcraft_core::{EnergyOffer, EnergySink, GridNode};
use gridcraft_types::{Direction, EnergyLevel, EnergyValue, NodeId};
use parking_lot::Mutex;
use tracing::{debug, info};

use super::Inbox;
use crate::error::WorldError;
use crate::item::{ChargeStore, ChargeableItem, ItemStack};

/// Static parameters of an [`Accumulator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccumulatorSpec {
    /// Largest amount the accumulator can bank.
    pub capacity: EnergyValue,
    /// Capacity band; larger offers burn the accumulator.
    pub level: EnergyLevel,
    /// Faces offers are taken from.
    pub input_faces: Vec<Direction>,
}

impl Default for AccumulatorSpec {
    fn default() -> Self {
        Self {
            capacity: EnergyValue::from(40_000_u32),
            level: EnergyLevel::L2,
            input_faces: Direction::ALL.to_vec(),
        }
    }
}

/// Counters for one accumulator tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkReport {
    /// Offers taken from the latched batch.
    pub drained: usize,
    /// Offers whose source paid up.
    pub accepted: usize,
    /// Energy banked from accepted offers.
    pub banked: EnergyValue,
    /// Offers that did not fit the free space.
    pub no_space: usize,
    /// Offers whose source could not honor the debit.
    pub refused: usize,
    /// Offers whose source was gone.
    pub dead_sources: usize,
}

/// Result of an accumulator tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccumulatorOutcome {
    /// The whole batch was handled.
    Processed(SinkReport),
    /// An overloading offer was accepted; the host must destroy the node.
    Destroyed {
        /// Source of the overloading offer.
        source: NodeId,
        /// Energy the overloading offer carried.
        remaining: EnergyValue,
        /// Counters for the offers handled before the overload.
        report: SinkReport,
    },
}

impl AccumulatorOutcome {
    /// Counters for the offers that were handled.
    pub const fn report(&self) -> &SinkReport {
        match self {
            Self::Processed(report) | Self::Destroyed { report, .. } => report,
        }
    }

    /// Whether the accumulator was destroyed this tick.
    pub const fn is_destroyed(&self) -> bool {
        matches!(self, Self::Destroyed { .. })
    }
}

/// A sink with a bounded store and a charging slot.
#[derive(Debug)]
pub struct Accumulator {
    id: NodeId,
    spec: AccumulatorSpec,
    stored: Mutex<EnergyValue>,
    inbox: Inbox,
    removed: AtomicBool,
}

impl Accumulator {
    /// Create an empty accumulator.
    pub fn new(spec: AccumulatorSpec) -> Self {
        Self {
            id: NodeId::new(),
            spec,
            stored: Mutex::new(EnergyValue::ZERO),
            inbox: Inbox::new(),
            removed: AtomicBool::new(false),
        }
    }

    /// Parameters this accumulator was built with.
    pub const fn spec(&self) -> &AccumulatorSpec {
        &self.spec
    }

    /// Energy currently banked.
    pub fn stored(&self) -> EnergyValue {
        *self.stored.lock()
    }

    /// Room left before the store is full.
    pub fn free_space(&self) -> EnergyValue {
        self.spec.capacity.saturating_sub(self.stored())
    }

    /// Whether the accumulator is gone from the grid.
    pub fn is_removed(&self) -> bool {
        self.removed.load(Ordering::SeqCst)
    }

    /// Offers received since the last latch.
    pub fn pending_offers(&self) -> Vec<EnergyOffer> {
        self.inbox.pending()
    }

    /// Accept what fits from the latched batch.
    ///
    /// Returns `None` if the accumulator was already removed.
    pub fn tick(&self) -> Option<AccumulatorOutcome> {
        if self.is_removed() {
            return None;
        }

        let offers = self.inbox.take_latched();
        let mut report = SinkReport {
            drained: offers.len(),
            ..SinkReport::default()
        };

        for offer in offers {
            if !offer.is_source_alive() {
                report.dead_sources = report.dead_sources.saturating_add(1);
                continue;
            }

            let remaining = offer.remaining();
            if remaining.is_zero() {
                continue;
            }
            if self.spec.level.is_overloaded_by(remaining) {
                if offer.accept() {
                    info!(
                        node = %self.id,
                        source = %offer.source_id(),
                        %remaining,
                        level = %self.spec.level,
                        "Accumulator overloaded"
                    );
                    self.inbox.clear();
                    return Some(AccumulatorOutcome::Destroyed {
                        source: offer.source_id(),
                        remaining,
                        report,
                    });
                }
                report.refused = report.refused.saturating_add(1);
                continue;
            }

            if remaining > self.free_space() {
                report.no_space = report.no_space.saturating_add(1);
                continue;
            }

            if !offer.accept() {
                debug!(node = %self.id, source = %offer.source_id(), "Offer refused by source");
                report.refused = report.refused.saturating_add(1);
                continue;
            }

            let mut stored = self.stored.lock();
            *stored = stored.saturating_add(remaining).min(self.spec.capacity);
            report.accepted = report.accepted.saturating_add(1);
            report.banked = report.banked.saturating_add(remaining);
        }

        if report.drained > 0 {
            debug!(
                node = %self.id,
                drained = report.drained,
                accepted = report.accepted,
                banked = %report.banked,
                no_space = report.no_space,
                "Accumulator tick"
            );
        }
        Some(AccumulatorOutcome::Processed(report))
    }

    /// Move banked energy into the item in the charging slot.
    ///
    /// Only what the item can take leaves the store. Returns the amount
    /// moved.
    pub fn charge_item<I, S>(
        &self,
        item: &I,
        stack: &mut ItemStack<S>,
    ) -> Result<EnergyValue, WorldError>
    where
        I: ChargeableItem,
        S: ChargeStore,
    {
        let mut stored = self.stored.lock();
        let unused = item.charge(stack, *stored)?;
        let moved = stored.saturating_sub(unused);
        *stored = unused;
        Ok(moved)
    }

    pub(crate) fn latch(&self) {
        if !self.is_removed() {
            self.inbox.latch();
        }
    }

    pub(crate) fn mark_removed(&self) {
        self.removed.store(true, Ordering::SeqCst);
        self.inbox.clear();
    }
}

impl EnergySink for Accumulator {
    fn is_consume_from(&self, direction: Direction) -> bool {
        !self.is_removed() && self.spec.input_faces.contains(&direction)
    }

    fn receive_offer(&self, offer: EnergyOffer) {
        if !self.is_removed() {
            self.inbox.push(offer);
        }
    }
}

impl GridNode for Accumulator {
    fn node_id(&self) -> NodeId {
        self.id
    }

    fn as_sink(&self) -> Option<&dyn EnergySink> {
        Some(self)
    }
}
