//! Per-node offer inbox with per-source coalescing.
//!
//! A node may be reached by the same source through several paths in one
//! tick. Only the most valuable claim per source is worth keeping: the others
//! carry less energy for the same debit. [`OfferBuffer`] enforces this on
//! every push, and [`coalesce`] applies the same rule to any batch of offers.

use std::collections::BTreeMap;

use gridcraft_types::NodeId;
use parking_lot::Mutex;

use crate::offer::EnergyOffer;

/// Offers received since the last drain, at most one per source.
#[derive(Debug, Default)]
pub struct OfferBuffer {
    pending: Mutex<BTreeMap<NodeId, EnergyOffer>>,
}

impl OfferBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer `offer`, keeping only the larger claim per source.
    ///
    /// Returns `true` if the offer was kept. Ties keep the offer that
    /// arrived first.
    pub fn push(&self, offer: EnergyOffer) -> bool {
        let mut pending = self.pending.lock();
        keep_most_valuable(&mut pending, offer)
    }

    /// Take every buffered offer, leaving the buffer empty.
    pub fn drain(&self) -> Vec<EnergyOffer> {
        let drained = core::mem::take(&mut *self.pending.lock());
        drained.into_values().collect()
    }

    /// Copy of the pending offers, leaving the buffer untouched.
    pub fn snapshot(&self) -> Vec<EnergyOffer> {
        self.pending.lock().values().cloned().collect()
    }

    /// Drop everything buffered without processing it.
    pub fn clear(&self) {
        self.pending.lock().clear();
    }

    /// Number of distinct sources with a pending offer.
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

/// Reduce a batch to one offer per source, the one with the most
/// `remaining` energy.
///
/// Output is ordered by source id.
pub fn coalesce<I>(offers: I) -> Vec<EnergyOffer>
where
    I: IntoIterator<Item = EnergyOffer>,
{
    let mut best = BTreeMap::new();
    for offer in offers {
        keep_most_valuable(&mut best, offer);
    }
    best.into_values().collect()
}

fn keep_most_valuable(best: &mut BTreeMap<NodeId, EnergyOffer>, offer: EnergyOffer) -> bool {
    match best.get(&offer.source_id()) {
        Some(existing) if !offer.supersedes(existing) => false,
        _ => {
            best.insert(offer.source_id(), offer);
            true
        }
    }
}
