//! Energy offers: speculative claims on a source's stored energy.
//!
//! An [`EnergyOffer`] is created by a source each tick and travels one hop
//! per tick through conduits. Each hop forks it into a new offer with less
//! `remaining` energy. The source is only ever debited when some sink calls
//! [`EnergyOffer::accept`], and it is debited for the `original` amount, not
//! for what survived the trip.

use core::fmt;
use std::sync::Arc;

use gridcraft_types::{EnergyValue, NodeId};

use crate::capability::EnergySource;

/// An immutable, forkable claim on a source's energy.
///
/// Offers from the same source are the same claim. Among them, the one with
/// the larger `remaining` supersedes the others.
#[derive(Clone)]
pub struct EnergyOffer {
    source: Arc<dyn EnergySource>,
    remaining: EnergyValue,
    original: EnergyValue,
}

impl EnergyOffer {
    /// Create a fresh offer where `remaining == original == amount`.
    pub fn new(source: Arc<dyn EnergySource>, amount: EnergyValue) -> Self {
        Self {
            source,
            remaining: amount,
            original: amount,
        }
    }

    /// Create a full-value offer from whatever the source can offer now.
    ///
    /// Does not touch the source's store.
    pub fn from_source(source: &Arc<dyn EnergySource>) -> Self {
        Self::new(Arc::clone(source), source.offer_amount())
    }

    /// The source this offer draws on.
    pub fn source(&self) -> &Arc<dyn EnergySource> {
        &self.source
    }

    /// Identity of the source, used for coalescing.
    pub fn source_id(&self) -> NodeId {
        self.source.source_id()
    }

    /// Energy still carried after decay along the path so far.
    pub const fn remaining(&self) -> EnergyValue {
        self.remaining
    }

    /// Energy the source is debited when the offer is accepted.
    pub const fn original(&self) -> EnergyValue {
        self.original
    }

    /// Whether the source is still present in the grid.
    pub fn is_source_alive(&self) -> bool {
        !self.source.is_removed()
    }

    /// Ask the source to supply the original amount.
    ///
    /// Returns `true` iff the source could honor the whole debit. A `false`
    /// result means the source could not deliver; callers must not retry.
    pub fn accept(&self) -> bool {
        self.source.supply_energy(self.original)
    }

    /// Produce the offer that continues past a conduit with `resistance`.
    ///
    /// Returns `None` when nothing would remain: the energy dissipated.
    #[must_use]
    pub fn fork(&self, resistance: EnergyValue) -> Option<Self> {
        let remaining = self.remaining.saturating_sub(resistance);
        if remaining.is_zero() {
            return None;
        }
        Some(Self {
            source: Arc::clone(&self.source),
            remaining,
            original: self.original,
        })
    }

    /// Whether both offers are claims on the same source.
    pub fn same_claim(&self, other: &Self) -> bool {
        self.source_id() == other.source_id()
    }

    /// Whether this offer replaces `other` when both are buffered together.
    pub fn supersedes(&self, other: &Self) -> bool {
        self.same_claim(other) && self.remaining > other.remaining
    }
}

impl PartialEq for EnergyOffer {
    fn eq(&self, other: &Self) -> bool {
        self.same_claim(other)
            && self.remaining == other.remaining
            && self.original == other.original
    }
}

impl Eq for EnergyOffer {}

impl fmt::Debug for EnergyOffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnergyOffer")
            .field("source", &self.source_id())
            .field("remaining", &self.remaining)
            .field("original", &self.original)
            .finish()
    }
}
