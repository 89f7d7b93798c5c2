//! Concrete grid nodes.
//!
//! - [`Generator`] -- a source with a bounded store that refills every tick
//! - [`Cable`] -- a conduit with resistance and a capacity band
//! - [`Accumulator`] -- a terminal sink that banks what it accepts
//!
//! Every buffering node owns an [`Inbox`]. Offers delivered during a tick
//! wait in the inbox until the world latches it at the start of the next
//! tick, which gives each hop exactly one tick of latency no matter in
//! which order the world ticks its nodes.

pub mod accumulator;
pub mod cable;
pub mod generator;

pub use accumulator::{Accumulator, AccumulatorOutcome, AccumulatorSpec, SinkReport};
pub use cable::{Cable, CableSpec};
pub use generator::{Generator, GeneratorSpec};

use std::sync::Arc;

use gridcraft_core::{EnergyOffer, GridNode, OfferBuffer};
use gridcraft_types::NodeId;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::identifiers::{self, Identifier};

/// Two-stage offer storage: `incoming` collects offers during a tick, the
/// latched batch is what the owner processes on its next tick.
#[derive(Debug, Default)]
pub struct Inbox {
    incoming: OfferBuffer,
    latched: Mutex<Vec<EnergyOffer>>,
}

impl Inbox {
    /// Create an empty inbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer an offer, coalescing per source.
    pub fn push(&self, offer: EnergyOffer) {
        self.incoming.push(offer);
    }

    /// Move everything received so far into the batch for this tick.
    ///
    /// A batch that was never taken is replaced.
    pub fn latch(&self) {
        *self.latched.lock() = self.incoming.drain();
    }

    /// Take the latched batch.
    pub fn take_latched(&self) -> Vec<EnergyOffer> {
        core::mem::take(&mut *self.latched.lock())
    }

    /// Offers received but not yet latched.
    pub fn pending(&self) -> Vec<EnergyOffer> {
        self.incoming.snapshot()
    }

    /// Drop everything, latched or not.
    pub fn clear(&self) {
        self.incoming.clear();
        self.latched.lock().clear();
    }
}

/// Kind of a placed node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A [`Generator`].
    Generator,
    /// A [`Cable`].
    Cable,
    /// An [`Accumulator`].
    Accumulator,
}

/// A node placed in the [`GridWorld`](crate::GridWorld).
#[derive(Debug, Clone)]
pub enum PlacedNode {
    /// Energy source.
    Generator(Arc<Generator>),
    /// Conduit.
    Cable(Arc<Cable>),
    /// Terminal sink.
    Accumulator(Arc<Accumulator>),
}

impl NodeKind {
    /// Namespaced identifier, e.g. `gridcraft:cable`.
    pub fn identifier(self) -> Identifier {
        identifiers::of(match self {
            Self::Generator => "generator",
            Self::Cable => "cable",
            Self::Accumulator => "accumulator",
        })
    }
}

impl PlacedNode {
    /// Identity of the wrapped node.
    pub fn node_id(&self) -> NodeId {
        match self {
            Self::Generator(node) => node.node_id(),
            Self::Cable(node) => node.node_id(),
            Self::Accumulator(node) => node.node_id(),
        }
    }

    /// Which kind of node this is.
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Generator(_) => NodeKind::Generator,
            Self::Cable(_) => NodeKind::Cable,
            Self::Accumulator(_) => NodeKind::Accumulator,
        }
    }

    /// The node as a capability-testable handle.
    pub fn as_grid_node(&self) -> Arc<dyn GridNode> {
        match self {
            Self::Generator(node) => Arc::clone(node) as Arc<dyn GridNode>,
            Self::Cable(node) => Arc::clone(node) as Arc<dyn GridNode>,
            Self::Accumulator(node) => Arc::clone(node) as Arc<dyn GridNode>,
        }
    }

    /// Latch the inbox of a buffering node. Generators have none.
    pub(crate) fn latch(&self) {
        match self {
            Self::Generator(_) => {}
            Self::Cable(node) => node.latch(),
            Self::Accumulator(node) => node.latch(),
        }
    }

    /// Mark the node as gone from the grid.
    pub(crate) fn mark_removed(&self) {
        match self {
            Self::Generator(node) => node.mark_removed(),
            Self::Cable(node) => node.mark_destroyed(),
            Self::Accumulator(node) => node.mark_removed(),
        }
    }
}

impl From<Arc<Generator>> for PlacedNode {
    fn from(node: Arc<Generator>) -> Self {
        Self::Generator(node)
    }
}

impl From<Arc<Cable>> for PlacedNode {
    fn from(node: Arc<Cable>) -> Self {
        Self::Cable(node)
    }
}

impl From<Arc<Accumulator>> for PlacedNode {
    fn from(node: Arc<Accumulator>) -> Self {
        Self::Accumulator(node)
    }
}
