//! In-memory grid host.
//!
//! [`GridWorld`] owns every placed node, resolves neighbors by position and
//! drives the global tick. A tick runs in three passes:
//!
//! 1. Latch: every buffering node moves the offers it received before this
//!    tick into its working batch.
//! 2. Generate: every generator adds one tick of production to its store.
//! 3. Tick: every node runs once, in ascending [`BlockPos`] order. Nodes that
//!    burn out are removed from the grid immediately.
//!
//! Because of the latch pass, an offer delivered during a tick is never
//! processed before the next one, so each hop costs exactly one tick
//! whichever order the nodes run in.

use std::collections::BTreeMap;
use std::sync::Arc;

use gridcraft_core::{ConduitReport, GridNode, NeighborResolver};
use gridcraft_types::{Direction, EnergyValue, NodeId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::WorldError;
use crate::nodes::{Accumulator, Cable, Generator, NodeKind, PlacedNode, SinkReport};
use crate::position::BlockPos;

/// A node removed by an overload during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestroyedNode {
    /// Identity of the node.
    pub id: NodeId,
    /// Where it stood.
    pub pos: BlockPos,
    /// What it was.
    pub kind: NodeKind,
}

/// What happened during one global tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickSummary {
    /// Tick number, starting at 1.
    pub tick: u64,
    /// Energy added to generator stores.
    pub generated: EnergyValue,
    /// Fresh offers pushed by generators.
    pub offers_emitted: usize,
    /// Offers that survived a cable and were fanned out.
    pub forwarded: usize,
    /// Forked offers handed to neighbors.
    pub deliveries: usize,
    /// Offers that decayed to nothing in a cable.
    pub dissipated: usize,
    /// Offers dropped because their source was gone.
    pub dead_sources: usize,
    /// Offers whose source could not honor an accept.
    pub refused: usize,
    /// Offers accepted by accumulators.
    pub accepted: usize,
    /// Energy banked by accumulators.
    pub banked: EnergyValue,
    /// Nodes burned out by overloads.
    pub destroyed: Vec<DestroyedNode>,
    /// Energy held by generators after the tick.
    pub generator_storage: EnergyValue,
    /// Energy held by accumulators after the tick.
    pub accumulator_storage: EnergyValue,
}

impl TickSummary {
    const fn add_conduit(&mut self, report: &ConduitReport) {
        self.forwarded = self.forwarded.saturating_add(report.forwarded);
        self.deliveries = self.deliveries.saturating_add(report.deliveries);
        self.dissipated = self.dissipated.saturating_add(report.dissipated);
        self.dead_sources = self.dead_sources.saturating_add(report.dead_sources);
        self.refused = self.refused.saturating_add(report.refused_overloads);
    }

    fn add_sink(&mut self, report: &SinkReport) {
        self.accepted = self.accepted.saturating_add(report.accepted);
        self.banked = self.banked.saturating_add(report.banked);
        self.dead_sources = self.dead_sources.saturating_add(report.dead_sources);
        self.refused = self.refused.saturating_add(report.refused);
    }
}

/// The grid: nodes by position, positions by node.
#[derive(Debug, Default)]
pub struct GridWorld {
    tick: u64,
    nodes: BTreeMap<BlockPos, PlacedNode>,
    positions: BTreeMap<NodeId, BlockPos>,
}

impl GridWorld {
    /// Create an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ticks run so far.
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Number of placed nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing is placed.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // -------------------------------------------------------------------
    // Editing
    // -------------------------------------------------------------------

    /// Put a node at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::PositionOccupied`] if something already stands
    /// there.
    pub fn place(
        &mut self,
        pos: BlockPos,
        node: impl Into<PlacedNode>,
    ) -> Result<NodeId, WorldError> {
        if self.nodes.contains_key(&pos) {
            return Err(WorldError::PositionOccupied(pos));
        }
        let node = node.into();
        let id = node.node_id();
        debug!(node = %id, %pos, kind = %node.kind().identifier(), "Node placed");
        self.positions.insert(id, pos);
        self.nodes.insert(pos, node);
        Ok(id)
    }

    /// Place a generator and keep a handle to it.
    pub fn place_generator(
        &mut self,
        pos: BlockPos,
        generator: Generator,
    ) -> Result<Arc<Generator>, WorldError> {
        let generator = Arc::new(generator);
        self.place(pos, Arc::clone(&generator))?;
        Ok(generator)
    }

    /// Place a cable and keep a handle to it.
    pub fn place_cable(&mut self, pos: BlockPos, cable: Cable) -> Result<Arc<Cable>, WorldError> {
        let cable = Arc::new(cable);
        self.place(pos, Arc::clone(&cable))?;
        Ok(cable)
    }

    /// Place an accumulator and keep a handle to it.
    pub fn place_accumulator(
        &mut self,
        pos: BlockPos,
        accumulator: Accumulator,
    ) -> Result<Arc<Accumulator>, WorldError> {
        let accumulator = Arc::new(accumulator);
        self.place(pos, Arc::clone(&accumulator))?;
        Ok(accumulator)
    }

    /// Take the node at `pos` out of the grid.
    ///
    /// The node is marked removed: offers that still reference it as their
    /// source are dropped wherever they are processed next.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EmptyPosition`] if nothing stands at `pos`.
    pub fn remove(&mut self, pos: BlockPos) -> Result<PlacedNode, WorldError> {
        let node = self
            .nodes
            .remove(&pos)
            .ok_or(WorldError::EmptyPosition(pos))?;
        self.positions.remove(&node.node_id());
        node.mark_removed();
        debug!(node = %node.node_id(), %pos, "Node removed");
        Ok(node)
    }

    /// Remove a node that burned out.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NodeNotFound`] if the node is not in the grid.
    pub fn destroy(&mut self, node: NodeId) -> Result<DestroyedNode, WorldError> {
        let pos = self
            .positions
            .get(&node)
            .copied()
            .ok_or(WorldError::NodeNotFound(node))?;
        let removed = self.remove(pos)?;
        info!(tick = self.tick, %node, %pos, kind = ?removed.kind(), "Node destroyed");
        Ok(DestroyedNode {
            id: node,
            pos,
            kind: removed.kind(),
        })
    }

    // -------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------

    /// The node standing at `pos`.
    pub fn node_at(&self, pos: BlockPos) -> Option<&PlacedNode> {
        self.nodes.get(&pos)
    }

    /// Where `node` stands, if it is in the grid.
    pub fn position_of(&self, node: NodeId) -> Option<BlockPos> {
        self.positions.get(&node).copied()
    }

    /// Iterate over placed nodes in tick order.
    pub fn nodes(&self) -> impl Iterator<Item = (&BlockPos, &PlacedNode)> {
        self.nodes.iter()
    }

    /// Energy held by all generators.
    pub fn generator_storage(&self) -> EnergyValue {
        self.nodes
            .values()
            .filter_map(|node| match node {
                PlacedNode::Generator(generator) => Some(generator.stored()),
                _ => None,
            })
            .fold(EnergyValue::ZERO, EnergyValue::saturating_add)
    }

    /// Energy held by all accumulators.
    pub fn accumulator_storage(&self) -> EnergyValue {
        self.nodes
            .values()
            .filter_map(|node| match node {
                PlacedNode::Accumulator(accumulator) => Some(accumulator.stored()),
                _ => None,
            })
            .fold(EnergyValue::ZERO, EnergyValue::saturating_add)
    }

    // -------------------------------------------------------------------
    // Tick
    // -------------------------------------------------------------------

    /// Run one global tick.
    pub fn tick(&mut self) -> TickSummary {
        self.tick = self.tick.saturating_add(1);
        let mut summary = TickSummary {
            tick: self.tick,
            ..TickSummary::default()
        };

        for node in self.nodes.values() {
            node.latch();
        }

        for node in self.nodes.values() {
            if let PlacedNode::Generator(generator) = node {
                summary.generated = summary.generated.saturating_add(generator.generate());
            }
        }

        let order: Vec<PlacedNode> = self.nodes.values().cloned().collect();
        for node in order {
            let burned = match &node {
                PlacedNode::Generator(generator) => {
                    let report = generator.tick(&*self);
                    summary.offers_emitted =
                        summary.offers_emitted.saturating_add(report.offers_sent);
                    false
                }
                PlacedNode::Cable(cable) => cable.tick(&*self).is_some_and(|outcome| {
                    summary.add_conduit(outcome.report());
                    outcome.is_destroyed()
                }),
                PlacedNode::Accumulator(accumulator) => accumulator.tick().is_some_and(|outcome| {
                    summary.add_sink(outcome.report());
                    outcome.is_destroyed()
                }),
            };

            if burned {
                if let Ok(destroyed) = self.destroy(node.node_id()) {
                    summary.destroyed.push(destroyed);
                }
            }
        }

        summary.generator_storage = self.generator_storage();
        summary.accumulator_storage = self.accumulator_storage();
        debug!(
            tick = summary.tick,
            offers_emitted = summary.offers_emitted,
            forwarded = summary.forwarded,
            accepted = summary.accepted,
            banked = %summary.banked,
            destroyed = summary.destroyed.len(),
            "Tick complete"
        );
        summary
    }
}

impl NeighborResolver for GridWorld {
    fn neighbor(&self, node: NodeId, direction: Direction) -> Option<Arc<dyn GridNode>> {
        let pos = self.positions.get(&node)?.offset(direction)?;
        self.nodes.get(&pos).map(PlacedNode::as_grid_node)
    }
}
