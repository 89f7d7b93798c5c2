//! The per-node tick algorithm.
//!
//! Two entry points, one per active role:
//!
//! - [`tick_source`] pushes a fresh offer into every accepting neighbor on
//!   the source's supplying faces.
//! - [`tick_conduit`] drains the conduit's buffer, keeps one claim per
//!   source, tests each for overload, decays the survivors by the conduit's
//!   resistance and fans them out to accepting neighbors.
//!
//! Both run to completion synchronously. Forwarded offers land in neighbor
//! buffers and are only looked at on the neighbor's next tick, so energy
//! crossing N conduits takes N ticks.
//!
//! # Conduit state machine
//!
//! ```text
//! Buffering ──tick──▶ Processing ──▶ Buffering
//!                         │
//!                         └─overload accepted──▶ Destroyed
//! ```
//!
//! Offers are handled one at a time to completion, so the result does not
//! depend on iteration order, except for which offers are left unprocessed
//! once an overload destroys the conduit.

use std::sync::Arc;

use gridcraft_types::{Direction, EnergyLevel, EnergyValue, NodeId};
use tracing::{debug, info, warn};

use crate::buffer::coalesce;
use crate::capability::{EnergyConduit, EnergySource};
use crate::offer::EnergyOffer;
use crate::resolver::NeighborResolver;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Where a conduit is in its tick cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ConduitPhase {
    /// Collecting offers for the next tick.
    #[default]
    Buffering,
    /// Working through the offers drained this tick.
    Processing,
    /// Overloaded and removed from the grid. Terminal.
    Destroyed,
}

/// What a source tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceReport {
    /// Offers delivered, one per accepting neighbor.
    pub offers_sent: usize,
}

/// Counters for one conduit tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConduitReport {
    /// Distinct offers left after coalescing the drained buffer.
    pub drained: usize,
    /// Offers that survived decay and were fanned out.
    pub forwarded: usize,
    /// Neighbor buffers that received a forked offer.
    pub deliveries: usize,
    /// Offers whose remaining energy decayed to nothing.
    pub dissipated: usize,
    /// Offers discarded because their source was removed.
    pub dead_sources: usize,
    /// Overloading offers whose source could not honor the accept.
    pub refused_overloads: usize,
}

/// An accepted overload: the conduit must be destroyed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overload {
    /// Source of the offer that blew the conduit.
    pub source: NodeId,
    /// Energy the offer still carried when it arrived.
    pub remaining: EnergyValue,
    /// Energy debited from the source by the accept.
    pub original: EnergyValue,
    /// Capacity band that was exceeded.
    pub level: EnergyLevel,
    /// Offers still queued this tick that were dropped unprocessed.
    pub dropped: usize,
    /// Counters for offers handled before the overload.
    pub report: ConduitReport,
}

/// Result of a conduit tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConduitOutcome {
    /// All drained offers were handled; the conduit is buffering again.
    Processed(ConduitReport),
    /// An overload was accepted; the host must destroy the conduit.
    Destroyed(Overload),
}

impl ConduitOutcome {
    /// Phase the conduit is left in.
    pub const fn phase(&self) -> ConduitPhase {
        match self {
            Self::Processed(_) => ConduitPhase::Buffering,
            Self::Destroyed(_) => ConduitPhase::Destroyed,
        }
    }

    /// Whether the conduit was destroyed this tick.
    pub const fn is_destroyed(&self) -> bool {
        matches!(self, Self::Destroyed(_))
    }

    /// Counters for the offers that were handled.
    pub const fn report(&self) -> &ConduitReport {
        match self {
            Self::Processed(report) => report,
            Self::Destroyed(overload) => &overload.report,
        }
    }
}

// ---------------------------------------------------------------------------
// Source tick
// ---------------------------------------------------------------------------

/// Offer the source's energy to every accepting neighbor.
///
/// Each accepting neighbor gets its own full-value offer. Nothing is debited
/// here: several neighbors may see the same nominal capacity in one tick,
/// and only accepts that the source can honor will succeed.
pub fn tick_source<R>(source: &Arc<dyn EnergySource>, resolver: &R) -> SourceReport
where
    R: NeighborResolver + ?Sized,
{
    let mut report = SourceReport::default();
    if source.is_removed() {
        return report;
    }

    let node = source.source_id();
    for direction in source.supplying_directions() {
        if deliver(resolver, node, direction, || EnergyOffer::from_source(source)) {
            report.offers_sent = report.offers_sent.saturating_add(1);
        }
    }

    debug!(%node, offers_sent = report.offers_sent, "Source tick");
    report
}

// ---------------------------------------------------------------------------
// Conduit tick
// ---------------------------------------------------------------------------

/// Process everything the conduit buffered since its last tick.
///
/// `fan_out` is the sequence of directions forked offers are pushed into;
/// pass [`Direction::ALL`] for the usual six-way fan-out.
///
/// When an overloading offer is accepted the function stops immediately and
/// returns [`ConduitOutcome::Destroyed`]; remaining offers are dropped and
/// nothing further is forwarded. The caller owns the grid and performs the
/// actual removal.
pub fn tick_conduit<R>(
    conduit: &dyn EnergyConduit,
    node: NodeId,
    resolver: &R,
    fan_out: &[Direction],
) -> ConduitOutcome
where
    R: NeighborResolver + ?Sized,
{
    let offers = coalesce(conduit.retrieve_upcoming_offers());
    let level = conduit.energy_level();
    let resistance = conduit.resistance();

    let total = offers.len();
    let mut report = ConduitReport {
        drained: total,
        ..ConduitReport::default()
    };

    for (index, offer) in offers.into_iter().enumerate() {
        if !offer.is_source_alive() {
            debug!(%node, source = %offer.source_id(), "Dropping offer from removed source");
            report.dead_sources = report.dead_sources.saturating_add(1);
            continue;
        }

        if level.is_overloaded_by(offer.remaining()) {
            if offer.accept() {
                let dropped = total.saturating_sub(index).saturating_sub(1);
                info!(
                    %node,
                    source = %offer.source_id(),
                    remaining = %offer.remaining(),
                    original = %offer.original(),
                    %level,
                    dropped,
                    "Conduit overloaded"
                );
                return ConduitOutcome::Destroyed(Overload {
                    source: offer.source_id(),
                    remaining: offer.remaining(),
                    original: offer.original(),
                    level,
                    dropped,
                    report,
                });
            }
            warn!(
                %node,
                source = %offer.source_id(),
                remaining = %offer.remaining(),
                "Overloading offer could not be honored by its source"
            );
            report.refused_overloads = report.refused_overloads.saturating_add(1);
        }

        let Some(forked) = offer.fork(resistance) else {
            debug!(%node, source = %offer.source_id(), "Offer dissipated");
            report.dissipated = report.dissipated.saturating_add(1);
            continue;
        };

        report.forwarded = report.forwarded.saturating_add(1);
        for &direction in fan_out {
            if deliver(resolver, node, direction, || forked.clone()) {
                report.deliveries = report.deliveries.saturating_add(1);
            }
        }
    }

    report_conduit(node, &report);
    ConduitOutcome::Processed(report)
}

fn report_conduit(node: NodeId, report: &ConduitReport) {
    if report.drained > 0 {
        debug!(
            %node,
            drained = report.drained,
            forwarded = report.forwarded,
            deliveries = report.deliveries,
            dissipated = report.dissipated,
            dead_sources = report.dead_sources,
            "Conduit tick"
        );
    }
}

/// Hand an offer to the neighbor on `direction` if it is a sink that accepts
/// from the facing side. The offer is only built once delivery is certain.
fn deliver<R, F>(resolver: &R, node: NodeId, direction: Direction, offer: F) -> bool
where
    R: NeighborResolver + ?Sized,
    F: FnOnce() -> EnergyOffer,
{
    let Some(neighbor) = resolver.neighbor(node, direction) else {
        return false;
    };
    let Some(sink) = neighbor.as_sink() else {
        return false;
    };
    if !sink.is_consume_from(direction.opposite()) {
        return false;
    }
    sink.receive_offer(offer());
    true
}
