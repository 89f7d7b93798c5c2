//! Paced tick loop.
//!
//! [`run`] ticks a [`GridWorld`] until `max_ticks` have run, sleeping
//! `tick_interval_ms` between ticks, and logs each [`TickSummary`].

use std::time::Duration;

use gridcraft_world::{GridWorld, TickSummary};
use tracing::{info, warn};

use crate::config::SimulationBounds;

/// Outcome of a run.
#[derive(Debug, Default)]
pub struct RunResult {
    /// Number of ticks executed.
    pub total_ticks: u64,
    /// Summary of the last tick, if any ran.
    pub final_summary: Option<TickSummary>,
    /// Nodes destroyed by overloads over the whole run.
    pub destroyed: usize,
}

/// Run the world for the configured number of ticks.
pub async fn run(world: &mut GridWorld, bounds: &SimulationBounds) -> RunResult {
    let mut result = RunResult::default();

    info!(
        max_ticks = bounds.max_ticks,
        tick_interval_ms = bounds.tick_interval_ms,
        nodes = world.len(),
        "Simulation starting"
    );

    while result.total_ticks < bounds.max_ticks {
        let summary = world.tick();
        result.total_ticks = result.total_ticks.saturating_add(1);
        result.destroyed = result.destroyed.saturating_add(summary.destroyed.len());

        info!(
            tick = summary.tick,
            offers_emitted = summary.offers_emitted,
            forwarded = summary.forwarded,
            accepted = summary.accepted,
            banked = %summary.banked,
            generator_storage = %summary.generator_storage,
            accumulator_storage = %summary.accumulator_storage,
            "Tick"
        );
        for node in &summary.destroyed {
            warn!(tick = summary.tick, node = %node.id, pos = %node.pos, kind = ?node.kind, "Node burned out");
        }
        result.final_summary = Some(summary);

        if bounds.tick_interval_ms > 0 && result.total_ticks < bounds.max_ticks {
            tokio::time::sleep(Duration::from_millis(bounds.tick_interval_ms)).await;
        }
    }

    result
}

/// Log how the run ended.
pub fn log_run_end(result: &RunResult) {
    info!(
        total_ticks = result.total_ticks,
        destroyed = result.destroyed,
        "Simulation ended"
    );

    if let Some(ref summary) = result.final_summary {
        match serde_json::to_string(summary) {
            Ok(json) => info!(summary = %json, "Final tick summary"),
            Err(e) => warn!(error = %e, "failed to serialize final tick summary"),
        }
    } else {
        warn!("Simulation ended with no ticks executed");
    }
}
