//! Builds a [`GridWorld`] from configured placements.

use std::sync::Arc;

use gridcraft_types::EnergyValue;
use gridcraft_world::{Accumulator, Cable, Generator, GridWorld, WorldError};
use tracing::info;

use crate::config::{self, NodePlacement};

/// Place every configured node into a fresh world.
///
/// # Errors
///
/// Returns [`WorldError::PositionOccupied`] if two placements share a
/// position.
pub fn build_world(placements: &[NodePlacement]) -> Result<GridWorld, WorldError> {
    let mut world = GridWorld::new();
    for placement in placements {
        let pos = placement.pos();
        let id = match placement {
            NodePlacement::Generator {
                capacity,
                production,
                max_output,
                stored,
                directions,
                ..
            } => {
                let spec = config::generator_spec(*capacity, *production, *max_output, directions);
                let generator = Generator::new(spec).with_stored(EnergyValue::from_units(*stored));
                world.place(pos, Arc::new(generator))?
            }
            NodePlacement::Cable {
                resistance, level, ..
            } => world.place(
                pos,
                Arc::new(Cable::new(config::cable_spec(*resistance, *level))),
            )?,
            NodePlacement::Accumulator {
                capacity,
                level,
                input_faces,
                ..
            } => world.place(
                pos,
                Arc::new(Accumulator::new(config::accumulator_spec(
                    *capacity,
                    *level,
                    input_faces,
                ))),
            )?,
        };
        info!(node = %id, %pos, "Node placed");
    }
    Ok(world)
}
