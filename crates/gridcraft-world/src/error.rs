//! Error types for the `gridcraft-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`].

use gridcraft_types::{EnergyError, NodeId};

use crate::position::BlockPos;

/// Errors that can occur while editing the grid or reading item charge.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// Another node already occupies the position.
    #[error("position {0} is already occupied")]
    PositionOccupied(BlockPos),

    /// No node sits at the position.
    #[error("no node at position {0}")]
    EmptyPosition(BlockPos),

    /// The node is not (or no longer) part of the grid.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// A stored charge value could not be read back.
    #[error("stored charge is corrupt: {source}")]
    CorruptCharge {
        /// The underlying parse failure.
        #[from]
        source: EnergyError,
    },
}
