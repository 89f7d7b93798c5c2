//! Spatial lookup supplied by the host.
//!
//! The propagation engine has no idea how nodes are laid out. It only asks
//! "what is on the `direction` side of `node`?" and then tests the answer for
//! the capability it needs.

use std::sync::Arc;

use gridcraft_types::{Direction, NodeId};

use crate::capability::GridNode;

/// Resolves the neighbor of a node in a given direction.
pub trait NeighborResolver {
    /// The node adjacent to `node` on its `direction` face, if any.
    fn neighbor(&self, node: NodeId, direction: Direction) -> Option<Arc<dyn GridNode>>;
}

impl<F> NeighborResolver for F
where
    F: Fn(NodeId, Direction) -> Option<Arc<dyn GridNode>>,
{
    fn neighbor(&self, node: NodeId, direction: Direction) -> Option<Arc<dyn GridNode>> {
        self(node, direction)
    }
}
