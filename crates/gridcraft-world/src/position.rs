//! Integer grid coordinates.

use serde::{Deserialize, Serialize};

use gridcraft_types::Direction;

/// A cell in the three-dimensional grid.
///
/// Ordered by `x`, then `y`, then `z`; the world ticks nodes in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    /// East-west coordinate (east is positive).
    pub x: i32,
    /// Vertical coordinate (up is positive).
    pub y: i32,
    /// North-south coordinate (south is positive).
    pub z: i32,
}

impl BlockPos {
    /// Create a position.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The adjacent cell on the `direction` side, or `None` at the edge of
    /// the coordinate range.
    pub const fn offset(self, direction: Direction) -> Option<Self> {
        let (dx, dy, dz) = direction.offset();
        let Some(x) = self.x.checked_add(dx) else {
            return None;
        };
        let Some(y) = self.y.checked_add(dy) else {
            return None;
        };
        let Some(z) = self.z.checked_add(dz) else {
            return None;
        };
        Some(Self { x, y, z })
    }
}

impl core::fmt::Display for BlockPos {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_moves_one_cell() {
        let origin = BlockPos::new(0, 0, 0);
        assert_eq!(origin.offset(Direction::Up), Some(BlockPos::new(0, 1, 0)));
        assert_eq!(origin.offset(Direction::North), Some(BlockPos::new(0, 0, -1)));
        assert_eq!(origin.offset(Direction::East), Some(BlockPos::new(1, 0, 0)));
    }

    #[test]
    fn offset_and_back_is_identity() {
        let start = BlockPos::new(3, -7, 12);
        for direction in Direction::ALL {
            let back = start
                .offset(direction)
                .and_then(|next| next.offset(direction.opposite()));
            assert_eq!(back, Some(start));
        }
    }

    #[test]
    fn offset_at_edge_is_none() {
        let edge = BlockPos::new(i32::MAX, 0, 0);
        assert_eq!(edge.offset(Direction::East), None);
        assert!(edge.offset(Direction::West).is_some());
    }
}
