//! The six axis directions of the grid.

use serde::{Deserialize, Serialize};

/// One of the six faces of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Positive Y.
    Up,
    /// Negative Y.
    Down,
    /// Negative Z.
    North,
    /// Positive Z.
    South,
    /// Positive X.
    East,
    /// Negative X.
    West,
}

impl Direction {
    /// All six directions, in the default conduit fan-out order.
    pub const ALL: [Self; 6] = [
        Self::Up,
        Self::Down,
        Self::North,
        Self::South,
        Self::East,
        Self::West,
    ];

    /// The face pointing the other way.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    /// Unit step `(dx, dy, dz)` for this direction.
    pub const fn offset(self) -> (i32, i32, i32) {
        match self {
            Self::Up => (0, 1, 0),
            Self::Down => (0, -1, 0),
            Self::North => (0, 0, -1),
            Self::South => (0, 0, 1),
            Self::East => (1, 0, 0),
            Self::West => (-1, 0, 0),
        }
    }
}

impl core::fmt::Display for Direction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_an_involution() {
        for direction in Direction::ALL {
            assert_ne!(direction, direction.opposite());
            assert_eq!(direction, direction.opposite().opposite());
        }
    }

    #[test]
    fn opposite_offsets_cancel() {
        for direction in Direction::ALL {
            let (x, y, z) = direction.offset();
            let (ox, oy, oz) = direction.opposite().offset();
            assert_eq!((x.saturating_add(ox), y.saturating_add(oy), z.saturating_add(oz)), (0, 0, 0));
        }
    }

    #[test]
    fn deserializes_snake_case() {
        let parsed: Option<Direction> = serde_json::from_str("\"north\"").ok();
        assert_eq!(parsed, Some(Direction::North));
    }
}
