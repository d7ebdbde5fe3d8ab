//! Tile coordinates on the unbounded world grid.
//!
//! Every piece of per-tile state is keyed by [`TileCoord`]. Continuous
//! world-space positions coming from a host are converted with
//! [`TileCoord::from_world`], which applies the pick offset exactly once.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Offset added after flooring a world-space position to get the tile a
/// click refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickOffset {
    pub dx: i32,
    pub dy: i32,
}

impl PickOffset {
    pub const fn new(dx: i32, dy: i32) -> Self {
        PickOffset { dx, dy }
    }
}

impl Default for PickOffset {
    fn default() -> Self {
        PickOffset::new(-1, -1)
    }
}

/// Integer tile coordinate. No bounds: any `i32` pair is a valid tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        TileCoord { x, y }
    }

    /// Convert a continuous world-space position into the tile it picks.
    pub fn from_world(world_x: f64, world_y: f64, offset: PickOffset) -> Self {
        TileCoord {
            x: (world_x.floor() as i32).wrapping_add(offset.dx),
            y: (world_y.floor() as i32).wrapping_add(offset.dy),
        }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        TileCoord {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
        }
    }

    /// The four orthogonal neighbours (right, left, down, up). No diagonals.
    pub fn neighbors4(&self) -> [TileCoord; 4] {
        [
            self.offset(1, 0),
            self.offset(-1, 0),
            self.offset(0, 1),
            self.offset(0, -1),
        ]
    }

    /// Manhattan distance to another coordinate
    pub fn distance_to(&self, other: &TileCoord) -> u64 {
        let dx = (self.x as i64 - other.x as i64).unsigned_abs();
        let dy = (self.y as i64 - other.y as i64).unsigned_abs();
        dx + dy
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
