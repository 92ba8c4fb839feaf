// src/dungeon/src/lib.rs
//! Static world data: floors, terrain queries, obstacles and dialog.
//!
//! Nothing in here is mutated during play. Resolved obstacles are tracked
//! by the session's [`FlagSet`], never by editing the catalog.

use serde::{Deserialize, Serialize};

pub mod flags;
pub mod layout;
pub mod obstacle;
pub mod tiles;

pub use crate::flags::FlagSet;
pub use crate::obstacle::{Obstacle, ObstacleKind, Registry};
pub use crate::tiles::{FloorMap, StairDirection, TerrainKind, TerrainMap};

/// A cell on one floor. Floor 0 is the town, deeper floors count upwards.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
    pub floor: i32,
}

impl GridPosition {
    pub const fn new(x: i32, y: i32, floor: i32) -> Self {
        Self { x, y, floor }
    }

    /// The neighbouring cell one step in `dir` on the same floor.
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
            floor: self.floor,
        }
    }

    /// Checkerboard parity used by the walking regen rule.
    pub fn is_even_cell(self) -> bool {
        (self.x + self.y).rem_euclid(2) == 0
    }
}

/// 移动方向
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}
