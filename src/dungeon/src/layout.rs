//! A small hand-authored five-floor dungeon.
//!
//! Each floor's down stairs sits on the same cell as the next floor's up
//! stairs, so arriving by stairs always lands on the matching staircase.

use crate::tiles::{FloorMap, StairDirection, TerrainKind};
use crate::GridPosition;

pub const FLOOR_WIDTH: i32 = 32;
pub const FLOOR_HEIGHT: i32 = 32;
pub const FLOOR_COUNT: usize = 5;

/// Down-stairs cell for each floor except the deepest.
const STAIRS: [(i32, i32); FLOOR_COUNT - 1] = [(2, 30), (28, 2), (2, 2), (28, 30)];

pub fn default_floors() -> FloorMap {
    let mut map = FloorMap::walled(FLOOR_WIDTH, FLOOR_HEIGHT, FLOOR_COUNT)
        // town: the south wing is only reachable through door 0-8
        .with_hwall(0, 25, 1, 3)
        .with_hwall(0, 25, 5, 30)
        .with(GridPosition::new(6, 16, 0), TerrainKind::Fountain)
        // floor 1: treasure room behind door 1-8
        .with_hwall(1, 6, 6, 13)
        .with_hwall(1, 10, 6, 13)
        .with_vwall(1, 6, 6, 10)
        .with_vwall(1, 13, 6, 10)
        .with(GridPosition::new(13, 8, 1), TerrainKind::Floor)
        .with(GridPosition::new(16, 16, 2), TerrainKind::Fountain)
        // floor 3: corridor to the west door
        .with_vwall(3, 6, 1, 30)
        .with(GridPosition::new(6, 21, 3), TerrainKind::Floor)
        .with(GridPosition::new(6, 22, 3), TerrainKind::Floor)
        .with(GridPosition::new(26, 26, 3), TerrainKind::Fountain)
        .with(GridPosition::new(20, 20, 4), TerrainKind::Fountain);

    for (floor, &(x, y)) in STAIRS.iter().enumerate() {
        let floor = floor as i32;
        map.set(
            GridPosition::new(x, y, floor),
            TerrainKind::Stairs(StairDirection::Down),
        );
        map.set(
            GridPosition::new(x, y, floor + 1),
            TerrainKind::Stairs(StairDirection::Up),
        );
    }
    map
}
