// src/dungeon/src/tiles.rs
use serde::{Deserialize, Serialize};

use crate::GridPosition;

/// 地形类型枚举
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerrainKind {
    /// 普通地板
    Floor,
    /// 墙壁
    Wall,
    /// 回复泉水
    Fountain,
    /// 楼梯(上下层)
    Stairs(StairDirection),
}

impl TerrainKind {
    /// Whether the player steps onto this cell instead of triggering it.
    pub fn is_walkable(self) -> bool {
        matches!(self, TerrainKind::Floor | TerrainKind::Stairs(_))
    }
}

/// 楼梯方向
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StairDirection {
    /// 上楼 (`<`)
    Up,
    /// 下楼 (`>`)
    Down,
}

impl StairDirection {
    /// Floor index change on arrival.
    pub fn floor_delta(self) -> i32 {
        match self {
            StairDirection::Up => -1,
            StairDirection::Down => 1,
        }
    }
}

/// Answers "what terrain occupies this cell?".
pub trait TerrainMap {
    fn query_cell(&self, pos: GridPosition) -> TerrainKind;
}

/// One rectangular grid per floor. Anything outside the grid reads as wall.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FloorMap {
    width: i32,
    height: i32,
    floors: Vec<Vec<TerrainKind>>,
}

impl FloorMap {
    /// `floors` walled-in rooms of the given size.
    pub fn walled(width: i32, height: i32, floors: usize) -> Self {
        let mut cells = Vec::with_capacity((width * height).max(0) as usize);
        for y in 0..height {
            for x in 0..width {
                let border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
                cells.push(if border {
                    TerrainKind::Wall
                } else {
                    TerrainKind::Floor
                });
            }
        }
        Self {
            width,
            height,
            floors: vec![cells; floors],
        }
    }

    fn index(&self, pos: GridPosition) -> Option<(usize, usize)> {
        let in_bounds = pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height;
        let floor = usize::try_from(pos.floor).ok()?;
        if !in_bounds || floor >= self.floors.len() {
            return None;
        }
        Some((floor, (pos.y * self.width + pos.x) as usize))
    }

    /// Overwrites one cell. Out-of-range positions are ignored.
    pub fn set(&mut self, pos: GridPosition, kind: TerrainKind) {
        if let Some((floor, idx)) = self.index(pos) {
            self.floors[floor][idx] = kind;
        }
    }

    /// Builder form of [`FloorMap::set`].
    pub fn with(mut self, pos: GridPosition, kind: TerrainKind) -> Self {
        self.set(pos, kind);
        self
    }

    /// Horizontal wall on `floor` from `x1` to `x2` inclusive.
    pub fn with_hwall(mut self, floor: i32, y: i32, x1: i32, x2: i32) -> Self {
        for x in x1..=x2 {
            self.set(GridPosition::new(x, y, floor), TerrainKind::Wall);
        }
        self
    }

    /// Vertical wall on `floor` from `y1` to `y2` inclusive.
    pub fn with_vwall(mut self, floor: i32, x: i32, y1: i32, y2: i32) -> Self {
        for y in y1..=y2 {
            self.set(GridPosition::new(x, y, floor), TerrainKind::Wall);
        }
        self
    }
}

impl TerrainMap for FloorMap {
    fn query_cell(&self, pos: GridPosition) -> TerrainKind {
        self.index(pos)
            .map_or(TerrainKind::Wall, |(floor, idx)| self.floors[floor][idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walled_room_has_border() {
        let map = FloorMap::walled(5, 4, 1);
        assert_eq!(map.query_cell(GridPosition::new(0, 2, 0)), TerrainKind::Wall);
        assert_eq!(map.query_cell(GridPosition::new(2, 2, 0)), TerrainKind::Floor);
        assert_eq!(map.query_cell(GridPosition::new(4, 3, 0)), TerrainKind::Wall);
    }

    #[test]
    fn outside_the_grid_is_wall() {
        let map = FloorMap::walled(5, 5, 2);
        assert_eq!(map.query_cell(GridPosition::new(-1, 2, 0)), TerrainKind::Wall);
        assert_eq!(map.query_cell(GridPosition::new(2, 2, 2)), TerrainKind::Wall);
        assert_eq!(map.query_cell(GridPosition::new(2, 2, -1)), TerrainKind::Wall);
    }

    #[test]
    fn set_and_walls() {
        let map = FloorMap::walled(8, 8, 1)
            .with(GridPosition::new(3, 3, 0), TerrainKind::Fountain)
            .with_hwall(0, 5, 1, 6);
        assert_eq!(map.query_cell(GridPosition::new(3, 3, 0)), TerrainKind::Fountain);
        assert_eq!(map.query_cell(GridPosition::new(4, 5, 0)), TerrainKind::Wall);
        assert!(!map.query_cell(GridPosition::new(4, 5, 0)).is_walkable());
        assert!(TerrainKind::Stairs(StairDirection::Down).is_walkable());
    }
}
