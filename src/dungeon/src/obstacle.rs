// src/dungeon/src/obstacle.rs
use std::collections::BTreeMap;

use strum::Display;

use crate::{FlagSet, GridPosition};

/// 障碍物类型
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display)]
pub enum ObstacleKind {
    Door,
    Chest,
    Npc,
}

/// A triggerable thing placed on a floor.
///
/// `value` is the gold inside a chest, or 0 for a chest holding a key.
/// Doors and NPCs ignore it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Obstacle {
    pub id: &'static str,
    pub pos: GridPosition,
    pub kind: ObstacleKind,
    pub value: u32,
}

impl Obstacle {
    const fn new(id: &'static str, x: i32, y: i32, floor: i32, kind: ObstacleKind, value: u32) -> Self {
        Self {
            id,
            pos: GridPosition::new(x, y, floor),
            kind,
            value,
        }
    }

    pub fn holds_key(&self) -> bool {
        self.kind == ObstacleKind::Chest && self.value == 0
    }
}

use ObstacleKind::{Chest, Door, Npc};

const OBSTACLES: &[Obstacle] = &[
    Obstacle::new("0-1", 8, 19, 0, Npc, 0),
    Obstacle::new("0-2", 3, 19, 0, Npc, 0),
    Obstacle::new("0-3", 8, 28, 0, Npc, 0),
    Obstacle::new("0-4", 12, 19, 0, Npc, 0),
    Obstacle::new("0-5", 12, 28, 0, Npc, 0),
    Obstacle::new("0-6", 11, 16, 0, Chest, 0),
    Obstacle::new("0-7", 11, 17, 0, Chest, 100),
    Obstacle::new("0-8", 4, 25, 0, Door, 0),
    Obstacle::new("0-9", 5, 27, 0, Npc, 0),
    Obstacle::new("1-1", 4, 6, 1, Door, 0),
    Obstacle::new("1-2", 27, 3, 1, Npc, 0),
    Obstacle::new("1-3", 7, 21, 1, Chest, 50),
    Obstacle::new("1-4", 8, 12, 1, Chest, 6),
    Obstacle::new("1-5", 12, 12, 1, Chest, 110),
    Obstacle::new("1-6", 16, 24, 1, Chest, 80),
    Obstacle::new("1-7", 24, 10, 1, Chest, 0),
    Obstacle::new("1-8", 13, 8, 1, Door, 0),
    Obstacle::new("1-9", 8, 7, 1, Chest, 100),
    Obstacle::new("1-10", 11, 7, 1, Chest, 100),
    Obstacle::new("1-11", 8, 9, 1, Chest, 100),
    Obstacle::new("1-12", 11, 9, 1, Chest, 100),
    Obstacle::new("2-1", 17, 10, 2, Chest, 170),
    Obstacle::new("2-2", 17, 20, 2, Chest, 73),
    Obstacle::new("2-3", 21, 10, 2, Chest, 25),
    Obstacle::new("2-4", 21, 20, 2, Chest, 256),
    Obstacle::new("2-5", 21, 4, 2, Npc, 0),
    Obstacle::new("2-6", 28, 28, 2, Chest, 0),
    Obstacle::new("2-7", 23, 4, 2, Door, 0),
    Obstacle::new("3-1", 6, 22, 3, Npc, 0),
    Obstacle::new("3-2", 4, 6, 3, Door, 0),
    Obstacle::new("3-3", 24, 12, 3, Chest, 0),
    Obstacle::new("3-4", 25, 12, 3, Chest, 1000),
    Obstacle::new("3-5", 4, 10, 3, Door, 0),
    Obstacle::new("4-1", 16, 11, 4, Chest, 0),
    Obstacle::new("4-2", 18, 25, 4, Chest, 0),
    Obstacle::new("4-3", 4, 27, 4, Npc, 0),
];

const TALKS: &[(&str, &[&str])] = &[
    ("0-1", &["Seek the treasure", "sleeping on B5"]),
    ("0-2", &["Drink from the fountain", "to restore HP and MP"]),
    ("0-4", &["Press X or Esc to", "open the menu"]),
    ("0-5", &["You need a key", "to open a door"]),
    ("0-9", &["Monsters lurk", "beyond this point"]),
    ("1-2", &["I have nothing more", "to teach you"]),
    ("2-5", &["I give up!"]),
    ("3-1", &["Curses!"]),
];

/// 世界注册表：障碍物与对话
#[derive(Clone, Debug)]
pub struct Registry {
    obstacles: Vec<Obstacle>,
    talks: BTreeMap<&'static str, Vec<String>>,
}

impl Registry {
    /// The stock catalog shipped with the game.
    pub fn standard() -> Self {
        Self::from_parts(
            OBSTACLES.to_vec(),
            TALKS
                .iter()
                .map(|(id, lines)| (*id, lines.iter().map(|l| l.to_string()).collect())),
        )
    }

    pub fn from_parts(
        obstacles: Vec<Obstacle>,
        talks: impl IntoIterator<Item = (&'static str, Vec<String>)>,
    ) -> Self {
        Self {
            obstacles,
            talks: talks.into_iter().collect(),
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// The unresolved obstacle standing on `pos`, if any.
    pub fn obstacle_at(&self, pos: GridPosition, flags: &FlagSet) -> Option<&Obstacle> {
        self.obstacles
            .iter()
            .find(|o| o.pos == pos && !flags.contains(o.id))
    }

    /// Unresolved obstacles on one floor, for drawing.
    pub fn visible_on(&self, floor: i32, flags: &FlagSet) -> impl Iterator<Item = &Obstacle> {
        self.obstacles
            .iter()
            .filter(move |o| o.pos.floor == floor && !flags.contains(o.id))
    }

    pub fn talk(&self, id: &str) -> Option<&[String]> {
        self.talks.get(id).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_floor_scoped() {
        let registry = Registry::standard();
        let mut seen = std::collections::HashSet::new();
        for o in registry.obstacles() {
            assert!(seen.insert(o.id), "duplicate id {}", o.id);
            let floor: i32 = o.id.split('-').next().unwrap().parse().unwrap();
            assert_eq!(floor, o.pos.floor);
        }
        assert_eq!(seen.len(), 35);
    }

    #[test]
    fn resolved_obstacles_are_skipped() {
        let registry = Registry::standard();
        let pos = GridPosition::new(11, 16, 0);
        let mut flags = FlagSet::new();
        assert_eq!(registry.obstacle_at(pos, &flags).map(|o| o.id), Some("0-6"));
        flags.insert("0-6");
        assert!(registry.obstacle_at(pos, &flags).is_none());
    }

    #[test]
    fn key_chests_have_zero_value() {
        let registry = Registry::standard();
        let by_id = |id: &str| registry.obstacles().iter().find(|o| o.id == id).unwrap();
        assert!(by_id("1-7").holds_key());
        assert!(!by_id("0-7").holds_key());
        assert!(!by_id("0-8").holds_key());
    }

    #[test]
    fn talk_lookup() {
        let registry = Registry::standard();
        assert_eq!(registry.talk("2-5").unwrap(), ["I give up!".to_string()]);
        assert!(registry.talk("0-3").is_none());
        assert_eq!(registry.visible_on(4, &FlagSet::new()).count(), 3);
    }
}
