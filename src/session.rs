//! The session aggregate: everything that survives a save.

use combat::spell::{self, SpellId};
use dungeon::{FlagSet, GridPosition};
use hero::{new_player, Actor, GOLD_CAP};
use save::SaveData;

/// 会话状态（存档的全部内容）
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub player: Actor,
    pub pos: GridPosition,
    pub gold: u32,
    pub keys: u32,
    pub flags: FlagSet,
    /// Steps taken since the last random encounter.
    pub encounters: u32,
    /// Ticks played outside the title screen.
    pub frames: u64,
}

impl Session {
    /// A fresh game standing on `start`.
    pub fn new_game(start: GridPosition) -> Self {
        Self {
            player: new_player(),
            pos: start,
            gold: 0,
            keys: 0,
            flags: FlagSet::new(),
            encounters: 0,
            frames: 0,
        }
    }

    /// Adds gold up to the cap. Returns the amount actually added.
    pub fn add_gold(&mut self, amount: u32) -> u32 {
        let before = self.gold;
        self.gold = self.gold.saturating_add(amount).min(GOLD_CAP);
        self.gold - before
    }

    pub fn go_start_location(&mut self, start: GridPosition) {
        self.pos = start;
    }

    /// Halves gold (rounding down), wakes the player at `start` with 1 HP.
    pub fn apply_defeat_penalty(&mut self, start: GridPosition) {
        self.gold /= 2;
        self.player.hp = 1;
        self.go_start_location(start);
    }

    pub fn available_spells(&self, in_battle: bool) -> Vec<SpellId> {
        spell::available(&self.flags, in_battle)
    }

    /// Play time as (minutes, seconds).
    pub fn elapsed(&self, fps: u32) -> (u64, u64) {
        let seconds = self.frames / u64::from(fps.max(1));
        (seconds / 60, seconds % 60)
    }

    pub fn to_save(&self) -> SaveData {
        let p = &self.player;
        SaveData {
            x: self.pos.x,
            y: self.pos.y,
            z: self.pos.floor,
            gold: self.gold,
            keys: self.keys,
            flags: self.flags.clone(),
            enc: self.encounters,
            frames: self.frames,
            name: p.name.clone(),
            hp: p.hp,
            mhp: p.max_hp,
            mp: p.mp,
            mmp: p.max_mp,
            atk: p.attack,
            spd: p.speed,
        }
    }

    pub fn from_save(data: SaveData) -> Self {
        let mut player = Actor::player(data.name, data.mhp, data.mmp, data.atk, data.spd);
        player.hp = data.hp;
        player.mp = data.mp;
        Self {
            player,
            pos: GridPosition::new(data.x, data.y, data.z),
            gold: data.gold,
            keys: data.keys,
            flags: data.flags,
            encounters: data.enc,
            frames: data.frames,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: GridPosition = GridPosition::new(8, 21, 0);

    #[test]
    fn gold_is_capped() {
        let mut session = Session::new_game(START);
        assert_eq!(session.add_gold(9000), 9000);
        assert_eq!(session.add_gold(u32::MAX), 999);
        assert_eq!(session.gold, GOLD_CAP);
    }

    #[test]
    fn defeat_penalty() {
        let mut session = Session::new_game(START);
        session.gold = 101;
        session.player.hp = 0;
        session.pos = GridPosition::new(3, 3, 2);
        session.apply_defeat_penalty(START);
        assert_eq!(session.gold, 50);
        assert_eq!(session.player.hp, 1);
        assert_eq!(session.pos, START);
    }

    #[test]
    fn elapsed_splits_minutes() {
        let mut session = Session::new_game(START);
        session.frames = 30 * 125;
        assert_eq!(session.elapsed(30), (2, 5));
    }

    #[test]
    fn save_round_trip_keeps_everything() {
        let mut session = Session::new_game(START);
        session.player.hp = 7;
        session.player.mp = 1;
        session.player.attack = 20;
        session.gold = 4321;
        session.keys = 3;
        session.flags.insert("1-7");
        session.flags.insert("sp1");
        session.encounters = 11;
        session.frames = 99;
        session.pos = GridPosition::new(24, 10, 1);
        assert_eq!(Session::from_save(session.to_save()), session);
    }
}
