// src/hero/src/lib.rs
//! Actor model shared by the player and monsters, the town shop, and the
//! dice every random rule rolls against.

mod actor;
pub mod rng;
pub mod shop;

pub use self::{
    actor::{Actor, Role},
    rng::{Dice, GameRng, ScriptedDice},
    shop::Upgrade,
};

/// Most gold a session can hold.
pub const GOLD_CAP: u32 = 9999;

/// Name given to a new player.
pub const PLAYER_NAME: &str = "Hero";

/// The player as created by "new game".
pub fn new_player() -> Actor {
    Actor::player(PLAYER_NAME, 30, 6, 12, 12)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_player_starts_full() {
        let p = new_player();
        assert!(p.is_player());
        assert_eq!((p.hp, p.max_hp, p.mp, p.max_mp), (30, 30, 6, 6));
        assert_eq!((p.attack, p.speed), (12, 12));
    }
}
