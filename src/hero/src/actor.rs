// src/hero/src/actor.rs
use serde::{Deserialize, Serialize};

/// What an actor can do beyond the shared combat record.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Casts from the menu and the spell list, grows through the shop.
    Player,
    /// Acts through the monster turn policy. `portrait` picks its picture.
    Monster { portrait: u8 },
}

/// 战斗角色（玩家与怪物共用）
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    pub max_hp: u32,
    pub hp: u32,
    pub max_mp: u32,
    pub mp: u32,
    pub attack: u32,
    pub speed: u32,
    /// Immune to FIRE.
    pub resist: bool,
    /// Gold paid out when defeated.
    pub reward_gold: u32,
    pub role: Role,
}

impl Actor {
    /// Fresh player at full HP/MP.
    pub fn player(name: impl Into<String>, max_hp: u32, max_mp: u32, attack: u32, speed: u32) -> Self {
        Self {
            name: name.into(),
            max_hp,
            hp: max_hp,
            max_mp,
            mp: max_mp,
            attack,
            speed,
            resist: false,
            reward_gold: 0,
            role: Role::Player,
        }
    }

    pub fn is_player(&self) -> bool {
        self.role == Role::Player
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Applies damage, flooring HP at zero. Returns the HP actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.hp);
        self.hp -= lost;
        lost
    }

    /// Restores HP up to the maximum. Returns the HP actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max_hp.saturating_sub(self.hp));
        self.hp += restored;
        restored
    }

    /// Spends MP if enough is available.
    pub fn spend_mp(&mut self, cost: u32) -> bool {
        if cost > self.mp {
            return false;
        }
        self.mp -= cost;
        true
    }

    pub fn restore_full(&mut self) {
        self.hp = self.max_hp;
        self.mp = self.max_mp;
    }

    /// Speed as used by the ratio formulas; never zero.
    pub fn effective_speed(&self) -> f64 {
        f64::from(self.speed.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn damage_floors_at_zero() {
        let mut a = Actor::player("You", 30, 6, 12, 12);
        assert_eq!(a.take_damage(10), 10);
        assert_eq!(a.take_damage(50), 20);
        assert_eq!(a.hp, 0);
        assert!(!a.is_alive());
    }

    #[test]
    fn spend_mp_refuses_overdraw() {
        let mut a = Actor::player("You", 30, 6, 12, 12);
        assert!(!a.spend_mp(7));
        assert_eq!(a.mp, 6);
        assert!(a.spend_mp(6));
        assert_eq!(a.mp, 0);
    }

    proptest! {
        #[test]
        fn heal_never_exceeds_missing_hp(max in 1u32..300, hp_frac in 0u32..=100, amount in 0u32..2000) {
            let mut a = Actor::player("You", max, 0, 1, 1);
            a.hp = max * hp_frac / 100;
            let missing = a.max_hp - a.hp;
            let restored = a.heal(amount);
            prop_assert!(restored <= missing);
            prop_assert!(a.hp <= a.max_hp);
        }
    }
}
