// src/combat/src/enemy.rs

use dungeon::flags::{BURST_UNLOCKED, HEAL_UNLOCKED, TREASURE_WON};
use hero::{Actor, Role};
use strum::Display;

use crate::spell::SpellId;

/// 怪物种类。顺序即图鉴序号：前五种按楼层随机出现，后三种是首领。
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display)]
pub enum EnemyKind {
    Pumpkin,
    Imp,
    Wisp,
    Ghost,
    Ninja,
    Sorcerer,
    #[strum(to_string = "Fallen Angel")]
    FallenAngel,
    Goddess,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 8] = [
        EnemyKind::Pumpkin,
        EnemyKind::Imp,
        EnemyKind::Wisp,
        EnemyKind::Ghost,
        EnemyKind::Ninja,
        EnemyKind::Sorcerer,
        EnemyKind::FallenAngel,
        EnemyKind::Goddess,
    ];

    /// Number of monsters that can turn up in random encounters.
    pub const WANDERING: usize = 5;

    /// Random-encounter monster for a catalog index, clamped to the
    /// wandering range.
    pub fn wandering(index: usize) -> Self {
        Self::ALL[index.min(Self::WANDERING - 1)]
    }

    /// 生成一个满状态的怪物实例
    pub fn spawn(self) -> Actor {
        // (hp, mp, attack, speed, resist, gold)
        let (hp, mp, attack, speed, resist, gold) = match self {
            EnemyKind::Pumpkin => (12, 0, 6, 12, false, 20),
            EnemyKind::Imp => (24, 0, 10, 13, false, 40),
            EnemyKind::Wisp => (32, 2, 14, 18, true, 80),
            EnemyKind::Ghost => (40, 0, 17, 32, false, 160),
            EnemyKind::Ninja => (64, 0, 34, 28, false, 320),
            EnemyKind::Sorcerer => (120, 4, 8, 15, false, 0),
            EnemyKind::FallenAngel => (200, 0, 20, 27, true, 0),
            EnemyKind::Goddess => (400, 0, 99, 99, false, 0),
        };
        Actor {
            name: self.to_string(),
            max_hp: hp,
            hp,
            max_mp: mp,
            mp,
            attack,
            speed,
            resist,
            reward_gold: gold,
            role: Role::Monster {
                portrait: self as u8,
            },
        }
    }
}

/// Scripted fights started from an NPC. Each pays out a one-time unlock
/// instead of gold.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display)]
pub enum Boss {
    Sorcerer,
    FallenAngel,
    Goddess,
}

impl Boss {
    pub fn enemy(self) -> EnemyKind {
        match self {
            Boss::Sorcerer => EnemyKind::Sorcerer,
            Boss::FallenAngel => EnemyKind::FallenAngel,
            Boss::Goddess => EnemyKind::Goddess,
        }
    }

    /// Flag set when this boss is beaten.
    pub fn reward_flag(self) -> &'static str {
        match self {
            Boss::Sorcerer => HEAL_UNLOCKED,
            Boss::FallenAngel => BURST_UNLOCKED,
            Boss::Goddess => TREASURE_WON,
        }
    }

    /// Spell learned by beating this boss, if any.
    pub fn reward_spell(self) -> Option<SpellId> {
        match self {
            Boss::Sorcerer => Some(SpellId::Heal),
            Boss::FallenAngel => Some(SpellId::Burst),
            Boss::Goddess => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemy_creation() {
        let pumpkin = EnemyKind::Pumpkin.spawn();
        assert_eq!((pumpkin.hp, pumpkin.attack, pumpkin.reward_gold), (12, 6, 20));
        assert_eq!(pumpkin.name, "Pumpkin");

        let wisp = EnemyKind::Wisp.spawn();
        assert!(wisp.resist);
        assert_eq!(wisp.mp, 2);
        assert_eq!(wisp.role, Role::Monster { portrait: 2 });
    }

    #[test]
    fn wandering_index_is_clamped() {
        assert_eq!(EnemyKind::wandering(0), EnemyKind::Pumpkin);
        assert_eq!(EnemyKind::wandering(4), EnemyKind::Ninja);
        assert_eq!(EnemyKind::wandering(9), EnemyKind::Ninja);
    }

    #[test]
    fn bosses_pay_in_flags() {
        assert_eq!(Boss::Sorcerer.reward_flag(), "sp2");
        assert_eq!(Boss::FallenAngel.reward_spell(), Some(SpellId::Burst));
        assert_eq!(Boss::Goddess.reward_flag(), "4-3");
        assert_eq!(Boss::Goddess.enemy().spawn().reward_gold, 0);
    }
}
