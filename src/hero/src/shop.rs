//! Stat power-ups sold by the town shop.

use error::Rejection;
use strum::{Display, EnumIter};

use crate::Actor;

/// 商店可购买的强化项目
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, EnumIter)]
pub enum Upgrade {
    #[strum(to_string = "HP")]
    MaxHp,
    #[strum(to_string = "MP")]
    MaxMp,
    #[strum(to_string = "ATK")]
    Attack,
    #[strum(to_string = "SPD")]
    Speed,
}

impl Upgrade {
    /// Shop order, matching the selector columns.
    pub const ALL: [Upgrade; 4] = [Upgrade::MaxHp, Upgrade::MaxMp, Upgrade::Attack, Upgrade::Speed];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn current(self, actor: &Actor) -> u32 {
        match self {
            Upgrade::MaxHp => actor.max_hp,
            Upgrade::MaxMp => actor.max_mp,
            Upgrade::Attack => actor.attack,
            Upgrade::Speed => actor.speed,
        }
    }

    fn step(self) -> u32 {
        match self {
            Upgrade::MaxHp => 5,
            _ => 2,
        }
    }

    fn limit(self) -> u32 {
        match self {
            Upgrade::MaxHp => 255,
            _ => 98,
        }
    }

    fn price_factor(self) -> u32 {
        match self {
            Upgrade::MaxHp => 2,
            _ => 5,
        }
    }

    /// The value after one purchase, or `None` once the stat is capped.
    pub fn next(self, actor: &Actor) -> Option<u32> {
        let current = self.current(actor);
        (current < self.limit()).then(|| current + self.step())
    }

    /// Price of the next purchase, or `None` once the stat is capped.
    pub fn cost(self, actor: &Actor) -> Option<u32> {
        self.next(actor).map(|_| self.current(actor) * self.price_factor())
    }

    /// Buys one step of this upgrade. Gold and stat change together or not
    /// at all. Returns the price paid.
    pub fn purchase(self, actor: &mut Actor, gold: &mut u32) -> Result<u32, Rejection> {
        let cost = self.cost(actor).ok_or(Rejection::MaxedOut)?;
        if *gold < cost {
            return Err(Rejection::NotEnoughGold);
        }
        *gold -= cost;
        match self {
            Upgrade::MaxHp => {
                actor.max_hp += self.step();
                actor.hp = actor.max_hp;
            }
            Upgrade::MaxMp => {
                actor.max_mp += self.step();
                actor.mp = actor.max_mp;
            }
            Upgrade::Attack => actor.attack += self.step(),
            Upgrade::Speed => actor.speed += self.step(),
        }
        Ok(cost)
    }
}
