//! Spell catalog and cost rules.

use dungeon::FlagSet;
use dungeon::flags::{BURST_UNLOCKED, HEAL_UNLOCKED, RETURN_UNLOCKED};
use error::Rejection;
use hero::{Actor, Dice};
use strum::{Display, EnumIter, IntoEnumIterator};

/// HP restored per MP spent on HEAL.
pub const HEAL_PER_MP: u32 = 5;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "UPPERCASE")]
pub enum SpellId {
    Fire,
    Return,
    Heal,
    Burst,
}

/// 法术目录条目
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spell {
    pub id: SpellId,
    pub name: &'static str,
    /// Fixed cost. HEAL and BURST compute theirs from the caster.
    pub base_cost: u32,
    pub usable_in_field: bool,
    pub usable_in_battle: bool,
    /// Flag that teaches the spell; `None` means known from the start.
    pub unlock_flag: Option<&'static str>,
    pub description: [&'static str; 2],
}

const CATALOG: [Spell; 4] = [
    Spell {
        id: SpellId::Fire,
        name: "FIRE",
        base_cost: 2,
        usable_in_field: false,
        usable_in_battle: true,
        unlock_flag: None,
        description: ["Hurls a small fireball", "at the enemy"],
    },
    Spell {
        id: SpellId::Return,
        name: "RETURN",
        base_cost: 6,
        usable_in_field: true,
        usable_in_battle: false,
        unlock_flag: Some(RETURN_UNLOCKED),
        description: ["Teleports you back", "to the starting point"],
    },
    Spell {
        id: SpellId::Heal,
        name: "HEAL",
        base_cost: 0,
        usable_in_field: true,
        usable_in_battle: true,
        unlock_flag: Some(HEAL_UNLOCKED),
        description: ["Restores HP, spending", "MP for what it heals"],
    },
    Spell {
        id: SpellId::Burst,
        name: "BURST",
        base_cost: 0,
        usable_in_field: false,
        usable_in_battle: true,
        unlock_flag: Some(BURST_UNLOCKED),
        description: ["Unleashes all your MP", "for massive damage"],
    },
];

impl SpellId {
    pub fn spell(self) -> &'static Spell {
        &CATALOG[self as usize]
    }

    /// MP this spell would take from `caster` right now.
    ///
    /// HEAL costs only what it needs: one MP per five missing HP, rounded
    /// up, but never more than the caster has. BURST always takes every
    /// MP the caster has.
    pub fn cost(self, caster: &Actor) -> u32 {
        match self {
            SpellId::Heal => {
                let missing = caster.max_hp.saturating_sub(caster.hp);
                caster.mp.min(missing.div_ceil(HEAL_PER_MP))
            }
            SpellId::Burst => caster.mp,
            _ => self.spell().base_cost,
        }
    }

    pub fn is_known(self, flags: &FlagSet) -> bool {
        self.spell().unlock_flag.is_none_or(|flag| flags.contains(flag))
    }
}

/// Spells offered on a list, in catalog order. RETURN is never offered in
/// battle; the field menu lists battle-only spells but refuses them.
pub fn available(flags: &FlagSet, in_battle: bool) -> Vec<SpellId> {
    SpellId::iter()
        .filter(|id| id.is_known(flags))
        .filter(|id| !in_battle || id.spell().usable_in_battle)
        .collect()
}

/// Heals `mp_spent × 5`, capped at max HP. Returns the HP actually restored.
pub fn cast_heal(caster: &mut Actor, mp_spent: u32) -> u32 {
    caster.heal(mp_spent * HEAL_PER_MP)
}

/// What a spell cast from the field menu did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldEffect {
    /// RETURN: the caller moves the player back to the start.
    Teleport,
    /// HEAL: HP actually restored.
    Healed(u32),
}

/// Casts a spell outside battle. MP is spent together with the effect, or
/// not at all.
pub fn cast_in_field(id: SpellId, caster: &mut Actor) -> Result<FieldEffect, Rejection> {
    if !id.spell().usable_in_field {
        return Err(Rejection::NotUsableHere);
    }
    let cost = id.cost(caster);
    if !caster.spend_mp(cost) {
        return Err(Rejection::NotEnoughMp);
    }
    Ok(match id {
        SpellId::Heal => FieldEffect::Healed(cast_heal(caster, cost)),
        _ => FieldEffect::Teleport,
    })
}

/// FIRE damage against `target`: nothing if it resists.
pub fn fire_damage(target: &Actor, dice: &mut dyn Dice) -> u32 {
    if target.resist {
        return 0;
    }
    dice.rndi(24, 30).max(0) as u32
}

/// BURST damage: one 8..=12 roll per MP spent.
pub fn burst_damage(mp_spent: u32, dice: &mut dyn Dice) -> u32 {
    (0..mp_spent).map(|_| dice.rndi(8, 12).max(0) as u32).sum()
}
