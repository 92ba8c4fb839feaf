//! One player-versus-one-monster encounter.
//!
//! A [`Battle`] only ever holds the monster. The player is borrowed per call
//! so the session keeps sole ownership of it.

use error::Rejection;
use hero::{Actor, Dice};
use tracing::debug;

use crate::enemy::Boss;
use crate::spell::{self, SpellId};
use crate::{Combat, CombatResult};

/// MP the monster needs before it considers casting FIRE.
const MONSTER_FIRE_COST: u32 = 2;

/// What the next acknowledgement does.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BattlePhase {
    /// Waiting for the player to pick a command.
    Command,
    /// The monster's action was shown; the player is prompted next.
    PlayerTurn,
    /// The player's action was shown; the monster acts next.
    MonsterTurn,
    Victory,
    Defeat,
    Fled,
}

impl BattlePhase {
    pub fn is_over(self) -> bool {
        matches!(self, BattlePhase::Victory | BattlePhase::Defeat | BattlePhase::Fled)
    }
}

/// Spoils of a won battle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Reward {
    Gold(u32),
    Unlock {
        flag: &'static str,
        spell: Option<SpellId>,
    },
}

#[derive(Clone, Debug)]
pub struct Battle {
    pub monster: Actor,
    pub boss: Option<Boss>,
    pub phase: BattlePhase,
    /// Messages for the action currently on screen.
    pub log: Vec<String>,
}

impl Battle {
    /// Opens a battle and rolls initiative.
    pub fn start(player: &Actor, monster: Actor, boss: Option<Boss>, dice: &mut dyn Dice) -> Self {
        let mut log = vec![format!("{} appears!", monster.name)];
        let phase = if Combat::player_goes_first(player, &monster, dice) {
            BattlePhase::Command
        } else {
            log.push(format!("{} strikes first!", monster.name));
            BattlePhase::MonsterTurn
        };
        debug!(monster = %monster.name, ?boss, ?phase, "battle started");
        Self {
            monster,
            boss,
            phase,
            log,
        }
    }

    /// Puts the player back on the command prompt.
    pub fn await_command(&mut self) {
        if !self.phase.is_over() {
            self.phase = BattlePhase::Command;
        }
    }

    fn show(&mut self, result: CombatResult) {
        self.log = result.logs;
    }

    fn after_player_action(&mut self) {
        self.phase = if self.monster.is_alive() {
            BattlePhase::MonsterTurn
        } else {
            BattlePhase::Victory
        };
    }

    pub fn player_attack(&mut self, player: &mut Actor, dice: &mut dyn Dice) {
        let result = Combat::resolve_attack(player, &mut self.monster, dice);
        self.show(result);
        self.after_player_action();
    }

    /// Casts a battle spell. MP is spent before the effect resolves.
    pub fn player_cast(&mut self, player: &mut Actor, id: SpellId, dice: &mut dyn Dice) -> Result<(), Rejection> {
        if !id.spell().usable_in_battle {
            return Err(Rejection::NotUsableHere);
        }
        let cost = id.cost(player);
        if !player.spend_mp(cost) {
            return Err(Rejection::NotEnoughMp);
        }

        let mut result = CombatResult::new();
        result.log(format!("{} cast {}!", player.name, id));
        match id {
            SpellId::Fire => {
                let damage = spell::fire_damage(&self.monster, dice);
                Combat::apply_damage(&mut self.monster, damage, &mut result);
            }
            SpellId::Heal => {
                let restored = spell::cast_heal(player, cost);
                result.log(format!("Recovered {} HP", restored));
            }
            SpellId::Burst => {
                let damage = spell::burst_damage(cost, dice);
                Combat::apply_damage(&mut self.monster, damage, &mut result);
            }
            // field-only, refused above
            SpellId::Return => {}
        }
        self.show(result);
        self.after_player_action();
        Ok(())
    }

    /// Tries to run. Success ends the battle; failure hands the turn over.
    pub fn flee(&mut self, player: &Actor, dice: &mut dyn Dice) {
        if Combat::flee_succeeds(player, &self.monster, dice) {
            self.log = vec!["You got away...".to_string()];
            self.phase = BattlePhase::Fled;
        } else {
            self.log = vec!["Couldn't get away!".to_string()];
            self.phase = BattlePhase::MonsterTurn;
        }
    }

    /// Monster turn policy: a monster with MP for FIRE casts it on a coin
    /// flip, otherwise it attacks.
    pub fn monster_turn(&mut self, player: &mut Actor, dice: &mut dyn Dice) {
        let result = if self.monster.mp >= MONSTER_FIRE_COST && dice.rndi(0, 1) == 0 {
            self.monster.mp -= MONSTER_FIRE_COST;
            let mut result = CombatResult::new();
            result.log(format!("{} cast {}!", self.monster.name, SpellId::Fire));
            let damage = dice.rndi(12, 18).max(0) as u32;
            Combat::apply_damage(player, damage, &mut result);
            result
        } else {
            Combat::resolve_attack(&mut self.monster, player, dice)
        };
        self.show(result);
        self.phase = if player.is_alive() {
            BattlePhase::PlayerTurn
        } else {
            BattlePhase::Defeat
        };
    }

    /// Rolls the reward for a won battle. Bosses pay their unlock; anyone
    /// else pays 70-100% of their gold, rounded up.
    pub fn settle(&self, dice: &mut dyn Dice) -> Reward {
        match self.boss {
            Some(boss) => Reward::Unlock {
                flag: boss.reward_flag(),
                spell: boss.reward_spell(),
            },
            None => {
                let gold = f64::from(self.monster.reward_gold) * dice.rndf(0.7, 1.0);
                Reward::Gold(gold.ceil() as u32)
            }
        }
    }
}
