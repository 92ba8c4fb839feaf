//! Field exploration: stepping between cells, obstacle triggers, stairs
//! and the random encounter roll.

use combat::{Boss, EnemyKind, SpellId};
use dungeon::flags::{HEAL_UNLOCKED, BURST_UNLOCKED, RETURN_UNLOCKED, TREASURE_WON, GAME_CLEARED};
use dungeon::{Direction, FlagSet, GridPosition, ObstacleKind, Registry, TerrainKind, TerrainMap};
use hero::Dice;
use tracing::debug;

use crate::config::GameConfig;
use crate::session::Session;

/// Sub-steps in one cell.
pub const STEP_LENGTH: i32 = 16;

const CONGRATULATION: [&str; 2] = ["You did it, hero!", "The town is grateful"];

/// What bumping into a non-walkable cell did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TriggerEffect {
    Fountain,
    DoorOpened,
    DoorLocked,
    ChestGold(u32),
    ChestKey,
    Dialog(Vec<String>),
    Shop,
    SpellGranted(SpellId),
    BossChallenge(Boss),
    /// An NPC with nothing to say.
    Nothing,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// A step is already underway.
    Busy,
    /// Wall; nothing happens.
    Blocked,
    /// The player started walking.
    Started,
    Trigger(TriggerEffect),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Arrived,
    FloorChanged(i32),
    /// Back in town with the treasure: play time at the moment of clearing.
    Ending { minutes: u64, seconds: u64 },
    Encounter(EnemyKind),
}

/// 进行中的移动
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub dir: Direction,
    pub target: GridPosition,
    /// Sub-steps covered, out of [`STEP_LENGTH`].
    pub progress: i32,
}

/// 场景移动控制器
#[derive(Clone, Debug, Default)]
pub struct FieldController {
    step: Option<Step>,
}

impl FieldController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_moving(&self) -> bool {
        self.step.is_some()
    }

    pub fn step(&self) -> Option<&Step> {
        self.step.as_ref()
    }

    /// Drops any step in progress.
    pub fn reset(&mut self) {
        self.step = None;
    }

    /// Classifies the neighbouring cell and either starts walking onto it or
    /// resolves its trigger on the spot.
    pub fn attempt_move(
        &mut self,
        dir: Direction,
        step_speed: i32,
        session: &mut Session,
        registry: &Registry,
        terrain: &dyn TerrainMap,
    ) -> MoveOutcome {
        if self.step.is_some() {
            return MoveOutcome::Busy;
        }
        let target = session.pos.step(dir);
        let kind = terrain.query_cell(target);
        if kind == TerrainKind::Fountain {
            session.player.restore_full();
            return MoveOutcome::Trigger(TriggerEffect::Fountain);
        }
        if !kind.is_walkable() {
            return MoveOutcome::Blocked;
        }

        let Some(obstacle) = registry.obstacle_at(target, &session.flags) else {
            self.step = Some(Step {
                dir,
                target,
                progress: step_speed,
            });
            return MoveOutcome::Started;
        };
        let id = obstacle.id;
        let effect = match obstacle.kind {
            ObstacleKind::Door => open_door(id, session),
            ObstacleKind::Chest => {
                session.flags.insert(id);
                if obstacle.holds_key() {
                    session.keys = session.keys.saturating_add(1);
                    TriggerEffect::ChestKey
                } else {
                    session.add_gold(obstacle.value);
                    TriggerEffect::ChestGold(obstacle.value)
                }
            }
            ObstacleKind::Npc => npc_script(id, &mut session.flags, registry),
        };
        debug!(id, ?effect, "obstacle triggered");
        MoveOutcome::Trigger(effect)
    }

    /// Advances the step in progress. Returns true once it reaches the
    /// target cell.
    pub fn advance(&mut self, step_speed: i32) -> bool {
        match &mut self.step {
            Some(step) if step.progress >= STEP_LENGTH => true,
            Some(step) => {
                step.progress += step_speed;
                step.progress >= STEP_LENGTH
            }
            None => false,
        }
    }

    /// Commits a finished step: moves the player, handles stairs, walking
    /// regen and the encounter roll.
    pub fn complete_move(
        &mut self,
        session: &mut Session,
        terrain: &dyn TerrainMap,
        dice: &mut dyn Dice,
        config: &GameConfig,
    ) -> StepOutcome {
        let Some(step) = self.step.take() else {
            return StepOutcome::Arrived;
        };
        session.pos = step.target;

        if let TerrainKind::Stairs(stairs) = terrain.query_cell(step.target) {
            session.pos.floor += stairs.floor_delta();
            let floor = session.pos.floor;
            if floor == 0 && session.flags.contains(TREASURE_WON) && !session.flags.contains(GAME_CLEARED) {
                session.flags.insert(GAME_CLEARED);
                let (minutes, seconds) = session.elapsed(config.fps);
                return StepOutcome::Ending { minutes, seconds };
            }
            return StepOutcome::FloorChanged(floor);
        }

        if session.pos.is_even_cell() {
            session.player.heal(1);
        }

        let encounter = &config.encounter;
        if (encounter.quiet_in_town && session.pos.floor == 0)
            || (encounter.quiet_before_ending && session.flags.in_pre_ending())
        {
            return StepOutcome::Arrived;
        }

        session.encounters = session.encounters.saturating_add(1);
        if session.encounters > encounter.threshold && dice.rndi(0, encounter.odds - 1) == 0 {
            session.encounters = 0;
            let shallower = dice.rndi(0, 99) < encounter.shallower_percent;
            let index = session.pos.floor - i32::from(shallower);
            return StepOutcome::Encounter(EnemyKind::wandering(index.max(0) as usize));
        }
        StepOutcome::Arrived
    }
}

fn open_door(id: &'static str, session: &mut Session) -> TriggerEffect {
    if session.keys == 0 {
        return TriggerEffect::DoorLocked;
    }
    session.keys -= 1;
    session.flags.insert(id);
    TriggerEffect::DoorOpened
}

/// Scripted NPCs. Grants and boss fights are gated on their reward flag, so
/// once resolved they fall back to plain talk.
fn npc_script(id: &str, flags: &mut FlagSet, registry: &Registry) -> TriggerEffect {
    match id {
        "0-1" if flags.contains(TREASURE_WON) => {
            TriggerEffect::Dialog(CONGRATULATION.iter().map(|l| l.to_string()).collect())
        }
        "0-3" => TriggerEffect::Shop,
        "1-2" if !flags.contains(RETURN_UNLOCKED) => {
            flags.insert(RETURN_UNLOCKED);
            TriggerEffect::SpellGranted(SpellId::Return)
        }
        "2-5" if !flags.contains(HEAL_UNLOCKED) => TriggerEffect::BossChallenge(Boss::Sorcerer),
        "3-1" if !flags.contains(BURST_UNLOCKED) => TriggerEffect::BossChallenge(Boss::FallenAngel),
        "4-3" => TriggerEffect::BossChallenge(Boss::Goddess),
        _ => registry
            .talk(id)
            .map_or(TriggerEffect::Nothing, |lines| TriggerEffect::Dialog(lines.to_vec())),
    }
}
