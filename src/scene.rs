//! 场景状态机
//!
//! [`Game`] owns the session and decides which mode handles each tick's
//! input: title, field, menu, battle or game over. Field and battle rules
//! live in their own modules; this one wires their outcomes to dialogs,
//! sound and scene changes.

use combat::spell::{self, FieldEffect};
use combat::{Battle, BattlePhase, Boss, EnemyKind, Reward};
use dungeon::{Registry, TerrainMap};
use error::Rejection;
use hero::{Dice, GameRng, Upgrade};
use save::SaveSystem;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::field::{FieldController, MoveOutcome, StepOutcome, TriggerEffect};
use crate::input::{Buttons, DirectionLatch};
use crate::modal::{CancelAction, Choice, Modal, ModalKind};
use crate::render::{Audio, Music, Sfx, SFX_CHANNEL};
use crate::session::Session;

/// 游戏场景
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SceneId {
    Title,
    Field,
    Menu,
    Battle,
    GameOver,
}

/// Name of a floor as shown to the player.
pub fn floor_label(floor: i32) -> String {
    format!("B{}F", floor + 1)
}

fn challenge(boss: Boss) -> &'static str {
    match boss {
        Boss::Sorcerer => "Are you ready?",
        Boss::FallenAngel => "You dare fight me?",
        Boss::Goddess => "You want the treasure?",
    }
}

/// 游戏主体
pub struct Game<D: Dice = GameRng> {
    config: GameConfig,
    registry: Registry,
    terrain: Box<dyn TerrainMap>,
    audio: Box<dyn Audio>,
    saves: SaveSystem,
    dice: D,
    session: Session,
    scene: SceneId,
    field: FieldController,
    battle: Option<Battle>,
    modal: Option<Modal>,
    latch: DirectionLatch,
    music: Option<u8>,
    quit: bool,
}

impl<D: Dice> Game<D> {
    /// Builds the game and opens the title screen, which loads the save.
    pub fn new(
        config: GameConfig,
        registry: Registry,
        terrain: Box<dyn TerrainMap>,
        audio: Box<dyn Audio>,
        saves: SaveSystem,
        dice: D,
    ) -> Self {
        let session = Session::new_game(config.start);
        let mut game = Self {
            config,
            registry,
            terrain,
            audio,
            saves,
            dice,
            session,
            scene: SceneId::Title,
            field: FieldController::new(),
            battle: None,
            modal: None,
            latch: DirectionLatch::new(),
            music: None,
            quit: false,
        };
        game.show_title();
        game
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn terrain(&self) -> &dyn TerrainMap {
        self.terrain.as_ref()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn scene(&self) -> SceneId {
        self.scene
    }

    pub fn field(&self) -> &FieldController {
        &self.field
    }

    pub fn battle(&self) -> Option<&Battle> {
        self.battle.as_ref()
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn dice_mut(&mut self) -> &mut D {
        &mut self.dice
    }

    /// Track currently playing.
    pub fn music(&self) -> Option<u8> {
        self.music
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Runs one simulation step.
    pub fn tick(&mut self, buttons: Buttons) {
        if self.scene != SceneId::Title {
            self.session.frames += 1;
        }
        let buttons = self.latch.filter(buttons);

        if self.modal.as_ref().is_some_and(|m| m.cursor.is_some()) {
            self.update_cursor(&buttons);
            return;
        }
        match self.scene {
            SceneId::Field => self.update_field(&buttons),
            SceneId::Battle if buttons.confirm || buttons.cancel => self.advance_battle(),
            SceneId::GameOver if buttons.confirm || buttons.cancel => {
                self.session.apply_defeat_penalty(self.config.start);
                info!(gold = self.session.gold, "back on your feet");
                self.field_start();
            }
            _ => {}
        }
    }

    /// Starts a fight, rolling initiative. Public for scripted scenarios.
    pub fn start_battle(&mut self, kind: EnemyKind, boss: Option<Boss>) {
        self.field.reset();
        let battle = Battle::start(&self.session.player, kind.spawn(), boss, &mut self.dice);
        info!(monster = %kind, ?boss, "battle start");
        let opening = (battle.phase == BattlePhase::Command).then(|| battle.log.clone());
        self.battle = Some(battle);
        self.scene = SceneId::Battle;
        self.modal = None;
        if let Some(log) = opening {
            self.open_battle_command(log, 0);
        }
        self.latch.arm();
        self.play_music(Music::Battle);
    }

    // ---- modal helpers ----

    fn open_modal(&mut self, modal: Modal) {
        if let Some(old) = self.modal.replace(modal) {
            debug!(superseded = ?old.kind, "modal replaced");
        }
    }

    fn message(&mut self, lines: Vec<String>) {
        self.open_modal(Modal::message(lines));
        self.latch.arm();
    }

    fn show_title(&mut self) {
        self.modal = None;
        self.battle = None;
        self.field.reset();
        let loaded = match self.saves.try_load() {
            Some(data) => {
                self.session = Session::from_save(data);
                true
            }
            None => {
                self.new_game();
                false
            }
        };
        let mut modal = Modal::choice(ModalKind::Title, Vec::new(), &["New", "Continue", "Exit"], CancelAction::Ignore)
            .with_pos(usize::from(loaded));
        modal.lines.push(" (Z or Enter)".to_string());
        self.open_modal(modal);
        self.scene = SceneId::Title;
        self.play_music(Music::Dungeon);
    }

    fn new_game(&mut self) {
        self.session = Session::new_game(self.config.start);
        info!("new game");
    }

    fn field_start(&mut self) {
        self.modal = None;
        self.scene = SceneId::Field;
        self.field.reset();
        self.play_field_music();
    }

    fn open_menu(&mut self, pos: usize) {
        self.scene = SceneId::Menu;
        let lines = vec![format!("You are on {}", floor_label(self.session.pos.floor))];
        self.open_modal(
            Modal::choice(ModalKind::Menu, lines, &["Save", "Spells", "Reset"], CancelAction::Back).with_pos(pos),
        );
    }

    fn open_menu_spells(&mut self, pos: usize) {
        let names: Vec<String> = self
            .session
            .available_spells(false)
            .iter()
            .map(|s| s.to_string())
            .collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        self.open_modal(
            Modal::choice(ModalKind::MenuSpells, vec!["Which spell?".to_string()], &names, CancelAction::Back)
                .with_pos(pos),
        );
    }

    fn open_shop(&mut self) {
        let names = Upgrade::ALL.map(|u| u.to_string());
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        self.open_modal(Modal::choice(
            ModalKind::Shop,
            vec!["Want to power up?".to_string()],
            &names,
            CancelAction::Back,
        ));
        self.latch.arm();
    }

    fn open_battle_command(&mut self, mut lines: Vec<String>, pos: usize) {
        if let Some(battle) = self.battle.as_mut() {
            battle.await_command();
        }
        lines.push("What will you do?".to_string());
        self.open_modal(
            Modal::choice(ModalKind::BattleCommand, lines, &["Attack", "Spell", "Run"], CancelAction::Ignore)
                .with_pos(pos),
        );
    }

    fn open_battle_spells(&mut self, pos: usize) {
        let spells = self.session.available_spells(true);
        let pos = pos.min(spells.len().saturating_sub(1));
        let names: Vec<String> = spells.iter().map(|s| s.to_string()).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut modal = Modal::choice(
            ModalKind::BattleSpells,
            vec!["Which spell?".to_string()],
            &names,
            CancelAction::Back,
        )
        .with_pos(pos);
        if let Some(id) = spells.get(pos) {
            modal.lines.push(format!(" MP {:>2}", id.cost(&self.session.player)));
        }
        self.open_modal(modal);
    }

    // ---- audio ----

    fn play_music(&mut self, music: Music) {
        let id = music as u8;
        if self.music != Some(id) {
            self.audio.play_music(id);
            self.music = Some(id);
        }
    }

    fn play_field_music(&mut self) {
        self.play_music(if self.session.pos.floor > 0 {
            Music::Dungeon
        } else {
            Music::Town
        });
    }

    fn sfx(&mut self, sfx: Sfx) {
        self.audio.play_sfx(SFX_CHANNEL, sfx as u8);
    }

    // ---- selectors ----

    fn update_cursor(&mut self, buttons: &Buttons) {
        let Some(modal) = self.modal.as_mut() else {
            return;
        };
        let kind = modal.kind;
        let Some(cursor) = modal.cursor.as_mut() else {
            return;
        };
        let (moved, choice) = cursor.update(buttons);
        let pos = cursor.pos;
        if moved {
            self.latch.arm();
            if kind == ModalKind::BattleSpells {
                self.open_battle_spells(pos);
            }
        }
        let Some(choice) = choice else {
            return;
        };
        // fallback selections from cancel stay silent
        if buttons.confirm && matches!(choice, Choice::Selected(_)) {
            self.sfx(Sfx::Confirm);
        }

        match (kind, choice) {
            (ModalKind::Title, Choice::Selected(index)) => {
                self.modal = None;
                match index {
                    0 => self.new_game(),
                    // Continue: the save was loaded when the title opened
                    2 => {
                        info!("quit requested");
                        self.quit = true;
                        return;
                    }
                    _ => {}
                }
                self.field_start();
            }
            (ModalKind::Menu, Choice::Selected(0)) => {
                self.saves.save_best_effort(&self.session.to_save());
                self.field_start();
                self.message(vec!["Saved.".to_string()]);
            }
            (ModalKind::Menu, Choice::Selected(1)) => self.open_menu_spells(0),
            (ModalKind::Menu, Choice::Selected(2)) => self.show_title(),
            (ModalKind::Menu, _) => self.field_start(),
            (ModalKind::MenuSpells, Choice::Selected(index)) => self.cast_from_menu(index),
            (ModalKind::MenuSpells, Choice::Back) => self.open_menu(1),
            (ModalKind::Shop, Choice::Selected(index)) => self.buy(index),
            (ModalKind::Shop, Choice::Back) => self.modal = None,
            (ModalKind::BossConfirm(boss), choice) => {
                self.modal = None;
                if choice == Choice::Selected(0) {
                    self.start_battle(boss.enemy(), Some(boss));
                }
            }
            (ModalKind::BattleCommand, Choice::Selected(index)) => {
                self.modal = None;
                match index {
                    0 => {
                        if let Some(battle) = self.battle.as_mut() {
                            battle.player_attack(&mut self.session.player, &mut self.dice);
                        }
                    }
                    1 => self.open_battle_spells(0),
                    _ => self.flee(),
                }
            }
            (ModalKind::BattleSpells, Choice::Selected(index)) => self.cast_in_battle(index),
            (ModalKind::BattleSpells, Choice::Back) => self.open_battle_command(Vec::new(), 1),
            (kind, choice) => debug!(?kind, ?choice, "selection ignored"),
        }
    }

    fn cast_from_menu(&mut self, index: usize) {
        let Some(&id) = self.session.available_spells(false).get(index) else {
            return;
        };
        match spell::cast_in_field(id, &mut self.session.player) {
            Ok(FieldEffect::Teleport) => {
                info!(spell = %id, "teleported to start");
                self.session.go_start_location(self.config.start);
                self.field_start();
                self.sfx(Sfx::Return);
            }
            Ok(FieldEffect::Healed(restored)) => debug!(restored, "healed from menu"),
            Err(rejection) => debug!(spell = %id, %rejection, "cast refused"),
        }
    }

    fn buy(&mut self, index: usize) {
        let Some(upgrade) = Upgrade::from_index(index) else {
            return;
        };
        match upgrade.purchase(&mut self.session.player, &mut self.session.gold) {
            Ok(cost) => {
                info!(%upgrade, cost, "power up");
                self.sfx(Sfx::PowerUp);
            }
            Err(rejection) => debug!(%upgrade, %rejection, "purchase refused"),
        }
    }

    // ---- field ----

    fn update_field(&mut self, buttons: &Buttons) {
        if self.field.is_moving() {
            if self.field.advance(self.config.step_speed) {
                let outcome =
                    self.field
                        .complete_move(&mut self.session, self.terrain.as_ref(), &mut self.dice, &self.config);
                self.on_step(outcome);
            }
            return;
        }

        if let Some(dir) = buttons.direction() {
            let outcome = self.field.attempt_move(
                dir,
                self.config.step_speed,
                &mut self.session,
                &self.registry,
                self.terrain.as_ref(),
            );
            match outcome {
                MoveOutcome::Started => {
                    self.modal = None;
                    if !self.config.input.walk_repeat {
                        self.latch.arm();
                    }
                }
                MoveOutcome::Trigger(effect) => self.on_trigger(effect),
                MoveOutcome::Blocked | MoveOutcome::Busy => {}
            }
        } else if buttons.confirm {
            self.modal = None;
        } else if buttons.cancel {
            self.open_menu(0);
        }
    }

    fn on_trigger(&mut self, effect: TriggerEffect) {
        let lines: Vec<String> = match effect {
            TriggerEffect::Fountain => {
                self.sfx(Sfx::PowerUp);
                vec!["A healing fountain!".into(), "HP and MP restored!".into()]
            }
            TriggerEffect::DoorOpened => {
                self.sfx(Sfx::Door);
                vec!["Unlocked the door".into()]
            }
            TriggerEffect::DoorLocked => vec![Rejection::NoKey.to_string()],
            TriggerEffect::ChestGold(gold) => {
                self.sfx(Sfx::Confirm);
                vec!["A treasure chest!".into(), format!("Found {}G", gold)]
            }
            TriggerEffect::ChestKey => {
                self.sfx(Sfx::Confirm);
                vec!["A treasure chest!".into(), "Found a key".into()]
            }
            TriggerEffect::Dialog(lines) => lines,
            TriggerEffect::SpellGranted(id) => {
                vec!["I shall teach you".into(), format!("the {} spell", id)]
            }
            TriggerEffect::Shop => return self.open_shop(),
            TriggerEffect::BossChallenge(boss) => {
                self.open_modal(Modal::choice(
                    ModalKind::BossConfirm(boss),
                    vec![challenge(boss).to_string()],
                    &["Yes", "No"],
                    CancelAction::Select(1),
                ));
                self.latch.arm();
                return;
            }
            TriggerEffect::Nothing => return,
        };
        self.message(lines);
    }

    fn on_step(&mut self, outcome: StepOutcome) {
        match outcome {
            StepOutcome::Arrived => {}
            StepOutcome::FloorChanged(floor) => {
                debug!(floor, "stairs");
                self.message(vec![floor_label(floor)]);
                self.play_field_music();
                self.sfx(Sfx::Stairs);
            }
            StepOutcome::Ending { minutes, seconds } => {
                info!(minutes, seconds, "game clear");
                self.message(vec![
                    "Game clear!".to_string(),
                    format!("Time: {} min {} sec", minutes, seconds),
                ]);
                self.play_field_music();
                self.sfx(Sfx::Stairs);
            }
            StepOutcome::Encounter(kind) => self.start_battle(kind, None),
        }
    }

    // ---- battle ----

    fn advance_battle(&mut self) {
        let Some(battle) = self.battle.as_mut() else {
            return;
        };
        if !self.session.player.is_alive() {
            self.game_over();
            return;
        }
        if !battle.monster.is_alive() {
            self.win_battle();
            return;
        }
        match battle.phase {
            BattlePhase::MonsterTurn => battle.monster_turn(&mut self.session.player, &mut self.dice),
            BattlePhase::PlayerTurn | BattlePhase::Command => self.open_battle_command(Vec::new(), 0),
            BattlePhase::Fled => self.leave_battle(),
            BattlePhase::Victory => self.win_battle(),
            BattlePhase::Defeat => self.game_over(),
        }
    }

    fn cast_in_battle(&mut self, index: usize) {
        let Some(&id) = self.session.available_spells(true).get(index) else {
            return;
        };
        let Some(battle) = self.battle.as_mut() else {
            return;
        };
        match battle.player_cast(&mut self.session.player, id, &mut self.dice) {
            Ok(()) => self.modal = None,
            Err(rejection) => debug!(spell = %id, %rejection, "cast refused"),
        }
    }

    fn flee(&mut self) {
        let Some(battle) = self.battle.as_mut() else {
            return;
        };
        battle.flee(&self.session.player, &mut self.dice);
        if battle.phase == BattlePhase::Fled {
            self.leave_battle();
        }
    }

    fn leave_battle(&mut self) {
        let log = self.battle.take().map(|b| b.log).unwrap_or_default();
        info!("fled");
        self.field_start();
        self.message(log);
    }

    fn win_battle(&mut self) {
        let Some(battle) = self.battle.take() else {
            return;
        };
        let reward = battle.settle(&mut self.dice);
        info!(?reward, "battle won");
        self.field_start();

        let mut lines = vec!["You won the battle!".to_string()];
        match reward {
            Reward::Gold(gold) => {
                self.session.add_gold(gold);
                lines.push(format!("Got {}G", gold));
            }
            Reward::Unlock {
                flag,
                spell: Some(spell),
            } => {
                self.session.flags.insert(flag);
                lines.push(format!("Learned {}!", spell));
            }
            Reward::Unlock { flag, spell: None } => {
                self.session.flags.insert(flag);
                lines = vec!["You got the treasure!".to_string()];
            }
        }
        self.message(lines);
    }

    fn game_over(&mut self) {
        self.battle = None;
        self.modal = None;
        info!(floor = self.session.pos.floor, "game over");
        self.message(vec![format!("{} collapsed...", self.session.player.name)]);
        self.scene = SceneId::GameOver;
    }
}
