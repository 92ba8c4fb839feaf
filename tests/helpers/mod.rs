//! Test helpers: a builder for scripted games and a screen that records
//! draw calls.

#![allow(dead_code)]

use dungeon::{Direction, FloorMap, GridPosition, Obstacle, ObstacleKind, Registry};
use hero::ScriptedDice;
use save::{MemoryStore, SaveSystem};
use tiny_dungeon_rpg::{
    config::GameConfig,
    input::Buttons,
    render::{Audio, FieldView, LogAudio, Screen},
    Game,
};

pub const START: GridPosition = GridPosition::new(8, 21, 0);

/// Builder for deterministic games on an open walled map.
pub struct TestGameBuilder {
    config: GameConfig,
    obstacles: Vec<Obstacle>,
    talks: Vec<(&'static str, Vec<String>)>,
    map: FloorMap,
    audio: Box<dyn Audio>,
    store: MemoryStore,
    dice: ScriptedDice,
}

impl TestGameBuilder {
    pub fn new() -> Self {
        Self {
            config: GameConfig::default(),
            obstacles: Vec::new(),
            talks: Vec::new(),
            map: FloorMap::walled(32, 32, 5),
            audio: Box::new(LogAudio),
            store: MemoryStore::new(),
            dice: ScriptedDice::new(),
        }
    }

    pub fn start(mut self, start: GridPosition) -> Self {
        self.config.start = start;
        self
    }

    pub fn obstacle(mut self, id: &'static str, pos: GridPosition, kind: ObstacleKind, value: u32) -> Self {
        self.obstacles.push(Obstacle { id, pos, kind, value });
        self
    }

    pub fn talk(mut self, id: &'static str, lines: &[&str]) -> Self {
        self.talks.push((id, lines.iter().map(|l| l.to_string()).collect()));
        self
    }

    pub fn map(mut self, map: FloorMap) -> Self {
        self.map = map;
        self
    }

    pub fn audio(mut self, audio: impl Audio + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    pub fn store(mut self, store: MemoryStore) -> Self {
        self.store = store;
        self
    }

    pub fn dice(mut self, dice: ScriptedDice) -> Self {
        self.dice = dice;
        self
    }

    pub fn build(self) -> Game<ScriptedDice> {
        Game::new(
            self.config,
            Registry::from_parts(self.obstacles, self.talks),
            Box::new(self.map),
            self.audio,
            SaveSystem::new(self.store),
            self.dice,
        )
    }
}

/// One tick with the buttons down, then one with everything released.
pub fn press(game: &mut Game<ScriptedDice>, buttons: Buttons) {
    game.tick(buttons);
    game.tick(Buttons::none());
}

pub fn press_dir(game: &mut Game<ScriptedDice>, dir: Direction) {
    press(game, Buttons::held(dir));
}

/// Holds `dir` until the step in progress lands.
pub fn walk(game: &mut Game<ScriptedDice>, dir: Direction) {
    game.tick(Buttons::held(dir));
    let mut ticks = 0;
    while game.field().is_moving() {
        game.tick(Buttons::held(dir));
        ticks += 1;
        assert!(ticks < 16, "step never finished");
    }
    game.tick(Buttons::none());
}

/// Picks "New" on the title screen.
pub fn start_new_game(game: &mut Game<ScriptedDice>) {
    press(game, Buttons::confirm());
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawCall {
    Panel { x1: u16, y1: u16, x2: u16, y2: u16, lines: Vec<String> },
    Selector { columns: Vec<u16>, row: u16, selected: usize },
    Field(FieldView),
    Portrait { portrait: u8, name: String },
}

/// Screen that remembers every call.
#[derive(Debug, Default)]
pub struct RecordingScreen {
    pub calls: Vec<DrawCall>,
}

impl RecordingScreen {
    pub fn panels(&self) -> impl Iterator<Item = &[String]> {
        self.calls.iter().filter_map(|c| match c {
            DrawCall::Panel { lines, .. } => Some(lines.as_slice()),
            _ => None,
        })
    }
}

impl Screen for RecordingScreen {
    fn draw_panel(&mut self, x1: u16, y1: u16, x2: u16, y2: u16, lines: &[String]) {
        self.calls.push(DrawCall::Panel {
            x1,
            y1,
            x2,
            y2,
            lines: lines.to_vec(),
        });
    }

    fn draw_selector(&mut self, columns: &[u16], row: u16, selected: usize) {
        self.calls.push(DrawCall::Selector {
            columns: columns.to_vec(),
            row,
            selected,
        });
    }

    fn draw_field(&mut self, view: &FieldView) {
        self.calls.push(DrawCall::Field(view.clone()));
    }

    fn draw_portrait(&mut self, portrait: u8, name: &str) {
        self.calls.push(DrawCall::Portrait {
            portrait,
            name: name.to_string(),
        });
    }
}
