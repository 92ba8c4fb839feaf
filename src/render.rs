//! Collaborator seams for drawing and sound, and the read-only frame
//! composer that feeds them from game state.
//!
//! Coordinates are character cells on a fixed 36×20 canvas.

use combat::{Battle, SpellId};
use dungeon::{GridPosition, ObstacleKind, StairDirection, TerrainKind};
use hero::{Dice, Role, Upgrade};
use tracing::trace;

use crate::modal::{Cursor, Modal, ModalKind};
use crate::scene::{floor_label, Game, SceneId};

pub const CANVAS_WIDTH: u16 = 36;
pub const CANVAS_HEIGHT: u16 = 20;

/// Sound effect channel.
pub const SFX_CHANNEL: u8 = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Music {
    Battle = 0,
    Dungeon = 1,
    Town = 2,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Sfx {
    PowerUp = 32,
    Door = 33,
    Stairs = 34,
    Confirm = 35,
    Return = 36,
}

/// Drawing surface.
pub trait Screen {
    /// Bordered box from (x1, y1) to (x2, y2), exclusive, one text line per
    /// inner row.
    fn draw_panel(&mut self, x1: u16, y1: u16, x2: u16, y2: u16, lines: &[String]);

    /// Selection marker on `row`, at the candidate column `selected`.
    fn draw_selector(&mut self, columns: &[u16], row: u16, selected: usize);

    fn draw_field(&mut self, view: &FieldView);

    fn draw_portrait(&mut self, portrait: u8, name: &str);
}

/// Sound output.
pub trait Audio {
    fn play_sfx(&mut self, channel: u8, id: u8);

    /// Starts a looping track.
    fn play_music(&mut self, id: u8);
}

/// Audio sink for terminals, which can't play sound: cues only go to the
/// log.
#[derive(Debug, Default)]
pub struct LogAudio;

impl Audio for LogAudio {
    fn play_sfx(&mut self, channel: u8, id: u8) {
        trace!(channel, id, "sfx");
    }

    fn play_music(&mut self, id: u8) {
        trace!(id, "music");
    }
}

/// 地图格子的显示类型
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Glyph {
    Floor,
    Wall,
    Fountain,
    StairsUp,
    StairsDown,
    Door,
    Chest,
    Npc,
    Player,
}

impl Glyph {
    pub fn symbol(self) -> char {
        match self {
            Glyph::Floor => '.',
            Glyph::Wall => '#',
            Glyph::Fountain => '~',
            Glyph::StairsUp => '<',
            Glyph::StairsDown => '>',
            Glyph::Door => '+',
            Glyph::Chest => '$',
            Glyph::Npc => '&',
            Glyph::Player => '@',
        }
    }
}

/// The player's surroundings, centred on the player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldView {
    pub floor: i32,
    /// `(2 × radius + 1)` rows of as many cells.
    pub rows: Vec<Vec<Glyph>>,
    pub status: String,
}

/// Cells shown on each side of the player.
pub const VIEW_RADIUS: i32 = 3;

#[derive(Copy, Clone, Debug)]
struct Panel {
    x1: u16,
    y1: u16,
    x2: u16,
    y2: u16,
}

impl Panel {
    const fn new(x1: u16, y1: u16, x2: u16, y2: u16) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn capacity(self) -> usize {
        usize::from(self.y2.saturating_sub(self.y1 + 2))
    }

    /// Draws the box. Lines past the last inner row are dropped.
    fn draw(self, screen: &mut dyn Screen, lines: &[String]) {
        let shown = &lines[..lines.len().min(self.capacity())];
        screen.draw_panel(self.x1, self.y1, self.x2, self.y2, shown);
    }

    fn draw_cursor(self, screen: &mut dyn Screen, cursor: &Cursor) {
        if cursor.line >= self.capacity() {
            return;
        }
        let columns: Vec<u16> = cursor.columns.iter().map(|c| self.x1 + 1 + c).collect();
        let row = self.y1 + 1 + cursor.line as u16;
        screen.draw_selector(&columns, row, cursor.pos);
    }
}

const TITLE_PANEL: Panel = Panel::new(6, 2, 30, 7);
const STATUS_PANEL: Panel = Panel::new(0, 0, CANVAS_WIDTH, 7);
const MESSAGE_PANEL: Panel = Panel::new(0, 13, CANVAS_WIDTH, 19);
const BATTLE_STATUS_PANEL: Panel = Panel::new(20, 0, CANVAS_WIDTH, 5);
const BATTLE_MESSAGE_PANEL: Panel = Panel::new(0, 8, CANVAS_WIDTH, 19);

/// Composes one frame. Reads game state only.
pub fn draw<D: Dice>(game: &Game<D>, screen: &mut dyn Screen) {
    match game.scene() {
        SceneId::Title => TITLE_PANEL.draw(
            screen,
            &["Tiny Dungeon".to_string(), "         RPG".to_string()],
        ),
        SceneId::Field => screen.draw_field(&field_view(game)),
        SceneId::Battle => {
            if let Some(battle) = game.battle() {
                draw_battle(game, battle, screen);
            }
        }
        SceneId::Menu | SceneId::GameOver => {}
    }

    let Some(modal) = game.modal() else {
        return;
    };
    if let Some(lines) = side_panel(game, modal) {
        STATUS_PANEL.draw(screen, &lines);
    }
    if !modal.kind.is_battle() {
        MESSAGE_PANEL.draw(screen, &modal.lines);
        if let Some(cursor) = &modal.cursor {
            MESSAGE_PANEL.draw_cursor(screen, cursor);
        }
    }
}

fn draw_battle<D: Dice>(game: &Game<D>, battle: &Battle, screen: &mut dyn Screen) {
    if let Role::Monster { portrait } = battle.monster.role {
        screen.draw_portrait(portrait, &battle.monster.name);
    }
    let player = &game.session().player;
    BATTLE_STATUS_PANEL.draw(
        screen,
        &[
            player.name.clone(),
            format!("HP {:>3}", player.hp),
            format!("MP  {:>2}", player.mp),
        ],
    );
    match game.modal().filter(|m| m.kind.is_battle()) {
        Some(modal) => {
            BATTLE_MESSAGE_PANEL.draw(screen, &modal.lines);
            if let Some(cursor) = &modal.cursor {
                BATTLE_MESSAGE_PANEL.draw_cursor(screen, cursor);
            }
        }
        None => BATTLE_MESSAGE_PANEL.draw(screen, &battle.log),
    }
}

/// Detail panel that goes with a selector: player status for the menu,
/// the highlighted spell or the highlighted upgrade.
fn side_panel<D: Dice>(game: &Game<D>, modal: &Modal) -> Option<Vec<String>> {
    let session = game.session();
    let player = &session.player;
    let pos = modal.pos().unwrap_or(0);
    match modal.kind {
        ModalKind::Menu => Some(vec![
            format!("HP {:>3}/{:>3}", player.hp, player.max_hp),
            format!("MP  {:>2}/ {:>2}", player.mp, player.max_mp),
            format!("ATK {:>2}  SPD {:>2}", player.attack, player.speed),
            format!(" {:>4}G  Keys {:>2}", session.gold, session.keys),
        ]),
        ModalKind::MenuSpells => {
            let id = *session.available_spells(false).get(pos)?;
            Some(spell_detail(id, game))
        }
        ModalKind::Shop => {
            let upgrade = Upgrade::from_index(pos)?;
            let next = upgrade
                .next(player)
                .map_or_else(|| "---".to_string(), |n| format!("{:>3}", n));
            let cost = upgrade.cost(player);
            Some(vec![
                format!("{:<3} {:>3} -> {}", upgrade, upgrade.current(player), next),
                match cost {
                    Some(cost) => format!("Power up for {}G", cost),
                    None => "Can't power up more".to_string(),
                },
                if cost.is_some_and(|c| c > session.gold) {
                    "# Not enough gold".to_string()
                } else {
                    String::new()
                },
                format!("  (Gold {:>4}G)", session.gold),
            ])
        }
        _ => None,
    }
}

fn spell_detail<D: Dice>(id: SpellId, game: &Game<D>) -> Vec<String> {
    let player = &game.session().player;
    let spell = id.spell();
    vec![
        format!("{:<6}  MP {:>2}", spell.name, id.cost(player)),
        spell.description[0].to_string(),
        spell.description[1].to_string(),
        if spell.usable_in_field {
            format!("Current MP {}", player.mp)
        } else {
            "Can't use here".to_string()
        },
    ]
}

/// The cells around the player, with unresolved obstacles on top of the
/// terrain.
pub fn field_view<D: Dice>(game: &Game<D>) -> FieldView {
    let session = game.session();
    let center = session.pos;
    let obstacles: Vec<_> = game
        .registry()
        .visible_on(center.floor, &session.flags)
        .collect();

    let rows = (-VIEW_RADIUS..=VIEW_RADIUS)
        .map(|dy| {
            (-VIEW_RADIUS..=VIEW_RADIUS)
                .map(|dx| {
                    let pos = GridPosition::new(center.x + dx, center.y + dy, center.floor);
                    if pos == center {
                        return Glyph::Player;
                    }
                    if let Some(obstacle) = obstacles.iter().find(|o| o.pos == pos) {
                        return match obstacle.kind {
                            ObstacleKind::Door => Glyph::Door,
                            ObstacleKind::Chest => Glyph::Chest,
                            ObstacleKind::Npc => Glyph::Npc,
                        };
                    }
                    match game.terrain().query_cell(pos) {
                        TerrainKind::Floor => Glyph::Floor,
                        TerrainKind::Wall => Glyph::Wall,
                        TerrainKind::Fountain => Glyph::Fountain,
                        TerrainKind::Stairs(StairDirection::Up) => Glyph::StairsUp,
                        TerrainKind::Stairs(StairDirection::Down) => Glyph::StairsDown,
                    }
                })
                .collect()
        })
        .collect();

    FieldView {
        floor: center.floor,
        rows,
        status: format!(
            "{} HP{:>3} MP{:>2} {:>4}G",
            floor_label(center.floor),
            session.player.hp,
            session.player.mp,
            session.gold
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_clips_to_inner_rows() {
        assert_eq!(MESSAGE_PANEL.capacity(), 4);
        assert_eq!(BATTLE_STATUS_PANEL.capacity(), 3);
        assert_eq!(BATTLE_MESSAGE_PANEL.capacity(), 9);
    }

    #[test]
    fn audio_ids() {
        assert_eq!(Music::Town as u8, 2);
        assert_eq!(Sfx::Return as u8, 36);
    }
}
