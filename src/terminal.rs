//! Terminal front end: a ratatui [`Screen`] and a crossterm key sampler.

use std::{
    io::{self, Stdout},
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};

use crate::input::Buttons;
use crate::render::{FieldView, Glyph, Screen, CANVAS_HEIGHT, CANVAS_WIDTH};

/// Where the 7×7 field view sits; each cell is two columns wide.
const FIELD_ORIGIN: (u16, u16) = (11, 3);
const PORTRAIT_AREA: (u16, u16, u16, u16) = (0, 0, 20, 8);

/// Small pictures, indexed by portrait number.
const PORTRAITS: [[&str; 3]; 8] = [
    ["  ,--.  ", " ( ^^ ) ", "  `--'  "],
    ["  /\\/\\  ", " ( >< ) ", "  /  \\  "],
    ["   ~~   ", "  (oo)  ", "   ~~   "],
    ["  .--.  ", " ( OO ) ", "  \\/\\/  "],
    ["  [==]  ", "  (--)  ", "  /||\\  "],
    ["   /\\   ", "  (@@)  ", "  /##\\  "],
    [" \\ /\\ / ", "  (--)  ", " / \\/ \\ "],
    ["  *  *  ", "  (**)  ", " *(  )* "],
];

enum DrawCommand {
    Panel { rect: Rect, lines: Vec<String> },
    Selector { x: u16, y: u16 },
    Field(FieldView),
    Portrait { portrait: u8, name: String },
}

/// 终端渲染器
///
/// Screen calls are queued and flushed as one ratatui frame by
/// [`TerminalScreen::present`].
pub struct TerminalScreen<B: Backend = CrosstermBackend<Stdout>> {
    terminal: Terminal<B>,
    commands: Vec<DrawCommand>,
}

impl TerminalScreen {
    pub fn new() -> Result<Self> {
        Self::with_backend(CrosstermBackend::new(io::stdout()))
    }
}

impl<B: Backend> TerminalScreen<B> {
    pub fn with_backend(backend: B) -> Result<Self> {
        let terminal = Terminal::new(backend).context("Failed to create terminal")?;
        Ok(Self {
            terminal,
            commands: Vec::new(),
        })
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    /// Draws everything queued since the last call.
    pub fn present(&mut self) -> Result<()> {
        let commands = std::mem::take(&mut self.commands);
        self.terminal
            .draw(|frame| {
                let canvas = Rect::new(0, 0, CANVAS_WIDTH, CANVAS_HEIGHT).intersection(frame.area());
                for command in &commands {
                    render_command(frame, canvas, command);
                }
            })
            .context("Failed to draw frame")?;
        Ok(())
    }
}

impl<B: Backend> Screen for TerminalScreen<B> {
    fn draw_panel(&mut self, x1: u16, y1: u16, x2: u16, y2: u16, lines: &[String]) {
        self.commands.push(DrawCommand::Panel {
            rect: Rect::new(x1, y1, x2.saturating_sub(x1), y2.saturating_sub(y1)),
            lines: lines.to_vec(),
        });
    }

    fn draw_selector(&mut self, columns: &[u16], row: u16, selected: usize) {
        if let Some(&x) = columns.get(selected) {
            self.commands.push(DrawCommand::Selector { x, y: row });
        }
    }

    fn draw_field(&mut self, view: &FieldView) {
        self.commands.push(DrawCommand::Field(view.clone()));
    }

    fn draw_portrait(&mut self, portrait: u8, name: &str) {
        self.commands.push(DrawCommand::Portrait {
            portrait,
            name: name.to_string(),
        });
    }
}

fn render_command(frame: &mut Frame, canvas: Rect, command: &DrawCommand) {
    match command {
        DrawCommand::Panel { rect, lines } => {
            let rect = rect.intersection(canvas);
            if rect.is_empty() {
                return;
            }
            let text: Vec<Line> = lines.iter().map(|l| Line::from(l.as_str())).collect();
            frame.render_widget(Clear, rect);
            frame.render_widget(
                Paragraph::new(text).block(Block::default().borders(Borders::ALL)),
                rect,
            );
        }
        DrawCommand::Selector { x, y } => {
            if *x < canvas.right() && *y < canvas.bottom() {
                frame
                    .buffer_mut()
                    .set_string(*x, *y, "▶", Style::default().fg(Color::Yellow));
            }
        }
        DrawCommand::Field(view) => {
            let lines: Vec<Line> = view
                .rows
                .iter()
                .map(|row| Line::from(row.iter().map(|g| glyph_span(*g)).collect::<Vec<_>>()))
                .collect();
            let (x, y) = FIELD_ORIGIN;
            let height = view.rows.len() as u16;
            let width = view.rows.first().map_or(0, |r| r.len() as u16 * 2);
            frame.render_widget(Paragraph::new(lines), Rect::new(x, y, width, height).intersection(canvas));
            let status = Rect::new(0, CANVAS_HEIGHT - 1, CANVAS_WIDTH, 1).intersection(canvas);
            frame.render_widget(Paragraph::new(view.status.as_str()), status);
        }
        DrawCommand::Portrait { portrait, name } => {
            let (x, y, w, h) = PORTRAIT_AREA;
            let art = PORTRAITS.get(usize::from(*portrait)).unwrap_or(&PORTRAITS[0]);
            let mut lines = vec![Line::from("")];
            lines.extend(art.iter().map(|l| {
                Line::from(Span::styled(format!("     {}", l), Style::default().fg(Color::Magenta)))
            }));
            let block = Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(name.as_str(), Style::default().add_modifier(Modifier::BOLD)));
            frame.render_widget(Paragraph::new(lines).block(block), Rect::new(x, y, w, h).intersection(canvas));
        }
    }
}

fn glyph_span(glyph: Glyph) -> Span<'static> {
    let color = match glyph {
        Glyph::Floor => Color::DarkGray,
        Glyph::Wall => Color::Gray,
        Glyph::Fountain => Color::Cyan,
        Glyph::StairsUp | Glyph::StairsDown => Color::White,
        Glyph::Door => Color::Yellow,
        Glyph::Chest => Color::LightYellow,
        Glyph::Npc => Color::Green,
        Glyph::Player => Color::LightRed,
    };
    Span::styled(format!("{} ", glyph.symbol()), Style::default().fg(color))
}

const UP: usize = 0;
const DOWN: usize = 1;
const LEFT: usize = 2;
const RIGHT: usize = 3;

#[derive(Copy, Clone, Debug)]
struct HeldKey {
    last_event: Instant,
    repeating: bool,
}

/// 终端输入采样
///
/// Terminals rarely report key releases, so a direction counts as held for
/// `hold_window` after its first press and for a shorter gap between
/// auto-repeats. With `release_events` the terminal reports releases and
/// those are used instead.
pub struct TerminalInput {
    hold_window: Duration,
    release_events: bool,
    held: [Option<HeldKey>; 4],
    quit: bool,
}

impl TerminalInput {
    pub fn new(hold_window: Duration, release_events: bool) -> Self {
        Self {
            hold_window,
            release_events,
            held: [None; 4],
            quit: false,
        }
    }

    /// Ctrl-C was pressed.
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Drains pending key events into this tick's snapshot.
    pub fn sample(&mut self) -> Result<Buttons> {
        let now = Instant::now();
        let mut buttons = Buttons::none();
        while event::poll(Duration::ZERO).context("Failed to poll input")? {
            if let Event::Key(key) = event::read().context("Failed to read input")? {
                self.apply(key, now, &mut buttons);
            }
        }

        let repeat_gap = (self.hold_window / 4).max(Duration::from_millis(50));
        for slot in &mut self.held {
            if self.release_events {
                continue;
            }
            if let Some(key) = slot {
                let window = if key.repeating { repeat_gap } else { self.hold_window };
                if now.duration_since(key.last_event) >= window {
                    *slot = None;
                }
            }
        }
        buttons.up = self.held[UP].is_some();
        buttons.down = self.held[DOWN].is_some();
        buttons.left = self.held[LEFT].is_some();
        buttons.right = self.held[RIGHT].is_some();
        Ok(buttons)
    }

    fn apply(&mut self, key: KeyEvent, now: Instant, buttons: &mut Buttons) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit = true;
            return;
        }
        let direction = match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(UP),
            KeyCode::Down | KeyCode::Char('j') => Some(DOWN),
            KeyCode::Left | KeyCode::Char('h') => Some(LEFT),
            KeyCode::Right | KeyCode::Char('l') => Some(RIGHT),
            _ => None,
        };

        match (direction, key.kind) {
            (Some(dir), KeyEventKind::Release) => self.held[dir] = None,
            (Some(dir), _) => {
                let repeating = key.kind == KeyEventKind::Repeat || self.held[dir].is_some();
                self.held[dir] = Some(HeldKey {
                    last_event: now,
                    repeating,
                });
            }
            (None, KeyEventKind::Release) => {}
            (None, _) => match key.code {
                KeyCode::Char('z') | KeyCode::Enter | KeyCode::Char(' ') => buttons.confirm = true,
                KeyCode::Char('x') | KeyCode::Esc => buttons.cancel = true,
                _ => {}
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn row_text(screen: &TerminalScreen<TestBackend>, y: u16) -> String {
        let buffer = screen.backend().buffer();
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn panels_and_selector_land_on_the_canvas() {
        let mut screen = TerminalScreen::with_backend(TestBackend::new(40, 22)).unwrap();
        screen.draw_panel(0, 13, 36, 19, &["Unlocked the door".to_string(), " Yes No".to_string()]);
        screen.draw_selector(&[1, 5], 15, 1);
        screen.present().unwrap();

        assert!(row_text(&screen, 14).starts_with("│Unlocked the door"));
        assert!(row_text(&screen, 15).starts_with("│ Yes▶No"));
        assert!(row_text(&screen, 13).starts_with("┌"));
    }

    #[test]
    fn field_view_draws_two_columns_per_cell() {
        let mut screen = TerminalScreen::with_backend(TestBackend::new(36, 20)).unwrap();
        screen.draw_field(&FieldView {
            floor: 0,
            rows: vec![vec![Glyph::Wall, Glyph::Player, Glyph::Door]],
            status: "B1F".to_string(),
        });
        screen.present().unwrap();

        assert_eq!(&row_text(&screen, 3)[11..17], "# @ + ");
        assert!(row_text(&screen, 19).starts_with("B1F"));
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn keys_map_to_buttons() {
        let mut input = TerminalInput::new(Duration::from_millis(500), false);
        let now = Instant::now();
        let mut buttons = Buttons::none();
        input.apply(press(KeyCode::Char('z')), now, &mut buttons);
        input.apply(press(KeyCode::Esc), now, &mut buttons);
        input.apply(press(KeyCode::Char('h')), now, &mut buttons);
        assert!(buttons.confirm && buttons.cancel);
        assert!(input.held[LEFT].is_some());
        assert!(!input.quit_requested());

        input.apply(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), now, &mut buttons);
        assert!(input.quit_requested());
    }

    #[test]
    fn release_clears_held_direction() {
        let mut input = TerminalInput::new(Duration::from_millis(500), true);
        let now = Instant::now();
        let mut buttons = Buttons::none();
        input.apply(press(KeyCode::Up), now, &mut buttons);
        assert!(input.held[UP].is_some());
        let mut release = press(KeyCode::Up);
        release.kind = KeyEventKind::Release;
        input.apply(release, now, &mut buttons);
        assert!(input.held[UP].is_none());
    }
}
