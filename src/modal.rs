//! The single modal slot: a message box, optionally with a selector.

use combat::Boss;

use crate::input::Buttons;

/// Which dialog is open. Each kind routes its selection differently.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ModalKind {
    /// Plain message, closed by confirm or by walking away.
    Message,
    Title,
    Menu,
    MenuSpells,
    Shop,
    BossConfirm(Boss),
    BattleCommand,
    BattleSpells,
}

impl ModalKind {
    /// Shown inside the battle message panel instead of the field one.
    pub fn is_battle(self) -> bool {
        matches!(self, ModalKind::BattleCommand | ModalKind::BattleSpells)
    }
}

/// What cancel does on a selector.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CancelAction {
    /// Cancel is not accepted.
    Ignore,
    /// Leave the selector.
    Back,
    /// Same as picking this option.
    Select(usize),
}

/// Result of one selector update.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Choice {
    Selected(usize),
    Back,
}

/// 选择光标
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cursor {
    /// Index of the modal line holding the options.
    pub line: usize,
    /// Character offset of each option's marker within that line.
    pub columns: Vec<u16>,
    pub pos: usize,
    pub on_cancel: CancelAction,
}

impl Cursor {
    pub fn new(line: usize, columns: Vec<u16>, on_cancel: CancelAction) -> Self {
        Self {
            line,
            columns,
            pos: 0,
            on_cancel,
        }
    }

    pub fn with_pos(mut self, pos: usize) -> Self {
        self.pos = pos.min(self.columns.len().saturating_sub(1));
        self
    }

    /// Moves on left/right (wrapping), then reports a confirm or cancel.
    /// Returns whether the cursor moved and the choice, if any.
    ///
    /// Held directions must already be debounced by the caller.
    pub fn update(&mut self, buttons: &Buttons) -> (bool, Option<Choice>) {
        let len = self.columns.len();
        let moved = match buttons.horizontal() {
            Some(step) if len > 0 => {
                self.pos = (self.pos as isize + step).rem_euclid(len as isize) as usize;
                true
            }
            _ => false,
        };

        let choice = if buttons.confirm {
            Some(Choice::Selected(self.pos))
        } else if buttons.cancel {
            match self.on_cancel {
                CancelAction::Ignore => None,
                CancelAction::Back => Some(Choice::Back),
                CancelAction::Select(i) => Some(Choice::Selected(i)),
            }
        } else {
            None
        };
        (moved, choice)
    }
}

/// 模态窗口
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Modal {
    pub kind: ModalKind,
    pub lines: Vec<String>,
    pub cursor: Option<Cursor>,
}

impl Modal {
    pub fn message(lines: Vec<String>) -> Self {
        Self {
            kind: ModalKind::Message,
            lines,
            cursor: None,
        }
    }

    /// A prompt whose last line is the option row.
    pub fn choice(kind: ModalKind, mut lines: Vec<String>, options: &[&str], on_cancel: CancelAction) -> Self {
        let (row, columns) = option_line(options);
        lines.push(row);
        let cursor = Cursor::new(lines.len() - 1, columns, on_cancel);
        Self {
            kind,
            lines,
            cursor: Some(cursor),
        }
    }

    pub fn with_pos(mut self, pos: usize) -> Self {
        self.cursor = self.cursor.map(|c| c.with_pos(pos));
        self
    }

    pub fn pos(&self) -> Option<usize> {
        self.cursor.as_ref().map(|c| c.pos)
    }
}

/// Lays options out on one line, each preceded by the space its selector
/// marker sits on. Returns the line and the marker offsets.
pub fn option_line(options: &[&str]) -> (String, Vec<u16>) {
    let mut line = String::new();
    let mut columns = Vec::with_capacity(options.len());
    for option in options {
        columns.push(line.chars().count() as u16);
        line.push(' ');
        line.push_str(option);
    }
    (line, columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon::Direction;

    #[test]
    fn option_columns_point_at_marker_spaces() {
        let (line, columns) = option_line(&["New", "Continue", "Exit"]);
        assert_eq!(line, " New Continue Exit");
        assert_eq!(columns, vec![0, 4, 13]);
    }

    #[test]
    fn cursor_wraps_both_ways() {
        let mut cursor = Cursor::new(1, vec![0, 4, 8], CancelAction::Ignore);
        assert_eq!(cursor.update(&Buttons::held(Direction::Left)), (true, None));
        assert_eq!(cursor.pos, 2);
        cursor.update(&Buttons::held(Direction::Right));
        assert_eq!(cursor.pos, 0);
    }

    #[test]
    fn cancel_actions() {
        let mut cursor = Cursor::new(0, vec![0, 4], CancelAction::Ignore);
        assert_eq!(cursor.update(&Buttons::cancel()), (false, None));
        cursor.on_cancel = CancelAction::Back;
        assert_eq!(cursor.update(&Buttons::cancel()).1, Some(Choice::Back));
        cursor.on_cancel = CancelAction::Select(1);
        assert_eq!(cursor.update(&Buttons::cancel()).1, Some(Choice::Selected(1)));
        assert_eq!(cursor.update(&Buttons::confirm()).1, Some(Choice::Selected(0)));
    }

    #[test]
    fn choice_modal_puts_cursor_on_option_row() {
        let modal = Modal::choice(
            ModalKind::BossConfirm(Boss::Goddess),
            vec!["Ready?".into()],
            &["Yes", "No"],
            CancelAction::Select(1),
        )
        .with_pos(5);
        let cursor = modal.cursor.as_ref().unwrap();
        assert_eq!(cursor.line, 1);
        assert_eq!(cursor.pos, 1);
        assert_eq!(modal.lines[1], " Yes No");
    }
}
