//! Per-tick button snapshot and held-direction debouncing.

use dungeon::Direction;

/// Buttons sampled once per tick.
///
/// Directions are level-triggered (held); confirm and cancel are
/// edge-triggered by whatever produced the snapshot.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Buttons {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub confirm: bool,
    pub cancel: bool,
}

impl Buttons {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn confirm() -> Self {
        Self {
            confirm: true,
            ..Self::default()
        }
    }

    pub fn cancel() -> Self {
        Self {
            cancel: true,
            ..Self::default()
        }
    }

    pub fn held(dir: Direction) -> Self {
        let mut buttons = Self::default();
        match dir {
            Direction::Up => buttons.up = true,
            Direction::Down => buttons.down = true,
            Direction::Left => buttons.left = true,
            Direction::Right => buttons.right = true,
        }
        buttons
    }

    pub fn any_direction(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    pub fn without_directions(self) -> Self {
        Self {
            confirm: self.confirm,
            cancel: self.cancel,
            ..Self::default()
        }
    }

    /// Walking direction. Vertical input wins over horizontal, and opposite
    /// keys cancel out.
    pub fn direction(&self) -> Option<Direction> {
        match (self.down as i8 - self.up as i8, self.right as i8 - self.left as i8) {
            (1, _) => Some(Direction::Down),
            (-1, _) => Some(Direction::Up),
            (0, 1) => Some(Direction::Right),
            (0, -1) => Some(Direction::Left),
            _ => None,
        }
    }

    /// Selector step: `1` for right, `-1` for left. Right wins a tie.
    pub fn horizontal(&self) -> Option<isize> {
        if self.right {
            Some(1)
        } else if self.left {
            Some(-1)
        } else {
            None
        }
    }
}

/// Honours a held direction once, then ignores it until every direction
/// is released.
#[derive(Clone, Debug, Default)]
pub struct DirectionLatch {
    armed: bool,
}

impl DirectionLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self) {
        self.armed = true;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Strips held directions while armed. Releasing every direction
    /// disarms the latch.
    pub fn filter(&mut self, buttons: Buttons) -> Buttons {
        if !buttons.any_direction() {
            self.armed = false;
            return buttons;
        }
        if self.armed {
            buttons.without_directions()
        } else {
            buttons
        }
    }
}
