// src/hero/src/rng.rs
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::collections::VecDeque;

/// Source of every random roll in the game.
///
/// Integer rolls are inclusive on both ends; float rolls are uniform on
/// `[lo, hi]`.
pub trait Dice {
    fn rndi(&mut self, lo: i32, hi: i32) -> i32;
    fn rndf(&mut self, lo: f64, hi: f64) -> f64;
}

/// 游戏使用的确定性RNG
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: Pcg32,
    seed: u64,
}

impl GameRng {
    /// 使用指定种子创建新RNG
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            seed,
        }
    }

    /// 使用随机种子创建新RNG
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// 获取当前种子值
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Dice for GameRng {
    fn rndi(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.rng.random_range(lo..=hi)
    }

    fn rndf(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return lo;
        }
        self.rng.random_range(lo..=hi)
    }
}

/// Replays queued rolls in order.
///
/// Each roll is clamped into the requested range; once a queue runs dry the
/// low end of the range is returned. Used for deterministic replays and in
/// tests.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    ints: VecDeque<i32>,
    floats: VecDeque<f64>,
}

impl ScriptedDice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ints(mut self, rolls: impl IntoIterator<Item = i32>) -> Self {
        self.push_ints(rolls);
        self
    }

    pub fn floats(mut self, rolls: impl IntoIterator<Item = f64>) -> Self {
        self.push_floats(rolls);
        self
    }

    pub fn push_ints(&mut self, rolls: impl IntoIterator<Item = i32>) {
        self.ints.extend(rolls);
    }

    pub fn push_floats(&mut self, rolls: impl IntoIterator<Item = f64>) {
        self.floats.extend(rolls);
    }

    pub fn is_exhausted(&self) -> bool {
        self.ints.is_empty() && self.floats.is_empty()
    }
}

impl Dice for ScriptedDice {
    fn rndi(&mut self, lo: i32, hi: i32) -> i32 {
        self.ints
            .pop_front()
            .map_or(lo, |v| v.clamp(lo, hi.max(lo)))
    }

    fn rndf(&mut self, lo: f64, hi: f64) -> f64 {
        self.floats
            .pop_front()
            .map_or(lo, |v| v.clamp(lo, hi.max(lo)))
    }
}
