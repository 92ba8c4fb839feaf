//! Runtime configuration.
//!
//! Every value has a default matching the stock game; environment variables
//! (optionally loaded from a `.env` file by the binary) override them.

use std::{env, path::PathBuf};

use directories::ProjectDirs;
use dungeon::GridPosition;

const QUALIFIER: &str = "";
const ORGANIZATION: &str = "tiny-dungeon";
const APPLICATION: &str = "tiny-dungeon-rpg";

/// 游戏配置
#[derive(Clone, Debug)]
pub struct GameConfig {
    /// Simulation ticks per second. Also converts the frame counter to
    /// play time.
    pub fps: u32,
    /// Sub-steps added per tick to an in-progress move; a move is 16.
    pub step_speed: i32,
    /// Fixed RNG seed, for replays.
    pub seed: Option<u64>,
    /// Where new games start and defeated players wake up.
    pub start: GridPosition,
    pub encounter: EncounterConfig,
    pub input: InputConfig,
    pub storage: StorageConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            step_speed: 4,
            seed: None,
            start: GridPosition::new(8, 21, 0),
            encounter: EncounterConfig::default(),
            input: InputConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = parse::<PathBuf>(lookup("DRPG_SAVE_PATH")) {
            config.storage.save_path = path;
        }
        if let Some(fps) = parse::<u32>(lookup("DRPG_FPS")) {
            config.fps = fps.max(1);
        }
        if let Some(seed) = parse::<u64>(lookup("DRPG_SEED")) {
            config.seed = Some(seed);
        }
        if let Some(threshold) = parse::<u32>(lookup("DRPG_ENCOUNTER_THRESHOLD")) {
            config.encounter.threshold = threshold;
        }
        if let Some(odds) = parse::<i32>(lookup("DRPG_ENCOUNTER_ODDS")) {
            config.encounter.odds = odds.max(1);
        }
        if let Some(percent) = parse::<i32>(lookup("DRPG_SHALLOWER_PERCENT")) {
            config.encounter.shallower_percent = percent.clamp(0, 100);
        }
        if let Some(ms) = parse::<u64>(lookup("DRPG_HOLD_WINDOW_MS")) {
            config.input.hold_window_ms = ms;
        }
        if let Some(walk_repeat) = parse_bool(lookup("DRPG_WALK_REPEAT")) {
            config.input.walk_repeat = walk_repeat;
        }

        config
    }

    /// Directory for the log file, falling back to the working directory.
    pub fn log_dir() -> PathBuf {
        ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .map(|dirs| dirs.cache_dir().join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs"))
    }
}

/// Random encounter tuning.
#[derive(Clone, Debug)]
pub struct EncounterConfig {
    /// Steps that must pass before encounters can happen.
    pub threshold: u32,
    /// One encounter roll in `odds` succeeds.
    pub odds: i32,
    /// Chance (percent) of meeting the monster from one floor up.
    pub shallower_percent: i32,
    /// No encounters on floor 0.
    pub quiet_in_town: bool,
    /// No encounters between taking the treasure and getting back to town.
    pub quiet_before_ending: bool,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            threshold: 12,
            odds: 8,
            shallower_percent: 25,
            quiet_in_town: true,
            quiet_before_ending: true,
        }
    }
}

/// 输入配置
#[derive(Clone, Debug)]
pub struct InputConfig {
    /// How long a direction key counts as held after its last key event.
    pub hold_window_ms: u64,
    /// Keep walking while a direction is held.
    pub walk_repeat: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            hold_window_ms: 500,
            walk_repeat: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub save_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let save_path = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .map(|dirs| dirs.data_dir().join("save.json"))
            .unwrap_or_else(|| PathBuf::from("save.json"));
        Self { save_path }
    }
}

fn parse<T>(value: Option<String>) -> Option<T>
where
    T: std::str::FromStr,
{
    value?.trim().parse().ok()
}

fn parse_bool(value: Option<String>) -> Option<bool> {
    match value?.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_tuning() {
        let config = GameConfig::default();
        assert_eq!(config.fps, 30);
        assert_eq!(config.start, GridPosition::new(8, 21, 0));
        assert_eq!(config.encounter.threshold, 12);
        assert_eq!(config.encounter.odds, 8);
        assert_eq!(config.encounter.shallower_percent, 25);
        assert!(!config.input.walk_repeat);
        assert!(config.storage.save_path.ends_with("save.json"));
    }

    fn lookup(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn overrides_are_applied_and_clamped() {
        let config = GameConfig::from_lookup(lookup(&[
            ("DRPG_FPS", "0"),
            ("DRPG_SEED", " 42 "),
            ("DRPG_ENCOUNTER_ODDS", "-3"),
            ("DRPG_SHALLOWER_PERCENT", "250"),
            ("DRPG_WALK_REPEAT", " On "),
            ("DRPG_SAVE_PATH", "/tmp/drpg/save.json"),
        ]));
        assert_eq!(config.fps, 1);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.encounter.odds, 1);
        assert_eq!(config.encounter.shallower_percent, 100);
        assert!(config.input.walk_repeat);
        assert_eq!(config.storage.save_path, PathBuf::from("/tmp/drpg/save.json"));
    }

    #[test]
    fn unparsable_values_are_ignored() {
        let config = GameConfig::from_lookup(lookup(&[
            ("DRPG_FPS", "twelve"),
            ("DRPG_WALK_REPEAT", "maybe"),
            ("DRPG_SEED", ""),
        ]));
        assert_eq!(config.fps, 30);
        assert!(!config.input.walk_repeat);
        assert_eq!(config.seed, None);
    }
}
