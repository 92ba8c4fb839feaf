// src/save/src/lib.rs
//! 存档系统
//!
//! The whole session is written as one flat JSON object and replaced
//! wholesale on every save. Loading never fails past this boundary in
//! practice: [`SaveSystem::try_load`] turns every problem into "no save".

use anyhow::Context;
use dungeon::FlagSet;
use error::{handle_error, GameError};
use hero::GOLD_CAP;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::{debug, info, warn};

/// Largest key count a save may carry.
pub const MAX_KEYS: u32 = 99;
/// Largest quiet-step counter a save may carry.
pub const MAX_ENCOUNTER_STEPS: u32 = 9999;
/// Ceiling for every stat in a save.
pub const MAX_STAT: u32 = 999;

/// 存档数据(包含游戏完整状态)
///
/// Field names are the on-disk format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveData {
    pub x: i32,
    pub y: i32,
    /// Floor index.
    pub z: i32,
    pub gold: u32,
    pub keys: u32,
    pub flags: FlagSet,
    /// Steps since the last encounter.
    pub enc: u32,
    pub frames: u64,
    pub name: String,
    pub hp: u32,
    pub mhp: u32,
    pub mp: u32,
    pub mmp: u32,
    pub atk: u32,
    pub spd: u32,
}

impl SaveData {
    /// Validate save data integrity
    pub fn validate(&self) -> Result<(), GameError> {
        if self.gold > GOLD_CAP {
            return Err(GameError::InvalidSaveData(format!("gold {} over cap", self.gold)));
        }
        if self.mhp == 0 {
            return Err(GameError::InvalidSaveData("max HP is zero".into()));
        }
        if self.hp > self.mhp || self.mp > self.mmp {
            return Err(GameError::InvalidSaveData("current stat above maximum".into()));
        }
        if self.z < 0 {
            return Err(GameError::InvalidSaveData(format!("floor {}", self.z)));
        }
        if self.keys > MAX_KEYS {
            return Err(GameError::InvalidSaveData(format!("{} keys", self.keys)));
        }
        if self.enc > MAX_ENCOUNTER_STEPS {
            return Err(GameError::InvalidSaveData(format!("encounter counter {}", self.enc)));
        }
        let stats = [
            ("mhp", self.mhp),
            ("mmp", self.mmp),
            ("atk", self.atk),
            ("spd", self.spd),
        ];
        if let Some((name, value)) = stats.into_iter().find(|(_, v)| *v > MAX_STAT) {
            return Err(GameError::InvalidSaveData(format!("{} {}", name, value)));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses and validates a payload. Anything that is not a save record
    /// comes back as [`GameError::CorruptedSave`].
    pub fn from_json(payload: &str) -> Result<Self, GameError> {
        let data: SaveData = serde_json::from_str(payload).map_err(|e| {
            debug!(error = %e, "save payload does not parse");
            GameError::CorruptedSave
        })?;
        data.validate()?;
        Ok(data)
    }
}

/// Where a save payload lives: a file on disk or a key-value slot.
pub trait SaveStore: Send {
    /// The stored payload, or `None` if nothing was ever saved.
    fn read(&self) -> Result<Option<String>, GameError>;

    /// Replaces the stored payload.
    fn write(&mut self, payload: &str) -> Result<(), GameError>;
}

/// 文件存档
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SaveStore for FileStore {
    fn read(&self) -> Result<Option<String>, GameError> {
        match fs::read_to_string(&self.path) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, payload: &str) -> Result<(), GameError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).context("Failed to create save directory")?;
        }

        // 创建临时文件
        let temp_path = self.path.with_extension("tmp");
        let mut file =
            fs::File::create(&temp_path).context("Failed to create temporary save file")?;
        file.write_all(payload.as_bytes())
            .context("Failed to write save data")?;

        // 确保数据写入磁盘
        file.flush().context("Failed to flush save data")?;

        // 原子性重命名
        fs::rename(&temp_path, &self.path).context("Failed to commit save file")?;
        Ok(())
    }
}

/// Single in-memory slot, the key-value store flavour of a save target.
///
/// Clones share the slot.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `payload`.
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(payload.into()))),
        }
    }

    pub fn payload(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl SaveStore for MemoryStore {
    fn read(&self) -> Result<Option<String>, GameError> {
        self.slot
            .lock()
            .map(|slot| slot.clone())
            .map_err(|_| GameError::StorageError("save slot lock poisoned".into()))
    }

    fn write(&mut self, payload: &str) -> Result<(), GameError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| GameError::StorageError("save slot lock poisoned".into()))?;
        *slot = Some(payload.to_string());
        Ok(())
    }
}

/// 存档系统
pub struct SaveSystem {
    store: Box<dyn SaveStore>,
}

impl SaveSystem {
    pub fn new(store: impl SaveStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// 加载游戏状态
    pub fn load(&self) -> Result<SaveData, GameError> {
        let payload = self.store.read()?.ok_or(GameError::MissingSave)?;
        SaveData::from_json(&payload)
    }

    /// Loads the save, treating every failure as "no save".
    pub fn try_load(&self) -> Option<SaveData> {
        match self.load() {
            Ok(data) => {
                info!(floor = data.z, gold = data.gold, "save loaded");
                Some(data)
            }
            Err(GameError::MissingSave) => {
                debug!("no save data, starting fresh");
                None
            }
            Err(e) if e.is_recoverable() => {
                warn!(reason = %handle_error(&e), "starting fresh");
                None
            }
            Err(e) => {
                tracing::error!(reason = %handle_error(&e), "save backend failed, starting fresh");
                None
            }
        }
    }

    /// 保存游戏状态
    pub fn save(&mut self, data: &SaveData) -> Result<(), GameError> {
        let payload = data.to_json()?;
        self.store.write(&payload)
    }

    /// Saves, logging and swallowing any failure. Returns whether the
    /// write went through.
    pub fn save_best_effort(&mut self, data: &SaveData) -> bool {
        match self.save(data) {
            Ok(()) => {
                info!(floor = data.z, "game saved");
                true
            }
            Err(e) => {
                warn!(reason = %handle_error(&e), "save failed, continuing unsaved");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn sample() -> SaveData {
        SaveData {
            x: 24,
            y: 10,
            z: 1,
            gold: 9999,
            keys: 2,
            flags: ["0-6", "0-8", "sp1"].into_iter().collect(),
            enc: 7,
            frames: 123_456,
            name: "Hero".into(),
            hp: 17,
            mhp: 35,
            mp: 3,
            mmp: 8,
            atk: 14,
            spd: 12,
        }
    }

    /// Always fails to write.
    struct BrokenStore;

    impl SaveStore for BrokenStore {
        fn read(&self) -> Result<Option<String>, GameError> {
            Err(GameError::StorageError("unplugged".into()))
        }

        fn write(&mut self, _payload: &str) -> Result<(), GameError> {
            Err(GameError::StorageError("unplugged".into()))
        }
    }

    #[test]
    fn file_round_trip() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("save.json");
        let mut system = SaveSystem::new(FileStore::new(&path));
        assert!(matches!(system.load(), Err(GameError::MissingSave)));

        system.save(&sample()).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
        assert_eq!(system.load().unwrap(), sample());
    }

    #[test]
    fn payload_uses_flat_field_names() {
        let json: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        for key in [
            "x", "y", "z", "gold", "keys", "flags", "enc", "frames", "name", "hp", "mhp", "mp",
            "mmp", "atk", "spd",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
        assert!(json["flags"].is_array());
    }

    #[test]
    fn missing_record_is_no_save() {
        let system = SaveSystem::new(MemoryStore::new());
        assert!(matches!(system.load(), Err(GameError::MissingSave)));
        assert!(system.try_load().is_none());
    }

    #[test]
    fn corrupt_payloads_are_no_save() {
        for payload in [
            "",
            "{not json",
            r#"{"x":1,"y":2}"#,
            r#"{"x":1,"y":2,"z":0,"gold":-5,"keys":0,"flags":[],"enc":0,"frames":0,"name":"a","hp":1,"mhp":1,"mp":0,"mmp":0,"atk":1,"spd":1}"#,
        ] {
            let system = SaveSystem::new(MemoryStore::with_payload(payload));
            assert!(system.try_load().is_none(), "accepted {:?}", payload);
        }
    }

    #[test]
    fn unparsable_payload_is_corrupted() {
        let system = SaveSystem::new(MemoryStore::with_payload("{not json"));
        let err = system.load().unwrap_err();
        assert!(matches!(err, GameError::CorruptedSave));
        assert!(err.is_recoverable());
        assert_eq!(handle_error(&err), "Save data is corrupted");
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let mut data = sample();
        data.gold = 10_000;
        assert!(matches!(data.validate(), Err(GameError::InvalidSaveData(_))));
        let mut data = sample();
        data.hp = data.mhp + 1;
        assert!(data.validate().is_err());
    }

    #[test]
    fn counters_near_overflow_are_rejected() {
        let cases: [fn(&mut SaveData); 5] = [
            |d| d.keys = u32::MAX,
            |d| d.enc = u32::MAX - 1,
            |d| {
                d.mmp = u32::MAX;
                d.mp = u32::MAX;
            },
            |d| d.atk = 1_000,
            |d| d.spd = u32::MAX,
        ];
        for tweak in cases {
            let mut data = sample();
            tweak(&mut data);
            let json = data.to_json().unwrap();
            let system = SaveSystem::new(MemoryStore::with_payload(json));
            assert!(matches!(system.load(), Err(GameError::InvalidSaveData(_))));
            assert!(system.try_load().is_none());
        }

        let mut edge = sample();
        edge.keys = MAX_KEYS;
        edge.enc = MAX_ENCOUNTER_STEPS;
        edge.mmp = MAX_STAT;
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn failed_write_is_swallowed() {
        let mut system = SaveSystem::new(BrokenStore);
        assert!(!system.save_best_effort(&sample()));
        assert!(system.try_load().is_none());
    }

    #[test]
    fn memory_store_clones_share_slot() {
        let store = MemoryStore::new();
        let mut system = SaveSystem::new(store.clone());
        assert!(system.save_best_effort(&sample()));
        assert!(store.payload().unwrap().contains("\"gold\":9999"));
    }
}
