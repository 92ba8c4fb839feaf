//! 游戏错误处理模块
//!
//! 处理游戏运行过程中可能出现的各种错误：存档读写、JSON 解析、IO，
//! 以及玩家在游戏内被拒绝的操作（没有钥匙、MP 不足、金币不足等）。

use thiserror::Error;

/// 游戏运行过程中可能出现的错误类型
#[derive(Debug, Error)]
pub enum GameError {
    /// 存档系统错误
    #[error("Save system error: {0}")]
    SaveError(#[from] anyhow::Error),

    /// IO操作错误
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON 序列化/反序列化错误
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// 存储后端错误（键值存储不可用等）
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 没有存档
    #[error("No save data")]
    MissingSave,

    /// 存档数据损坏
    #[error("Corrupted save data")]
    CorruptedSave,

    /// 存档字段取值非法
    #[error("Invalid save data: {0}")]
    InvalidSaveData(String),
}

impl GameError {
    /// Whether the caller should quietly fall back to a fresh session.
    ///
    /// Every load failure is recoverable; the only reason to tell them apart
    /// is logging.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GameError::MissingSave
                | GameError::CorruptedSave
                | GameError::InvalidSaveData(_)
                | GameError::JsonError(_)
                | GameError::IoError(_)
                | GameError::StorageError(_)
        )
    }
}

/// 处理游戏错误并转换为用户友好的消息
pub fn handle_error(error: &GameError) -> String {
    match error {
        GameError::MissingSave => "No save data found".to_string(),
        GameError::CorruptedSave | GameError::JsonError(_) => "Save data is corrupted".to_string(),
        GameError::InvalidSaveData(field) => format!("Save data is invalid: {}", field),
        GameError::IoError(e) => match e.kind() {
            std::io::ErrorKind::NotFound => "Save file does not exist".to_string(),
            std::io::ErrorKind::PermissionDenied => "No permission to access save file".to_string(),
            _ => format!("IO error: {}", e),
        },
        _ => error.to_string(),
    }
}

/// 玩家操作被拒绝的原因。
///
/// 这些都不是真正的错误：状态保持不变，最多显示一条游戏内消息。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("You have no key")]
    NoKey,
    #[error("Not enough MP")]
    NotEnoughMp,
    #[error("Not enough gold")]
    NotEnoughGold,
    #[error("Cannot power up any further")]
    MaxedOut,
    #[error("Cannot use that here")]
    NotUsableHere,
}
