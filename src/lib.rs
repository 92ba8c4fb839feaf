pub mod config;
pub mod field;
pub mod input;
pub mod modal;
pub mod render;
pub mod scene;
pub mod session;
pub mod terminal;

pub use crate::config::GameConfig;
pub use crate::scene::{Game, SceneId};
pub use crate::session::Session;
