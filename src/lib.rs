//! Infinite side-scroller core: streams terrain and trees around the avatar,
//! runs the ambient day/night scenery and keeps a host registry in sync.
#![forbid(unsafe_code)]

pub mod avatar;
pub mod camera;
pub mod config;
pub mod event;
pub mod game;
pub mod host;
pub mod sim;

pub use config::{GameConfig, load_config_from_path};
pub use game::{Game, GameStats};
