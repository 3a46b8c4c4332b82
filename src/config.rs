use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;
use verdure_world::worldgen::{WorldGenError, WorldGenParams};
use verdure_world::WorldGenConfig;

#[derive(Clone, Debug, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub window: Window,
    #[serde(default = "default_seed")]
    pub seed: i32,
    #[serde(default = "default_cycle_length")]
    pub cycle_length: f32,
    #[serde(default)]
    pub spawn_x: f32,
    #[serde(default)]
    pub avatar: AvatarConfig,
    #[serde(default)]
    pub worldgen: WorldGenConfig,
}
fn default_seed() -> i32 {
    12345
}
fn default_cycle_length() -> f32 {
    30.0
}
impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: Window::default(),
            seed: default_seed(),
            cycle_length: default_cycle_length(),
            spawn_x: 0.0,
            avatar: AvatarConfig::default(),
            worldgen: WorldGenConfig::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Window {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
}
fn default_width() -> f32 {
    800.0
}
fn default_height() -> f32 {
    600.0
}
impl Default for Window {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct AvatarConfig {
    #[serde(default = "default_size")]
    pub size: f32,
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// Negative: screen y grows downwards.
    #[serde(default = "default_jump_speed")]
    pub jump_speed: f32,
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    #[serde(default = "default_move_energy")]
    pub move_energy: f32,
    #[serde(default = "default_jump_energy")]
    pub jump_energy: f32,
    #[serde(default = "default_max_energy")]
    pub max_energy: f32,
    #[serde(default = "default_fruit_energy")]
    pub fruit_energy: f32,
    #[serde(default = "default_clip_time")]
    pub clip_time: f32,
}
fn default_size() -> f32 {
    50.0
}
fn default_speed() -> f32 {
    400.0
}
fn default_jump_speed() -> f32 {
    -650.0
}
fn default_gravity() -> f32 {
    600.0
}
fn default_move_energy() -> f32 {
    0.5
}
fn default_jump_energy() -> f32 {
    10.0
}
fn default_max_energy() -> f32 {
    100.0
}
fn default_fruit_energy() -> f32 {
    10.0
}
fn default_clip_time() -> f32 {
    0.1
}
impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            speed: default_speed(),
            jump_speed: default_jump_speed(),
            gravity: default_gravity(),
            move_energy: default_move_energy(),
            jump_energy: default_jump_energy(),
            max_energy: default_max_energy(),
            fruit_energy: default_fruit_energy(),
            clip_time: default_clip_time(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    BadWindow { width: f32, height: f32 },
    BadCycleLength(f32),
    BadAvatar(&'static str),
    WorldGen(WorldGenError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::BadWindow { width, height } => {
                write!(f, "window must be positive, got {}x{}", width, height)
            }
            ConfigError::BadCycleLength(v) => {
                write!(f, "cycle_length must be positive, got {}", v)
            }
            ConfigError::BadAvatar(field) => write!(f, "avatar.{} must be positive", field),
            ConfigError::WorldGen(e) => write!(f, "worldgen: {}", e),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::WorldGen(e) => Some(e),
            _ => None,
        }
    }
}

impl From<WorldGenError> for ConfigError {
    fn from(e: WorldGenError) -> Self {
        ConfigError::WorldGen(e)
    }
}

impl GameConfig {
    pub fn worldgen_params(&self) -> WorldGenParams {
        WorldGenParams::from_config(&self.worldgen)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = self.window;
        if !(w.width > 0.0 && w.height > 0.0) {
            return Err(ConfigError::BadWindow {
                width: w.width,
                height: w.height,
            });
        }
        if !(self.cycle_length > 0.0) {
            return Err(ConfigError::BadCycleLength(self.cycle_length));
        }
        let a = &self.avatar;
        for (name, v) in [
            ("size", a.size),
            ("speed", a.speed),
            ("gravity", a.gravity),
            ("max_energy", a.max_energy),
            ("clip_time", a.clip_time),
        ] {
            if !(v > 0.0) {
                return Err(ConfigError::BadAvatar(name));
            }
        }
        self.worldgen_params().validate()?;
        Ok(())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let cfg: GameConfig = toml::from_str(&s)?;
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let cfg: GameConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.seed, 12345);
        assert_eq!(cfg.window.width, 800.0);
        assert_eq!(cfg.window.height, 600.0);
        assert_eq!(cfg.avatar.jump_speed, -650.0);
        assert_eq!(cfg.worldgen_params().tree_spacing, 170);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg: GameConfig = toml::from_str(
            r#"
            seed = 7
            [window]
            width = 1024.0
            [avatar]
            speed = 250.0
            [worldgen.terrain]
            block_size = 20
            "#,
        )
        .unwrap();
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.window.width, 1024.0);
        assert_eq!(cfg.window.height, 600.0);
        assert_eq!(cfg.avatar.speed, 250.0);
        assert_eq!(cfg.avatar.size, 50.0);
        assert_eq!(cfg.worldgen_params().block_size, 20);
    }

    #[test]
    fn rejects_bad_values() {
        let mut cfg = GameConfig::default();
        cfg.cycle_length = 0.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::BadCycleLength(_))));

        let mut cfg = GameConfig::default();
        cfg.window.height = -1.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::BadWindow { .. })));

        let mut cfg = GameConfig::default();
        cfg.worldgen.flora.tree_spacing = 0;
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, ConfigError::WorldGen(_)));
        assert!(err.source().is_some());
    }
}
