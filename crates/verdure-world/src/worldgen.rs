use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default)]
    pub terrain: Terrain,
    #[serde(default)]
    pub flora: Flora,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Terrain {
    #[serde(default = "default_block_size")]
    pub block_size: i32,
    #[serde(default = "default_depth")]
    pub depth: u32,
    #[serde(default = "default_base_height_fraction")]
    pub base_height_fraction: f32,
    #[serde(default = "default_noise_amplitude")]
    pub noise_amplitude: f32,
    #[serde(default = "default_noise_frequency")]
    pub noise_frequency: f32,
    #[serde(default = "default_noise_octaves")]
    pub noise_octaves: u32,
}
fn default_block_size() -> i32 {
    30
}
fn default_depth() -> u32 {
    20
}
fn default_base_height_fraction() -> f32 {
    2.0 / 3.0
}
fn default_noise_amplitude() -> f32 {
    55.0
}
fn default_noise_frequency() -> f32 {
    0.003
}
fn default_noise_octaves() -> u32 {
    3
}
impl Default for Terrain {
    fn default() -> Self {
        Self {
            block_size: default_block_size(),
            depth: default_depth(),
            base_height_fraction: default_base_height_fraction(),
            noise_amplitude: default_noise_amplitude(),
            noise_frequency: default_noise_frequency(),
            noise_octaves: default_noise_octaves(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Flora {
    #[serde(default = "default_tree_spacing")]
    pub tree_spacing: i32,
    #[serde(default = "default_tree_min_height")]
    pub tree_min_height: u32,
    #[serde(default = "default_tree_height_span")]
    pub tree_height_span: u32,
    #[serde(default = "default_canopy_size")]
    pub canopy_size: u32,
    #[serde(default = "default_half")]
    pub leaf_chance: f64,
    #[serde(default = "default_half")]
    pub fruit_chance: f64,
    #[serde(default = "default_fruit_cooldown")]
    pub fruit_cooldown: f32,
    #[serde(default)]
    pub leaf: LeafMotion,
}
fn default_tree_spacing() -> i32 {
    170
}
fn default_tree_min_height() -> u32 {
    100
}
fn default_tree_height_span() -> u32 {
    151
}
fn default_canopy_size() -> u32 {
    5
}
fn default_half() -> f64 {
    0.5
}
fn default_fruit_cooldown() -> f32 {
    30.0
}
impl Default for Flora {
    fn default() -> Self {
        Self {
            tree_spacing: default_tree_spacing(),
            tree_min_height: default_tree_min_height(),
            tree_height_span: default_tree_height_span(),
            canopy_size: default_canopy_size(),
            leaf_chance: default_half(),
            fruit_chance: default_half(),
            fruit_cooldown: default_fruit_cooldown(),
            leaf: LeafMotion::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct LeafMotion {
    #[serde(default = "default_sway_angle")]
    pub sway_angle: f32,
    #[serde(default = "default_motion_period")]
    pub sway_period: f32,
    #[serde(default = "default_max_delay")]
    pub max_delay: f32,
    #[serde(default = "default_width_factor")]
    pub width_factor: f32,
    #[serde(default = "default_motion_period")]
    pub width_period: f32,
}
fn default_sway_angle() -> f32 {
    30.0
}
fn default_motion_period() -> f32 {
    2.0
}
fn default_max_delay() -> f32 {
    4.0
}
fn default_width_factor() -> f32 {
    1.1
}
impl Default for LeafMotion {
    fn default() -> Self {
        Self {
            sway_angle: default_sway_angle(),
            sway_period: default_motion_period(),
            max_delay: default_max_delay(),
            width_factor: default_width_factor(),
            width_period: default_motion_period(),
        }
    }
}

#[derive(Debug)]
pub enum WorldGenError {
    NonPositive(&'static str),
    ChanceOutOfRange(&'static str, f64),
}

impl std::fmt::Display for WorldGenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorldGenError::NonPositive(field) => write!(f, "{} must be greater than zero", field),
            WorldGenError::ChanceOutOfRange(field, v) => {
                write!(f, "{} must lie in [0, 1], got {}", field, v)
            }
        }
    }
}

impl std::error::Error for WorldGenError {}

/// Flattened worldgen parameters consumed by the terrain and flora builders.
#[derive(Clone, Debug)]
pub struct WorldGenParams {
    pub block_size: i32,
    pub terrain_depth: u32,
    pub base_height_fraction: f32,
    pub noise_amplitude: f32,
    pub noise_frequency: f32,
    pub noise_octaves: u32,
    pub tree_spacing: i32,
    pub tree_width: f32,
    pub tree_min_height: u32,
    pub tree_height_span: u32,
    pub canopy_size: u32,
    pub leaf_chance: f64,
    pub fruit_chance: f64,
    pub fruit_cooldown: f32,
    pub leaf_sway_angle: f32,
    pub leaf_sway_period: f32,
    pub leaf_max_delay: f32,
    pub leaf_width_factor: f32,
    pub leaf_width_period: f32,
}

impl Default for WorldGenParams {
    fn default() -> Self {
        Self::from_config(&WorldGenConfig::default())
    }
}

impl WorldGenParams {
    pub fn from_config(cfg: &WorldGenConfig) -> Self {
        Self {
            block_size: cfg.terrain.block_size,
            terrain_depth: cfg.terrain.depth,
            base_height_fraction: cfg.terrain.base_height_fraction,
            noise_amplitude: cfg.terrain.noise_amplitude,
            noise_frequency: cfg.terrain.noise_frequency,
            noise_octaves: cfg.terrain.noise_octaves,
            tree_spacing: cfg.flora.tree_spacing,
            // Trunks are one block wide.
            tree_width: cfg.terrain.block_size as f32,
            tree_min_height: cfg.flora.tree_min_height,
            tree_height_span: cfg.flora.tree_height_span,
            canopy_size: cfg.flora.canopy_size,
            leaf_chance: cfg.flora.leaf_chance,
            fruit_chance: cfg.flora.fruit_chance,
            fruit_cooldown: cfg.flora.fruit_cooldown,
            leaf_sway_angle: cfg.flora.leaf.sway_angle,
            leaf_sway_period: cfg.flora.leaf.sway_period,
            leaf_max_delay: cfg.flora.leaf.max_delay,
            leaf_width_factor: cfg.flora.leaf.width_factor,
            leaf_width_period: cfg.flora.leaf.width_period,
        }
    }

    pub fn validate(&self) -> Result<(), WorldGenError> {
        if self.block_size <= 0 {
            return Err(WorldGenError::NonPositive("terrain.block_size"));
        }
        if self.tree_spacing <= 0 {
            return Err(WorldGenError::NonPositive("flora.tree_spacing"));
        }
        if self.tree_height_span == 0 {
            return Err(WorldGenError::NonPositive("flora.tree_height_span"));
        }
        if self.noise_octaves == 0 {
            return Err(WorldGenError::NonPositive("terrain.noise_octaves"));
        }
        for (name, v) in [
            ("flora.leaf_chance", self.leaf_chance),
            ("flora.fruit_chance", self.fruit_chance),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(WorldGenError::ChanceOutOfRange(name, v));
            }
        }
        Ok(())
    }
}

/// Reads a standalone worldgen TOML (the `[terrain]` and `[flora]` tables at
/// top level) and rejects it if the derived params are invalid.
pub fn load_worldgen_from_path(path: &Path) -> Result<WorldGenConfig, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let cfg: WorldGenConfig = toml::from_str(&s)?;
    WorldGenParams::from_config(&cfg).validate()?;
    Ok(cfg)
}
