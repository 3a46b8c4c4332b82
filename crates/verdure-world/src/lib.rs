//! Procedural side-scroller world: height noise, terrain strip, flora and the
//! streaming window that keeps them materialized around the avatar.
#![forbid(unsafe_code)]

pub mod flora;
pub mod noise;
pub mod streaming;
pub mod terrain;
pub mod worldgen;

pub use flora::{FloraField, Fruit, Leaf, Tree, TreeData, TreeId, TreeKey};
pub use noise::NoiseField;
pub use streaming::{EvictionStash, HistoricalBounds, Span, StreamDelta, WorldWindow};
pub use terrain::{Block, Column, HeightField, TerrainStrip};
pub use worldgen::{WorldGenConfig, WorldGenError, WorldGenParams};

/// Object tags the host uses to tell collision partners apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    Ground,
    Tree,
    Leaf,
    Fruit,
    Avatar,
    Cloud,
    Rain,
    Sun,
    SunHalo,
    Night,
    Sky,
    Ui,
}

impl Tag {
    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Ground => "ground",
            Tag::Tree => "tree",
            Tag::Leaf => "leaf",
            Tag::Fruit => "fruit",
            Tag::Avatar => "avatar",
            Tag::Cloud => "cloud",
            Tag::Rain => "rain",
            Tag::Sun => "sun",
            Tag::SunHalo => "sunHalo",
            Tag::Night => "night",
            Tag::Sky => "sky",
            Tag::Ui => "ui",
        }
    }
}

/// Builds a terrain strip and a flora field that share one height field, then
/// wraps them in a window centred on `center_x`.
pub fn build_world(
    params: &WorldGenParams,
    seed: i32,
    screen_width: f32,
    screen_height: f32,
    center_x: f32,
) -> Result<WorldWindow, WorldGenError> {
    params.validate()?;
    let terrain = TerrainStrip::new(params, seed, screen_height);
    let height = terrain.height_field();
    let flora = FloraField::new(Box::new(move |x| height.height_at(x)), params, seed);
    Ok(WorldWindow::new(terrain, flora, screen_width, center_x))
}
