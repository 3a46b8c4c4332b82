//! Cosmetic, time-driven scenery: drifting cloud, rain bursts, sun and halo,
//! night overlay and sky.
#![forbid(unsafe_code)]

pub mod cloud;
pub mod daynight;
pub mod rain;

pub use cloud::Cloud;
pub use daynight::{Night, Sky, Sun, SunHalo};
pub use rain::{DropId, Rain, RainDrop};

use verdure_geom::Vec2;

/// Which space an effect's positions are expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoordinateSpace {
    World,
    /// Fixed to the screen; the camera offset does not apply.
    Camera,
}

/// Receives the cloud anchor every time the avatar jumps.
pub trait JumpListener {
    fn on_jump(&mut self, anchor: Vec2);
}
