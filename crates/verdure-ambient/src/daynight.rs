use verdure_anim::{Interpolator, RepeatMode, Transition};
use verdure_geom::{Aabb, Vec2};
use verdure_world::Tag;

use crate::CoordinateSpace;

pub const SUN_COLOR: [u8; 3] = [255, 255, 0];
pub const HALO_COLOR: [u8; 4] = [255, 255, 0, 20];
pub const SKY_COLOR: [u8; 3] = [0x80, 0xC6, 0xE5];
pub const NIGHT_COLOR: [u8; 3] = [0, 0, 0];

const SUN_SIZE: f32 = 100.0;
const HALO_SIZE: f32 = 120.0;
const MIDNIGHT_OPACITY: f32 = 0.5;

/// Sun orbiting a point low on the screen once per cycle.
#[derive(Clone, Debug)]
pub struct Sun {
    start: Vec2,
    pivot: Vec2,
    angle: Transition,
}

impl Sun {
    pub const TAG: Tag = Tag::Sun;
    pub const SPACE: CoordinateSpace = CoordinateSpace::Camera;

    pub fn new(window: Vec2, cycle_length: f32) -> Self {
        Self {
            start: Vec2::new(window.x / 2.0, window.y / 3.0),
            pivot: Vec2::new(window.x / 2.0, window.y / 3.0 * 2.0),
            angle: Transition::linear(0.0, 360.0, cycle_length, RepeatMode::Loop),
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.angle.update(dt);
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle.value()
    }

    pub fn center(&self) -> Vec2 {
        (self.start - self.pivot).rotated(self.angle()) + self.pivot
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.center(), Vec2::splat(SUN_SIZE))
    }
}

/// Translucent disc kept centred on the sun.
#[derive(Clone, Copy, Debug)]
pub struct SunHalo {
    center: Vec2,
}

impl SunHalo {
    pub const TAG: Tag = Tag::SunHalo;
    pub const SPACE: CoordinateSpace = CoordinateSpace::Camera;

    pub fn new(sun: &Sun) -> Self {
        Self {
            center: sun.center(),
        }
    }

    pub fn follow(&mut self, sun: &Sun) {
        self.center = sun.center();
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.center, Vec2::splat(HALO_SIZE))
    }
}

/// Full-screen dark overlay that deepens to midnight and back twice per cycle
/// length.
#[derive(Clone, Debug)]
pub struct Night {
    size: Vec2,
    opacity: Transition,
}

impl Night {
    pub const TAG: Tag = Tag::Night;
    pub const SPACE: CoordinateSpace = CoordinateSpace::Camera;

    pub fn new(window: Vec2, cycle_length: f32) -> Self {
        Self {
            size: window,
            opacity: Transition::new(
                0.0,
                MIDNIGHT_OPACITY,
                cycle_length / 2.0,
                Interpolator::Cubic,
                RepeatMode::BackAndForth,
            ),
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.opacity.update(dt);
    }

    #[inline]
    pub fn opacity(&self) -> f32 {
        self.opacity.value()
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_top_left(Vec2::ZERO, self.size)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Sky {
    size: Vec2,
}

impl Sky {
    pub const TAG: Tag = Tag::Sky;
    pub const SPACE: CoordinateSpace = CoordinateSpace::Camera;
    pub const COLOR: [u8; 3] = SKY_COLOR;

    pub fn new(window: Vec2) -> Self {
        Self { size: window }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_top_left(Vec2::ZERO, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-2
    }

    #[test]
    fn sun_starts_high_and_is_lowest_at_half_cycle() {
        let window = Vec2::new(800.0, 600.0);
        let mut sun = Sun::new(window, 30.0);
        assert!(close(sun.center(), Vec2::new(400.0, 200.0)));
        sun.update(15.0);
        assert!(close(sun.center(), Vec2::new(400.0, 600.0)));
        sun.update(15.0);
        assert!(close(sun.center(), Vec2::new(400.0, 200.0)));
    }

    #[test]
    fn halo_follows_sun() {
        let mut sun = Sun::new(Vec2::new(800.0, 600.0), 30.0);
        let mut halo = SunHalo::new(&sun);
        sun.update(7.5);
        halo.follow(&sun);
        assert!(close(halo.center(), sun.center()));
        assert!((halo.bounds().size().x - 120.0).abs() < 1e-4);
    }

    #[test]
    fn night_peaks_at_half_cycle() {
        let mut night = Night::new(Vec2::new(800.0, 600.0), 30.0);
        assert_eq!(night.opacity(), 0.0);
        night.update(15.0);
        assert!((night.opacity() - 0.5).abs() < 1e-5);
        night.update(15.0);
        assert!(night.opacity().abs() < 1e-5);
    }
}
