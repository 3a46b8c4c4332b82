use verdure_anim::{RepeatMode, ScheduledTask, Transition};
use verdure_geom::{Aabb, Vec2};

use crate::Tag;

pub const LEAF_COLOR: [u8; 3] = [50, 200, 30];

#[derive(Clone, Copy, Debug)]
pub struct LeafMotion {
    pub sway_angle: f32,
    pub sway_period: f32,
    pub width_factor: f32,
    pub width_period: f32,
}

/// Decorative canopy cell. Sways after a per-leaf delay and breathes in width
/// from the moment it exists.
#[derive(Clone, Debug)]
pub struct Leaf {
    position: Vec2,
    size: f32,
    delay: ScheduledTask,
    sway: Option<Transition>,
    sway_template: Transition,
    width: Transition,
}

impl Leaf {
    pub const TAG: Tag = Tag::Leaf;

    pub fn new(position: Vec2, size: f32, delay: f32, motion: LeafMotion) -> Self {
        Self {
            position,
            size,
            delay: ScheduledTask::after(delay),
            sway: None,
            sway_template: Transition::linear(
                0.0,
                motion.sway_angle,
                motion.sway_period,
                RepeatMode::BackAndForth,
            ),
            width: Transition::linear(
                size * motion.width_factor,
                size,
                motion.width_period,
                RepeatMode::BackAndForth,
            ),
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.width.update(dt);
        match self.sway.as_mut() {
            Some(sway) => {
                sway.update(dt);
            }
            None => {
                if self.delay.tick(dt) {
                    self.sway = Some(self.sway_template.clone());
                }
            }
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Current render angle in degrees; zero until the sway delay elapses.
    pub fn angle(&self) -> f32 {
        self.sway.as_ref().map_or(0.0, Transition::value)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width.value()
    }

    #[inline]
    pub fn is_swaying(&self) -> bool {
        self.sway.is_some()
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_top_left(self.position, Vec2::new(self.width(), self.size))
    }
}
