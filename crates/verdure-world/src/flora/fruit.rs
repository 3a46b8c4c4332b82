use verdure_anim::ScheduledTask;
use verdure_geom::{Aabb, Vec2};

use crate::Tag;

pub const FRUIT_COLOR: [u8; 3] = [255, 0, 0];

/// Consumable canopy fruit. Eating it hides it at the origin; once the cooldown
/// elapses it comes back at `initial_position`.
#[derive(Clone, Debug)]
pub struct Fruit {
    initial_position: Vec2,
    position: Vec2,
    size: f32,
    visible: bool,
    cooldown: f32,
    regrow: Option<ScheduledTask>,
}

impl Fruit {
    pub const TAG: Tag = Tag::Fruit;

    pub fn new(position: Vec2, size: f32, cooldown: f32) -> Self {
        Self {
            initial_position: position,
            position,
            size,
            visible: true,
            cooldown,
            regrow: None,
        }
    }

    /// Returns false if the fruit was already eaten.
    pub fn consume(&mut self) -> bool {
        if !self.visible {
            return false;
        }
        self.visible = false;
        self.position = Vec2::ZERO;
        self.regrow = Some(ScheduledTask::after(self.cooldown));
        true
    }

    /// Advances the regrow timer; true on the frame the fruit reappears.
    pub fn update(&mut self, dt: f32) -> bool {
        let Some(task) = self.regrow.as_mut() else {
            return false;
        };
        if task.tick(dt) {
            self.regrow = None;
            self.show();
            return true;
        }
        false
    }

    /// Forces the fruit back to its grown state, dropping any pending cooldown.
    pub fn reset(&mut self) {
        self.regrow = None;
        self.show();
    }

    fn show(&mut self) {
        self.visible = true;
        self.position = self.initial_position;
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn initial_position(&self) -> Vec2 {
        self.initial_position
    }

    pub fn cooldown_remaining(&self) -> Option<f32> {
        self.regrow.as_ref().map(ScheduledTask::remaining)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_top_left(self.position, Vec2::splat(self.size))
    }
}
