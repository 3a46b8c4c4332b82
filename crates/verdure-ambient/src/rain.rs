use verdure_anim::{RepeatMode, Transition};
use verdure_geom::{Aabb, Vec2};
use verdure_world::Tag;

use crate::{CoordinateSpace, JumpListener};

pub const RAIN_COLOR: [u8; 3] = [12, 174, 203];
const DROPS_PER_BURST: usize = 3;
const DROP_SIZE: f32 = 10.0;
const DROP_GAP: f32 = 15.0;
const DROP_GRAVITY: f32 = 20.0;
const FADE_SECONDS: f32 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DropId(pub u64);

#[derive(Clone, Debug)]
pub struct RainDrop {
    id: DropId,
    position: Vec2,
    velocity_y: f32,
    fade: Transition,
}

impl RainDrop {
    #[inline]
    pub fn id(&self) -> DropId {
        self.id
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn opacity(&self) -> f32 {
        self.fade.value()
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_top_left(self.position, Vec2::splat(DROP_SIZE))
    }
}

/// Short-lived rain bursts spawned under the cloud on every jump. Each drop falls,
/// fades out over a few seconds and then removes itself.
#[derive(Debug, Default)]
pub struct Rain {
    drops: Vec<RainDrop>,
    spawned: Vec<DropId>,
    next_id: u64,
}

impl Rain {
    pub const TAG: Tag = Tag::Rain;
    pub const SPACE: CoordinateSpace = CoordinateSpace::Camera;

    pub fn new() -> Self {
        Self::default()
    }

    fn burst(&mut self, anchor: Vec2) {
        for i in 0..DROPS_PER_BURST {
            self.next_id += 1;
            let id = DropId(self.next_id);
            let position = Vec2::new(
                (anchor.x + i as f32 * (DROP_SIZE + DROP_GAP)).trunc(),
                anchor.y.trunc() + DROP_SIZE,
            );
            self.drops.push(RainDrop {
                id,
                position,
                velocity_y: 0.0,
                fade: Transition::linear(1.0, 0.0, FADE_SECONDS, RepeatMode::Once),
            });
            self.spawned.push(id);
        }
        log::debug!(target: "ambient", "rain burst at ({}, {})", anchor.x, anchor.y);
    }

    /// Drops created since the last call, for the host to register.
    pub fn take_spawned(&mut self) -> Vec<DropId> {
        std::mem::take(&mut self.spawned)
    }

    /// Moves and fades every drop; returns the ids of drops that faded out.
    pub fn update(&mut self, dt: f32) -> Vec<DropId> {
        for drop in &mut self.drops {
            drop.velocity_y += DROP_GRAVITY * dt;
            drop.position.y += drop.velocity_y * dt;
            drop.fade.update(dt);
        }
        let mut expired = Vec::new();
        self.drops.retain(|d| {
            if d.fade.is_finished() {
                expired.push(d.id);
                false
            } else {
                true
            }
        });
        // A drop that expires before the host ever saw it was never registered.
        self.spawned.retain(|id| !expired.contains(id));
        expired
    }

    pub fn drops(&self) -> &[RainDrop] {
        &self.drops
    }

    pub fn find(&self, id: DropId) -> Option<&RainDrop> {
        self.drops.iter().find(|d| d.id == id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.drops.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.drops.is_empty()
    }
}

impl JumpListener for Rain {
    fn on_jump(&mut self, anchor: Vec2) {
        self.burst(anchor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_spawns_three_spaced_drops() {
        let mut rain = Rain::new();
        rain.on_jump(Vec2::new(45.0, 180.0));
        let xs: Vec<f32> = rain.drops().iter().map(|d| d.position().x).collect();
        assert_eq!(xs, vec![45.0, 70.0, 95.0]);
        assert!(rain.drops().iter().all(|d| d.position().y == 190.0));
        assert_eq!(rain.take_spawned().len(), 3);
        assert!(rain.take_spawned().is_empty());
    }

    #[test]
    fn drops_fall_fade_and_expire() {
        let mut rain = Rain::new();
        rain.on_jump(Vec2::ZERO);
        rain.take_spawned();
        let y0 = rain.drops()[0].position().y;
        assert!(rain.update(1.5).is_empty());
        assert!(rain.drops()[0].position().y > y0);
        assert!((rain.drops()[0].opacity() - 0.5).abs() < 1e-5);
        let gone = rain.update(1.5);
        assert_eq!(gone.len(), 3);
        assert!(rain.is_empty());
    }
}
