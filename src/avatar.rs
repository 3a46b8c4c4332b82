use verdure_geom::{Aabb, Vec2};
use verdure_world::Tag;

use crate::config::AvatarConfig;
use crate::event::{Event, EventQueue};
use crate::host::{InputSource, Key};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimState {
    Idle,
    Run,
    Jump,
}

impl AnimState {
    /// Frames in each clip.
    pub fn frames(self) -> usize {
        match self {
            AnimState::Idle => 4,
            AnimState::Run => 6,
            AnimState::Jump => 4,
        }
    }
}

/// Player-controlled body. Reads input, spends and regains energy and publishes
/// jumps; integration and contacts are left to the host.
#[derive(Clone, Debug)]
pub struct Avatar {
    params: AvatarConfig,
    position: Vec2,
    velocity: Vec2,
    energy: f32,
    anim: AnimState,
    facing_left: bool,
    clip_clock: f32,
}

impl Avatar {
    pub const TAG: Tag = Tag::Avatar;

    /// `position` is the top-left corner.
    pub fn new(position: Vec2, params: AvatarConfig) -> Self {
        Self {
            params,
            position,
            velocity: Vec2::ZERO,
            energy: params.max_energy,
            anim: AnimState::Idle,
            facing_left: false,
            clip_clock: 0.0,
        }
    }

    pub fn update(
        &mut self,
        dt: f32,
        input: &impl InputSource,
        cloud_anchor: Vec2,
        events: &mut EventQueue,
    ) {
        let p = self.params;
        let left = input.is_key_held(Key::Left);
        let right = input.is_key_held(Key::Right);
        let grounded = self.velocity.y == 0.0;
        let mut next = self.anim;

        let mut vx = 0.0;
        if left != right && self.energy >= p.move_energy {
            vx = if left { -p.speed } else { p.speed };
            self.facing_left = left;
            self.energy -= p.move_energy;
            next = AnimState::Run;
        }
        self.velocity.x = vx;

        if input.is_key_held(Key::Space) && grounded && self.energy >= p.jump_energy {
            self.velocity.y = p.jump_speed;
            self.energy -= p.jump_energy;
            next = AnimState::Jump;
            events.emit_now(Event::Jumped {
                anchor: cloud_anchor,
            });
        }

        if self.energy < p.max_energy
            && self.velocity.y == 0.0
            && (!input.any_key_held() || (left && right))
        {
            self.energy = (self.energy + 1.0).min(p.max_energy);
            next = AnimState::Idle;
        }

        if next != self.anim {
            self.anim = next;
            self.clip_clock = 0.0;
        } else {
            self.clip_clock += dt.max(0.0);
        }
        events.emit_now(Event::EnergyChanged {
            energy: self.energy as i32,
        });
    }

    /// Gravity and velocity step, as the host physics would apply it.
    pub fn integrate(&mut self, dt: f32) {
        self.velocity.y += self.params.gravity * dt;
        self.position += self.velocity * dt;
    }

    /// Lifts the avatar onto a surface at height `top` if it sank below it.
    pub fn land_on(&mut self, top: f32) {
        if self.bottom() > top {
            self.position.y = top - self.params.size;
            if self.velocity.y > 0.0 {
                self.velocity.y = 0.0;
            }
        }
    }

    pub fn eat_fruit(&mut self) {
        self.energy = (self.energy + self.params.fruit_energy).min(self.params.max_energy);
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    #[inline]
    pub fn energy(&self) -> f32 {
        self.energy
    }

    #[inline]
    pub fn anim(&self) -> AnimState {
        self.anim
    }

    pub fn clip_frame(&self) -> usize {
        (self.clip_clock / self.params.clip_time) as usize % self.anim.frames()
    }

    #[inline]
    pub fn facing_left(&self) -> bool {
        self.facing_left
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.params.size
    }

    pub fn center(&self) -> Vec2 {
        self.position + Vec2::splat(self.params.size / 2.0)
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.params.size
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_top_left(self.position, Vec2::splat(self.params.size))
    }
}
