//! Wires the world window, ambient effects and avatar to a host registry.

mod events;
mod scene;

pub use scene::Handle;

use verdure_ambient::{Cloud, Night, Rain, Sky, Sun, SunHalo};
use verdure_geom::{Aabb, Vec2};
use verdure_world::streaming::{HistoricalBounds, Span, StreamDelta};
use verdure_world::{Column, Tag, Tree, TreeData, WorldWindow, build_world};

use crate::avatar::Avatar;
use crate::camera::Camera;
use crate::config::{ConfigError, GameConfig};
use crate::event::{Event, EventQueue};
use crate::host::{InputSource, Layer, ObjectId, SceneObject, SpatialRegistry};
use scene::Scene;

const CLOUD_PERIOD: f32 = 30.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameStats {
    pub frames: u64,
    pub jumps: u64,
    pub fruits_eaten: u64,
    pub shifts: u64,
    pub frontier_shifts: u64,
    pub trees_generated: u64,
    pub trees_restored: u64,
}

struct SceneryIds {
    avatar: ObjectId,
    sun: ObjectId,
    halo: ObjectId,
    cloud: Vec<ObjectId>,
}

pub struct Game<R: SpatialRegistry, I: InputSource> {
    config: GameConfig,
    world: WorldWindow,
    avatar: Avatar,
    spawn: Vec2,
    camera: Camera,
    cloud: Cloud,
    rain: Rain,
    sun: Sun,
    halo: SunHalo,
    night: Night,
    sky: Sky,
    energy_text: String,
    scene: Scene<R>,
    scenery: SceneryIds,
    input: I,
    events: EventQueue,
    stats: GameStats,
}

impl<R: SpatialRegistry, I: InputSource> Game<R, I> {
    pub fn new(config: GameConfig, registry: R, input: I) -> Result<Self, ConfigError> {
        config.validate()?;
        let params = config.worldgen_params();
        let window = Vec2::new(config.window.width, config.window.height);
        let mut world = build_world(&params, config.seed, window.x, window.y, config.spawn_x)?;

        let spawn = Vec2::new(
            config.spawn_x,
            world.ground_height_at(config.spawn_x) - config.avatar.size,
        );
        let avatar = Avatar::new(spawn, config.avatar);
        let camera = Camera::new(window / 2.0 - spawn, window, avatar.center());

        let block = params.block_size as f32;
        let cloud = Cloud::new(0.0, window.x / 10.0, window.x, block, CLOUD_PERIOD);
        let sun = Sun::new(window, config.cycle_length);
        let halo = SunHalo::new(&sun);
        let night = Night::new(window, config.cycle_length);
        let sky = Sky::new(window);

        let mut scene = Scene::new(registry);
        scene.add(
            SceneObject::camera(Sky::TAG, sky.bounds()),
            Layer::Background,
            Handle::Scenery(Tag::Sky),
        );
        let sun_id = scene.add(
            SceneObject::camera(Sun::TAG, sun.bounds()),
            Layer::Background,
            Handle::Scenery(Tag::Sun),
        );
        let halo_id = scene.add(
            SceneObject::camera(SunHalo::TAG, halo.bounds()),
            Layer::Background,
            Handle::Scenery(Tag::SunHalo),
        );
        let cloud_ids = cloud
            .block_bounds()
            .map(|b| {
                scene.add(
                    SceneObject::camera(Cloud::TAG, b),
                    Layer::Background,
                    Handle::Scenery(Tag::Cloud),
                )
            })
            .collect();
        scene.add(
            SceneObject::camera(Night::TAG, night.bounds()),
            Layer::Foreground,
            Handle::Scenery(Tag::Night),
        );
        scene.add(
            SceneObject::camera(Tag::Ui, energy_text_bounds()),
            Layer::Ui,
            Handle::Scenery(Tag::Ui),
        );
        let avatar_id = scene.add(
            SceneObject::world(Avatar::TAG, avatar.bounds()),
            Layer::Default,
            Handle::Avatar,
        );

        let opened = world.open();
        log::info!(
            target: "game",
            "seed {} window [{}, {}] spawn ({}, {})",
            config.seed,
            world.window().min,
            world.window().max,
            spawn.x,
            spawn.y
        );

        let mut game = Self {
            energy_text: format_energy(avatar.energy()),
            config,
            world,
            avatar,
            spawn,
            camera,
            cloud,
            rain: Rain::new(),
            sun,
            halo,
            night,
            sky,
            scene,
            scenery: SceneryIds {
                avatar: avatar_id,
                sun: sun_id,
                halo: halo_id,
                cloud: cloud_ids,
            },
            input,
            events: EventQueue::new(),
            stats: GameStats::default(),
        };
        game.apply_delta(&opened);
        Ok(game)
    }

    /// One simulation frame: input and energy, streaming, flora and ambient
    /// clocks, event dispatch and registry sync.
    pub fn update(&mut self, dt: f32) {
        self.events.emit_now(Event::Tick);
        let anchor = self.cloud.anchor();
        self.avatar.update(dt, &self.input, anchor, &mut self.events);

        self.stream();

        let regrown = self.world.flora_mut().update(dt);
        if regrown > 0 {
            self.events.emit_now(Event::FruitRegrown { count: regrown });
        }
        self.cloud.update(dt);
        self.sun.update(dt);
        self.halo.follow(&self.sun);
        self.night.update(dt);
        let expired = self.rain.update(dt);
        for drop in expired {
            self.scene.remove_drop(drop);
        }

        self.dispatch_events();
        self.sync_scene();
        self.camera.follow(self.avatar.center());
        self.stats.frames += 1;
        self.events.advance_tick();
    }

    /// Re-evaluates the world window against the avatar's left edge and mirrors
    /// the resulting delta into the registry. Hosts that move the avatar after
    /// `update` call this again once their kinematics have run.
    pub fn stream(&mut self) {
        let delta = self.world.update(self.avatar.position().x);
        self.apply_delta(&delta);
    }

    fn apply_delta(&mut self, delta: &StreamDelta) {
        if delta.is_empty() {
            return;
        }
        for &x in &delta.columns_removed {
            self.scene.remove_column(x);
        }
        for &x in &delta.columns_added {
            if let Some(column) = self.world.terrain().column(x) {
                self.scene.add_column(column);
            }
        }
        for &key in &delta.trees_removed {
            self.scene.remove_tree(key);
        }
        for &key in &delta.trees_added {
            if let Some((tree, data)) = self.world.flora().tree(key) {
                self.scene.add_tree(tree, data);
            }
        }
        for shift in &delta.shifts {
            self.stats.shifts += 1;
            if shift.frontier {
                self.stats.frontier_shifts += 1;
            }
            self.stats.trees_generated += shift.generated as u64;
            self.stats.trees_restored += shift.restored as u64;
            self.events.emit_now(Event::WindowShifted {
                edge: shift.edge,
                min: shift.window.min,
                max: shift.window.max,
                frontier: shift.frontier,
            });
        }
    }

    fn sync_scene(&mut self) {
        for (key, (_, data)) in self.world.flora().trees() {
            self.scene.sync_tree(*key, data);
        }
        for id in self.rain.take_spawned() {
            if let Some(drop) = self.rain.find(id) {
                self.scene
                    .add_drop(id, SceneObject::camera(Rain::TAG, drop.bounds()));
            }
        }
        for drop in self.rain.drops() {
            if let Some(obj) = self.scene.drop_object(drop.id()) {
                self.scene.registry.set_bounds(obj, drop.bounds());
            }
        }
        for (id, bounds) in self.scenery.cloud.iter().zip(self.cloud.block_bounds()) {
            self.scene.registry.set_bounds(*id, bounds);
        }
        self.scene.registry.set_bounds(self.scenery.sun, self.sun.bounds());
        self.scene
            .registry
            .set_bounds(self.scenery.halo, self.halo.bounds());
        self.sync_avatar();
    }

    /// Pushes the avatar's bounds to the registry; hosts call this after
    /// integrating and resolving contacts.
    pub fn sync_avatar(&mut self) {
        self.scene
            .registry
            .set_bounds(self.scenery.avatar, self.avatar.bounds());
    }

    pub fn ground_height_at(&self, x: f32) -> f32 {
        self.world.ground_height_at(x)
    }

    pub fn terrain_in_range(&self, min_x: f32, max_x: f32) -> impl Iterator<Item = &Column> {
        self.world.terrain().columns_in_range(min_x, max_x)
    }

    pub fn trees_in_range(
        &self,
        min_x: f32,
        max_x: f32,
    ) -> impl Iterator<Item = &(Tree, TreeData)> {
        self.world.flora().trees_in_range(min_x, max_x)
    }

    #[inline]
    pub fn spawn_position(&self) -> Vec2 {
        self.spawn
    }

    #[inline]
    pub fn window(&self) -> Span {
        self.world.window()
    }

    #[inline]
    pub fn historical_bounds(&self) -> HistoricalBounds {
        self.world.historical_bounds()
    }

    #[inline]
    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub fn avatar_mut(&mut self) -> &mut Avatar {
        &mut self.avatar
    }

    #[inline]
    pub fn avatar_id(&self) -> ObjectId {
        self.scenery.avatar
    }

    pub fn energy_text(&self) -> &str {
        &self.energy_text
    }

    pub fn world(&self) -> &WorldWindow {
        &self.world
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn cloud(&self) -> &Cloud {
        &self.cloud
    }

    pub fn rain(&self) -> &Rain {
        &self.rain
    }

    pub fn sun(&self) -> &Sun {
        &self.sun
    }

    pub fn night(&self) -> &Night {
        &self.night
    }

    pub fn sky(&self) -> &Sky {
        &self.sky
    }

    pub fn stats(&self) -> GameStats {
        self.stats
    }

    #[inline]
    pub fn tick(&self) -> u64 {
        self.events.now
    }

    /// Handle a registry id currently stands for.
    pub fn handle_of(&self, id: ObjectId) -> Option<Handle> {
        self.scene.handle(id)
    }

    /// Objects this game has registered and not yet removed.
    pub fn object_count(&self) -> usize {
        self.scene.object_count()
    }

    pub fn registered_columns(&self) -> impl Iterator<Item = i32> + '_ {
        self.scene.column_keys()
    }

    pub fn registered_trees(&self) -> impl Iterator<Item = i32> + '_ {
        self.scene.tree_keys()
    }

    pub fn registry(&self) -> &R {
        &self.scene.registry
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }
}

fn energy_text_bounds() -> Aabb {
    Aabb::from_top_left(Vec2::new(10.0, 10.0), Vec2::new(60.0, 30.0))
}

fn format_energy(energy: f32) -> String {
    format!("{}", energy as i32)
}
