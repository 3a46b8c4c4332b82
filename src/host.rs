//! Seams to the embedding engine: where objects are registered, where input
//! comes from, and how collision-enter is detected for a headless host.

use std::collections::BTreeSet;

use hashbrown::{HashMap, HashSet};
use verdure_ambient::CoordinateSpace;
use verdure_geom::Aabb;
use verdure_world::Tag;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

/// Draw and collision layer an object is registered in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    Background,
    Default,
    StaticObjects,
    Foreground,
    Ui,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneObject {
    pub tag: Tag,
    pub bounds: Aabb,
    pub space: CoordinateSpace,
}

impl SceneObject {
    pub fn world(tag: Tag, bounds: Aabb) -> Self {
        Self {
            tag,
            bounds,
            space: CoordinateSpace::World,
        }
    }

    pub fn camera(tag: Tag, bounds: Aabb) -> Self {
        Self {
            tag,
            bounds,
            space: CoordinateSpace::Camera,
        }
    }
}

pub trait SpatialRegistry {
    fn add(&mut self, id: ObjectId, object: SceneObject, layer: Layer);
    /// False if `id` was not registered in `layer`.
    fn remove(&mut self, id: ObjectId, layer: Layer) -> bool;
    fn set_bounds(&mut self, id: ObjectId, bounds: Aabb);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Space,
}

pub trait InputSource {
    fn is_key_held(&self, key: Key) -> bool;
    fn any_key_held(&self) -> bool;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn alloc(&mut self) -> ObjectId {
        self.next += 1;
        ObjectId(self.next)
    }
}

/// In-memory registry used by the headless driver and tests.
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    objects: HashMap<ObjectId, (SceneObject, Layer)>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id).map(|(o, _)| o)
    }

    pub fn layer_of(&self, id: ObjectId) -> Option<Layer> {
        self.objects.get(&id).map(|(_, l)| *l)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn count_in(&self, layer: Layer) -> usize {
        self.objects.values().filter(|(_, l)| *l == layer).count()
    }

    pub fn count_tagged(&self, tag: Tag) -> usize {
        self.objects.values().filter(|(o, _)| o.tag == tag).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &SceneObject, Layer)> {
        self.objects.iter().map(|(id, (o, l))| (*id, o, *l))
    }

    /// World-space objects strictly overlapping `bounds`.
    pub fn overlapping(&self, bounds: &Aabb) -> BTreeSet<ObjectId> {
        self.objects
            .iter()
            .filter(|(_, (o, _))| o.space == CoordinateSpace::World && o.bounds.intersects(bounds))
            .map(|(id, _)| *id)
            .collect()
    }
}

impl SpatialRegistry for ObjectRegistry {
    fn add(&mut self, id: ObjectId, object: SceneObject, layer: Layer) {
        if self.objects.insert(id, (object, layer)).is_some() {
            log::warn!(target: "host", "object {:?} registered twice", id);
        }
    }

    fn remove(&mut self, id: ObjectId, layer: Layer) -> bool {
        match self.objects.get(&id) {
            Some((_, l)) if *l == layer => {
                self.objects.remove(&id);
                true
            }
            _ => false,
        }
    }

    fn set_bounds(&mut self, id: ObjectId, bounds: Aabb) {
        if let Some((o, _)) = self.objects.get_mut(&id) {
            o.bounds = bounds;
        }
    }
}

/// Keys held for the current frame; the driver rewrites it between frames.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    held: HashSet<Key>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hold(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn set_held(&mut self, keys: &[Key]) {
        self.held.clear();
        self.held.extend(keys.iter().copied());
    }

    pub fn release_all(&mut self) {
        self.held.clear();
    }
}

impl InputSource for ScriptedInput {
    fn is_key_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    fn any_key_held(&self) -> bool {
        !self.held.is_empty()
    }
}

/// Collision-enter detection over an `ObjectRegistry`.
///
/// `entered` reports ids overlapping now that were not touching after the last
/// resolution; `settle` records the post-resolution contacts.
#[derive(Debug, Default)]
pub struct ContactTracker {
    touching: BTreeSet<ObjectId>,
}

impl ContactTracker {
    pub fn entered(&self, registry: &ObjectRegistry, body: ObjectId, bounds: &Aabb) -> Vec<ObjectId> {
        registry
            .overlapping(bounds)
            .into_iter()
            .filter(|id| *id != body && !self.touching.contains(id))
            .collect()
    }

    pub fn settle(&mut self, registry: &ObjectRegistry, body: ObjectId, bounds: &Aabb) {
        self.touching = registry.overlapping(bounds);
        self.touching.remove(&body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdure_geom::Vec2;

    fn square(x: f32, y: f32) -> Aabb {
        Aabb::from_top_left(Vec2::new(x, y), Vec2::splat(10.0))
    }

    #[test]
    fn remove_checks_layer() {
        let mut reg = ObjectRegistry::new();
        let id = ObjectId(1);
        reg.add(id, SceneObject::world(Tag::Ground, square(0.0, 0.0)), Layer::StaticObjects);
        assert!(!reg.remove(id, Layer::Background));
        assert!(reg.remove(id, Layer::StaticObjects));
        assert!(!reg.remove(id, Layer::StaticObjects));
        assert!(reg.is_empty());
    }

    #[test]
    fn camera_objects_never_overlap() {
        let mut reg = ObjectRegistry::new();
        reg.add(ObjectId(1), SceneObject::camera(Tag::Sun, square(0.0, 0.0)), Layer::Background);
        reg.add(ObjectId(2), SceneObject::world(Tag::Fruit, square(5.0, 5.0)), Layer::StaticObjects);
        let hits = reg.overlapping(&square(2.0, 2.0));
        assert_eq!(hits.into_iter().collect::<Vec<_>>(), vec![ObjectId(2)]);
    }

    #[test]
    fn tracker_reports_only_new_contacts() {
        let mut reg = ObjectRegistry::new();
        let body = ObjectId(9);
        reg.add(body, SceneObject::world(Tag::Avatar, square(0.0, 0.0)), Layer::Default);
        reg.add(ObjectId(1), SceneObject::world(Tag::Ground, square(5.0, 5.0)), Layer::StaticObjects);
        let mut tracker = ContactTracker::default();
        let b = square(0.0, 0.0);
        assert_eq!(tracker.entered(&reg, body, &b), vec![ObjectId(1)]);
        tracker.settle(&reg, body, &b);
        assert!(tracker.entered(&reg, body, &b).is_empty());
        tracker.settle(&reg, body, &square(-20.0, 0.0));
        assert_eq!(tracker.entered(&reg, body, &b), vec![ObjectId(1)]);
    }

    #[test]
    fn scripted_input_tracks_held_keys() {
        let mut input = ScriptedInput::new();
        assert!(!input.any_key_held());
        input.set_held(&[Key::Left, Key::Space]);
        assert!(input.is_key_held(Key::Left));
        assert!(!input.is_key_held(Key::Right));
        input.release_all();
        assert!(!input.any_key_held());
    }
}
