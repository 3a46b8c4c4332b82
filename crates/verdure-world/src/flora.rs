//! Trees on a fixed placement grid, each with a rolled canopy of leaves and fruit.

pub mod fruit;
pub mod leaf;

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use verdure_geom::{Aabb, Vec2};

use crate::Tag;
use crate::noise::{SALT_TREE_HEIGHT, pick};
use crate::worldgen::WorldGenParams;

pub use fruit::{FRUIT_COLOR, Fruit};
pub use leaf::{LEAF_COLOR, Leaf, LeafMotion};

pub const TRUNK_COLOR: [u8; 3] = [100, 50, 20];

/// Quantized x of a tree; a multiple of the placement grid.
pub type TreeKey = i32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreeId(pub u64);

#[derive(Clone, Debug, PartialEq)]
pub struct Tree {
    id: TreeId,
    key: TreeKey,
    top_left: Vec2,
    width: f32,
    height: f32,
}

impl Tree {
    pub const TAG: Tag = Tag::Tree;

    #[inline]
    pub fn id(&self) -> TreeId {
        self.id
    }

    #[inline]
    pub fn key(&self) -> TreeKey {
        self.key
    }

    #[inline]
    pub fn top_left(&self) -> Vec2 {
        self.top_left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_top_left(self.top_left, Vec2::new(self.width, self.height))
    }
}

#[derive(Clone, Debug, Default)]
pub struct TreeData {
    pub leaves: Vec<Leaf>,
    pub fruits: Vec<Fruit>,
}

/// Tree height for slot `x`: `min + hash(seed, x) % span`.
pub fn tree_height(seed: u32, x: TreeKey, min: u32, span: u32) -> u32 {
    min + pick(seed, x, 0, SALT_TREE_HEIGHT, span)
}

pub type HeightProvider = Box<dyn Fn(f32) -> f32>;

/// Clamps a probability into `[0, 1]`; NaN counts as never.
fn unit_chance(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}

/// Live trees keyed by slot.
///
/// Unlike `TerrainStrip`, `materialize` accumulates: trees carry identity and a
/// canopy rolled from a sequential RNG, so a tree is only ever created once and
/// then moved between the live map and the caller's stash.
pub struct FloraField {
    height_at: HeightProvider,
    params: WorldGenParams,
    seed: u32,
    rng: ChaCha8Rng,
    live: BTreeMap<TreeKey, (Tree, TreeData)>,
    next_id: u64,
}

impl FloraField {
    pub fn new(height_at: HeightProvider, params: &WorldGenParams, seed: i32) -> Self {
        Self {
            height_at,
            params: params.clone(),
            seed: seed as u32,
            rng: ChaCha8Rng::seed_from_u64(u64::from(seed as u32)),
            live: BTreeMap::new(),
            next_id: 1,
        }
    }

    #[inline]
    pub fn spacing(&self) -> i32 {
        self.params.tree_spacing
    }

    /// Plants every empty grid slot inside `[min_x, max_x]` (rounded inward) and
    /// returns the keys planted by this call. Occupied slots are left as they are.
    pub fn materialize(&mut self, min_x: f32, max_x: f32) -> Vec<TreeKey> {
        let mut planted = Vec::new();
        if !(min_x.is_finite() && max_x.is_finite()) || min_x > max_x {
            return planted;
        }
        let grid = self.spacing() as f32;
        let first = (min_x / grid).ceil() as i32;
        let last = (max_x / grid).floor() as i32;
        for slot in first..=last {
            let Some(key) = slot.checked_mul(self.spacing()) else {
                continue;
            };
            if self.live.contains_key(&key) {
                continue;
            }
            let entry = self.plant(key);
            self.live.insert(key, entry);
            planted.push(key);
        }
        if !planted.is_empty() {
            log::trace!(target: "flora", "planted {} trees in [{}, {}]", planted.len(), min_x, max_x);
        }
        planted
    }

    fn plant(&mut self, key: TreeKey) -> (Tree, TreeData) {
        let p = &self.params;
        let ground = (self.height_at)(key as f32);
        let height = tree_height(self.seed, key, p.tree_min_height, p.tree_height_span) as f32;
        let id = TreeId(self.next_id);
        self.next_id += 1;
        let tree = Tree {
            id,
            key,
            top_left: Vec2::new(key as f32, ground - height),
            width: p.tree_width,
            height,
        };
        let data = self.roll_canopy(&tree);
        (tree, data)
    }

    fn roll_canopy(&mut self, tree: &Tree) -> TreeData {
        let p = &self.params;
        let cell = p.block_size as f32;
        let n = p.canopy_size;
        let start_x = (tree.top_left.x + (tree.width - cell * n as f32) / 2.0).trunc();
        let start_y = (tree.top_left.y - cell).trunc();
        let motion = LeafMotion {
            sway_angle: p.leaf_sway_angle,
            sway_period: p.leaf_sway_period,
            width_factor: p.leaf_width_factor,
            width_period: p.leaf_width_period,
        };
        let (leaf_chance, fruit_chance, max_delay, cooldown) = (
            unit_chance(p.leaf_chance),
            unit_chance(p.fruit_chance),
            p.leaf_max_delay,
            p.fruit_cooldown,
        );
        let mut data = TreeData::default();
        for row in 0..n {
            for col in 0..n {
                let has_leaf = self.rng.gen_bool(leaf_chance);
                let has_fruit = self.rng.gen_bool(fruit_chance);
                let pos = Vec2::new(
                    start_x + col as f32 * cell,
                    (start_y + row as f32 * cell - tree.height / 2.0).trunc(),
                );
                if has_leaf {
                    let delay = if max_delay > 0.0 {
                        self.rng.gen_range(0.0..max_delay)
                    } else {
                        0.0
                    };
                    data.leaves.push(Leaf::new(pos, cell, delay, motion));
                }
                if has_fruit {
                    data.fruits.push(Fruit::new(pos, cell, cooldown));
                }
            }
        }
        data
    }

    /// Removes and returns every tree whose key lies outside `[min_x, max_x]`.
    pub fn evict(&mut self, min_x: f32, max_x: f32) -> Vec<(Tree, TreeData)> {
        let stale: Vec<TreeKey> = self
            .live
            .keys()
            .copied()
            .filter(|&k| (k as f32) < min_x || (k as f32) > max_x)
            .collect();
        stale
            .into_iter()
            .filter_map(|k| self.live.remove(&k))
            .collect()
    }

    /// Puts a previously evicted tree back without re-rolling anything. Fruit is
    /// forced back to its grown state.
    pub fn restore(&mut self, tree: Tree, mut data: TreeData) {
        for fruit in &mut data.fruits {
            fruit.reset();
        }
        self.live.insert(tree.key, (tree, data));
    }

    /// Advances leaf motion and fruit regrowth. Returns how many fruits regrew.
    pub fn update(&mut self, dt: f32) -> usize {
        let mut regrown = 0;
        for (_, data) in self.live.values_mut() {
            for leaf in &mut data.leaves {
                leaf.update(dt);
            }
            for fruit in &mut data.fruits {
                if fruit.update(dt) {
                    regrown += 1;
                }
            }
        }
        regrown
    }

    /// Eats fruit `index` of tree `key`. False if missing or already eaten.
    pub fn consume_fruit(&mut self, key: TreeKey, index: usize) -> bool {
        self.live
            .get_mut(&key)
            .and_then(|(_, data)| data.fruits.get_mut(index))
            .is_some_and(Fruit::consume)
    }

    #[inline]
    pub fn tree(&self, key: TreeKey) -> Option<&(Tree, TreeData)> {
        self.live.get(&key)
    }

    pub fn trees(&self) -> &BTreeMap<TreeKey, (Tree, TreeData)> {
        &self.live
    }

    pub fn trees_in_range(
        &self,
        min_x: f32,
        max_x: f32,
    ) -> impl Iterator<Item = &(Tree, TreeData)> {
        self.live
            .values()
            .filter(move |(t, _)| (t.key as f32) >= min_x && (t.key as f32) <= max_x)
    }

    #[inline]
    pub fn contains(&self, key: TreeKey) -> bool {
        self.live.contains_key(&key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
