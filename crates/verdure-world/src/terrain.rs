use std::collections::BTreeMap;
use std::sync::Arc;

use verdure_geom::{Aabb, Vec2};

use crate::Tag;
use crate::noise::{NoiseField, jitter_color};
use crate::worldgen::WorldGenParams;

pub const GROUND_COLOR: [u8; 3] = [212, 123, 74];
const GROUND_TINT_DELTA: u8 = 10;

/// `x -> ground height` for a fixed seed and window height. Shared with flora
/// through the injected height provider.
pub struct HeightField {
    noise: NoiseField,
    base_height: f32,
    amplitude: f32,
}

impl HeightField {
    pub fn new(noise: NoiseField, window_height: f32, base_fraction: f32, amplitude: f32) -> Self {
        Self {
            noise,
            base_height: window_height * base_fraction,
            amplitude,
        }
    }

    #[inline]
    pub fn height_at(&self, x: f32) -> f32 {
        self.base_height + self.noise.sample(x, self.amplitude)
    }

    #[inline]
    pub fn base_height(&self) -> f32 {
        self.base_height
    }

    #[inline]
    pub fn seed(&self) -> i32 {
        self.noise.seed()
    }
}

/// Immovable ground block; collides from every direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Block {
    pub top_left: Vec2,
    pub size: f32,
    pub color: [u8; 3],
}

impl Block {
    pub const TAG: Tag = Tag::Ground;

    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_top_left(self.top_left, Vec2::splat(self.size))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub x: i32,
    pub top: f32,
    pub blocks: Vec<Block>,
}

/// Windowed column-of-blocks view over the height field.
///
/// `materialize` replaces the live set wholesale. Columns carry no identity and
/// rebuild identically from the seed, so there is nothing worth keeping across
/// a window shift; flora does the opposite (see `FloraField`).
pub struct TerrainStrip {
    height: Arc<HeightField>,
    block_size: i32,
    depth: u32,
    live: BTreeMap<i32, Column>,
}

impl TerrainStrip {
    pub fn new(params: &WorldGenParams, seed: i32, window_height: f32) -> Self {
        let noise = NoiseField::new(seed, params.noise_frequency, params.noise_octaves);
        let height = HeightField::new(
            noise,
            window_height,
            params.base_height_fraction,
            params.noise_amplitude,
        );
        Self::with_height_field(Arc::new(height), params.block_size, params.terrain_depth)
    }

    pub fn with_height_field(height: Arc<HeightField>, block_size: i32, depth: u32) -> Self {
        Self {
            height,
            block_size: block_size.max(1),
            depth,
            live: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn height_at(&self, x: f32) -> f32 {
        self.height.height_at(x)
    }

    pub fn height_field(&self) -> Arc<HeightField> {
        Arc::clone(&self.height)
    }

    #[inline]
    pub fn block_size(&self) -> i32 {
        self.block_size
    }

    /// First block-aligned x at or below `x`.
    #[inline]
    pub fn align_down(&self, x: f32) -> i32 {
        ((x / self.block_size as f32).floor() as i32).saturating_mul(self.block_size)
    }

    fn build_column(&self, x: i32) -> Column {
        let top = self.height_at(x as f32).floor();
        let size = self.block_size as f32;
        let seed = self.height.seed() as u32;
        let blocks = (0..self.depth)
            .map(|row| Block {
                top_left: Vec2::new(x as f32, top + row as f32 * size),
                size,
                color: jitter_color(GROUND_COLOR, seed, x, row as i32, GROUND_TINT_DELTA),
            })
            .collect();
        Column { x, top, blocks }
    }

    /// Rebuilds the live set to exactly cover `[align_down(min_x), max_x]`.
    pub fn materialize(&mut self, min_x: f32, max_x: f32) -> &BTreeMap<i32, Column> {
        let mut next = BTreeMap::new();
        if min_x.is_finite() && max_x.is_finite() {
            let mut x = self.align_down(min_x);
            while x as f32 <= max_x {
                next.insert(x, self.build_column(x));
                match x.checked_add(self.block_size) {
                    Some(n) => x = n,
                    None => break,
                }
            }
        }
        self.live = next;
        &self.live
    }

    /// Removes and returns every live column outside `[min_x, max_x]`.
    pub fn evict(&mut self, min_x: f32, max_x: f32) -> Vec<Column> {
        let stale: Vec<i32> = self
            .live
            .keys()
            .copied()
            .filter(|&x| (x as f32) < min_x || (x as f32) > max_x)
            .collect();
        stale
            .into_iter()
            .filter_map(|x| self.live.remove(&x))
            .collect()
    }

    #[inline]
    pub fn column(&self, x: i32) -> Option<&Column> {
        self.live.get(&x)
    }

    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.live.values()
    }

    pub fn columns_in_range(&self, min_x: f32, max_x: f32) -> impl Iterator<Item = &Column> {
        let lo = self.align_down(min_x);
        self.live
            .range(lo..)
            .map(|(_, c)| c)
            .take_while(move |c| c.x as f32 <= max_x)
            .filter(move |c| c.x as f32 >= min_x)
    }

    pub fn column_keys(&self) -> impl Iterator<Item = i32> + '_ {
        self.live.keys().copied()
    }

    /// Leftmost and rightmost live column x.
    pub fn live_span(&self) -> Option<(i32, i32)> {
        let lo = *self.live.keys().next()?;
        let hi = *self.live.keys().next_back()?;
        Some((lo, hi))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn block_count(&self) -> usize {
        self.live.values().map(|c| c.blocks.len()).sum()
    }
}
