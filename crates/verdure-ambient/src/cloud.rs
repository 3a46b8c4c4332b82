use verdure_anim::{RepeatMode, Transition};
use verdure_geom::{Aabb, Vec2};
use verdure_world::Tag;
use verdure_world::noise::pick;

use crate::CoordinateSpace;

pub const CLOUD_COLOR: [u8; 3] = [255, 255, 255];
const SALT_CLOUD_SHADE: u32 = 0x000C_10D5;

const SHAPE: [[u8; 6]; 6] = [
    [0, 1, 1, 0, 0, 0],
    [1, 1, 1, 0, 1, 0],
    [1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1],
    [0, 1, 1, 1, 0, 0],
    [0, 0, 0, 0, 0, 0],
];
const CLOUD_ROW: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CloudBlock {
    pub initial: Vec2,
    pub color: [u8; 3],
}

/// Block cloud drifting across the screen on a loop.
#[derive(Clone, Debug)]
pub struct Cloud {
    blocks: Vec<CloudBlock>,
    block_size: f32,
    drift: Transition,
}

impl Cloud {
    pub const TAG: Tag = Tag::Cloud;
    pub const SPACE: CoordinateSpace = CoordinateSpace::Camera;

    /// Lays out shape columns from `start_x` in block steps while they fit in
    /// `start_x + length`; each block then drifts `0 -> window_width` over `period`.
    pub fn new(start_x: f32, length: f32, window_width: f32, block_size: f32, period: f32) -> Self {
        let end_x = start_x + length;
        let base = Vec2::new(start_x, CLOUD_ROW * block_size);
        let mut blocks = Vec::new();
        let mut x = start_x;
        let mut col = 0usize;
        while x <= end_x && col < SHAPE[0].len() {
            for (row, cells) in SHAPE.iter().enumerate() {
                if cells[col] == 1 {
                    let initial = base + Vec2::new(x - start_x, row as f32 * block_size);
                    // Same dimming on every channel keeps the block grey-white.
                    let dim = pick(0, col as i32, row as i32, SALT_CLOUD_SHADE, 21) as u8;
                    let color = CLOUD_COLOR.map(|c| c - dim);
                    blocks.push(CloudBlock { initial, color });
                }
            }
            x += block_size;
            col += 1;
        }
        Self {
            blocks,
            block_size,
            drift: Transition::linear(0.0, window_width, period, RepeatMode::Loop),
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.drift.update(dt);
    }

    #[inline]
    pub fn offset(&self) -> f32 {
        self.drift.value()
    }

    pub fn blocks(&self) -> impl Iterator<Item = (Vec2, [u8; 3])> + '_ {
        let dx = self.offset();
        self.blocks
            .iter()
            .map(move |b| (b.initial + Vec2::new(dx, 0.0), b.color))
    }

    pub fn block_bounds(&self) -> impl Iterator<Item = Aabb> + '_ {
        let size = Vec2::splat(self.block_size);
        self.blocks().map(move |(p, _)| Aabb::from_top_left(p, size))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Point just under the middle of the cloud's bottom row, or `Vec2::ZERO`
    /// when the cloud has no blocks.
    pub fn anchor(&self) -> Vec2 {
        let mut bottom = f32::MIN;
        for (p, _) in self.blocks() {
            bottom = bottom.max(p.y);
        }
        if bottom == f32::MIN {
            return Vec2::ZERO;
        }
        let (mut lo, mut hi) = (f32::MAX, f32::MIN);
        for (p, _) in self.blocks().filter(|(p, _)| p.y == bottom) {
            lo = lo.min(p.x);
            hi = hi.max(p.x);
        }
        Vec2::new((lo + hi) / 2.0, bottom + self.block_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_range_uses_leading_columns() {
        // 800 / 10 = 80 px: columns at 0, 30, 60.
        let c = Cloud::new(0.0, 80.0, 800.0, 30.0, 30.0);
        assert_eq!(c.len(), 3 + 5 + 5);
    }

    #[test]
    fn anchor_sits_under_bottom_row() {
        let c = Cloud::new(0.0, 80.0, 800.0, 30.0, 30.0);
        // Bottom populated row is row 4 (y = 30 + 120), columns 1..=2.
        assert_eq!(c.anchor(), Vec2::new(45.0, 180.0));
    }

    #[test]
    fn empty_cloud_anchor_is_zero() {
        let c = Cloud::new(0.0, -1.0, 800.0, 30.0, 30.0);
        assert!(c.is_empty());
        assert_eq!(c.anchor(), Vec2::ZERO);
    }

    #[test]
    fn drift_moves_anchor_and_wraps() {
        let mut c = Cloud::new(0.0, 80.0, 800.0, 30.0, 30.0);
        c.update(15.0);
        assert_eq!(c.anchor(), Vec2::new(445.0, 180.0));
        c.update(15.0);
        assert_eq!(c.anchor(), Vec2::new(45.0, 180.0));
    }
}
