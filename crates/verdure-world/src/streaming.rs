//! Window streaming: keeps terrain and flora materialized around the avatar,
//! generating on the frontier and restoring from the stash everywhere else.

use std::collections::BTreeSet;

use hashbrown::HashMap;

use crate::flora::{FloraField, Tree, TreeData, TreeKey};
use crate::terrain::TerrainStrip;

/// Upper bound on window shifts resolved by a single `update`.
pub const MAX_SHIFTS_PER_UPDATE: usize = 256;

/// Closed x-range `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    #[inline]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max - self.min
    }

    #[inline]
    pub fn contains(&self, x: f32) -> bool {
        x >= self.min && x <= self.max
    }

    #[inline]
    pub fn covers(&self, other: Span) -> bool {
        self.min <= other.min && self.max >= other.max
    }

    #[inline]
    pub fn shifted(&self, by: f32) -> Span {
        Span::new(self.min + by, self.max + by)
    }
}

/// Widest extent ever materialized. Only grows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HistoricalBounds {
    span: Span,
}

impl HistoricalBounds {
    pub fn new(initial: Span) -> Self {
        Self { span: initial }
    }

    /// Widens to include `window`; true if either edge moved.
    pub fn absorb(&mut self, window: Span) -> bool {
        let mut grew = false;
        if window.min < self.span.min {
            self.span.min = window.min;
            grew = true;
        }
        if window.max > self.span.max {
            self.span.max = window.max;
            grew = true;
        }
        grew
    }

    #[inline]
    pub fn min(&self) -> f32 {
        self.span.min
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.span.max
    }

    #[inline]
    pub fn span(&self) -> Span {
        self.span
    }
}

/// Evicted trees waiting to be restored, keyed by quantized x bucket.
pub struct EvictionStash {
    bucket: i32,
    entries: HashMap<i32, (Tree, TreeData)>,
}

impl EvictionStash {
    pub fn new(bucket: i32) -> Self {
        Self {
            bucket: bucket.max(1),
            entries: HashMap::new(),
        }
    }

    #[inline]
    pub fn bucket_of(&self, x: i32) -> i32 {
        x.div_euclid(self.bucket) * self.bucket
    }

    pub fn stash(&mut self, tree: Tree, data: TreeData) {
        let key = self.bucket_of(tree.key());
        if let Some((old, _)) = self.entries.insert(key, (tree, data)) {
            log::warn!(target: "stream", "stash bucket {} overwritten (tree {:?})", key, old.id());
        }
    }

    /// Removes and returns every entry whose bucket lies in `[lo, hi]`, ordered by bucket.
    pub fn take_range(&mut self, lo: f32, hi: f32) -> Vec<(Tree, TreeData)> {
        let mut keys: Vec<i32> = self
            .entries
            .keys()
            .copied()
            .filter(|&k| (k as f32) >= lo && (k as f32) <= hi)
            .collect();
        keys.sort_unstable();
        keys.into_iter()
            .filter_map(|k| self.entries.remove(&k))
            .collect()
    }

    #[inline]
    pub fn get(&self, bucket: i32) -> Option<&(Tree, TreeData)> {
        self.entries.get(&bucket)
    }

    #[inline]
    pub fn contains(&self, bucket: i32) -> bool {
        self.entries.contains_key(&bucket)
    }

    pub fn buckets(&self) -> impl Iterator<Item = i32> + '_ {
        self.entries.keys().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    /// Avatar came within reach of the left edge; window moves left.
    Left,
    /// Avatar came within reach of the right edge; window moves right.
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShiftRecord {
    pub edge: Edge,
    pub window: Span,
    pub exposed: Span,
    pub frontier: bool,
    pub generated: usize,
    pub restored: usize,
    pub stashed: usize,
}

/// Registry additions and removals produced by one `WorldWindow` call. An item
/// added and removed within the same call cancels out.
#[derive(Clone, Debug, Default)]
pub struct StreamDelta {
    pub columns_added: BTreeSet<i32>,
    pub columns_removed: BTreeSet<i32>,
    pub trees_added: BTreeSet<TreeKey>,
    pub trees_removed: BTreeSet<TreeKey>,
    pub shifts: Vec<ShiftRecord>,
}

impl StreamDelta {
    fn add_column(&mut self, x: i32) {
        if !self.columns_removed.remove(&x) {
            self.columns_added.insert(x);
        }
    }

    fn remove_column(&mut self, x: i32) {
        if !self.columns_added.remove(&x) {
            self.columns_removed.insert(x);
        }
    }

    fn add_tree(&mut self, key: TreeKey) {
        if !self.trees_removed.remove(&key) {
            self.trees_added.insert(key);
        }
    }

    fn remove_tree(&mut self, key: TreeKey) {
        if !self.trees_added.remove(&key) {
            self.trees_removed.insert(key);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns_added.is_empty()
            && self.columns_removed.is_empty()
            && self.trees_added.is_empty()
            && self.trees_removed.is_empty()
    }
}

/// Streaming controller over a terrain strip and a flora field.
pub struct WorldWindow {
    terrain: TerrainStrip,
    flora: FloraField,
    stash: EvictionStash,
    window: Span,
    bounds: HistoricalBounds,
    screen_width: f32,
    spacing: i32,
    opened: bool,
}

impl WorldWindow {
    /// Sets up the initial window around `center_x`. Nothing is materialized
    /// until `open`.
    pub fn new(terrain: TerrainStrip, flora: FloraField, screen_width: f32, center_x: f32) -> Self {
        let spacing = flora.spacing();
        let s = spacing as f32;
        // At least 1.5 screens wide so a shift can never arm the opposite edge.
        let half = (0.75 * screen_width / s).ceil().max(1.0) * s;
        let center = (center_x / s).round() * s;
        let window = Span::new(center - half, center + half);
        Self {
            terrain,
            flora,
            stash: EvictionStash::new(spacing),
            window,
            bounds: HistoricalBounds::new(window),
            screen_width,
            spacing,
            opened: false,
        }
    }

    /// Materializes the initial window as fresh territory.
    pub fn open(&mut self) -> StreamDelta {
        let mut delta = StreamDelta::default();
        if self.opened {
            return delta;
        }
        self.opened = true;
        let w = self.window;
        self.terrain.materialize(w.min, w.max);
        for x in self.terrain.column_keys().collect::<Vec<_>>() {
            delta.add_column(x);
        }
        for key in self.generate(w) {
            delta.add_tree(key);
        }
        log::info!(
            target: "stream",
            "opened window [{}, {}]: {} columns, {} trees",
            w.min,
            w.max,
            self.terrain.len(),
            self.flora.len()
        );
        delta
    }

    #[inline]
    pub fn distance_to_generate(&self) -> f32 {
        self.screen_width / 2.0
    }

    /// Shifts the window until the avatar is at least half a screen from both
    /// edges, at most `MAX_SHIFTS_PER_UPDATE` times per call.
    pub fn update(&mut self, avatar_x: f32) -> StreamDelta {
        let mut delta = self.open();
        let d = self.distance_to_generate();
        if !avatar_x.is_finite() || d <= 0.0 {
            return delta;
        }
        for _ in 0..MAX_SHIFTS_PER_UPDATE {
            if avatar_x - self.window.min < d {
                self.shift(Edge::Left, &mut delta);
            } else if self.window.max - avatar_x < d {
                self.shift(Edge::Right, &mut delta);
            } else {
                return delta;
            }
        }
        log::warn!(
            target: "stream",
            "avatar at {} still outside [{}, {}] after {} shifts; resuming next update",
            avatar_x,
            self.window.min,
            self.window.max,
            MAX_SHIFTS_PER_UPDATE
        );
        delta
    }

    fn shift(&mut self, edge: Edge, delta: &mut StreamDelta) {
        let d = self.distance_to_generate();
        let old = self.window;
        let (window, exposed) = match edge {
            Edge::Left => (old.shifted(-d), Span::new(old.min - d, old.min)),
            Edge::Right => (old.shifted(d), Span::new(old.max, old.max + d)),
        };
        self.window = window;
        let frontier = self.bounds.absorb(window);

        let before: BTreeSet<i32> = self.terrain.column_keys().collect();
        self.terrain.materialize(window.min, window.max);
        for x in self.terrain.column_keys() {
            if !before.contains(&x) {
                delta.add_column(x);
            }
        }

        // Revisited slots inside the exposed strip come back from the stash
        // before any generation, so the frontier pass only fills true gaps.
        let restored = self.restore_range(exposed, delta);
        let generated = if frontier {
            let planted = self.generate(exposed);
            let n = planted.len();
            for key in planted {
                delta.add_tree(key);
            }
            n
        } else {
            0
        };

        let live: BTreeSet<i32> = self.terrain.column_keys().collect();
        for x in before.difference(&live) {
            delta.remove_column(*x);
        }

        let evicted = self.flora.evict(window.min, window.max);
        let stashed = evicted.len();
        for (tree, data) in evicted {
            delta.remove_tree(tree.key());
            self.stash.stash(tree, data);
        }

        let record = ShiftRecord {
            edge,
            window,
            exposed,
            frontier,
            generated,
            restored,
            stashed,
        };
        log::debug!(
            target: "stream",
            "shift {:?} -> [{}, {}] frontier={} generated={} restored={} stashed={}",
            edge,
            window.min,
            window.max,
            frontier,
            generated,
            restored,
            stashed
        );
        delta.shifts.push(record);
    }

    /// Walks `span` in spacing steps, planting empty slots.
    fn generate(&mut self, span: Span) -> Vec<TreeKey> {
        let step = self.spacing as f32;
        let mut planted = Vec::new();
        let mut pos = span.min;
        while pos <= span.max {
            let hi = (pos + step).min(span.max);
            planted.extend(self.flora.materialize(pos, hi));
            pos += step;
        }
        planted
    }

    fn restore_range(&mut self, span: Span, delta: &mut StreamDelta) -> usize {
        let back = self.stash.take_range(span.min, span.max);
        let n = back.len();
        for (tree, data) in back {
            delta.add_tree(tree.key());
            self.flora.restore(tree, data);
        }
        n
    }

    #[inline]
    pub fn window(&self) -> Span {
        self.window
    }

    #[inline]
    pub fn historical_bounds(&self) -> HistoricalBounds {
        self.bounds
    }

    #[inline]
    pub fn ground_height_at(&self, x: f32) -> f32 {
        self.terrain.height_at(x)
    }

    pub fn terrain(&self) -> &TerrainStrip {
        &self.terrain
    }

    pub fn flora(&self) -> &FloraField {
        &self.flora
    }

    pub fn flora_mut(&mut self) -> &mut FloraField {
        &mut self.flora
    }

    pub fn stash(&self) -> &EvictionStash {
        &self.stash
    }

    #[inline]
    pub fn screen_width(&self) -> f32 {
        self.screen_width
    }
}
