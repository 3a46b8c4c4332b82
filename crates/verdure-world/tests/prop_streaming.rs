use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use verdure_world::{TreeId, WorldGenParams, build_world};

fn slots_in(min: f32, max: f32, spacing: i32) -> BTreeSet<i32> {
    let s = spacing as f32;
    ((min / s).ceil() as i32..=(max / s).floor() as i32)
        .map(|i| i * spacing)
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn window_invariants_hold_for_any_walk(
        seed in any::<i32>(),
        width in prop_oneof![Just(640.0f32), Just(800.0), Just(1280.0)],
        steps in prop::collection::vec(-2500.0f32..2500.0, 1..30),
    ) {
        let params = WorldGenParams::default();
        let mut w = build_world(&params, seed, width, 600.0, 0.0).unwrap();
        w.open();
        let d = width / 2.0;
        let mut x = 0.0f32;
        let mut prev = w.historical_bounds();
        let mut ids: BTreeMap<i32, TreeId> = BTreeMap::new();

        for step in steps {
            x += step;
            w.update(x);
            let win = w.window();

            // Live range covers half a screen on both sides of the avatar.
            prop_assert!(win.min <= x - d && win.max >= x + d);
            let (lo, hi) = w.terrain().live_span().unwrap();
            prop_assert!(lo as f32 <= x - d);
            prop_assert!((hi + params.block_size) as f32 >= x + d);

            // Historical bounds never shrink.
            let hb = w.historical_bounds();
            prop_assert!(hb.min() <= prev.min() && hb.max() >= prev.max());
            prop_assert!(hb.span().covers(win));
            prev = hb;

            // Every grid slot in the window is live; every other visited slot is stashed.
            let live: BTreeSet<i32> = w.flora().trees().keys().copied().collect();
            let stashed: BTreeSet<i32> = w.stash().buckets().collect();
            prop_assert!(live.is_disjoint(&stashed));
            prop_assert_eq!(&live, &slots_in(win.min, win.max, params.tree_spacing));
            let all: BTreeSet<i32> = live.union(&stashed).copied().collect();
            prop_assert_eq!(all, slots_in(hb.min(), hb.max(), params.tree_spacing));

            // A slot keeps the tree it was first given.
            for (key, (tree, _)) in w.flora().trees() {
                let id = *ids.entry(*key).or_insert(tree.id());
                prop_assert_eq!(id, tree.id());
            }
        }
    }

    #[test]
    fn heights_do_not_depend_on_query_order(
        seed in any::<i32>(),
        xs in prop::collection::vec(-1.0e5f32..1.0e5, 1..64),
    ) {
        let a = build_world(&WorldGenParams::default(), seed, 800.0, 600.0, 0.0).unwrap();
        let b = build_world(&WorldGenParams::default(), seed, 800.0, 600.0, 0.0).unwrap();
        let fwd: Vec<f32> = xs.iter().map(|&x| a.ground_height_at(x)).collect();
        let mut rev: Vec<f32> = xs.iter().rev().map(|&x| b.ground_height_at(x)).collect();
        rev.reverse();
        prop_assert_eq!(fwd, rev);
    }
}
