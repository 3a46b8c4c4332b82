use proptest::prelude::*;
use verdure::config::GameConfig;
use verdure::host::Key;
use verdure::sim::{Sim, Step};
use verdure_world::Tag;

fn arb_step() -> impl Strategy<Value = Step> {
    let keys = prop_oneof![
        Just(Vec::<Key>::new()),
        Just(vec![Key::Left]),
        Just(vec![Key::Right]),
        Just(vec![Key::Space]),
        Just(vec![Key::Right, Key::Space]),
        Just(vec![Key::Left, Key::Right]),
    ];
    (keys, 1u32..90).prop_map(|(keys, frames)| Step { keys, frames })
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 12, .. ProptestConfig::default() })]

    #[test]
    fn registry_mirrors_world_under_any_script(
        seed in any::<i32>(),
        script in prop::collection::vec(arb_step(), 1..8),
    ) {
        let mut cfg = GameConfig::default();
        cfg.seed = seed;
        let mut sim = Sim::new(cfg, 1.0 / 60.0).unwrap();
        let mut last_bounds = sim.game().historical_bounds();
        for step in &script {
            for _ in 0..step.frames {
                sim.step(&step.keys);
            }
            let g = sim.game();
            let b = g.historical_bounds();
            prop_assert!(b.min() <= last_bounds.min() && b.max() >= last_bounds.max());
            last_bounds = b;
            let x = g.avatar().position().x;
            let d = g.config().window.width / 2.0;
            prop_assert!(g.window().min <= x - d && g.window().max >= x + d);
            let energy = g.avatar().energy();
            prop_assert!((0.0..=100.0).contains(&energy));
        }
        let g = sim.game();
        prop_assert_eq!(g.registry().len(), g.object_count());
        prop_assert_eq!(g.registry().count_tagged(Tag::Tree), g.world().flora().len());
        prop_assert_eq!(
            g.registry().count_tagged(Tag::Ground),
            g.world().terrain().block_count()
        );
        prop_assert_eq!(g.registry().count_tagged(Tag::Rain), g.rain().len());
    }
}
