use proptest::prelude::*;
use verdure_ambient::{Cloud, JumpListener, Night, Rain, Sun};
use verdure_geom::Vec2;

proptest! {
    #[test]
    fn night_opacity_stays_between_day_and_midnight(
        cycle in 2.0f32..120.0,
        steps in prop::collection::vec(0.0f32..3.0, 1..300),
    ) {
        let mut night = Night::new(Vec2::new(800.0, 600.0), cycle);
        for dt in steps {
            night.update(dt);
            let o = night.opacity();
            prop_assert!((-1e-5..=0.5 + 1e-5).contains(&o), "opacity {}", o);
        }
    }

    #[test]
    fn sun_keeps_its_orbit_radius(
        cycle in 1.0f32..120.0,
        steps in prop::collection::vec(0.0f32..5.0, 1..200),
    ) {
        let window = Vec2::new(800.0, 600.0);
        let pivot = Vec2::new(400.0, 400.0);
        let mut sun = Sun::new(window, cycle);
        for dt in steps {
            sun.update(dt);
            prop_assert!(((sun.center() - pivot).length() - 200.0).abs() < 1e-2);
        }
    }

    // However often the avatar jumps, bursts are bounded and gone after the fade.
    #[test]
    fn rain_bursts_are_bounded_and_self_expiring(
        jumps in prop::collection::vec(0.0f32..1.0, 1..40),
    ) {
        let mut rain = Rain::new();
        let cloud = Cloud::new(0.0, 80.0, 800.0, 30.0, 30.0);
        let mut removed = 0usize;
        for dt in &jumps {
            rain.on_jump(cloud.anchor());
            removed += rain.update(*dt).len();
            prop_assert!(rain.len() <= 3 * jumps.len());
        }
        removed += rain.update(3.0).len();
        prop_assert!(rain.is_empty());
        prop_assert_eq!(removed, 3 * jumps.len());
    }
}
