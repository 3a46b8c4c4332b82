use proptest::num::f32::NORMAL;
use proptest::prelude::*;
use proptest::strategy::Strategy;
use verdure_geom::Vec2;

fn approx(a: f32, b: f32, eps: f32) -> bool { (a - b).abs() <= eps }
fn vapprox(a: Vec2, b: Vec2, eps: f32) -> bool {
    approx(a.x, b.x, eps) && approx(a.y, b.y, eps)
}

fn approx_abs_rel(a: f32, b: f32, atol: f32, rtol: f32) -> bool {
    let diff = (a - b).abs();
    let scale = a.abs().max(b.abs());
    diff <= atol + rtol * scale
}

fn bounded_f32() -> impl Strategy<Value = f32> {
    NORMAL.prop_filter("bounded", |v| v.is_finite() && v.abs() <= 1e4)
}

fn arb_vec2() -> impl Strategy<Value = Vec2> {
    (bounded_f32(), bounded_f32()).prop_map(|(x, y)| Vec2::new(x, y))
}

proptest! {
    #[test]
    fn vec2_add_commutative(a in arb_vec2(), b in arb_vec2()) {
        prop_assert!(vapprox(a + b, b + a, 1e-5));
    }

    #[test]
    fn vec2_sub_inverts_add(a in arb_vec2(), b in arb_vec2()) {
        let back = (a + b) - b;
        prop_assert!(approx_abs_rel(back.x, a.x, 1e-2, 1e-5));
        prop_assert!(approx_abs_rel(back.y, a.y, 1e-2, 1e-5));
    }

    // Rotation is an isometry: length is preserved for any angle.
    #[test]
    fn vec2_rotation_preserves_length(v in arb_vec2(), deg in -720.0f32..720.0) {
        let r = v.rotated(deg);
        prop_assert!(approx_abs_rel(r.length(), v.length(), 1e-2, 1e-4));
    }

    #[test]
    fn vec2_full_turn_is_identity(v in arb_vec2()) {
        let r = v.rotated(360.0);
        prop_assert!(approx_abs_rel(r.x, v.x, 1e-2, 1e-4));
        prop_assert!(approx_abs_rel(r.y, v.y, 1e-2, 1e-4));
    }

    #[test]
    fn vec2_normalized_is_unit_or_zero(v in arb_vec2()) {
        let n = v.normalized();
        if v.length() > 1e-3 {
            prop_assert!(approx(n.length(), 1.0, 1e-4));
        }
    }
}
