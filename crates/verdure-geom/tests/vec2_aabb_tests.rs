use verdure_geom::{Aabb, Vec2};

fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn vec2_approx_eq(a: Vec2, b: Vec2, eps: f32) -> bool {
    approx_eq(a.x, b.x, eps) && approx_eq(a.y, b.y, eps)
}

#[test]
fn vec2_constants() {
    assert!(vec2_approx_eq(Vec2::ZERO, Vec2::new(0.0, 0.0), 1e-6));
    assert!(vec2_approx_eq(Vec2::ONES, Vec2::splat(1.0), 1e-6));
}

#[test]
fn vec2_add_sub_neg() {
    let a = Vec2::new(1.0, 2.0);
    let b = Vec2::new(-4.0, 5.0);
    assert!(vec2_approx_eq(a + b, Vec2::new(-3.0, 7.0), 1e-6));
    assert!(vec2_approx_eq(a - b, Vec2::new(5.0, -3.0), 1e-6));
    assert!(vec2_approx_eq(-a, Vec2::new(-1.0, -2.0), 1e-6));

    let mut v = a;
    v += b;
    v -= a;
    assert!(vec2_approx_eq(v, b, 1e-6));
}

#[test]
fn vec2_rotated_quarter_turn() {
    let v = Vec2::new(1.0, 0.0).rotated(90.0);
    assert!(vec2_approx_eq(v, Vec2::new(0.0, 1.0), 1e-5));
}

#[test]
fn aabb_from_top_left_and_center() {
    let b = Aabb::from_top_left(Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0));
    assert!(vec2_approx_eq(b.max, Vec2::new(40.0, 60.0), 1e-6));
    assert!(vec2_approx_eq(b.center(), Vec2::new(25.0, 40.0), 1e-6));

    let c = Aabb::from_center(Vec2::new(0.0, 0.0), Vec2::splat(120.0));
    assert!(vec2_approx_eq(c.min, Vec2::splat(-60.0), 1e-6));
    assert!(vec2_approx_eq(c.size(), Vec2::splat(120.0), 1e-6));
}

#[test]
fn aabb_touching_edges_do_not_intersect() {
    let a = Aabb::from_top_left(Vec2::ZERO, Vec2::splat(30.0));
    let b = Aabb::from_top_left(Vec2::new(30.0, 0.0), Vec2::splat(30.0));
    let c = Aabb::from_top_left(Vec2::new(29.0, 29.0), Vec2::splat(30.0));
    assert!(!a.intersects(&b));
    assert!(a.intersects(&c));
    assert!(c.intersects(&a));
}

#[test]
fn aabb_contains_and_translate() {
    let a = Aabb::from_top_left(Vec2::ZERO, Vec2::splat(10.0));
    assert!(a.contains(Vec2::new(5.0, 5.0)));
    assert!(a.contains(Vec2::new(10.0, 10.0)));
    assert!(!a.contains(Vec2::new(10.5, 5.0)));
    let t = a.translated(Vec2::new(100.0, -5.0));
    assert!(vec2_approx_eq(t.min, Vec2::new(100.0, -5.0), 1e-6));
}
