use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::time::Duration;

use verdure_world::{WorldGenParams, build_world};

fn bench_open_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("open_window");
    let params = WorldGenParams::default();
    group.bench_function("800x600", |b| {
        b.iter(|| {
            let mut w = build_world(&params, 12345, 800.0, 600.0, 0.0).unwrap();
            black_box(w.open());
        })
    });
    group.finish();
}

fn bench_walk_right(c: &mut Criterion) {
    let mut group = c.benchmark_group("walk_right");
    let params = WorldGenParams::default();
    group.bench_function("frontier_50_shifts", |b| {
        b.iter(|| {
            let mut w = build_world(&params, 12345, 800.0, 600.0, 0.0).unwrap();
            w.open();
            let mut x = 0.0;
            for _ in 0..50 {
                x += 400.0;
                black_box(w.update(x));
            }
        })
    });
    group.finish();
}

fn bench_oscillate(c: &mut Criterion) {
    let mut group = c.benchmark_group("oscillate");
    let params = WorldGenParams::default();
    let mut w = build_world(&params, 12345, 800.0, 600.0, 0.0).unwrap();
    w.open();
    group.bench_function("backtrack_restore", |b| {
        b.iter(|| {
            black_box(w.update(300.0));
            black_box(w.update(100.0));
        })
    });
    group.finish();
}

fn short_config() -> Criterion {
    Criterion::default()
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
        .sample_size(30)
}

criterion_group! {
    name = benches;
    config = short_config();
    targets = bench_open_window, bench_walk_right, bench_oscillate
}
criterion_main!(benches);
