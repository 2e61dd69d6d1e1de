// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Point;
use understory_viewport::Viewport;

fn viewport(rotation: f64) -> Viewport {
    let mut vp = Viewport::new();
    vp.set_center_xy(1_234.5, -6_789.0);
    vp.set_resolution(2.5);
    vp.set_size(1_920.0, 1_080.0);
    vp.set_rotation(rotation);
    vp
}

fn screen_points(n: usize) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            Point::new((t * 37.0) % 1_920.0, (t * 53.0) % 1_080.0)
        })
        .collect()
}

fn bench_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewport/convert");
    let points = screen_points(4_096);

    // Rotation 0 takes the unrotated path; 30 degrees pays for the rotation.
    for rotation in [0.0_f64, 30.0] {
        let vp = viewport(rotation);
        group.bench_with_input(
            BenchmarkId::new("screen_to_world", rotation),
            &points,
            |b, points| {
                b.iter(|| {
                    let sum = points
                        .iter()
                        .map(|p| vp.screen_to_world(*p))
                        .fold(0.0, |acc, w| acc + w.x + w.y);
                    black_box(sum);
                });
            },
        );

        let affine = vp.screen_to_world_transform();
        group.bench_with_input(
            BenchmarkId::new("screen_to_world_affine", rotation),
            &points,
            |b, points| {
                b.iter(|| {
                    let sum = points
                        .iter()
                        .map(|p| affine * *p)
                        .fold(0.0, |acc, w| acc + w.x + w.y);
                    black_box(sum);
                });
            },
        );
    }

    group.finish();
}

fn bench_extent(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewport/extent");

    for rotation in [0.0_f64, 30.0] {
        group.bench_function(BenchmarkId::new("recompute", rotation), |b| {
            b.iter_batched(
                || viewport(rotation),
                |vp| black_box(vp.extent()),
                BatchSize::SmallInput,
            );
        });
    }

    let vp = viewport(30.0);
    let _ = vp.extent();
    group.bench_function("cached", |b| b.iter(|| black_box(vp.extent())));

    group.finish();
}

fn bench_gesture(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewport/gesture");
    let steps = screen_points(256);

    group.bench_function("pinch_drag_sequence", |b| {
        b.iter_batched(
            || viewport(15.0),
            |mut vp| {
                for pair in steps.windows(2) {
                    vp.transform(pair[1], pair[0], 1.01);
                    black_box(vp.extent());
                }
                black_box(vp);
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_conversion, bench_extent, bench_gesture);
criterion_main!(benches);
