// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Indexed versus linear `$within` queries.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Point;
use locus_geometry::Polygon;
use locus_grid::{FlatScan, GeoIndex, GridConfig};
use locus_within::{Shape, WithinQuery};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_points(rng: &mut impl Rng, n: u32) -> Vec<(u32, Point)> {
    (0..n)
        .map(|i| (i, Point::new(rng.gen_range(-170.0..170.0), rng.gen_range(-80.0..80.0))))
        .collect()
}

fn random_convex_polygon(rng: &mut impl Rng) -> Polygon {
    let vertices = rng.gen_range(3..=12);
    let cx = rng.gen_range(-150.0..150.0);
    let cy = rng.gen_range(-60.0..60.0);
    let radius = rng.gen_range(2.0..20.0);
    let mut angles: Vec<f64> = (0..vertices)
        .map(|_| rng.gen_range(0.0..std::f64::consts::TAU))
        .collect();
    angles.sort_by(f64::total_cmp);
    Polygon::new(
        angles
            .iter()
            .map(|a| (cx + radius * a.cos(), cy + radius * a.sin())),
    )
    .expect("generated polygon has at least three finite vertices")
}

fn within_benchmark_fn(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);

    const NUM_QUERIES: usize = 100;
    let queries: Vec<WithinQuery> = (0..NUM_QUERIES)
        .map(|_| WithinQuery::from_polygon(random_convex_polygon(&mut rng)))
        .collect();

    let mut group = c.benchmark_group("WithinQueries");
    for n in [1_000_u32, 10_000, 100_000] {
        let pts = random_points(&mut rng, n);
        let idx = GeoIndex::build(GridConfig::default(), pts.iter().copied())
            .expect("points are inside the default domain");
        let flat: FlatScan<u32> = pts.iter().copied().collect();

        group.bench_with_input(BenchmarkId::new("indexed", n), &idx, |b, idx| {
            let mut query_iter = queries.iter().cycle();
            b.iter(|| {
                let q = query_iter.next().unwrap();
                q.execute(black_box(idx), idx).unwrap()
            });
        });
        group.bench_with_input(BenchmarkId::new("linear", n), &flat, |b, flat| {
            let mut query_iter = queries.iter().cycle();
            b.iter(|| {
                let q = query_iter.next().unwrap();
                q.execute(black_box(flat), &idx).unwrap()
            });
        });
    }
    group.finish();
}

fn index_maintenance_fn(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(11);
    let pts = random_points(&mut rng, 10_000);

    let mut group = c.benchmark_group("IndexMaintenance");
    group.bench_function("build_10k", |b| {
        b.iter(|| GeoIndex::build(GridConfig::default(), black_box(&pts).iter().copied()).unwrap());
    });
    group.bench_function("update_10k", |b| {
        let mut idx = GeoIndex::build(GridConfig::default(), pts.iter().copied()).unwrap();
        let mut flip = false;
        b.iter(|| {
            let dx = if flip { -1.0 } else { 1.0 };
            flip = !flip;
            for &(id, p) in &pts {
                idx.update(id, Point::new(p.x + dx * 0.5, p.y)).unwrap();
            }
        });
    });
    group.finish();

    let shape = Shape::from_corners((-10.0, -10.0), (10.0, 10.0));
    let idx = GeoIndex::build(GridConfig::default(), pts.iter().copied()).unwrap();
    c.bench_function("box_20x20_10k", |b| {
        let q = WithinQuery::new(&shape).unwrap();
        b.iter(|| q.execute(black_box(&idx), &idx).unwrap());
    });
}

criterion_group!(benches, within_benchmark_fn, index_maintenance_fn);
criterion_main!(benches);
