// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use understory_quadtree::{Aabb2D, Backend, BoundsPolicy, FlatIndex, PointIndex, PointIndexGeneric};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

const POINT_SEED: u64 = 0x81FD_BEE7_94F0_AF1A;
const QUERY_SEED: u64 = 0x3C6E_F35F_4750_2932;

fn world() -> Aabb2D<f64> {
    Aabb2D::new(0.0, 0.0, 2000.0, 2000.0)
}

/// Generates `count` random points `(x, y)` that are all contained in `world`.
fn gen_uniform_points(count: usize, world: Aabb2D<f64>, seed: u64) -> Vec<(f64, f64)> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|_| {
            let x = rng.next_f64() * (world.max_x - world.min_x) + world.min_x;
            let y = rng.next_f64() * (world.max_y - world.min_y) + world.min_y;
            (x, y)
        })
        .collect()
}

fn gen_clustered_points(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut centers = Vec::with_capacity(n_clusters);
    for _ in 0..n_clusters {
        centers.push((
            rng.next_f64() * (2000.0 - spread) + spread * 0.5,
            rng.next_f64() * (2000.0 - spread) + spread * 0.5,
        ));
    }
    for (cx, cy) in centers {
        for _ in 0..per_cluster {
            let dx = (rng.next_f64() - 0.5) * spread;
            let dy = (rng.next_f64() - 0.5) * spread;
            out.push((cx + dx, cy + dy));
        }
    }
    out
}

fn build<B: Backend<f64>>(
    mut idx: PointIndexGeneric<f64, u32, B>,
    points: &[(f64, f64)],
) -> PointIndexGeneric<f64, u32, B> {
    for (i, &(x, y)) in points.iter().enumerate() {
        idx.insert(x, y, i as u32).unwrap();
    }
    idx
}

fn quadtree() -> PointIndex<f64, u32> {
    PointIndex::new(world()).unwrap()
}

fn flat() -> FlatIndex<f64, u32> {
    FlatIndex::flat(world(), BoundsPolicy::Reject).unwrap()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_uniform");
    for &n in &[1_000_usize, 10_000, 100_000] {
        let points = gen_uniform_points(n, world(), POINT_SEED);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(BenchmarkId::new("Quadtree", n), |b| {
            b.iter_batched(
                quadtree,
                |idx| build(idx, &points),
                BatchSize::SmallInput,
            );
        });
        group.bench_function(BenchmarkId::new("FlatVec", n), |b| {
            b.iter_batched(flat, |idx| build(idx, &points), BatchSize::SmallInput);
        });
    }
    group.finish();
}

fn bench_nearest_points(
    c: &mut Criterion,
    benchmark_group_name: &str,
    make_points: impl Fn(usize) -> Vec<(f64, f64)>,
) {
    fn bench<B: Backend<f64>>(
        b: &mut criterion::Bencher<'_>,
        idx: &PointIndexGeneric<f64, u32, B>,
        queries: &[(f64, f64)],
    ) {
        b.iter(|| {
            let mut found = 0_usize;
            for &(x, y) in queries {
                if idx.find_nearest(x, y, 30.0).unwrap().is_some() {
                    found += 1;
                }
            }
            black_box(found)
        });
    }

    let queries = gen_uniform_points(1_000, world(), QUERY_SEED);
    let mut group = c.benchmark_group(benchmark_group_name);
    for &n in &[100_usize, 1_000, 10_000] {
        let points = make_points(n);
        let qt = build(quadtree(), &points);
        let fv = build(flat(), &points);
        group.throughput(Throughput::Elements(queries.len() as u64));
        group.bench_function(BenchmarkId::new("Quadtree", n), |b| {
            bench(b, &qt, &queries);
        });
        group.bench_function(BenchmarkId::new("FlatVec", n), |b| {
            bench(b, &fv, &queries);
        });
    }
    group.finish();
}

fn bench_nearest_uniform(c: &mut Criterion) {
    bench_nearest_points(c, "nearest_uniform", |n| gen_uniform_points(n, world(), POINT_SEED));
}

fn bench_nearest_clustered(c: &mut Criterion) {
    bench_nearest_points(c, "nearest_clustered", |n| {
        gen_clustered_points(20, n.div_ceil(20), 80.0)
    });
}

fn bench_query_rect(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_rect_uniform");
    let mut rng = Rng::new(0xFACE_FEED_CAFE_BABE);
    let rects: Vec<Aabb2D<f64>> = (0..256)
        .map(|_| Aabb2D::from_xywh(rng.next_f64() * 1800.0, rng.next_f64() * 1800.0, 200.0, 200.0))
        .collect();
    for &n in &[1_000_usize, 10_000] {
        let points = gen_uniform_points(n, world(), POINT_SEED);
        let qt = build(quadtree(), &points);
        let fv = build(flat(), &points);
        group.throughput(Throughput::Elements(rects.len() as u64));
        group.bench_function(BenchmarkId::new("Quadtree", n), |b| {
            b.iter(|| {
                let mut hits = 0_usize;
                for r in &rects {
                    qt.visit_rect(*r, |_, _| hits += 1).unwrap();
                }
                black_box(hits)
            });
        });
        group.bench_function(BenchmarkId::new("FlatVec", n), |b| {
            b.iter(|| {
                let mut hits = 0_usize;
                for r in &rects {
                    fv.visit_rect(*r, |_, _| hits += 1).unwrap();
                }
                black_box(hits)
            });
        });
    }
    group.finish();
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_uniform");
    let n = 10_000_usize;
    let points = gen_uniform_points(n, world(), POINT_SEED);
    let moves = gen_uniform_points(1_000, world(), QUERY_SEED);
    group.throughput(Throughput::Elements(moves.len() as u64));
    group.bench_function(BenchmarkId::new("Quadtree", n), |b| {
        b.iter_batched(
            || {
                let mut idx = quadtree();
                let keys = idx
                    .add_all(points.iter().enumerate().map(|(i, &(x, y))| (x, y, i as u32)))
                    .unwrap();
                (idx, keys)
            },
            |(mut idx, keys)| {
                for (k, &(x, y)) in keys.iter().zip(&moves) {
                    idx.update(*k, x, y).unwrap();
                }
                idx
            },
            BatchSize::LargeInput,
        );
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_build,
    bench_nearest_uniform,
    bench_nearest_clustered,
    bench_query_rect,
    bench_update,
);
criterion_main!(benches);
