// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Size};
use understory_scatter::{Datum, PointId, Session, SessionConfig};

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

const VIEWPORT: Size = Size::new(800.0, 600.0);

fn gen_circles(n: u32) -> Vec<Datum> {
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    (0..n)
        .map(|id| {
            Datum::circle_at(
                id,
                rng.next_f64() * VIEWPORT.width,
                rng.next_f64() * VIEWPORT.height,
                2.0 + rng.next_f64() * 28.0,
            )
        })
        .collect()
}

fn gen_path(n: usize) -> Vec<Point> {
    let mut rng = Rng::new(0xFACE_FEED_CAFE_BABE);
    (0..n)
        .map(|_| Point::new(rng.next_f64() * VIEWPORT.width, rng.next_f64() * VIEWPORT.height))
        .collect()
}

fn session(points: Vec<Datum>) -> Session {
    let mut s = Session::new(VIEWPORT, SessionConfig::default()).unwrap();
    s.rebuild(points).unwrap();
    s
}

fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("scatter_rebuild");
    for &n in &[20_u32, 1_000, 10_000] {
        let points = gen_circles(n);
        group.bench_function(BenchmarkId::from_parameter(n), |b| {
            let mut s = Session::new(VIEWPORT, SessionConfig::default()).unwrap();
            b.iter_batched(
                || points.clone(),
                |pts| s.rebuild(pts).unwrap(),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

// Drag one point along a path: the in-place update that replaces per-move rebuilds.
fn bench_drag(c: &mut Criterion) {
    let mut group = c.benchmark_group("scatter_drag_update");
    let path = gen_path(256);
    for &n in &[20_u32, 1_000, 10_000] {
        let mut s = session(gen_circles(n));
        group.bench_function(BenchmarkId::new("update_position", n), |b| {
            b.iter(|| {
                for p in &path {
                    s.update_position(PointId(0), p.x, p.y).unwrap();
                }
            });
        });
        let points = gen_circles(n);
        group.bench_function(BenchmarkId::new("rebuild_per_move", n), |b| {
            b.iter_batched(
                || points.clone(),
                |mut pts| {
                    let mut s = Session::new(VIEWPORT, SessionConfig::default()).unwrap();
                    for p in path.iter().take(8) {
                        pts[0].position = *p;
                        s.rebuild(pts.clone()).unwrap();
                    }
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_hover(c: &mut Criterion) {
    let mut group = c.benchmark_group("scatter_hover");
    let path = gen_path(1_000);
    for &n in &[20_u32, 1_000, 10_000] {
        let mut s = session(gen_circles(n));
        group.bench_function(BenchmarkId::from_parameter(n), |b| {
            b.iter(|| {
                let mut changes = 0_usize;
                for p in &path {
                    if s.pointer_move(*p).unwrap().is_changed() {
                        changes += 1;
                    }
                }
                black_box(changes)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rebuild, bench_drag, bench_hover);
criterion_main!(benches);
