// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_index::{Backend, FlatVec, QuadTree};
use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use kurbo::{Point, Rect};

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

/// Sunflower layout: `n` points on a golden-angle spiral of radius 450.
fn gen_phyllotaxis(n: usize) -> Vec<Point> {
    let golden = std::f64::consts::PI * (3.0 - 5.0_f64.sqrt());
    (0..n)
        .map(|i| {
            let r = (i as f64 / n as f64).sqrt() * 450.0;
            let theta = i as f64 * golden;
            Point::new(r * theta.cos(), r * theta.sin())
        })
        .collect()
}

fn gen_clustered(n: usize) -> Vec<Point> {
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let clusters = (n / 64).max(1);
    let centers: Vec<Point> = (0..clusters)
        .map(|_| Point::new(rng.next_f64() * 2000.0, rng.next_f64() * 2000.0))
        .collect();
    (0..n)
        .map(|i| {
            let c = centers[i % clusters];
            Point::new(
                c.x + (rng.next_f64() - 0.5) * 40.0,
                c.y + (rng.next_f64() - 0.5) * 40.0,
            )
        })
        .collect()
}

fn gen_queries(count: usize, around: &[Point]) -> Vec<Point> {
    let mut rng = Rng::new(0x81FD_BEE7_94F0_AF1A);
    (0..count)
        .map(|_| {
            let p = around[(rng.next_u64() % around.len() as u64) as usize];
            Point::new(
                p.x + (rng.next_f64() - 0.5) * 24.0,
                p.y + (rng.next_f64() - 0.5) * 24.0,
            )
        })
        .collect()
}

fn build<B: Backend<u32>>(mut index: B, points: &[Point]) -> B {
    index.rebuild_all(points.iter().enumerate().map(|(i, p)| (i as u32, *p)));
    index
}

const SIZES: [usize; 4] = [256, 1_024, 4_096, 16_384];

fn bench_find_nearest(
    c: &mut Criterion,
    benchmark_group_name: &str,
    make_points: impl Fn(usize) -> Vec<Point>,
) {
    fn bench<B: Backend<u32>>(b: &mut criterion::Bencher, index: &B, queries: &[Point]) {
        b.iter(|| {
            let mut hits = 0usize;
            for q in queries {
                if index.find_nearest(*q, 12.0).is_some() {
                    hits += 1;
                }
            }
            hits
        });
    }

    let mut group = c.benchmark_group(benchmark_group_name);
    for n in SIZES {
        let points = make_points(n);
        let queries = gen_queries(256, &points);
        group.throughput(Throughput::Elements(queries.len() as u64));
        let flat = build(FlatVec::new(), &points);
        let tree = build(QuadTree::new(), &points);
        group.bench_function(BenchmarkId::new("FlatVec", n), |b| bench(b, &flat, &queries));
        group.bench_function(BenchmarkId::new("QuadTree", n), |b| bench(b, &tree, &queries));
    }
    group.finish();
}

fn bench_relocate(c: &mut Criterion) {
    fn bench<B: Backend<u32> + Clone>(b: &mut criterion::Bencher, index: &B, moves: &[(u32, Point)]) {
        b.iter_batched(
            || index.clone(),
            |mut idx| {
                for (key, to) in moves {
                    idx.relocate(*key, *to);
                }
                black_box(idx)
            },
            BatchSize::LargeInput,
        );
    }

    let mut group = c.benchmark_group("relocate_phyllotaxis");
    for n in SIZES {
        let points = gen_phyllotaxis(n);
        let mut rng = Rng::new(0xFACE_FEED_CAFE_BABE);
        // A drag: one key stepping across the layout, plus scattered single moves.
        let mut moves: Vec<(u32, Point)> = (0..128)
            .map(|step| (0, Point::new(-450.0 + f64::from(step) * 7.0, 0.0)))
            .collect();
        moves.extend((0..128).map(|_| {
            let key = (rng.next_u64() % n as u64) as u32;
            let to = Point::new((rng.next_f64() - 0.5) * 900.0, (rng.next_f64() - 0.5) * 900.0);
            (key, to)
        }));
        group.throughput(Throughput::Elements(moves.len() as u64));
        let flat = build(FlatVec::new(), &points);
        let tree = build(QuadTree::new(), &points);
        group.bench_function(BenchmarkId::new("FlatVec", n), |b| bench(b, &flat, &moves));
        group.bench_function(BenchmarkId::new("QuadTree", n), |b| bench(b, &tree, &moves));
    }
    group.finish();
}

fn bench_query_rect(c: &mut Criterion) {
    fn bench<B: Backend<u32>>(b: &mut criterion::Bencher, index: &B, windows: &[Rect]) {
        b.iter(|| {
            let mut total = 0usize;
            for window in windows {
                index.visit_rect(*window, |_, _| total += 1);
            }
            total
        });
    }

    let mut group = c.benchmark_group("visit_rect_phyllotaxis");
    let windows: Vec<Rect> = (0..64)
        .map(|i| {
            let x = -450.0 + f64::from(i) * 12.0;
            Rect::new(x, x, x + 120.0, x + 80.0)
        })
        .collect();
    for n in SIZES {
        let points = gen_phyllotaxis(n);
        group.throughput(Throughput::Elements(windows.len() as u64));
        let flat = build(FlatVec::new(), &points);
        let tree = build(QuadTree::new(), &points);
        group.bench_function(BenchmarkId::new("FlatVec", n), |b| bench(b, &flat, &windows));
        group.bench_function(BenchmarkId::new("QuadTree", n), |b| bench(b, &tree, &windows));
    }
    group.finish();
}

fn bench_find_nearest_phyllotaxis(c: &mut Criterion) {
    bench_find_nearest(c, "find_nearest_phyllotaxis", gen_phyllotaxis);
}

fn bench_find_nearest_clustered(c: &mut Criterion) {
    bench_find_nearest(c, "find_nearest_clustered", gen_clustered);
}

criterion_group!(
    benches,
    bench_find_nearest_phyllotaxis,
    bench_find_nearest_clustered,
    bench_relocate,
    bench_query_rect,
);
criterion_main!(benches);
