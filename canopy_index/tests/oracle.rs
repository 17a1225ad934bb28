// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cross-checks the quadtree against the linear-scan backend.
//!
//! Both backends see the same interleaved sequence of inserts, relocations,
//! and removals; after every step their answers must agree.

use canopy_index::{Backend, FlatVec, QuadTree, QuadTreeConfig};
use kurbo::{Point, Rect};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
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
        (v as f64) / ((1_u64 << 53) as f64)
    }

    fn point(&mut self, extent: f64) -> Point {
        Point::new(
            (self.next_f64() - 0.5) * extent,
            (self.next_f64() - 0.5) * extent,
        )
    }

    fn below(&mut self, n: u32) -> u32 {
        (self.next_u64() % u64::from(n)) as u32
    }
}

fn assert_same_nearest(qt: &QuadTree<u32>, fv: &FlatVec<u32>, pt: Point, radius: f64) {
    let a = qt.find_nearest(pt, radius);
    let b = fv.find_nearest(pt, radius);
    match (a, b) {
        (None, None) => {}
        (Some(a), Some(b)) => assert_eq!(
            a.distance_sq, b.distance_sq,
            "nearest distance differs at {pt:?} r={radius}"
        ),
        _ => panic!("backends disagree at {pt:?} r={radius}: {a:?} vs {b:?}"),
    }
}

#[test]
fn interleaved_mutations_match_linear_scan() {
    let mut rng = Rng(0x9E37_79B9_7F4A_7C15);
    let mut qt = QuadTree::with_config(QuadTreeConfig {
        max_leaf: 4,
        initial_extent: 16.0,
        ..QuadTreeConfig::default()
    });
    let mut fv = FlatVec::new();

    for step in 0..2_000 {
        let key = rng.below(200);
        match rng.below(4) {
            0 | 1 => {
                let p = rng.point(2_000.0);
                assert_eq!(qt.insert(key, p), fv.insert(key, p));
            }
            2 => {
                let p = rng.point(2_000.0);
                assert_eq!(qt.relocate(key, p), fv.relocate(key, p));
            }
            _ => assert_eq!(qt.remove(key), fv.remove(key)),
        }
        assert_eq!(qt.len(), fv.len(), "length diverged at step {step}");

        let probe = rng.point(2_200.0);
        assert_same_nearest(&qt, &fv, probe, rng.next_f64() * 300.0);
    }

    // Every entry answers a radius-0 query at its own position.
    for key in 0..200 {
        if let Some(p) = fv.position(key) {
            assert_eq!(qt.position(key), Some(p));
            let hit = qt.find_nearest(p, 0.0).expect("entry must be findable");
            assert_eq!(hit.position, p);
        }
    }
}

#[test]
fn rect_queries_match_linear_scan() {
    let mut rng = Rng(0xC1A5_7E55_9999_ABCD);
    let mut qt = QuadTree::new();
    let mut fv = FlatVec::new();
    for key in 0..500 {
        let p = rng.point(1_000.0);
        qt.insert(key, p);
        fv.insert(key, p);
    }
    for _ in 0..50 {
        let a = rng.point(1_200.0);
        let b = rng.point(1_200.0);
        let rect = Rect::from_points(a, b);
        let mut from_tree = qt.query_rect(rect);
        let mut from_scan = fv.query_rect(rect);
        from_tree.sort_unstable();
        from_scan.sort_unstable();
        assert_eq!(from_tree, from_scan);
    }
}

#[test]
fn dense_clusters_with_overlapping_search_radii() {
    let mut qt = QuadTree::new();
    let mut fv = FlatVec::new();
    let mut key = 0;
    for cx in [0.0, 30.0] {
        for i in 0..40 {
            let angle = f64::from(i) * 0.25;
            let p = Point::new(cx + angle.cos() * 5.0, angle.sin() * 5.0);
            qt.insert(key, p);
            fv.insert(key, p);
            key += 1;
        }
    }
    let mut x = -10.0;
    while x <= 40.0 {
        assert_same_nearest(&qt, &fv, Point::new(x, 0.5), 25.0);
        x += 0.75;
    }
}
