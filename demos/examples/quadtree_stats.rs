// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadtree shape under a phyllotaxis scene.
//!
//! Prints the quadtree's node/leaf/depth counts for growing scenes and checks
//! nearest queries against the linear-scan backend.
//!
//! Run:
//! - `cargo run -p canopy_demos --example quadtree_stats`

use canopy::index::{Backend, FlatVec, QuadTree, QuadTreeConfig};
use canopy_demos::{NODE_RADIUS, phyllotaxis_point};
use kurbo::Point;

fn main() {
    for n in [100usize, 400, 1_600, 6_400] {
        let mut tree = QuadTree::with_config(QuadTreeConfig {
            max_leaf: 8,
            ..QuadTreeConfig::default()
        });
        let mut flat = FlatVec::new();
        for i in 0..n {
            let p = phyllotaxis_point(i, n);
            tree.insert(i, p);
            flat.insert(i, p);
        }

        let info = tree.debug_info();
        let mut agree = 0;
        let probes = 500;
        for k in 0..probes {
            let t = f64::from(k) / f64::from(probes);
            let probe = Point::new(-450.0 + 900.0 * t, 300.0 * (t * 20.0).sin());
            let a = tree.find_nearest(probe, NODE_RADIUS).map(|h| h.distance_sq);
            let b = flat.find_nearest(probe, NODE_RADIUS).map(|h| h.distance_sq);
            if a == b {
                agree += 1;
            }
        }
        println!(
            "n = {n:>5}: {} nodes, {} leaves, depth {}, bounds {:?}; {agree}/{probes} probes agree with FlatVec",
            info.nodes, info.leaves, info.depth, info.bounds
        );
    }
}
