// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for the Canopy demos.
//!
//! Run:
//! - `cargo run -p canopy_demos --example gesture_script`
//! - `RUST_LOG=debug cargo run -p canopy_demos --example gesture_script` to
//!   see gesture lifecycle logging
//! - `cargo run -p canopy_demos --example quadtree_stats`

use canopy::{Entity, SceneView};
use kurbo::Point;
use peniko::Color;

/// Number of nodes in the default demo scene.
pub const DEFAULT_NODES: usize = 400;

/// Radius of every demo node.
pub const NODE_RADIUS: f64 = 12.0;

/// Fill used for selected nodes.
pub const SELECTED: Color = Color::from_rgba8(255, 0, 0, 255);

/// Position of node `i` of `n` on a sunflower spiral of radius 450.
///
/// See <https://en.wikipedia.org/wiki/Phyllotaxis>.
#[must_use]
pub fn phyllotaxis_point(i: usize, n: usize) -> Point {
    let golden = core::f64::consts::PI * (3.0 - 5.0_f64.sqrt());
    let (i, n) = (i as f64, n.max(1) as f64);
    let r = (i / n).sqrt() * 450.0;
    let theta = i * golden;
    Point::new(r * theta.cos(), r * theta.sin())
}

/// `n` nodes laid out by [`phyllotaxis_point`], ids `"0"`, `"1"`, ...
///
/// Colors come from a fixed-seed generator so every run draws the same scene.
#[must_use]
pub fn phyllotaxis(n: usize) -> Vec<Entity> {
    let mut palette = Palette(0x9E37_79B9_7F4A_7C15);
    (0..n)
        .map(|i| {
            Entity::new(i.to_string(), phyllotaxis_point(i, n), NODE_RADIUS)
                .with_color(palette.next_color())
        })
        .collect()
}

/// A view over a phyllotaxis scene of `n` nodes, not yet laid out.
#[must_use]
pub fn phyllotaxis_view(n: usize) -> SceneView {
    let mut view = SceneView::new();
    if let Err(err) = view.replace_scene(phyllotaxis(n), core::iter::empty()) {
        // Generated ids are unique and positions finite.
        log::error!("demo scene rejected: {err}");
    }
    view
}

/// The color a renderer should fill `entity` with.
#[must_use]
pub fn fill_color(entity: &Entity) -> Color {
    if entity.selected {
        SELECTED
    } else {
        entity.color
    }
}

/// `#rrggbb` form of an opaque color.
#[must_use]
pub fn hex(color: Color) -> String {
    let rgba = color.to_rgba8();
    format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
}

struct Palette(u64);

impl Palette {
    fn next_color(&mut self) -> Color {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        let [r, g, b, ..] = x.to_le_bytes();
        Color::from_rgba8(r, g, b, 255)
    }
}
