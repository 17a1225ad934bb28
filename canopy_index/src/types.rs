// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect};

/// Result of a nearest-neighbor query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Nearest<K> {
    /// Key of the nearest entry.
    pub key: K,
    /// Indexed position of the entry.
    pub position: Point,
    /// Squared distance from the query point.
    pub distance_sq: f64,
}

impl<K> Nearest<K> {
    /// Distance from the query point.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance_sq.sqrt()
    }
}

/// Squared distance from `pt` to the closest point of `rect` (zero inside).
pub(crate) fn rect_distance_sq(rect: Rect, pt: Point) -> f64 {
    let dx = (rect.x0 - pt.x).max(pt.x - rect.x1).max(0.0);
    let dy = (rect.y0 - pt.y).max(pt.y - rect.y1).max(0.0);
    dx * dx + dy * dy
}

/// Closed-interval containment: points on every edge count as inside.
pub(crate) fn covers(rect: Rect, pt: Point) -> bool {
    pt.x >= rect.x0 && pt.x <= rect.x1 && pt.y >= rect.y0 && pt.y <= rect.y1
}

/// Closed-interval overlap test.
pub(crate) fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

/// Whether `max_radius` describes a usable search radius.
pub(crate) fn valid_radius(max_radius: f64) -> bool {
    max_radius >= 0.0 && !max_radius.is_nan()
}
