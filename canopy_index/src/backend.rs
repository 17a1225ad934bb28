// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend trait for point indexing implementations.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use kurbo::{Point, Rect};

use crate::types::Nearest;

/// Spatial backend abstraction over keyed points.
///
/// Every key appears at most once. Inserting a key that is already present
/// relocates it instead of duplicating it.
pub trait Backend<K>
where
    K: Copy + Eq + Hash + Debug,
{
    /// Insert `key` at `position`.
    ///
    /// Returns the previous position when `key` was already indexed; in that
    /// case the entry is relocated.
    fn insert(&mut self, key: K, position: Point) -> Option<Point>;

    /// Remove `key`, returning its indexed position.
    fn remove(&mut self, key: K) -> Option<Point>;

    /// Move an indexed key to `position` as a single operation.
    ///
    /// Returns `false` (and indexes nothing) when `key` is not present.
    fn relocate(&mut self, key: K, position: Point) -> bool {
        if self.remove(key).is_none() {
            return false;
        }
        self.insert(key, position);
        true
    }

    /// Indexed position of `key`, if present.
    fn position(&self, key: K) -> Option<Point>;

    /// Whether `key` is indexed.
    fn contains(&self, key: K) -> bool {
        self.position(key).is_some()
    }

    /// Number of indexed keys.
    fn len(&self) -> usize;

    /// Returns `true` if nothing is indexed.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove everything.
    fn clear(&mut self);

    /// Replace the whole contents with `items`.
    ///
    /// Backends may override this to bulk-build a better structure than
    /// repeated inserts would.
    fn rebuild_all<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = (K, Point)>,
    {
        self.clear();
        for (key, position) in items {
            self.insert(key, position);
        }
    }

    /// The entry nearest to `pt` whose distance is at most `max_radius`.
    ///
    /// Returns `None` when nothing lies within the radius, when the index is
    /// empty, or when `max_radius` is negative or NaN. Ties keep the first
    /// entry encountered, which is deterministic for a given insertion history.
    fn find_nearest(&self, pt: Point, max_radius: f64) -> Option<Nearest<K>>;

    /// Visit every entry whose position lies inside `rect` (edges inclusive).
    fn visit_rect<F: FnMut(K, Point)>(&self, rect: Rect, f: F);

    /// Collect the keys inside `rect`. Default: collects [`Backend::visit_rect`].
    fn query_rect(&self, rect: Rect) -> Vec<K> {
        let mut out = Vec::new();
        self.visit_rect(rect, |key, _| out.push(key));
        out
    }
}
