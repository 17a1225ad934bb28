// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat vector backend (linear scan).

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use kurbo::{Point, Rect};

use crate::backend::Backend;
use crate::types::{Nearest, covers, valid_radius};

/// Linear-scan backend.
#[derive(Clone, Debug)]
pub struct FlatVec<K> {
    entries: Vec<(K, Point)>,
}

impl<K> Default for FlatVec<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: Copy + Eq + Hash + Debug> FlatVec<K> {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: K) -> Option<usize> {
        self.entries.iter().position(|(k, _)| *k == key)
    }
}

impl<K: Copy + Eq + Hash + Debug> Backend<K> for FlatVec<K> {
    fn insert(&mut self, key: K, position: Point) -> Option<Point> {
        debug_assert!(position.is_finite(), "indexed positions must be finite");
        if !position.is_finite() {
            return None;
        }
        if let Some(i) = self.slot(key) {
            let prev = self.entries[i].1;
            self.entries[i].1 = position;
            return Some(prev);
        }
        self.entries.push((key, position));
        None
    }

    fn remove(&mut self, key: K) -> Option<Point> {
        let i = self.slot(key)?;
        Some(self.entries.remove(i).1)
    }

    fn relocate(&mut self, key: K, position: Point) -> bool {
        debug_assert!(position.is_finite(), "indexed positions must be finite");
        match self.slot(key) {
            Some(i) if position.is_finite() => {
                self.entries[i].1 = position;
                true
            }
            _ => false,
        }
    }

    fn position(&self, key: K) -> Option<Point> {
        self.slot(key).map(|i| self.entries[i].1)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn find_nearest(&self, pt: Point, max_radius: f64) -> Option<Nearest<K>> {
        if !valid_radius(max_radius) {
            return None;
        }
        let mut best: Option<Nearest<K>> = None;
        let mut best_d2 = max_radius * max_radius;
        for &(key, position) in &self.entries {
            let d2 = position.distance_squared(pt);
            if d2 <= best_d2 && (best.is_none() || d2 < best_d2) {
                best_d2 = d2;
                best = Some(Nearest {
                    key,
                    position,
                    distance_sq: d2,
                });
            }
        }
        best
    }

    fn visit_rect<F: FnMut(K, Point)>(&self, rect: Rect, mut f: F) {
        for &(key, position) in &self.entries {
            if covers(rect, position) {
                f(key, position);
            }
        }
    }
}
