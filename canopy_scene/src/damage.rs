// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Batched mutation notifications returned by
//! [`SceneStore::take_damage`](crate::SceneStore::take_damage).

use alloc::vec::Vec;

use kurbo::Rect;

use crate::key::EntityKey;

/// Entity changes since the last [`SceneStore::take_damage`](crate::SceneStore::take_damage).
///
/// Bounds are world-space and include the entity radius. Changes to the same
/// entity within one batch are coalesced: an entity added and then moved is
/// reported once as added at its final bounds; one added and then removed is
/// not reported at all.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneDamage {
    /// Entities added, with their bounds.
    pub added: Vec<(EntityKey, Rect)>,
    /// Entities removed, with the bounds they had when the batch started.
    pub removed: Vec<(EntityKey, Rect)>,
    /// Entities moved: `(key, old, new)`.
    pub moved: Vec<(EntityKey, Rect, Rect)>,
    /// Entity or edge selection changed.
    pub selection_changed: bool,
    /// Edges were added or removed.
    pub edges_changed: bool,
}

impl SceneDamage {
    /// True if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.moved.is_empty()
            && !self.selection_changed
            && !self.edges_changed
    }

    /// Union of every affected entity bound. Returns `None` if no entity changed.
    #[must_use]
    pub fn union(&self) -> Option<Rect> {
        let mut it = self
            .added
            .iter()
            .map(|(_, r)| *r)
            .chain(self.removed.iter().map(|(_, r)| *r))
            .chain(self.moved.iter().flat_map(|(_, a, b)| [*a, *b]));
        let first = it.next()?;
        Some(it.fold(first, |acc, r| acc.union(r)))
    }

    pub(crate) fn record_added(&mut self, key: EntityKey, bounds: Rect) {
        self.added.push((key, bounds));
    }

    pub(crate) fn record_moved(&mut self, key: EntityKey, old: Rect, new: Rect) {
        if let Some(entry) = self.added.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = new;
        } else if let Some(entry) = self.moved.iter_mut().find(|(k, _, _)| *k == key) {
            entry.2 = new;
        } else {
            self.moved.push((key, old, new));
        }
    }

    pub(crate) fn record_removed(&mut self, key: EntityKey, bounds: Rect) {
        if let Some(i) = self.added.iter().position(|(k, _)| *k == key) {
            self.added.swap_remove(i);
            return;
        }
        let bounds = match self.moved.iter().position(|(k, _, _)| *k == key) {
            Some(i) => self.moved.swap_remove(i).1,
            None => bounds,
        };
        self.removed.push((key, bounds));
    }
}
