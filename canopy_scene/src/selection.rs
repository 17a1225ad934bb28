// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selection bookkeeping.

use alloc::vec::Vec;

/// An ordered set of selected keys with a primary key and a revision counter.
///
/// Keys are kept in selection order with uniqueness enforced by equality. The
/// **primary** key is the most recently added one. The **revision** bumps only
/// when the contents or the primary actually change, so observers can detect
/// "did anything happen?" without comparing contents.
#[derive(Clone, Debug, Default)]
pub struct Selection<T> {
    items: Vec<T>,
    primary: Option<usize>,
    revision: u64,
}

impl<T> Selection<T> {
    /// Creates an empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            primary: None,
            revision: 0,
        }
    }

    /// Returns `true` if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of selected keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Selected keys in selection order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Iterates the selected keys in selection order.
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// The most recently added key, if it is still selected.
    #[must_use]
    pub fn primary(&self) -> Option<&T> {
        self.primary.map(|idx| &self.items[idx])
    }

    /// Current revision.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.items.clear();
        self.primary = None;
        self.bump_revision();
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

impl<T: PartialEq> Selection<T> {
    /// Whether `key` is selected.
    #[must_use]
    pub fn contains(&self, key: &T) -> bool {
        self.position_of(key).is_some()
    }

    /// Toggles `key`. Returns `true` if it is selected afterwards.
    ///
    /// A newly added key becomes the primary.
    pub fn toggle(&mut self, key: T) -> bool {
        if let Some(idx) = self.position_of(&key) {
            self.remove_at(idx);
            self.bump_revision();
            false
        } else {
            self.push(key);
            true
        }
    }

    /// Adds `key` if absent. Returns `true` if it was added.
    pub fn add(&mut self, key: T) -> bool {
        if self.contains(&key) {
            return false;
        }
        self.push(key);
        true
    }

    /// Adds every absent key in `keys`, never removing anything.
    ///
    /// Returns the number of keys added. The last added key becomes primary.
    pub fn extend_with<I>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        let before = self.items.len();
        for key in keys {
            if self.position_of(&key).is_none() {
                self.items.push(key);
            }
        }
        let added = self.items.len() - before;
        if added > 0 {
            self.primary = Some(self.items.len() - 1);
            self.bump_revision();
        }
        added
    }

    /// Removes `key`. Returns `true` if it was selected.
    pub fn remove(&mut self, key: &T) -> bool {
        let Some(idx) = self.position_of(key) else {
            return false;
        };
        self.remove_at(idx);
        self.bump_revision();
        true
    }

    fn push(&mut self, key: T) {
        self.items.push(key);
        self.primary = Some(self.items.len() - 1);
        self.bump_revision();
    }

    fn position_of(&self, key: &T) -> Option<usize> {
        self.items.iter().position(|k| k == key)
    }

    fn remove_at(&mut self, idx: usize) {
        self.items.remove(idx);
        self.primary = match self.primary {
            Some(p) if p == idx => None,
            Some(p) if p > idx => Some(p - 1),
            other => other,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::Selection;

    #[test]
    fn toggle_adds_then_removes() {
        let mut s = Selection::new();
        assert!(s.toggle(3_u32));
        assert_eq!(s.primary(), Some(&3));
        assert!(!s.toggle(3));
        assert!(s.is_empty());
        assert_eq!(s.primary(), None);
        assert_eq!(s.revision(), 2);
    }

    #[test]
    fn extend_is_additive_and_idempotent() {
        let mut s = Selection::new();
        s.toggle(1_u32);
        assert_eq!(s.extend_with([1, 2, 2, 3]), 2);
        assert_eq!(s.items(), &[1, 2, 3]);
        assert_eq!(s.primary(), Some(&3));

        let rev = s.revision();
        assert_eq!(s.extend_with([1, 3]), 0);
        assert_eq!(s.revision(), rev, "no-op extend must not bump the revision");
    }

    #[test]
    fn removing_before_primary_keeps_primary() {
        let mut s = Selection::new();
        s.extend_with([10_u32, 20, 30]);
        assert!(s.remove(&10));
        assert_eq!(s.primary(), Some(&30));
        assert!(s.remove(&30));
        assert_eq!(s.primary(), None);
        assert!(!s.remove(&30));
    }

    #[test]
    fn clear_on_empty_is_a_no_op() {
        let mut s: Selection<u8> = Selection::new();
        s.clear();
        assert_eq!(s.revision(), 0);
        s.add(1);
        assert!(!s.add(1));
        s.clear();
        assert_eq!(s.revision(), 2);
    }
}
