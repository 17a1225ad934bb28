// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Index: a point spatial index keyed by stable handles.
//!
//! Canopy Index answers one question quickly: *which indexed item is nearest
//! to this point, within this radius?* It also supports rectangle queries for
//! marquee-style selection.
//!
//! - Insert, relocate, and remove points under caller-chosen keys.
//! - Query the nearest key within a bounded radius (true nearest neighbor, not
//!   "first cell that overlaps").
//! - Visit every key inside a rectangle.
//!
//! Entries are keyed, not hashed by coordinate, so removing one of many
//! coincident points removes exactly that entry. The index stores a copy of
//! each position: a caller that moves an item must relocate it here in the
//! same step, or queries will answer from the old position.
//!
//! Backends are pluggable via [`Backend`]:
//! - [`QuadTree`] (default): point-region quadtree with a growable root.
//!   Nearest queries visit `O(log n)` nodes for well-spread data.
//! - [`FlatVec`]: linear scan. Useful as a reference oracle and for very
//!   small sets.
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use canopy_index::{Backend, QuadTree};
//!
//! let mut idx: QuadTree<u32> = QuadTree::new();
//! idx.insert(1, Point::new(0.0, 0.0));
//! idx.insert(2, Point::new(100.0, 100.0));
//!
//! // Nearest within 10 units of (3, 4): key 1 at distance 5.
//! let hit = idx.find_nearest(Point::new(3.0, 4.0), 10.0).unwrap();
//! assert_eq!(hit.key, 1);
//! assert_eq!(hit.distance(), 5.0);
//!
//! // Move key 1; the old position no longer answers.
//! idx.relocate(1, Point::new(5.0, 5.0));
//! assert!(idx.find_nearest(Point::ZERO, 0.0).is_none());
//! assert_eq!(idx.find_nearest(Point::new(5.0, 5.0), 0.0).unwrap().key, 1);
//!
//! // Rectangle query.
//! let inside = idx.query_rect(Rect::new(50.0, 50.0, 150.0, 150.0));
//! assert_eq!(inside, vec![2]);
//! ```
//!
//! ### Float semantics
//!
//! Positions must be finite. Debug builds assert; release builds ignore
//! non-finite inserts. Radius comparisons are inclusive (`d² <= r²`).

#![no_std]

extern crate alloc;

pub mod backend;
pub mod backends;
mod types;

pub use backend::Backend;
pub use backends::flatvec::FlatVec;
pub use backends::quadtree::{QuadTree, QuadTreeConfig, QuadTreeDebugInfo};
pub use types::Nearest;
