// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point-region quadtree backend.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;
use kurbo::{Point, Rect, Size};
use smallvec::SmallVec;

use crate::backend::Backend;
use crate::types::{Nearest, covers, overlaps, rect_distance_sq, valid_radius};

const LEAF_INLINE: usize = 8;

type LeafItems<K> = SmallVec<[(K, Point); LEAF_INLINE]>;

/// Tuning knobs for [`QuadTree`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadTreeConfig {
    /// A leaf holding more than this many entries splits into four quadrants.
    pub max_leaf: usize,
    /// Leaves at this depth never split.
    pub max_depth: u32,
    /// Side length of the root square created around the first inserted point.
    pub initial_extent: f64,
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        Self {
            max_leaf: LEAF_INLINE,
            max_depth: 20,
            initial_extent: 256.0,
        }
    }
}

/// Point-region quadtree keyed by `K`.
///
/// Nodes live in an arena and refer to each other by index; entries live in
/// leaves together with a copy of their position. A side table maps each key
/// to its indexed position so removal can descend straight to the owning leaf
/// and excise exactly that key, even among many coincident points.
#[derive(Clone)]
pub struct QuadTree<K> {
    config: QuadTreeConfig,
    nodes: Vec<Node<K>>,
    free: Vec<NodeIdx>,
    root: Option<NodeIdx>,
    positions: HashMap<K, Point>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct NodeIdx(usize);

#[derive(Clone)]
struct Node<K> {
    bounds: Rect,
    kind: Kind<K>,
}

#[derive(Clone)]
enum Kind<K> {
    Leaf(LeafItems<K>),
    /// `mid` is the exact split point; child `q` covers the quadrant with
    /// `x >= mid.x` when `q & 1` and `y >= mid.y` when `q & 2`.
    Internal { mid: Point, children: [NodeIdx; 4] },
}

fn quadrant(mid: Point, pt: Point) -> usize {
    usize::from(pt.x >= mid.x) | (usize::from(pt.y >= mid.y) << 1)
}

fn child_bounds(bounds: Rect, mid: Point, q: usize) -> Rect {
    let (x0, x1) = if q & 1 == 0 {
        (bounds.x0, mid.x)
    } else {
        (mid.x, bounds.x1)
    };
    let (y0, y1) = if q & 2 == 0 {
        (bounds.y0, mid.y)
    } else {
        (mid.y, bounds.y1)
    };
    Rect::new(x0, y0, x1, y1)
}

/// Half-open ownership test matching [`quadrant`]: the max edges belong to
/// the neighbor, so a point on them must grow the root rather than be routed
/// inconsistently.
fn owns(bounds: Rect, pt: Point) -> bool {
    pt.x >= bounds.x0 && pt.x < bounds.x1 && pt.y >= bounds.y0 && pt.y < bounds.y1
}

/// Smallest side that keeps a square around `p` from rounding to zero width.
fn min_side(p: Point) -> f64 {
    (p.x.abs().max(p.y.abs()) * (4.0 * f64::EPSILON)).max(f64::MIN_POSITIVE)
}

fn all_coincident<K>(items: &[(K, Point)]) -> bool {
    match items.first() {
        Some(&(_, first)) => items.iter().all(|&(_, p)| p == first),
        None => true,
    }
}

impl<K: Copy + Eq + Hash + Debug> Default for QuadTree<K> {
    fn default() -> Self {
        Self::with_config(QuadTreeConfig::default())
    }
}

impl<K: Copy + Eq + Hash + Debug> QuadTree<K> {
    /// Create an empty quadtree with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty quadtree with an explicit configuration.
    #[must_use]
    pub fn with_config(config: QuadTreeConfig) -> Self {
        Self {
            config: QuadTreeConfig {
                max_leaf: config.max_leaf.max(1),
                initial_extent: if config.initial_extent > 0.0 {
                    config.initial_extent
                } else {
                    QuadTreeConfig::default().initial_extent
                },
                ..config
            },
            nodes: Vec::new(),
            free: Vec::new(),
            root: None,
            positions: HashMap::new(),
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> QuadTreeConfig {
        self.config
    }

    /// Bounds of the root square, if anything has been inserted.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.root.map(|r| self.node(r).bounds)
    }

    /// Iterate over all indexed entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (K, Point)> + '_ {
        self.positions.iter().map(|(k, p)| (*k, *p))
    }

    /// Snapshot of the tree shape for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> QuadTreeDebugInfo {
        let mut info = QuadTreeDebugInfo {
            bounds: self.bounds(),
            entries: self.positions.len(),
            nodes: 0,
            leaves: 0,
            depth: 0,
        };
        let Some(root) = self.root else {
            return info;
        };
        let mut stack: Vec<(NodeIdx, u32)> = alloc::vec![(root, 0)];
        while let Some((idx, depth)) = stack.pop() {
            info.nodes += 1;
            info.depth = info.depth.max(depth);
            match &self.node(idx).kind {
                Kind::Leaf(_) => info.leaves += 1,
                Kind::Internal { children, .. } => {
                    stack.extend(children.iter().map(|&c| (c, depth + 1)));
                }
            }
        }
        info
    }

    fn node(&self, idx: NodeIdx) -> &Node<K> {
        &self.nodes[idx.0]
    }

    fn node_mut(&mut self, idx: NodeIdx) -> &mut Node<K> {
        &mut self.nodes[idx.0]
    }

    fn alloc(&mut self, bounds: Rect, kind: Kind<K>) -> NodeIdx {
        let node = Node { bounds, kind };
        if let Some(idx) = self.free.pop() {
            self.nodes[idx.0] = node;
            idx
        } else {
            self.nodes.push(node);
            NodeIdx(self.nodes.len() - 1)
        }
    }

    fn release(&mut self, idx: NodeIdx) {
        self.node_mut(idx).kind = Kind::Leaf(SmallVec::new());
        self.free.push(idx);
    }

    /// Grow the root toward `pt` until it owns it.
    ///
    /// The old root keeps its exact bounds and becomes one quadrant of the new
    /// root; the split point is one of its corners, so no rounding gaps open
    /// between siblings, and every point already stored routes back into the
    /// old root.
    ///
    /// Each step extends by at least the old side, twice the gap to `pt`, and
    /// a few ulps at this magnitude, so it always makes progress even when the
    /// old root has rounded to zero width.
    fn grow_to_contain(&mut self, pt: Point) {
        while let Some(root) = self.root {
            let b = self.node(root).bounds;
            if owns(b, pt) {
                return;
            }
            let floor = min_side(pt)
                .max(min_side(Point::new(b.x0, b.y0)))
                .max(min_side(Point::new(b.x1, b.y1)));
            let gx = b
                .width()
                .max(2.0 * (b.x0 - pt.x))
                .max(2.0 * (pt.x - b.x1))
                .max(floor);
            let gy = b
                .height()
                .max(2.0 * (b.y0 - pt.y))
                .max(2.0 * (pt.y - b.y1))
                .max(floor);
            let west = pt.x < b.x0;
            let north = pt.y < b.y0;
            let (x0, x1, mid_x) = if west {
                (b.x0 - gx, b.x1, b.x0)
            } else {
                (b.x0, b.x1 + gx, b.x1)
            };
            let (y0, y1, mid_y) = if north {
                (b.y0 - gy, b.y1, b.y0)
            } else {
                (b.y0, b.y1 + gy, b.y1)
            };
            let bounds = Rect::new(x0, y0, x1, y1);
            let mid = Point::new(mid_x, mid_y);
            let old_q = usize::from(west) | (usize::from(north) << 1);
            let mut children = [root; 4];
            for (q, child) in children.iter_mut().enumerate() {
                if q != old_q {
                    *child = self.alloc(child_bounds(bounds, mid, q), Kind::Leaf(SmallVec::new()));
                }
            }
            self.root = Some(self.alloc(bounds, Kind::Internal { mid, children }));
        }
    }

    fn attach(&mut self, key: K, pt: Point) {
        if self.root.is_none() {
            let extent = self.config.initial_extent.max(min_side(pt));
            let bounds = Rect::from_center_size(pt, Size::new(extent, extent));
            self.root = Some(self.alloc(bounds, Kind::Leaf(SmallVec::new())));
        }
        self.grow_to_contain(pt);

        let Some(mut idx) = self.root else {
            return;
        };
        let mut depth = 0_u32;
        loop {
            let max_leaf = self.config.max_leaf;
            let max_depth = self.config.max_depth;
            match &mut self.node_mut(idx).kind {
                Kind::Internal { mid, children } => {
                    idx = children[quadrant(*mid, pt)];
                    depth += 1;
                }
                Kind::Leaf(items) => {
                    items.push((key, pt));
                    let needs_split =
                        items.len() > max_leaf && depth < max_depth && !all_coincident(items);
                    if needs_split {
                        self.split(idx, depth);
                    }
                    return;
                }
            }
        }
    }

    /// Split an overfull leaf, recursing into any child that is still overfull.
    fn split(&mut self, idx: NodeIdx, depth: u32) {
        let bounds = self.node(idx).bounds;
        let Kind::Leaf(items) = core::mem::replace(
            &mut self.node_mut(idx).kind,
            Kind::Leaf(SmallVec::new()),
        ) else {
            return;
        };
        let mid = bounds.center();
        let mut buckets: [LeafItems<K>; 4] = Default::default();
        for (key, pt) in items {
            buckets[quadrant(mid, pt)].push((key, pt));
        }
        let mut children = [idx; 4];
        let mut overfull = SmallVec::<[NodeIdx; 4]>::new();
        for (q, bucket) in buckets.into_iter().enumerate() {
            let crowded = bucket.len() > self.config.max_leaf
                && depth + 1 < self.config.max_depth
                && !all_coincident(&bucket);
            let child = self.alloc(child_bounds(bounds, mid, q), Kind::Leaf(bucket));
            if crowded {
                overfull.push(child);
            }
            children[q] = child;
        }
        self.node_mut(idx).kind = Kind::Internal { mid, children };
        for child in overfull {
            self.split(child, depth + 1);
        }
    }

    fn detach(&mut self, key: K, pt: Point) {
        let Some(mut idx) = self.root else {
            return;
        };
        let mut path = SmallVec::<[NodeIdx; 24]>::new();
        loop {
            match &mut self.node_mut(idx).kind {
                Kind::Internal { mid, children } => {
                    path.push(idx);
                    idx = children[quadrant(*mid, pt)];
                }
                Kind::Leaf(items) => {
                    let found = items.iter().position(|(k, _)| *k == key);
                    debug_assert!(found.is_some(), "key {key:?} missing from its leaf");
                    if let Some(i) = found {
                        items.swap_remove(i);
                    }
                    break;
                }
            }
        }
        while let Some(parent) = path.pop() {
            if !self.try_collapse(parent) {
                break;
            }
        }
    }

    /// Merge an internal node whose children are all leaves back into one leaf
    /// when the merged leaf would not be overfull.
    fn try_collapse(&mut self, idx: NodeIdx) -> bool {
        let Kind::Internal { children, .. } = &self.node(idx).kind else {
            return false;
        };
        let children = *children;
        let mut total = 0;
        for &c in &children {
            match &self.node(c).kind {
                Kind::Leaf(items) => total += items.len(),
                Kind::Internal { .. } => return false,
            }
        }
        if total > self.config.max_leaf {
            return false;
        }
        let mut merged = LeafItems::<K>::new();
        for &c in &children {
            if let Kind::Leaf(items) = &mut self.node_mut(c).kind {
                merged.extend(items.drain(..));
            }
            self.release(c);
        }
        self.node_mut(idx).kind = Kind::Leaf(merged);
        true
    }
}

impl<K: Copy + Eq + Hash + Debug> Backend<K> for QuadTree<K> {
    fn insert(&mut self, key: K, position: Point) -> Option<Point> {
        debug_assert!(position.is_finite(), "indexed positions must be finite");
        if !position.is_finite() {
            return None;
        }
        let prev = self.positions.insert(key, position);
        if let Some(old) = prev {
            self.detach(key, old);
        }
        self.attach(key, position);
        prev
    }

    fn remove(&mut self, key: K) -> Option<Point> {
        let pt = self.positions.remove(&key)?;
        if self.positions.is_empty() {
            self.clear();
        } else {
            self.detach(key, pt);
        }
        Some(pt)
    }

    fn relocate(&mut self, key: K, position: Point) -> bool {
        debug_assert!(position.is_finite(), "indexed positions must be finite");
        if !position.is_finite() || !self.positions.contains_key(&key) {
            return false;
        }
        self.insert(key, position);
        true
    }

    fn position(&self, key: K) -> Option<Point> {
        self.positions.get(&key).copied()
    }

    fn len(&self) -> usize {
        self.positions.len()
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.root = None;
        self.positions.clear();
    }

    /// Bulk build: the root is sized to the bounding square of `items` up
    /// front, so no growth steps are needed while inserting.
    fn rebuild_all<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = (K, Point)>,
    {
        self.clear();
        let items: Vec<(K, Point)> = items.into_iter().filter(|(_, p)| p.is_finite()).collect();
        let Some(&(_, first)) = items.first() else {
            return;
        };
        let bbox = items
            .iter()
            .fold(Rect::from_points(first, first), |acc, &(_, p)| acc.union_pt(p));
        let side = bbox.width().max(bbox.height());
        // Pad so the max corner falls strictly inside the half-open root.
        let side = if side > 0.0 {
            side * 1.01
        } else {
            self.config.initial_extent
        };
        let side = side
            .max(min_side(bbox.origin()))
            .max(min_side(Point::new(bbox.x1, bbox.y1)));
        let root = self.alloc(
            Rect::from_center_size(bbox.center(), Size::new(side, side)),
            Kind::Leaf(SmallVec::new()),
        );
        self.root = Some(root);
        for (key, position) in items {
            self.insert(key, position);
        }
    }

    fn find_nearest(&self, pt: Point, max_radius: f64) -> Option<Nearest<K>> {
        if !valid_radius(max_radius) || !pt.is_finite() {
            return None;
        }
        let root = self.root?;
        let mut best: Option<Nearest<K>> = None;
        let mut best_d2 = max_radius * max_radius;
        let mut stack = SmallVec::<[NodeIdx; 64]>::new();
        stack.push(root);
        while let Some(idx) = stack.pop() {
            let node = self.node(idx);
            if rect_distance_sq(node.bounds, pt) > best_d2 {
                continue;
            }
            match &node.kind {
                Kind::Leaf(items) => {
                    for &(key, position) in items {
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
                }
                Kind::Internal { children, .. } => {
                    // Push far children first so the closest quadrant is
                    // searched first and tightens the bound early.
                    let mut order = *children;
                    order.sort_unstable_by(|a, b| {
                        let da = rect_distance_sq(self.node(*a).bounds, pt);
                        let db = rect_distance_sq(self.node(*b).bounds, pt);
                        db.total_cmp(&da)
                    });
                    stack.extend(order);
                }
            }
        }
        best
    }

    fn visit_rect<F: FnMut(K, Point)>(&self, rect: Rect, mut f: F) {
        let Some(root) = self.root else {
            return;
        };
        let mut stack = SmallVec::<[NodeIdx; 64]>::new();
        stack.push(root);
        while let Some(idx) = stack.pop() {
            let node = self.node(idx);
            if !overlaps(node.bounds, rect) {
                continue;
            }
            match &node.kind {
                Kind::Leaf(items) => {
                    for &(key, position) in items {
                        if covers(rect, position) {
                            f(key, position);
                        }
                    }
                }
                Kind::Internal { children, .. } => stack.extend(children.iter().copied()),
            }
        }
    }
}

impl<K: Debug> Debug for QuadTree<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("QuadTree")
            .field("config", &self.config)
            .field("entries", &self.positions.len())
            .field("nodes", &(self.nodes.len() - self.free.len()))
            .field("bounds", &self.root.map(|r| self.nodes[r.0].bounds))
            .finish_non_exhaustive()
    }
}

/// Debug snapshot of a [`QuadTree`] shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadTreeDebugInfo {
    /// Root bounds, if the tree is non-empty.
    pub bounds: Option<Rect>,
    /// Number of indexed entries.
    pub entries: usize,
    /// Number of live nodes reachable from the root.
    pub nodes: usize,
    /// Number of leaf nodes.
    pub leaves: usize,
    /// Depth of the deepest node (root is 0).
    pub depth: u32,
}
