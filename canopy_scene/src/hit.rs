// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-phase hit testing: index broad phase, disk containment narrow phase.

use canopy_affine::AffineTransform;
use canopy_index::Backend;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect};
use log::warn;

use crate::key::EntityKey;
use crate::store::SceneStore;

/// How a point exactly on an entity's rim is classified.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Containment {
    /// `distance² <= radius²`: the rim belongs to the entity.
    #[default]
    Inclusive,
    /// `distance² < radius²`: the rim is outside.
    Exclusive,
}

impl Containment {
    /// Whether a point at squared distance `distance_sq` from the center lies
    /// within `radius`.
    #[must_use]
    pub fn contains(self, distance_sq: f64, radius: f64) -> bool {
        let r2 = radius * radius;
        match self {
            Self::Inclusive => distance_sq <= r2,
            Self::Exclusive => distance_sq < r2,
        }
    }
}

/// Parameters for [`HitTester`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HitParams {
    /// Broad-phase search radius in world units.
    ///
    /// `None` uses the largest entity radius in the scene, which is the
    /// smallest radius that can never miss a containing entity.
    pub search_radius: Option<f64>,
    /// Rim classification for the narrow phase.
    pub containment: Containment,
}

/// A successful hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    /// The entity hit.
    pub key: EntityKey,
    /// The query point in world space.
    pub world: Point,
    /// Distance from the query point to the entity center.
    pub distance: f64,
}

/// Resolves screen or world points to the entity under them.
///
/// The spatial index answers "which center is nearest within the search
/// radius"; that is only a broad phase. The candidate then has to pass a true
/// containment test against its own radius. If the nearest center fails (a
/// small entity close by, a large one further away that does contain the
/// point), the remaining candidates inside the search radius are checked and
/// the one with the nearest center wins.
#[derive(Clone, Copy, Debug, Default)]
pub struct HitTester {
    params: HitParams,
}

impl HitTester {
    /// Creates a tester with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tester with explicit parameters.
    #[must_use]
    pub fn with_params(params: HitParams) -> Self {
        Self { params }
    }

    /// The active parameters.
    #[must_use]
    pub fn params(&self) -> HitParams {
        self.params
    }

    /// Replaces the parameters.
    pub fn set_params(&mut self, params: HitParams) {
        self.params = params;
    }

    /// Hit-tests a screen point through the inverse of `transform`.
    ///
    /// A singular transform means nothing can be hit; it is logged and
    /// reported as a miss.
    #[must_use]
    pub fn hit_test<B: Backend<EntityKey>>(
        &self,
        transform: AffineTransform,
        store: &SceneStore<B>,
        screen: Point,
    ) -> Option<Hit> {
        match transform.invert() {
            Ok(inverse) => self.hit_test_world(store, inverse.apply(screen)),
            Err(err) => {
                warn!("hit test at {screen:?} skipped: {err}");
                None
            }
        }
    }

    /// Hit-tests a world point.
    #[must_use]
    pub fn hit_test_world<B: Backend<EntityKey>>(
        &self,
        store: &SceneStore<B>,
        world: Point,
    ) -> Option<Hit> {
        if !world.is_finite() {
            return None;
        }
        let search = self
            .params
            .search_radius
            .unwrap_or_else(|| store.max_radius());
        let containment = self.params.containment;
        let contains = |key: EntityKey, distance_sq: f64| {
            store
                .entity_by_key(key)
                .is_some_and(|e| containment.contains(distance_sq, e.radius))
        };

        let nearest = store.index().find_nearest(world, search)?;
        if contains(nearest.key, nearest.distance_sq) {
            return Some(Hit {
                key: nearest.key,
                world,
                distance: nearest.distance(),
            });
        }

        let window = Rect::from_center_size(world, (2.0 * search, 2.0 * search));
        let mut best: Option<(EntityKey, f64)> = None;
        store.index().visit_rect(window, |key, position| {
            let d2 = position.distance_squared(world);
            if d2 <= search * search
                && best.is_none_or(|(_, b)| d2 < b)
                && contains(key, d2)
            {
                best = Some((key, d2));
            }
        });
        best.map(|(key, d2)| Hit {
            key,
            world,
            distance: d2.sqrt(),
        })
    }
}
