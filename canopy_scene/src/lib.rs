// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Scene: entities, edges, selection, and hit testing.
//!
//! [`SceneStore`] owns a scene of round [`Entity`] values joined by [`Edge`]s
//! and keeps a spatial index (by default a [`canopy_index::QuadTree`]) in
//! lockstep with entity positions. [`HitTester`] answers *which entity is
//! under this point?* in two phases: a nearest-center query against the index,
//! then an exact disk containment test.
//!
//! - Entities are addressed by string id or by a generational [`EntityKey`].
//! - Moves relocate the entity in the index in the same call.
//! - Selection flags are mirrored onto entities and edges; the ordered
//!   selections are available as [`Selection`] values.
//! - Every change is recorded as [`SceneDamage`] for renderers to drain.
//!
//! ## Minimal example
//!
//! ```rust
//! use canopy_affine::AffineTransform;
//! use canopy_scene::{Entity, HitTester, SceneStore};
//! use kurbo::Point;
//!
//! let mut scene = SceneStore::new();
//! scene.add_entity(Entity::new("a", (0.0, 0.0), 10.0)).unwrap();
//! scene.add_entity(Entity::new("b", (100.0, 100.0), 10.0)).unwrap();
//!
//! let tester = HitTester::new();
//! let view = AffineTransform::IDENTITY;
//! let hit = tester.hit_test(view, &scene, Point::new(3.0, 4.0)).unwrap();
//! assert_eq!(scene.entity_by_key(hit.key).unwrap().id, "a");
//! assert!(tester.hit_test(view, &scene, Point::new(200.0, 200.0)).is_none());
//!
//! // Moving an entity moves its hit area.
//! scene.move_entity("a", Point::new(50.0, 0.0));
//! assert!(tester.hit_test(view, &scene, Point::new(3.0, 4.0)).is_none());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod damage;
mod entity;
mod error;
mod hit;
mod key;
mod selection;
mod store;

pub use damage::SceneDamage;
pub use entity::{Edge, Entity};
pub use error::SceneError;
pub use hit::{Containment, Hit, HitParams, HitTester};
pub use key::{EdgeKey, EntityKey};
pub use selection::Selection;
pub use store::SceneStore;
