// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy: an interactive 2D scene view.
//!
//! A [`SceneView`] shows a scene of round entities joined by edges through a
//! world-to-screen affine transform. Users pan, pinch-zoom, rotate and
//! wheel-zoom the view, drag entities, and select them with long presses.
//!
//! The view is assembled from the workspace crates, re-exported here:
//!
//! - [`affine`]: [`AffineTransform`] with checked inversion
//! - [`index`]: the point index behind hit testing ([`index::QuadTree`])
//! - [`view2d`]: [`ViewTransformController`], the only writer of the transform
//! - [`scene`]: [`SceneStore`], [`HitTester`] and selection
//! - [`event_state`]: [`GestureRouter`] and [`GestureEvent`]
//!
//! ## Minimal example
//!
//! ```rust
//! use canopy::{Entity, GestureEvent, SceneView};
//! use kurbo::{Point, Size};
//!
//! let mut view = SceneView::new();
//! view.scene_mut().add_entity(Entity::new("a", (0.0, 0.0), 10.0)).unwrap();
//! view.scene_mut().add_entity(Entity::new("b", (100.0, 100.0), 10.0)).unwrap();
//!
//! // The first layout fits the scene into the viewport.
//! assert!(view.layout(Size::new(400.0, 300.0)));
//! let b = view.world_to_screen(Point::new(100.0, 100.0));
//! assert_eq!(view.entity_at(b).unwrap().id, "b");
//!
//! // One wheel notch zooms out about the pointer.
//! view.handle(GestureEvent::Wheel { position: b, direction: 1.0 });
//! assert_eq!(view.entity_at(b).unwrap().id, "b");
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod view;

pub use canopy_affine as affine;
pub use canopy_event_state as event_state;
pub use canopy_index as index;
pub use canopy_scene as scene;
pub use canopy_view2d as view2d;

pub use canopy_affine::{AffineTransform, SingularTransform};
pub use canopy_event_state::{GestureEvent, GestureKind, GestureRouter, Response, RouterSettings};
pub use canopy_scene::{Edge, Entity, EntityKey, Hit, HitParams, HitTester, SceneStore};
pub use canopy_view2d::{ControllerSettings, ViewTransformController};
pub use view::SceneView;
