// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Event State: gesture routing for an interactive scene view.
//!
//! Input layers deliver normalized [`GestureEvent`]s; a [`GestureRouter`]
//! decides which gesture owns the view and forwards each event to a
//! [`canopy_view2d::ViewTransformController`], a [`canopy_scene::SceneStore`]
//! and a [`canopy_scene::HitTester`].
//!
//! - [`router`]: the race between pan, pinch, rotate and long-press, plus wheel zoom
//! - [`drag`]: entity drags that keep their grab offset
//! - [`touch`]: focal point, span and angle from raw two-pointer samples
//!
//! ## Minimal example
//!
//! ```rust
//! use canopy_event_state::{GestureEvent, GestureRouter, Response};
//! use canopy_scene::{Entity, HitTester, SceneStore};
//! use canopy_view2d::ViewTransformController;
//! use kurbo::{Point, Vec2};
//!
//! let mut view = ViewTransformController::new();
//! let mut scene = SceneStore::new();
//! let key = scene.add_entity(Entity::new("a", (10.0, 10.0), 5.0)).unwrap();
//! let hit = HitTester::new();
//! let mut router = GestureRouter::new();
//!
//! // A pan that starts on an entity drags it.
//! let begin = GestureEvent::PanBegin { position: Point::new(10.0, 10.0) };
//! assert_eq!(router.handle(begin, &mut view, &mut scene, &hit), Response::DragBegan(key));
//! let change = GestureEvent::PanChange { position: Point::new(30.0, 10.0), delta: Vec2::new(20.0, 0.0) };
//! assert_eq!(router.handle(change, &mut view, &mut scene, &hit), Response::EntityMoved(key));
//! assert_eq!(scene.entity("a").unwrap().position, Point::new(30.0, 10.0));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

pub mod drag;
mod event;
pub mod router;
pub mod touch;

pub use event::{GestureEvent, GestureKind, Phase, Response};
pub use router::{GestureRouter, RouterSettings};
