// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Entity drag state: which entity a pan is carrying and where it was grabbed.
//!
//! ## Usage
//!
//! 1) Start a drag with [`DragSession::start`], passing the grabbed entity, its
//!    world position and the pointer's world position.
//! 2) On each move, map the pointer to world space and call
//!    [`DragSession::target`] to get the entity's new center.
//! 3) [`DragSession::update`] tracks screen movement like a plain drag would.
//!
//! ## Minimal example
//!
//! ```
//! use canopy_event_state::drag::DragSession;
//! use canopy_scene::{Entity, SceneStore};
//! use kurbo::Point;
//!
//! let mut scene = SceneStore::new();
//! let key = scene.add_entity(Entity::new("a", (10.0, 10.0), 5.0)).unwrap();
//!
//! // Grabbed 2 units left of the center.
//! let drag = DragSession::start(key, Point::new(10.0, 10.0), Point::new(8.0, 10.0), Point::ZERO);
//! assert_eq!(drag.target(Point::new(18.0, 30.0)), Point::new(20.0, 30.0));
//! ```

use canopy_scene::EntityKey;
use kurbo::{Point, Vec2};

/// An entity being carried by a pan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    /// The dragged entity.
    pub key: EntityKey,
    /// Entity center minus the pointer's world position at grab time.
    pub grab_offset: Vec2,
    /// Screen position where the drag started.
    pub start_pos: Point,
    /// Last screen position seen.
    pub last_pos: Point,
}

impl DragSession {
    /// Starts carrying `key`, whose center is at `center`, grabbed at the
    /// world point `grab` from screen point `screen`.
    #[must_use]
    pub fn start(key: EntityKey, center: Point, grab: Point, screen: Point) -> Self {
        Self {
            key,
            grab_offset: center - grab,
            start_pos: screen,
            last_pos: screen,
        }
    }

    /// Where the entity's center goes for a pointer at world point `pointer`.
    #[must_use]
    pub fn target(&self, pointer: Point) -> Point {
        pointer + self.grab_offset
    }

    /// Records a new screen position and returns the movement since the last one.
    pub fn update(&mut self, screen: Point) -> Vec2 {
        let delta = screen - self.last_pos;
        self.last_pos = screen;
        delta
    }

    /// Screen movement since the drag started.
    #[must_use]
    pub fn total_offset(&self) -> Vec2 {
        self.last_pos - self.start_pos
    }
}
