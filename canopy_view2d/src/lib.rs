// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy View 2D: the gesture-driven world → screen transform.
//!
//! [`ViewTransformController`] owns the current [`AffineTransform`] and turns
//! pan, pinch, rotate and wheel input into transform updates:
//! - Pan deltas are screen-space and accumulate exactly.
//! - Pinch and rotate rebuild from a snapshot taken at begin, using the
//!   cumulative factor or angle reported since then, about the world point
//!   under the fingers. Both can run at once and share the snapshot.
//! - Wheel zoom is a discrete step about a pivot.
//! - [`fit_transform`] / [`ViewTransformController::fit_to_content`] center
//!   and scale content into a viewport for the initial view.
//!
//! Updates can also be submitted as [`TransformCommand`] values, which keeps
//! the controller the single writer of the transform.
//!
//! It does **not** recognize gestures or own any scene; callers feed it
//! already-decoded gesture phases.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size, Rect};
//! use canopy_view2d::ViewTransformController;
//!
//! let mut view = ViewTransformController::new();
//! view.fit_to_content(Size::new(400.0, 400.0), Some(Rect::new(-10.0, -10.0, 110.0, 110.0)));
//!
//! // Pinch 2x around the viewport center.
//! let focal = Point::new(200.0, 200.0);
//! let under_finger = view.screen_to_world(focal).unwrap();
//! view.pinch_begin(focal);
//! view.pinch_change(focal, 2.0);
//! view.pinch_end();
//!
//! assert!(view.world_to_screen(under_finger).distance(focal) < 1e-9);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod command;
mod controller;
mod fit;
mod settings;

pub use canopy_affine::AffineTransform;
pub use command::TransformCommand;
pub use controller::{ControllerDebugInfo, TransformGestures, ViewTransformController};
pub use fit::fit_transform;
pub use settings::ControllerSettings;
