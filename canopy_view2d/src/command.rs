// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_affine::AffineTransform;
use kurbo::{Point, Rect, Size, Vec2};

/// A request to update the view transform.
///
/// Input sources submit commands and a single [`crate::ViewTransformController`]
/// applies them in order, so no gesture ever writes the transform directly.
/// Points are in screen space unless stated otherwise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformCommand {
    /// Screen-space pan delta.
    Pan(Vec2),
    /// Start a pinch at `focal`.
    PinchBegin {
        /// Focal point between the fingers.
        focal: Point,
    },
    /// Cumulative pinch factor since begin.
    Pinch {
        /// Focal point between the fingers.
        focal: Point,
        /// Scale relative to the gesture start.
        scale: f64,
    },
    /// End the pinch.
    PinchEnd,
    /// Start a rotation at `anchor`.
    RotateBegin {
        /// Rotation anchor.
        anchor: Point,
    },
    /// Cumulative rotation since begin.
    Rotate {
        /// Rotation anchor.
        anchor: Point,
        /// Angle in radians relative to the gesture start.
        angle: f64,
    },
    /// End the rotation.
    RotateEnd,
    /// One wheel notch; see [`crate::ViewTransformController::wheel_zoom`].
    Wheel {
        /// Zoom pivot.
        pivot: Point,
        /// Sign selects zoom out (positive) or in (negative).
        direction: f64,
    },
    /// Fit world-space `content` into a viewport of size `viewport`.
    Fit {
        /// Viewport size in screen units.
        viewport: Size,
        /// World-space content bounds.
        content: Option<Rect>,
    },
    /// Replace the transform.
    Set(AffineTransform),
}
