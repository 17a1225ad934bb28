// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-pointer sampling: turns raw pointer pairs into pinch and rotate values.
//!
//! ## Usage
//!
//! ```
//! use canopy_event_state::touch::{TwoFingerSample, TwoFingerTracker};
//! use kurbo::Point;
//!
//! let start = TwoFingerSample::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
//! let mut tracker = TwoFingerTracker::new(start);
//! let update = tracker.update(TwoFingerSample::new(Point::new(0.0, 0.0), Point::new(0.0, 20.0)));
//! assert_eq!(update.scale, 2.0);
//! assert!((update.rotation - core::f64::consts::FRAC_PI_2).abs() < 1e-12);
//! ```

use core::f64::consts::{PI, TAU};

use kurbo::Point;
use log::debug;

/// Spans below this are treated as touching pointers.
pub const MIN_SPAN: f64 = 1e-6;

/// Positions of two pointers at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TwoFingerSample {
    /// First pointer.
    pub a: Point,
    /// Second pointer.
    pub b: Point,
}

impl TwoFingerSample {
    /// Creates a sample.
    #[must_use]
    pub fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    /// Midpoint of the pointers.
    #[must_use]
    pub fn focal(&self) -> Point {
        self.a.midpoint(self.b)
    }

    /// Distance between the pointers.
    #[must_use]
    pub fn span(&self) -> f64 {
        (self.b - self.a).hypot()
    }

    /// Direction from `a` to `b`, in radians.
    #[must_use]
    pub fn angle(&self) -> f64 {
        (self.b - self.a).atan2()
    }

    /// True when the pointers coincide (or a coordinate is not finite).
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        let span = self.span();
        !span.is_finite() || span < MIN_SPAN
    }

    /// Span ratio relative to `start`; `1.0` if either sample is degenerate.
    #[must_use]
    pub fn scale_since(&self, start: &Self) -> f64 {
        if self.is_degenerate() || start.is_degenerate() {
            return 1.0;
        }
        self.span() / start.span()
    }

    /// Angle relative to `start`, wrapped to `(-π, π]`; `0.0` if either sample
    /// is degenerate.
    #[must_use]
    pub fn rotation_since(&self, start: &Self) -> f64 {
        if self.is_degenerate() || start.is_degenerate() {
            return 0.0;
        }
        wrap_angle(self.angle() - start.angle())
    }
}

/// Cumulative values reported by [`TwoFingerTracker::update`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TwoFingerUpdate {
    /// Current midpoint.
    pub focal: Point,
    /// Span ratio since the first sample.
    pub scale: f64,
    /// Unwrapped rotation since the first sample, in radians.
    pub rotation: f64,
}

/// Follows a two-pointer gesture from its first sample.
///
/// Rotation is unwrapped sample to sample, so turning past half a revolution
/// keeps accumulating instead of jumping by a full turn.
#[derive(Clone, Copy, Debug)]
pub struct TwoFingerTracker {
    start: TwoFingerSample,
    last: TwoFingerSample,
    rotation: f64,
}

impl TwoFingerTracker {
    /// Starts tracking from `start`.
    #[must_use]
    pub fn new(start: TwoFingerSample) -> Self {
        if start.is_degenerate() {
            debug!("two-finger gesture starts with coincident pointers");
        }
        Self {
            start,
            last: start,
            rotation: 0.0,
        }
    }

    /// The first sample.
    #[must_use]
    pub fn start(&self) -> TwoFingerSample {
        self.start
    }

    /// Feeds the next sample.
    ///
    /// Degenerate samples report a scale of `1.0` and leave the rotation
    /// where it was.
    pub fn update(&mut self, sample: TwoFingerSample) -> TwoFingerUpdate {
        let scale = sample.scale_since(&self.start);
        if !sample.is_degenerate() && !self.last.is_degenerate() {
            self.rotation += sample.rotation_since(&self.last);
        }
        if !sample.is_degenerate() {
            self.last = sample;
        } else {
            debug!("degenerate two-finger sample {sample:?}");
        }
        TwoFingerUpdate {
            focal: sample.focal(),
            scale,
            rotation: self.rotation,
        }
    }
}

fn wrap_angle(mut angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    while angle > PI {
        angle -= TAU;
    }
    while angle <= -PI {
        angle += TAU;
    }
    angle
}
