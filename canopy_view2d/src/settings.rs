// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Tuning for [`crate::ViewTransformController`].
///
/// Values are normalized when handed to the controller: non-finite or
/// non-positive entries fall back to their defaults and reversed zoom limits
/// are swapped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControllerSettings {
    /// Factor applied by one wheel notch with a positive direction (zoom out).
    ///
    /// A negative direction applies the reciprocal.
    pub wheel_step: f64,
    /// Smallest cumulative pinch factor accepted; smaller factors are raised
    /// to this so a gesture can never collapse the transform.
    pub min_scale_factor: f64,
    /// Smallest uniform zoom the transform may reach through gestures or fitting.
    pub min_zoom: f64,
    /// Largest uniform zoom the transform may reach through gestures or fitting.
    pub max_zoom: f64,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            wheel_step: 0.9,
            min_scale_factor: 1e-3,
            min_zoom: 1e-3,
            max_zoom: 1e3,
        }
    }
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

impl ControllerSettings {
    /// Sets the wheel zoom step.
    #[must_use]
    pub fn with_wheel_step(mut self, step: f64) -> Self {
        self.wheel_step = step;
        self
    }

    /// Sets the smallest accepted cumulative pinch factor.
    #[must_use]
    pub fn with_min_scale_factor(mut self, factor: f64) -> Self {
        self.min_scale_factor = factor;
        self
    }

    /// Sets the zoom range. The bounds may be given in either order.
    #[must_use]
    pub fn with_zoom_limits(mut self, min_zoom: f64, max_zoom: f64) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }

    /// Returns a copy with every field forced into its valid range.
    #[must_use]
    pub fn normalized(self) -> Self {
        let defaults = Self::default();
        let mut wheel_step = positive_or(self.wheel_step, defaults.wheel_step);
        if wheel_step == 1.0 {
            wheel_step = defaults.wheel_step;
        }
        let min_zoom = positive_or(self.min_zoom, defaults.min_zoom);
        let max_zoom = positive_or(self.max_zoom, defaults.max_zoom);
        let (min_zoom, max_zoom) = if min_zoom <= max_zoom {
            (min_zoom, max_zoom)
        } else {
            (max_zoom, min_zoom)
        };
        Self {
            wheel_step,
            min_scale_factor: positive_or(self.min_scale_factor, defaults.min_scale_factor),
            min_zoom,
            max_zoom,
        }
    }

    /// Clamps an absolute zoom into `[min_zoom, max_zoom]`.
    #[must_use]
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.max(self.min_zoom).min(self.max_zoom)
    }
}
