// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_affine::AffineTransform;
use kurbo::{Point, Rect, Size, Vec2};
use log::{debug, trace, warn};

use crate::command::TransformCommand;
use crate::fit::fit_transform;
use crate::settings::ControllerSettings;

bitflags::bitflags! {
    /// Pivot-relative gestures engaged in the current transform session.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TransformGestures: u8 {
        /// A pinch (scale) gesture is engaged.
        const PINCH  = 0b0000_0001;
        /// A rotate gesture is engaged.
        const ROTATE = 0b0000_0010;
    }
}

/// Scratch state shared by pinch and rotate between begin and end.
#[derive(Clone, Copy, Debug)]
struct Session {
    /// Transform snapshot taken when the first gesture of the session began.
    offset: AffineTransform,
    /// World-space pivot, refreshed on every change against the live transform.
    pivot: Point,
    /// Cumulative scale since `offset`.
    scale: f64,
    /// Cumulative rotation since `offset`, in radians.
    angle: f64,
    engaged: TransformGestures,
}

impl Session {
    fn transform(&self) -> AffineTransform {
        let linear =
            AffineTransform::scale_uniform(self.scale).compose(AffineTransform::rotate(self.angle));
        self.offset.transform_about(self.pivot, linear)
    }
}

/// Owner of the world → screen transform and the rules that update it.
///
/// Every continuous gesture follows a begin / change / end pattern:
/// - Pan needs no snapshot; each change appends a screen-space translation,
///   so successive deltas accumulate exactly.
/// - Pinch and rotate snapshot the transform at begin (the *offset*) and
///   rebuild from it on every change using the cumulative factor or angle
///   reported by the input layer. The pivot is the world point under the
///   focal/anchor point, recomputed against the live transform on every
///   change so a drifting focal point is followed.
/// - Pinch and rotate may be engaged together; they then share one snapshot
///   and one combined scale+rotation, so the result does not depend on the
///   order in which their changes arrive.
///
/// Wheel zoom is one-shot and applies to the current transform directly.
///
/// Malformed input (non-finite deltas, non-positive scale factors, changes
/// without a begin) degrades to a no-op and is logged at `debug` level.
#[derive(Clone, Debug)]
pub struct ViewTransformController {
    transform: AffineTransform,
    settings: ControllerSettings,
    session: Option<Session>,
    revision: u64,
}

impl Default for ViewTransformController {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewTransformController {
    /// Creates a controller holding the identity transform.
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(ControllerSettings::default())
    }

    /// Creates a controller with explicit settings.
    #[must_use]
    pub fn with_settings(settings: ControllerSettings) -> Self {
        Self {
            transform: AffineTransform::IDENTITY,
            settings: settings.normalized(),
            session: None,
            revision: 0,
        }
    }

    /// The current world → screen transform.
    #[must_use]
    pub fn transform(&self) -> AffineTransform {
        self.transform
    }

    /// Monotonic counter bumped whenever the transform changes.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The active settings.
    #[must_use]
    pub fn settings(&self) -> ControllerSettings {
        self.settings
    }

    /// Replaces the settings. Applies to the next update.
    pub fn set_settings(&mut self, settings: ControllerSettings) {
        self.settings = settings.normalized();
    }

    /// Gestures currently sharing the transform session.
    #[must_use]
    pub fn engaged(&self) -> TransformGestures {
        self.session.map(|s| s.engaged).unwrap_or_default()
    }

    /// Replaces the transform wholesale, abandoning any pinch/rotate session.
    ///
    /// Non-finite transforms are refused. Returns whether the transform changed.
    pub fn set_transform(&mut self, transform: AffineTransform) -> bool {
        if self.session.take().is_some() {
            debug!("transform replaced; abandoning pinch/rotate session");
        }
        self.commit(transform)
    }

    /// Maps a screen point to world space, or `None` if the transform is singular.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Option<Point> {
        self.transform.invert().ok().map(|inv| inv.apply(screen))
    }

    /// Maps a world point to screen space.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        self.transform.apply(world)
    }

    /// Starts a pan. Pans need no snapshot, so this only logs.
    pub fn pan_begin(&mut self) {
        debug!("pan begin");
    }

    /// Pans by a screen-space delta: `translate(delta) ∘ current`.
    pub fn pan_change(&mut self, delta: Vec2) -> bool {
        if !delta.is_finite() {
            debug!("ignoring non-finite pan delta {delta:?}");
            return false;
        }
        trace!("pan by {delta:?}");
        self.commit(self.transform.then_translate(delta))
    }

    /// Ends a pan.
    pub fn pan_end(&mut self) {
        debug!("pan end");
    }

    /// Starts a pinch around the screen-space `focal` point.
    ///
    /// Returns `false` if the current transform cannot be inverted.
    pub fn pinch_begin(&mut self, focal: Point) -> bool {
        self.engage(TransformGestures::PINCH, focal)
    }

    /// Applies a cumulative-from-begin `scale` about `focal`.
    ///
    /// The factor is normalized before use: non-finite or non-positive values
    /// become `1.0`, tiny values are raised to the minimum scale factor and
    /// the result is limited so the zoom stays within the configured range.
    pub fn pinch_change(&mut self, focal: Point, scale: f64) -> bool {
        let Some(mut session) = self.session_for(TransformGestures::PINCH) else {
            return false;
        };
        session.scale = self.limit_factor(session.offset.uniform_scale(), scale);
        trace!("pinch at {focal:?} scale {}", session.scale);
        self.update_session(session, focal)
    }

    /// Ends a pinch, keeping the transform it produced.
    pub fn pinch_end(&mut self) -> bool {
        self.disengage(TransformGestures::PINCH)
    }

    /// Starts a rotation around the screen-space `anchor` point.
    ///
    /// Returns `false` if the current transform cannot be inverted.
    pub fn rotate_begin(&mut self, anchor: Point) -> bool {
        self.engage(TransformGestures::ROTATE, anchor)
    }

    /// Applies a cumulative-from-begin rotation of `angle` radians about `anchor`.
    ///
    /// Non-finite angles are treated as no rotation.
    pub fn rotate_change(&mut self, anchor: Point, angle: f64) -> bool {
        let Some(mut session) = self.session_for(TransformGestures::ROTATE) else {
            return false;
        };
        session.angle = if angle.is_finite() {
            angle
        } else {
            debug!("degenerate rotation {angle}; using 0");
            0.0
        };
        trace!("rotate at {anchor:?} angle {}", session.angle);
        self.update_session(session, anchor)
    }

    /// Ends a rotation, keeping the transform it produced.
    pub fn rotate_end(&mut self) -> bool {
        self.disengage(TransformGestures::ROTATE)
    }

    /// One discrete zoom step about a screen-space `pivot`.
    ///
    /// A positive `direction` zooms out by the wheel step, a negative one
    /// zooms in by its reciprocal; zero (or NaN) does nothing. The step is
    /// ignored while a pinch or rotate is engaged, since the next change of
    /// that gesture would rebuild from its snapshot and discard it.
    pub fn wheel_zoom(&mut self, pivot: Point, direction: f64) -> bool {
        if let Some(session) = self.session {
            debug!("wheel ignored during {:?}", session.engaged);
            return false;
        }
        let step = self.settings.wheel_step;
        let factor = if direction > 0.0 {
            step
        } else if direction < 0.0 {
            1.0 / step
        } else {
            return false;
        };
        let inverse = match self.transform.invert() {
            Ok(inverse) => inverse,
            Err(err) => {
                warn!("wheel zoom skipped: {err}");
                return false;
            }
        };
        let world_pivot = inverse.apply(pivot);
        let factor = self.limit_factor(self.transform.uniform_scale(), factor);
        trace!("wheel zoom by {factor} about {pivot:?}");
        self.commit(self.transform.scale_about(factor, world_pivot))
    }

    /// Fits world-space `content` into a viewport of the given size.
    ///
    /// `None` content resets to the identity. A viewport without positive area
    /// leaves the transform untouched. Any pinch/rotate session is abandoned.
    pub fn fit_to_content(&mut self, viewport: Size, content: Option<Rect>) -> bool {
        let Some(fitted) = fit_transform(viewport, content, &self.settings) else {
            debug!("fit skipped for empty viewport {viewport:?}");
            return false;
        };
        self.set_transform(fitted)
    }

    /// Applies a [`TransformCommand`].
    ///
    /// Returns `true` when the command changed the transform or, for
    /// begin/end commands, the session state.
    pub fn apply(&mut self, command: TransformCommand) -> bool {
        match command {
            TransformCommand::Pan(delta) => self.pan_change(delta),
            TransformCommand::PinchBegin { focal } => self.pinch_begin(focal),
            TransformCommand::Pinch { focal, scale } => self.pinch_change(focal, scale),
            TransformCommand::PinchEnd => self.pinch_end(),
            TransformCommand::RotateBegin { anchor } => self.rotate_begin(anchor),
            TransformCommand::Rotate { anchor, angle } => self.rotate_change(anchor, angle),
            TransformCommand::RotateEnd => self.rotate_end(),
            TransformCommand::Wheel { pivot, direction } => self.wheel_zoom(pivot, direction),
            TransformCommand::Fit { viewport, content } => self.fit_to_content(viewport, content),
            TransformCommand::Set(transform) => self.set_transform(transform),
        }
    }

    /// Snapshot of the controller state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> ControllerDebugInfo {
        ControllerDebugInfo {
            transform: self.transform,
            revision: self.revision,
            zoom: self.transform.uniform_scale(),
            engaged: self.engaged(),
            offset: self.session.map(|s| s.offset),
            pivot: self.session.map(|s| s.pivot),
        }
    }

    fn commit(&mut self, transform: AffineTransform) -> bool {
        if !transform.is_finite() {
            debug!("refusing non-finite transform {transform:?}");
            return false;
        }
        if transform == self.transform {
            return false;
        }
        self.transform = transform;
        self.revision = self.revision.wrapping_add(1);
        true
    }

    fn engage(&mut self, kind: TransformGestures, screen: Point) -> bool {
        let pivot = match self.transform.invert() {
            Ok(inverse) => inverse.apply(screen),
            Err(err) => {
                warn!("{kind:?} not started: {err}");
                return false;
            }
        };
        match &mut self.session {
            Some(session) => {
                debug!("{kind:?} joins session with {:?}", session.engaged);
                session.engaged |= kind;
                session.pivot = pivot;
            }
            None => {
                debug!("{kind:?} begin at {screen:?}");
                self.session = Some(Session {
                    offset: self.transform,
                    pivot,
                    scale: 1.0,
                    angle: 0.0,
                    engaged: kind,
                });
            }
        }
        true
    }

    fn disengage(&mut self, kind: TransformGestures) -> bool {
        let Some(session) = &mut self.session else {
            return false;
        };
        if !session.engaged.contains(kind) {
            return false;
        }
        session.engaged.remove(kind);
        debug!("{kind:?} end");
        if session.engaged.is_empty() {
            self.session = None;
        }
        true
    }

    fn session_for(&self, kind: TransformGestures) -> Option<Session> {
        let session = self.session.filter(|s| s.engaged.contains(kind));
        if session.is_none() {
            debug!("{kind:?} change without begin ignored");
        }
        session
    }

    fn update_session(&mut self, mut session: Session, screen: Point) -> bool {
        match self.transform.invert() {
            Ok(inverse) => session.pivot = inverse.apply(screen),
            Err(err) => warn!("keeping previous pivot: {err}"),
        }
        self.session = Some(session);
        self.commit(session.transform())
    }

    /// Normalizes a scale factor applied on top of a transform whose zoom is `base`.
    fn limit_factor(&self, base: f64, factor: f64) -> f64 {
        if !factor.is_finite() || factor <= 0.0 {
            debug!("degenerate scale factor {factor}; using 1.0");
            return 1.0;
        }
        let factor = factor.max(self.settings.min_scale_factor);
        if !(base.is_finite() && base > 0.0) {
            return factor;
        }
        // Never force a jump when the base already lies outside the range.
        let lo = (self.settings.min_zoom / base).min(1.0);
        let hi = (self.settings.max_zoom / base).max(1.0);
        factor.max(lo).min(hi)
    }
}

/// Debug snapshot of a [`ViewTransformController`].
#[derive(Clone, Copy, Debug)]
pub struct ControllerDebugInfo {
    /// Current world → screen transform.
    pub transform: AffineTransform,
    /// Current revision.
    pub revision: u64,
    /// Uniform zoom of the current transform.
    pub zoom: f64,
    /// Gestures engaged in the current session.
    pub engaged: TransformGestures,
    /// Session snapshot, if a pinch or rotate is engaged.
    pub offset: Option<AffineTransform>,
    /// Session pivot in world space, if a pinch or rotate is engaged.
    pub pivot: Option<Point>,
}

#[cfg(test)]
mod tests {
    use core::f64::consts::FRAC_PI_2;

    use canopy_affine::AffineTransform;
    use kurbo::{Point, Vec2};

    use super::{TransformGestures, ViewTransformController};
    use crate::ControllerSettings;

    fn close(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-9
    }

    fn skewed_start() -> ViewTransformController {
        let mut c = ViewTransformController::new();
        let t = AffineTransform::translate((37.0, -12.0))
            .compose(AffineTransform::rotate(0.4))
            .compose(AffineTransform::scale_uniform(1.7));
        assert!(c.set_transform(t));
        c
    }

    #[test]
    fn pans_accumulate_additively() {
        let mut a = skewed_start();
        let mut b = skewed_start();
        a.pan_change(Vec2::new(3.5, -2.0));
        a.pan_change(Vec2::new(-10.25, 7.0));
        b.pan_change(Vec2::new(-6.75, 5.0));
        assert!(a.transform().approx_eq(b.transform(), 1e-12));
    }

    #[test]
    fn pinch_about_focal_scenario() {
        let mut c = ViewTransformController::new();
        assert!(c.pinch_begin(Point::new(50.0, 50.0)));
        c.pinch_change(Point::new(50.0, 50.0), 1.5);
        c.pinch_change(Point::new(50.0, 50.0), 2.0);
        assert!(close(c.world_to_screen(Point::new(50.0, 50.0)), Point::new(50.0, 50.0)));
        assert!(close(c.world_to_screen(Point::ZERO), Point::new(-50.0, -50.0)));
        assert!(c.pinch_end());
        assert!(c.engaged().is_empty());
    }

    #[test]
    fn pinch_scale_is_cumulative_from_begin() {
        let mut c = ViewTransformController::new();
        c.pinch_begin(Point::new(10.0, 10.0));
        c.pinch_change(Point::new(10.0, 10.0), 3.0);
        c.pinch_change(Point::new(10.0, 10.0), 2.0);
        assert!((c.transform().uniform_scale() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn pinch_keeps_world_point_under_stationary_focal() {
        let mut c = skewed_start();
        let focal = Point::new(120.0, 80.0);
        let world = c.screen_to_world(focal).unwrap();
        c.pinch_begin(focal);
        for s in [0.8, 1.3, 2.6, 4.0] {
            c.pinch_change(focal, s);
            assert!(close(c.world_to_screen(world), focal));
        }
    }

    #[test]
    fn rotate_keeps_world_point_under_stationary_anchor() {
        let mut c = skewed_start();
        let anchor = Point::new(-40.0, 15.0);
        let world = c.screen_to_world(anchor).unwrap();
        c.rotate_begin(anchor);
        for a in [0.1, -0.7, FRAC_PI_2, 3.0] {
            c.rotate_change(anchor, a);
            assert!(close(c.world_to_screen(world), anchor));
        }
        assert!((c.transform().uniform_scale() - 1.7).abs() < 1e-9);
    }

    #[test]
    fn pinch_pivot_follows_a_drifting_focal() {
        let mut c = skewed_start();
        let offset = c.transform();
        let (f0, f1) = (Point::new(120.0, 80.0), Point::new(150.0, 60.0));
        c.pinch_begin(f0);
        c.pinch_change(f0, 1.4);
        let live = c.transform();
        c.pinch_change(f1, 2.5);
        let pivot = live.invert().unwrap().apply(f1);
        assert!(c.transform().approx_eq(offset.scale_about(2.5, pivot), 1e-9));
        // A pivot frozen at begin would give a different transform.
        let frozen = offset.invert().unwrap().apply(f0);
        assert!(!c.transform().approx_eq(offset.scale_about(2.5, frozen), 1e-6));
    }

    #[test]
    fn rotate_pivot_follows_a_drifting_anchor() {
        let mut c = skewed_start();
        let offset = c.transform();
        let (a0, a1) = (Point::new(-40.0, 15.0), Point::new(10.0, 90.0));
        c.rotate_begin(a0);
        c.rotate_change(a0, 0.3);
        let live = c.transform();
        c.rotate_change(a1, 1.1);
        let pivot = live.invert().unwrap().apply(a1);
        assert!(c.transform().approx_eq(offset.rotate_about(1.1, pivot), 1e-9));
    }

    #[test]
    fn rotate_angle_is_cumulative_from_begin() {
        let mut c = ViewTransformController::new();
        c.rotate_begin(Point::ZERO);
        c.rotate_change(Point::ZERO, 1.0);
        c.rotate_change(Point::ZERO, FRAC_PI_2);
        assert!(close(c.world_to_screen(Point::new(1.0, 0.0)), Point::new(0.0, 1.0)));
    }

    #[test]
    fn simultaneous_pinch_and_rotate_are_order_independent() {
        let focal = Point::new(60.0, 40.0);

        let mut a = skewed_start();
        a.pinch_begin(focal);
        a.rotate_begin(focal);
        a.pinch_change(focal, 1.8);
        a.rotate_change(focal, 0.6);

        let mut b = skewed_start();
        b.rotate_begin(focal);
        b.pinch_begin(focal);
        b.rotate_change(focal, 0.6);
        b.pinch_change(focal, 1.8);

        assert_eq!(
            a.engaged(),
            TransformGestures::PINCH | TransformGestures::ROTATE
        );
        assert!(a.transform().approx_eq(b.transform(), 1e-9));
        assert!((a.transform().uniform_scale() - 1.7 * 1.8).abs() < 1e-9);
    }

    #[test]
    fn ending_one_of_two_gestures_keeps_the_session() {
        let focal = Point::new(5.0, 5.0);
        let mut c = ViewTransformController::new();
        c.pinch_begin(focal);
        c.rotate_begin(focal);
        c.pinch_change(focal, 2.0);
        assert!(c.pinch_end());
        assert_eq!(c.engaged(), TransformGestures::ROTATE);
        c.rotate_change(focal, 0.3);
        // The finished pinch's scale is retained.
        assert!((c.transform().uniform_scale() - 2.0).abs() < 1e-9);
        assert!(c.rotate_end());
        assert!(!c.rotate_end());
    }

    #[test]
    fn degenerate_scale_is_a_unit_scale() {
        let mut c = skewed_start();
        let before = c.transform();
        c.pinch_begin(Point::new(1.0, 2.0));
        for s in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            c.pinch_change(Point::new(1.0, 2.0), s);
            assert!(c.transform().approx_eq(before, 1e-12));
        }
    }

    #[test]
    fn tiny_scale_factor_never_makes_the_transform_singular() {
        let mut c = ViewTransformController::with_settings(
            ControllerSettings::default().with_zoom_limits(1e-9, 1e9),
        );
        c.pinch_begin(Point::ZERO);
        c.pinch_change(Point::ZERO, 1e-30);
        assert!((c.transform().uniform_scale() - 1e-3).abs() < 1e-12);
        assert!(c.transform().invert().is_ok());
    }

    #[test]
    fn zoom_limits_clamp_cumulative_pinch() {
        let mut c = ViewTransformController::with_settings(
            ControllerSettings::default().with_zoom_limits(0.5, 4.0),
        );
        let focal = Point::new(30.0, 30.0);
        c.pinch_begin(focal);
        c.pinch_change(focal, 10.0);
        assert!((c.transform().uniform_scale() - 4.0).abs() < 1e-9);
        assert!(close(c.world_to_screen(focal), focal));
        c.pinch_change(focal, 0.1);
        assert!((c.transform().uniform_scale() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn changes_without_begin_are_ignored() {
        let mut c = ViewTransformController::new();
        assert!(!c.pinch_change(Point::ZERO, 2.0));
        assert!(!c.rotate_change(Point::ZERO, 1.0));
        assert!(!c.pinch_end());
        assert_eq!(c.transform(), AffineTransform::IDENTITY);
        assert_eq!(c.revision(), 0);
    }

    #[test]
    fn wheel_steps_about_pivot() {
        let mut c = ViewTransformController::new();
        let pivot = Point::new(100.0, 50.0);
        assert!(c.wheel_zoom(pivot, 1.0));
        assert!((c.transform().uniform_scale() - 0.9).abs() < 1e-12);
        assert!(close(c.world_to_screen(pivot), pivot));
        assert!(c.wheel_zoom(pivot, -1.0));
        assert!(c.transform().approx_eq(AffineTransform::IDENTITY, 1e-12));
        assert!(!c.wheel_zoom(pivot, 0.0));
        assert!(!c.wheel_zoom(pivot, f64::NAN));
    }

    #[test]
    fn wheel_is_ignored_during_pinch() {
        let mut c = ViewTransformController::new();
        c.pinch_begin(Point::ZERO);
        assert!(!c.wheel_zoom(Point::ZERO, 1.0));
        c.pinch_end();
        assert!(c.wheel_zoom(Point::ZERO, 1.0));
    }

    #[test]
    fn singular_transform_degrades_to_no_op() {
        let mut c = ViewTransformController::new();
        assert!(c.set_transform(AffineTransform::scale_uniform(0.0)));
        assert!(c.screen_to_world(Point::ZERO).is_none());
        assert!(!c.wheel_zoom(Point::ZERO, 1.0));
        assert!(!c.pinch_begin(Point::ZERO));
        assert!(c.engaged().is_empty());
    }

    #[test]
    fn revision_counts_committed_changes() {
        let mut c = ViewTransformController::new();
        c.pan_change(Vec2::new(1.0, 0.0));
        c.pan_change(Vec2::ZERO);
        c.pan_change(Vec2::new(f64::NAN, 0.0));
        assert_eq!(c.revision(), 1);
        assert_eq!(c.debug_info().revision, 1);
    }
}
