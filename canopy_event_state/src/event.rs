// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Normalized gesture events and the router's outcomes.

use canopy_scene::EntityKey;
use kurbo::{Point, Vec2};

/// The gestures that take part in the race.
///
/// Wheel steps are discrete and never race, so they have no kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureKind {
    /// One-pointer drag: pans the view or drags an entity.
    Pan,
    /// Two-pointer scale about a focal point.
    Pinch,
    /// Two-pointer rotation about an anchor point.
    Rotate,
    /// Press and hold without moving.
    LongPress,
}

impl GestureKind {
    /// Every kind, highest precedence first.
    pub const ALL: [Self; 4] = [Self::Pinch, Self::Rotate, Self::Pan, Self::LongPress];

    /// Race precedence; a higher value preempts a lower one that has not
    /// produced a change yet.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Pinch => 3,
            Self::Rotate => 2,
            Self::Pan => 1,
            Self::LongPress => 0,
        }
    }

    pub(crate) const fn slot(self) -> usize {
        match self {
            Self::Pinch => 0,
            Self::Rotate => 1,
            Self::Pan => 2,
            Self::LongPress => 3,
        }
    }
}

/// One normalized input event, in screen coordinates.
///
/// Pinch `scale` and rotate `angle` are cumulative since the gesture began;
/// pan `delta` is incremental since the previous sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEvent {
    /// A single pointer went down and started moving.
    PanBegin {
        /// Pointer position.
        position: Point,
    },
    /// The pointer moved.
    PanChange {
        /// Pointer position.
        position: Point,
        /// Movement since the previous pan sample.
        delta: Vec2,
    },
    /// The pointer lifted.
    PanEnd,
    /// Two pointers started a pinch.
    PinchBegin {
        /// Midpoint of the two pointers.
        focal: Point,
    },
    /// The pinch span changed.
    PinchChange {
        /// Midpoint of the two pointers.
        focal: Point,
        /// Span ratio since begin.
        scale: f64,
    },
    /// The pinch ended.
    PinchEnd,
    /// Two pointers started a rotation.
    RotateBegin {
        /// Midpoint of the two pointers.
        anchor: Point,
    },
    /// The pointer pair turned.
    RotateChange {
        /// Midpoint of the two pointers.
        anchor: Point,
        /// Radians since begin.
        angle: f64,
    },
    /// The rotation ended.
    RotateEnd,
    /// A press was held long enough to count.
    LongPressBegin {
        /// Press position.
        position: Point,
    },
    /// The long press was released.
    LongPressEnd {
        /// Release position.
        position: Point,
    },
    /// A discrete wheel step.
    Wheel {
        /// Pointer position; the zoom pivot.
        position: Point,
        /// Sign of the vertical wheel delta. Positive zooms out.
        direction: f64,
    },
    /// The platform cancelled a gesture.
    Cancel(GestureKind),
}

impl GestureEvent {
    /// The racing gesture this event belongs to, if any.
    #[must_use]
    pub fn kind(&self) -> Option<GestureKind> {
        match self {
            Self::PanBegin { .. } | Self::PanChange { .. } | Self::PanEnd => Some(GestureKind::Pan),
            Self::PinchBegin { .. } | Self::PinchChange { .. } | Self::PinchEnd => {
                Some(GestureKind::Pinch)
            }
            Self::RotateBegin { .. } | Self::RotateChange { .. } | Self::RotateEnd => {
                Some(GestureKind::Rotate)
            }
            Self::LongPressBegin { .. } | Self::LongPressEnd { .. } => Some(GestureKind::LongPress),
            Self::Cancel(kind) => Some(*kind),
            Self::Wheel { .. } => None,
        }
    }
}

/// Where a gesture is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// Not running.
    #[default]
    Idle,
    /// Accepted, no change delivered yet. May still be preempted.
    Began,
    /// Has produced at least one change. Holds the race until it ends.
    Changed,
    /// Lost the race; its remaining events are dropped until it ends.
    Lost,
}

impl Phase {
    /// True for [`Phase::Began`] and [`Phase::Changed`].
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Began | Self::Changed)
    }
}

/// What handling an event did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Response {
    /// Nothing changed.
    Ignored,
    /// A gesture was accepted into the race.
    Began(GestureKind),
    /// A pan began over an entity; the pan will drag it.
    DragBegan(EntityKey),
    /// The view transform changed.
    ViewChanged,
    /// A dragged entity moved.
    EntityMoved(EntityKey),
    /// The selection changed.
    SelectionChanged,
    /// A gesture ended or was cancelled.
    Ended(GestureKind),
}
