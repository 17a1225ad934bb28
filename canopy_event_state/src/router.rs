// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The gesture router: arbitrates the gesture race and turns events into
//! view commands, entity drags and selection changes.
//!
//! ## Race policy
//!
//! Each [`GestureKind`] runs its own `Idle → Began → Changed → Idle` state
//! machine (long-press skips `Changed`). Precedence is
//! pinch > rotate > pan > long-press:
//!
//! - A begin preempts every lower-precedence gesture that is still in
//!   [`Phase::Began`]; the preempted gesture gets an end-equivalent.
//! - A begin loses if any other gesture has already changed, or if a
//!   higher-precedence one has begun. A losing gesture sits in
//!   [`Phase::Lost`] and its events are dropped until its end or cancel.
//! - With [`RouterSettings::simultaneous_pinch_rotate`], pinch and rotate do
//!   not race each other; they share one controller session.
//!
//! Wheel steps do not take part in the race.
//!
//! ## Drags
//!
//! Whether a pan drags an entity or pans the view is decided once, at
//! [`GestureEvent::PanBegin`], by hit-testing the begin position. A drag keeps
//! the grab offset so the entity does not jump under the pointer.

use canopy_index::Backend;
use canopy_scene::{EntityKey, HitTester, SceneStore};
use canopy_view2d::{TransformCommand, ViewTransformController};
use kurbo::Point;
use log::{debug, trace};

use crate::drag::DragSession;
use crate::event::{GestureEvent, GestureKind, Phase, Response};

/// Behavior switches for [`GestureRouter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouterSettings {
    /// Let pinch and rotate run together instead of racing.
    pub simultaneous_pinch_rotate: bool,
    /// Add a dragged entity to the selection when its drag begins.
    pub select_on_drag: bool,
    /// Clear the selection when a pan or drag ends normally.
    pub clear_selection_on_pan_end: bool,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            simultaneous_pinch_rotate: true,
            select_on_drag: true,
            clear_selection_on_pan_end: true,
        }
    }
}

/// Routes [`GestureEvent`]s to a [`ViewTransformController`] and a [`SceneStore`].
///
/// The router holds no reference to either; both are passed to
/// [`GestureRouter::handle`], so the caller stays free to read or edit them
/// between events.
#[derive(Clone, Debug, Default)]
pub struct GestureRouter {
    settings: RouterSettings,
    phases: [Phase; 4],
    drag: Option<DragSession>,
}

impl GestureRouter {
    /// Creates an idle router with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an idle router with explicit settings.
    #[must_use]
    pub fn with_settings(settings: RouterSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// The active settings.
    #[must_use]
    pub fn settings(&self) -> RouterSettings {
        self.settings
    }

    /// Replaces the settings. Running gestures keep going.
    pub fn set_settings(&mut self, settings: RouterSettings) {
        self.settings = settings;
    }

    /// Current phase of `kind`.
    #[must_use]
    pub fn phase(&self, kind: GestureKind) -> Phase {
        self.phases[kind.slot()]
    }

    /// Gestures currently in `Began` or `Changed`, highest precedence first.
    pub fn active(&self) -> impl Iterator<Item = GestureKind> + '_ {
        GestureKind::ALL
            .into_iter()
            .filter(|kind| self.phase(*kind).is_active())
    }

    /// True if no gesture is running or waiting for its end.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.phases.iter().all(|p| *p == Phase::Idle)
    }

    /// The entity drag in progress, if any.
    #[must_use]
    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    /// Handles one event.
    pub fn handle<B: Backend<EntityKey>>(
        &mut self,
        event: GestureEvent,
        view: &mut ViewTransformController,
        scene: &mut SceneStore<B>,
        hit: &HitTester,
    ) -> Response {
        match event {
            GestureEvent::PanBegin { position } => self.pan_begin(position, view, scene, hit),
            GestureEvent::PanChange { position, delta } => {
                if !self.change(GestureKind::Pan) {
                    return Response::Ignored;
                }
                if let Some(drag) = self.drag.as_mut() {
                    drag.update(position);
                    let drag = *drag;
                    return self.drag_to(drag, position, view, scene);
                }
                trace!("pan {delta:?}");
                changed(view.apply(TransformCommand::Pan(delta)))
            }
            GestureEvent::PanEnd => self.finish(GestureKind::Pan, true, view, scene),
            GestureEvent::PinchBegin { focal } => {
                if !self.admit(GestureKind::Pinch, view, scene) {
                    return Response::Ignored;
                }
                self.engage(
                    GestureKind::Pinch,
                    view.apply(TransformCommand::PinchBegin { focal }),
                )
            }
            GestureEvent::PinchChange { focal, scale } => {
                if !self.change(GestureKind::Pinch) {
                    return Response::Ignored;
                }
                changed(view.apply(TransformCommand::Pinch { focal, scale }))
            }
            GestureEvent::PinchEnd => self.finish(GestureKind::Pinch, true, view, scene),
            GestureEvent::RotateBegin { anchor } => {
                if !self.admit(GestureKind::Rotate, view, scene) {
                    return Response::Ignored;
                }
                self.engage(
                    GestureKind::Rotate,
                    view.apply(TransformCommand::RotateBegin { anchor }),
                )
            }
            GestureEvent::RotateChange { anchor, angle } => {
                if !self.change(GestureKind::Rotate) {
                    return Response::Ignored;
                }
                changed(view.apply(TransformCommand::Rotate { anchor, angle }))
            }
            GestureEvent::RotateEnd => self.finish(GestureKind::Rotate, true, view, scene),
            GestureEvent::LongPressBegin { .. } => {
                if self.admit(GestureKind::LongPress, view, scene) {
                    Response::Began(GestureKind::LongPress)
                } else {
                    Response::Ignored
                }
            }
            GestureEvent::LongPressEnd { position } => {
                self.long_press_end(position, view, scene, hit)
            }
            GestureEvent::Wheel {
                position,
                direction,
            } => changed(view.apply(TransformCommand::Wheel {
                pivot: position,
                direction,
            })),
            GestureEvent::Cancel(kind) => {
                debug!("{kind:?} cancelled");
                self.finish(kind, false, view, scene)
            }
        }
    }

    /// Cancels every running gesture, releasing drags and controller sessions.
    ///
    /// Returns whether anything was running.
    pub fn cancel_all<B: Backend<EntityKey>>(
        &mut self,
        view: &mut ViewTransformController,
        scene: &mut SceneStore<B>,
    ) -> bool {
        let was_idle = self.is_idle();
        for kind in GestureKind::ALL {
            self.finish(kind, false, view, scene);
        }
        !was_idle
    }

    fn set_phase(&mut self, kind: GestureKind, phase: Phase) {
        self.phases[kind.slot()] = phase;
    }

    fn coexists(&self, a: GestureKind, b: GestureKind) -> bool {
        self.settings.simultaneous_pinch_rotate
            && matches!(
                (a, b),
                (GestureKind::Pinch, GestureKind::Rotate) | (GestureKind::Rotate, GestureKind::Pinch)
            )
    }

    /// Runs the race for a begin of `kind`. Returns whether `kind` won.
    fn admit<B: Backend<EntityKey>>(
        &mut self,
        kind: GestureKind,
        view: &mut ViewTransformController,
        scene: &mut SceneStore<B>,
    ) -> bool {
        if self.phase(kind) != Phase::Idle {
            debug!("{kind:?} began again without ending; restarting it");
            self.finish(kind, false, view, scene);
        }

        let mut preempt = [false; 4];
        for other in GestureKind::ALL {
            let phase = self.phase(other);
            if other == kind || !phase.is_active() || self.coexists(kind, other) {
                continue;
            }
            if phase == Phase::Began && kind.precedence() > other.precedence() {
                preempt[other.slot()] = true;
            } else {
                debug!("{kind:?} lost the race to {other:?} ({phase:?})");
                self.set_phase(kind, Phase::Lost);
                return false;
            }
        }

        for other in GestureKind::ALL {
            if preempt[other.slot()] {
                debug!("{kind:?} preempts {other:?}");
                self.finish(other, false, view, scene);
            }
        }
        debug!("{kind:?} began");
        self.set_phase(kind, Phase::Began);
        true
    }

    /// Records a controller begin. A refused begin (singular transform) turns
    /// the gesture into a loser so its changes are dropped.
    fn engage(&mut self, kind: GestureKind, accepted: bool) -> Response {
        if accepted {
            Response::Began(kind)
        } else {
            debug!("{kind:?} refused by the controller");
            self.set_phase(kind, Phase::Lost);
            Response::Ignored
        }
    }

    /// Moves `kind` to `Changed` if it is running. Returns whether it is.
    fn change(&mut self, kind: GestureKind) -> bool {
        if self.phase(kind).is_active() {
            self.set_phase(kind, Phase::Changed);
            true
        } else {
            trace!("{kind:?} sample dropped ({:?})", self.phase(kind));
            false
        }
    }

    fn pan_begin<B: Backend<EntityKey>>(
        &mut self,
        position: Point,
        view: &mut ViewTransformController,
        scene: &mut SceneStore<B>,
        hit: &HitTester,
    ) -> Response {
        if !self.admit(GestureKind::Pan, view, scene) {
            return Response::Ignored;
        }
        let grabbed = hit
            .hit_test(view.transform(), scene, position)
            .and_then(|h| Some((h, scene.entity_by_key(h.key)?.position)));
        let Some((grabbed, center)) = grabbed else {
            view.pan_begin();
            return Response::Began(GestureKind::Pan);
        };

        debug!("drag of {:?} began at {position:?}", grabbed.key);
        self.drag = Some(DragSession::start(grabbed.key, center, grabbed.world, position));
        if self.settings.select_on_drag {
            scene.select_key(grabbed.key);
        }
        Response::DragBegan(grabbed.key)
    }

    fn drag_to<B: Backend<EntityKey>>(
        &mut self,
        drag: DragSession,
        position: Point,
        view: &ViewTransformController,
        scene: &mut SceneStore<B>,
    ) -> Response {
        if scene.entity_by_key(drag.key).is_none() {
            debug!("dragged entity {:?} is gone; drag released", drag.key);
            self.drag = None;
            return Response::Ignored;
        }
        let Some(pointer) = view.screen_to_world(position) else {
            return Response::Ignored;
        };
        let target = drag.target(pointer);
        trace!("drag {:?} to {target:?}", drag.key);
        if scene.move_by_key(drag.key, target) {
            Response::EntityMoved(drag.key)
        } else {
            Response::Ignored
        }
    }

    fn long_press_end<B: Backend<EntityKey>>(
        &mut self,
        position: Point,
        view: &ViewTransformController,
        scene: &mut SceneStore<B>,
        hit: &HitTester,
    ) -> Response {
        let phase = self.phase(GestureKind::LongPress);
        self.set_phase(GestureKind::LongPress, Phase::Idle);
        if !phase.is_active() {
            return Response::Ignored;
        }
        debug!("long press ended at {position:?}");
        let selection_changed = match hit.hit_test(view.transform(), scene, position) {
            Some(h) => scene.toggle_key(h.key),
            None => scene.clear_selection(),
        };
        if selection_changed {
            Response::SelectionChanged
        } else {
            Response::Ended(GestureKind::LongPress)
        }
    }

    /// Ends `kind`. `completed` is false for cancellation and preemption, which
    /// release state but skip end-of-gesture selection effects.
    fn finish<B: Backend<EntityKey>>(
        &mut self,
        kind: GestureKind,
        completed: bool,
        view: &mut ViewTransformController,
        scene: &mut SceneStore<B>,
    ) -> Response {
        let phase = self.phase(kind);
        self.set_phase(kind, Phase::Idle);
        if !phase.is_active() {
            return Response::Ignored;
        }
        match kind {
            GestureKind::Pan => {
                match self.drag.take() {
                    Some(drag) => debug!("drag of {:?} ended", drag.key),
                    None => view.pan_end(),
                }
                if completed && self.settings.clear_selection_on_pan_end && scene.clear_selection()
                {
                    return Response::SelectionChanged;
                }
            }
            GestureKind::Pinch => {
                view.apply(TransformCommand::PinchEnd);
            }
            GestureKind::Rotate => {
                view.apply(TransformCommand::RotateEnd);
            }
            GestureKind::LongPress => debug!("long press released"),
        }
        Response::Ended(kind)
    }
}

fn changed(view_changed: bool) -> Response {
    if view_changed {
        Response::ViewChanged
    } else {
        Response::Ignored
    }
}

#[cfg(test)]
mod tests {
    use canopy_scene::{Entity, HitTester, SceneStore};
    use canopy_view2d::{AffineTransform, TransformGestures, ViewTransformController};
    use kurbo::{Point, Vec2};

    use super::{GestureRouter, RouterSettings};
    use crate::event::{GestureEvent, GestureKind, Phase, Response};

    struct Rig {
        router: GestureRouter,
        view: ViewTransformController,
        scene: SceneStore,
        hit: HitTester,
    }

    impl Rig {
        fn new() -> Self {
            Self::with_settings(RouterSettings::default())
        }

        fn with_settings(settings: RouterSettings) -> Self {
            let mut scene = SceneStore::new();
            scene
                .add_entity(Entity::new("a", (10.0, 10.0), 5.0))
                .unwrap();
            scene
                .add_entity(Entity::new("b", (100.0, 100.0), 5.0))
                .unwrap();
            Self {
                router: GestureRouter::with_settings(settings),
                view: ViewTransformController::new(),
                scene,
                hit: HitTester::new(),
            }
        }

        fn send(&mut self, event: GestureEvent) -> Response {
            self.router
                .handle(event, &mut self.view, &mut self.scene, &self.hit)
        }

        fn pan_change(&mut self, x: f64, y: f64, dx: f64, dy: f64) -> Response {
            self.send(GestureEvent::PanChange {
                position: Point::new(x, y),
                delta: Vec2::new(dx, dy),
            })
        }
    }

    #[test]
    fn pan_over_empty_space_moves_the_view() {
        let mut rig = Rig::new();
        let begin = rig.send(GestureEvent::PanBegin {
            position: Point::new(50.0, 50.0),
        });
        assert_eq!(begin, Response::Began(GestureKind::Pan));
        assert_eq!(rig.pan_change(60.0, 55.0, 10.0, 5.0), Response::ViewChanged);
        assert_eq!(rig.pan_change(70.0, 60.0, 10.0, 5.0), Response::ViewChanged);
        assert_eq!(
            rig.view.world_to_screen(Point::ZERO),
            Point::new(20.0, 10.0)
        );
        assert_eq!(rig.send(GestureEvent::PanEnd), Response::Ended(GestureKind::Pan));
        assert!(rig.router.is_idle());
    }

    #[test]
    fn pan_over_an_entity_drags_it_keeping_the_grab_offset() {
        let mut rig = Rig::new();
        let a = rig.scene.key("a").unwrap();
        let begin = rig.send(GestureEvent::PanBegin {
            position: Point::new(12.0, 10.0),
        });
        assert_eq!(begin, Response::DragBegan(a));
        assert!(rig.scene.is_selected("a"));

        assert_eq!(rig.pan_change(52.0, 10.0, 40.0, 0.0), Response::EntityMoved(a));
        assert_eq!(rig.scene.entity("a").unwrap().position, Point::new(50.0, 10.0));
        assert_eq!(rig.view.revision(), 0, "a drag never moves the view");

        // The entity is findable at its new place right away.
        let hit = rig.hit.hit_test_world(&rig.scene, Point::new(50.0, 10.0));
        assert_eq!(hit.map(|h| h.key), Some(a));
    }

    #[test]
    fn drag_or_pan_is_decided_at_begin() {
        let mut rig = Rig::new();
        rig.send(GestureEvent::PanBegin {
            position: Point::new(-40.0, 10.0),
        });
        // Sweeping over "a" keeps panning the view.
        assert_eq!(rig.pan_change(10.0, 10.0, 50.0, 0.0), Response::ViewChanged);
        assert_eq!(rig.scene.entity("a").unwrap().position, Point::new(10.0, 10.0));
        assert!(rig.router.drag().is_none());
    }

    #[test]
    fn drag_follows_the_pointer_through_a_zoomed_view() {
        let mut rig = Rig::new();
        rig.view.set_transform(AffineTransform::scale_uniform(2.0));
        let a = rig.scene.key("a").unwrap();
        // "a" is drawn at (20, 20) on screen.
        assert_eq!(
            rig.send(GestureEvent::PanBegin {
                position: Point::new(20.0, 20.0)
            }),
            Response::DragBegan(a)
        );
        rig.pan_change(40.0, 20.0, 20.0, 0.0);
        assert_eq!(rig.scene.entity("a").unwrap().position, Point::new(20.0, 10.0));
    }

    #[test]
    fn dragging_a_selected_entity_keeps_it_selected() {
        let mut rig = Rig::new();
        rig.scene.select_many(["a", "b"]);
        let revision = rig.scene.selection().revision();
        let a = rig.scene.key("a").unwrap();
        assert_eq!(
            rig.send(GestureEvent::PanBegin {
                position: Point::new(10.0, 10.0)
            }),
            Response::DragBegan(a)
        );
        assert!(rig.scene.is_selected("a"));
        assert!(rig.scene.is_selected("b"));
        assert_eq!(rig.scene.selection().revision(), revision);
    }

    #[test]
    fn pan_end_clears_the_selection() {
        let mut rig = Rig::new();
        rig.send(GestureEvent::PanBegin {
            position: Point::new(10.0, 10.0),
        });
        rig.pan_change(20.0, 10.0, 10.0, 0.0);
        assert_eq!(rig.send(GestureEvent::PanEnd), Response::SelectionChanged);
        assert!(rig.scene.selection().is_empty());
        assert!(rig.router.drag().is_none());
    }

    #[test]
    fn selection_effects_can_be_switched_off() {
        let mut rig = Rig::with_settings(RouterSettings {
            select_on_drag: false,
            clear_selection_on_pan_end: false,
            ..RouterSettings::default()
        });
        rig.scene.select_one("b");
        rig.send(GestureEvent::PanBegin {
            position: Point::new(10.0, 10.0),
        });
        assert!(!rig.scene.is_selected("a"));
        assert_eq!(rig.send(GestureEvent::PanEnd), Response::Ended(GestureKind::Pan));
        assert!(rig.scene.is_selected("b"));
    }

    #[test]
    fn pinch_preempts_a_pan_that_has_not_moved() {
        let mut rig = Rig::new();
        rig.send(GestureEvent::PanBegin {
            position: Point::new(10.0, 10.0),
        });
        assert!(rig.router.drag().is_some());
        let begin = rig.send(GestureEvent::PinchBegin {
            focal: Point::new(50.0, 50.0),
        });
        assert_eq!(begin, Response::Began(GestureKind::Pinch));
        assert_eq!(rig.router.phase(GestureKind::Pan), Phase::Idle);
        assert!(rig.router.drag().is_none(), "preemption releases the drag");
        assert!(rig.scene.is_selected("a"), "preemption is not a completed pan");
        assert_eq!(rig.pan_change(30.0, 10.0, 20.0, 0.0), Response::Ignored);
        assert_eq!(rig.scene.entity("a").unwrap().position, Point::new(10.0, 10.0));
    }

    #[test]
    fn a_changed_pan_holds_the_race() {
        let mut rig = Rig::new();
        rig.send(GestureEvent::PanBegin {
            position: Point::new(50.0, 50.0),
        });
        rig.pan_change(51.0, 50.0, 1.0, 0.0);
        let before = rig.view.transform();

        assert_eq!(
            rig.send(GestureEvent::PinchBegin {
                focal: Point::new(50.0, 50.0)
            }),
            Response::Ignored
        );
        assert_eq!(rig.router.phase(GestureKind::Pinch), Phase::Lost);
        assert_eq!(
            rig.send(GestureEvent::PinchChange {
                focal: Point::new(50.0, 50.0),
                scale: 3.0
            }),
            Response::Ignored
        );
        assert_eq!(rig.view.transform(), before);
        assert_eq!(rig.send(GestureEvent::PinchEnd), Response::Ignored);
        assert_eq!(rig.router.phase(GestureKind::Pinch), Phase::Idle);
        assert_eq!(rig.pan_change(52.0, 50.0, 1.0, 0.0), Response::ViewChanged);
    }

    #[test]
    fn lower_precedence_begin_loses_to_a_fresh_higher_one() {
        let mut rig = Rig::new();
        rig.send(GestureEvent::PinchBegin {
            focal: Point::new(50.0, 50.0),
        });
        assert_eq!(
            rig.send(GestureEvent::PanBegin {
                position: Point::new(50.0, 50.0)
            }),
            Response::Ignored
        );
        assert_eq!(rig.router.phase(GestureKind::Pan), Phase::Lost);
        assert_eq!(rig.router.phase(GestureKind::Pinch), Phase::Began);
    }

    #[test]
    fn pinch_and_rotate_run_together_by_default() {
        let mut rig = Rig::new();
        let focal = Point::new(50.0, 50.0);
        rig.send(GestureEvent::PinchBegin { focal });
        assert_eq!(
            rig.send(GestureEvent::RotateBegin { anchor: focal }),
            Response::Began(GestureKind::Rotate)
        );
        assert_eq!(
            rig.view.engaged(),
            TransformGestures::PINCH | TransformGestures::ROTATE
        );
        rig.send(GestureEvent::PinchChange { focal, scale: 2.0 });
        rig.send(GestureEvent::RotateChange {
            anchor: focal,
            angle: 0.5,
        });
        assert!((rig.view.transform().uniform_scale() - 2.0).abs() < 1e-9);
        let pivot = rig.view.world_to_screen(focal);
        assert!((pivot - focal).hypot() < 1e-9);
        assert_eq!(rig.router.active().count(), 2);
    }

    #[test]
    fn without_simultaneity_pinch_and_rotate_race() {
        let mut rig = Rig::with_settings(RouterSettings {
            simultaneous_pinch_rotate: false,
            ..RouterSettings::default()
        });
        let focal = Point::new(50.0, 50.0);
        rig.send(GestureEvent::RotateBegin { anchor: focal });
        assert_eq!(
            rig.send(GestureEvent::PinchBegin { focal }),
            Response::Began(GestureKind::Pinch)
        );
        assert_eq!(rig.router.phase(GestureKind::Rotate), Phase::Idle);
        assert_eq!(rig.view.engaged(), TransformGestures::PINCH);

        assert_eq!(
            rig.send(GestureEvent::RotateBegin { anchor: focal }),
            Response::Ignored
        );
        assert_eq!(rig.router.phase(GestureKind::Rotate), Phase::Lost);
    }

    #[test]
    fn pinch_scenario_through_the_router() {
        let mut rig = Rig::new();
        let focal = Point::new(50.0, 50.0);
        rig.send(GestureEvent::PinchBegin { focal });
        for scale in [1.25, 1.5, 2.0] {
            assert_eq!(
                rig.send(GestureEvent::PinchChange { focal, scale }),
                Response::ViewChanged
            );
        }
        assert_eq!(rig.send(GestureEvent::PinchEnd), Response::Ended(GestureKind::Pinch));
        let t = rig.view.transform();
        assert!((t.apply(focal) - focal).hypot() < 1e-9);
        assert!((t.apply(Point::ZERO) - Point::new(-50.0, -50.0)).hypot() < 1e-9);
        assert!(rig.view.engaged().is_empty());
    }

    #[test]
    fn cancel_releases_the_drag() {
        let mut rig = Rig::new();
        rig.send(GestureEvent::PanBegin {
            position: Point::new(10.0, 10.0),
        });
        rig.pan_change(15.0, 10.0, 5.0, 0.0);
        assert_eq!(
            rig.send(GestureEvent::Cancel(GestureKind::Pan)),
            Response::Ended(GestureKind::Pan)
        );
        assert!(rig.router.drag().is_none());
        assert!(rig.router.is_idle());
        assert_eq!(rig.pan_change(30.0, 10.0, 15.0, 0.0), Response::Ignored);
        assert_eq!(rig.scene.entity("a").unwrap().position, Point::new(15.0, 10.0));
    }

    #[test]
    fn cancel_ends_the_controller_session() {
        let mut rig = Rig::new();
        rig.send(GestureEvent::PinchBegin {
            focal: Point::ZERO,
        });
        rig.send(GestureEvent::Cancel(GestureKind::Pinch));
        assert!(rig.view.engaged().is_empty());
        assert_eq!(
            rig.send(GestureEvent::Cancel(GestureKind::Pinch)),
            Response::Ignored
        );
    }

    #[test]
    fn long_press_toggles_the_entity_under_it() {
        let mut rig = Rig::new();
        let at = Point::new(100.0, 100.0);
        rig.send(GestureEvent::LongPressBegin { position: at });
        assert_eq!(
            rig.send(GestureEvent::LongPressEnd { position: at }),
            Response::SelectionChanged
        );
        assert!(rig.scene.is_selected("b"));

        rig.send(GestureEvent::LongPressBegin { position: at });
        rig.send(GestureEvent::LongPressEnd { position: at });
        assert!(!rig.scene.is_selected("b"));
    }

    #[test]
    fn long_press_on_empty_space_clears_the_selection() {
        let mut rig = Rig::new();
        rig.scene.select_one("a");
        let at = Point::new(300.0, 300.0);
        rig.send(GestureEvent::LongPressBegin { position: at });
        assert_eq!(
            rig.send(GestureEvent::LongPressEnd { position: at }),
            Response::SelectionChanged
        );
        assert!(rig.scene.selection().is_empty());

        rig.send(GestureEvent::LongPressBegin { position: at });
        assert_eq!(
            rig.send(GestureEvent::LongPressEnd { position: at }),
            Response::Ended(GestureKind::LongPress)
        );
    }

    #[test]
    fn pan_preempts_a_pending_long_press() {
        let mut rig = Rig::new();
        let at = Point::new(100.0, 100.0);
        rig.send(GestureEvent::LongPressBegin { position: at });
        rig.send(GestureEvent::PanBegin {
            position: Point::new(300.0, 300.0),
        });
        assert_eq!(
            rig.send(GestureEvent::LongPressEnd { position: at }),
            Response::Ignored
        );
        assert!(!rig.scene.is_selected("b"));
    }

    #[test]
    fn wheel_zooms_about_the_pointer_but_not_during_a_pinch() {
        let mut rig = Rig::new();
        let at = Point::new(100.0, 100.0);
        assert_eq!(
            rig.send(GestureEvent::Wheel {
                position: at,
                direction: 1.0
            }),
            Response::ViewChanged
        );
        assert!((rig.view.transform().uniform_scale() - 0.9).abs() < 1e-12);
        assert!((rig.view.world_to_screen(at) - at).hypot() < 1e-9);

        rig.send(GestureEvent::PinchBegin { focal: at });
        assert_eq!(
            rig.send(GestureEvent::Wheel {
                position: at,
                direction: -1.0
            }),
            Response::Ignored
        );
    }

    #[test]
    fn begin_without_end_restarts_the_gesture() {
        let mut rig = Rig::new();
        rig.send(GestureEvent::PanBegin {
            position: Point::new(10.0, 10.0),
        });
        rig.pan_change(12.0, 10.0, 2.0, 0.0);
        let again = rig.send(GestureEvent::PanBegin {
            position: Point::new(300.0, 300.0),
        });
        assert_eq!(again, Response::Began(GestureKind::Pan));
        assert!(rig.router.drag().is_none());
    }

    #[test]
    fn a_singular_view_refuses_pinches() {
        let mut rig = Rig::new();
        rig.view.set_transform(AffineTransform::scale_uniform(0.0));
        assert_eq!(
            rig.send(GestureEvent::PinchBegin {
                focal: Point::ZERO
            }),
            Response::Ignored
        );
        assert_eq!(rig.router.phase(GestureKind::Pinch), Phase::Lost);
        assert_eq!(rig.send(GestureEvent::PinchEnd), Response::Ignored);
        assert!(rig.router.is_idle());
    }

    #[test]
    fn cancel_all_resets_everything() {
        let mut rig = Rig::new();
        let focal = Point::new(50.0, 50.0);
        rig.send(GestureEvent::PinchBegin { focal });
        rig.send(GestureEvent::RotateBegin { anchor: focal });
        assert!(rig
            .router
            .cancel_all(&mut rig.view, &mut rig.scene));
        assert!(rig.router.is_idle());
        assert!(rig.view.engaged().is_empty());
        assert!(!rig.router.cancel_all(&mut rig.view, &mut rig.scene));
    }
}
