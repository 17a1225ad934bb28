// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use canopy_affine::AffineTransform;
use canopy_event_state::{GestureEvent, GestureRouter, Response, RouterSettings};
use canopy_index::{Backend, QuadTree};
use canopy_scene::{Edge, Entity, EntityKey, Hit, HitParams, HitTester, SceneError, SceneStore};
use canopy_view2d::{ControllerSettings, ViewTransformController};
use kurbo::{Point, Rect, Size};
use log::debug;

/// A scene, the transform it is viewed through, and the gestures driving both.
///
/// `SceneView` owns one of each component and forwards to them; every part
/// stays reachable through accessors for callers that need finer control.
///
/// - [`SceneView::layout`] records the viewport size and, the first time the
///   viewport and the scene are both non-empty, fits the scene into view.
/// - [`SceneView::handle`] runs an input event through the gesture router.
/// - [`SceneView::hit_test`] resolves a screen point to the entity under it.
#[derive(Debug)]
pub struct SceneView<B: Backend<EntityKey> = QuadTree<EntityKey>> {
    controller: ViewTransformController,
    scene: SceneStore<B>,
    hit_tester: HitTester,
    router: GestureRouter,
    viewport: Size,
    laid_out: bool,
}

impl Default for SceneView {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneView {
    /// Creates an empty view over a quadtree-indexed scene.
    #[must_use]
    pub fn new() -> Self {
        Self::with_scene(SceneStore::new())
    }
}

impl<B: Backend<EntityKey>> SceneView<B> {
    /// Creates a view over an existing scene. Nothing is fitted until the
    /// first [`SceneView::layout`].
    #[must_use]
    pub fn with_scene(scene: SceneStore<B>) -> Self {
        Self {
            controller: ViewTransformController::new(),
            scene,
            hit_tester: HitTester::new(),
            router: GestureRouter::new(),
            viewport: Size::ZERO,
            laid_out: false,
        }
    }

    /// Sets the controller settings (wheel step, zoom limits).
    #[must_use]
    pub fn with_controller_settings(mut self, settings: ControllerSettings) -> Self {
        self.controller.set_settings(settings);
        self
    }

    /// Sets the gesture router settings.
    #[must_use]
    pub fn with_router_settings(mut self, settings: RouterSettings) -> Self {
        self.router.set_settings(settings);
        self
    }

    /// Sets the hit-test parameters.
    #[must_use]
    pub fn with_hit_params(mut self, params: HitParams) -> Self {
        self.hit_tester.set_params(params);
        self
    }

    /// The scene.
    #[must_use]
    pub fn scene(&self) -> &SceneStore<B> {
        &self.scene
    }

    /// The scene, mutably.
    pub fn scene_mut(&mut self) -> &mut SceneStore<B> {
        &mut self.scene
    }

    /// The view transform controller.
    #[must_use]
    pub fn controller(&self) -> &ViewTransformController {
        &self.controller
    }

    /// The view transform controller, mutably.
    pub fn controller_mut(&mut self) -> &mut ViewTransformController {
        &mut self.controller
    }

    /// The gesture router.
    #[must_use]
    pub fn router(&self) -> &GestureRouter {
        &self.router
    }

    /// The hit tester.
    #[must_use]
    pub fn hit_tester(&self) -> &HitTester {
        &self.hit_tester
    }

    /// The hit tester, mutably.
    pub fn hit_tester_mut(&mut self) -> &mut HitTester {
        &mut self.hit_tester
    }

    /// The current world-to-screen transform.
    #[must_use]
    pub fn transform(&self) -> AffineTransform {
        self.controller.transform()
    }

    /// The last viewport size passed to [`SceneView::layout`].
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// True once the initial fit has happened.
    #[must_use]
    pub fn is_laid_out(&self) -> bool {
        self.laid_out
    }

    /// Records the viewport size.
    ///
    /// The first call that sees a viewport with positive area and a non-empty
    /// scene fits the scene's bounds (radii included) into the viewport.
    /// Later calls only record the size; user gestures are never overridden.
    /// Returns whether this call performed the fit.
    pub fn layout(&mut self, viewport: Size) -> bool {
        self.viewport = viewport;
        if self.laid_out || !(viewport.width > 0.0 && viewport.height > 0.0) {
            return false;
        }
        let Some(content) = self.scene.content_bounds() else {
            debug!("layout at {viewport:?} with an empty scene; fit deferred");
            return false;
        };
        self.laid_out = true;
        debug!("initial fit of {content:?} into {viewport:?}");
        self.controller.fit_to_content(viewport, Some(content))
    }

    /// Fits the scene into the current viewport again, regardless of earlier layouts.
    pub fn refit(&mut self) -> bool {
        self.router.cancel_all(&mut self.controller, &mut self.scene);
        self.controller
            .fit_to_content(self.viewport, self.scene.content_bounds())
    }

    /// Handles one input event.
    pub fn handle(&mut self, event: GestureEvent) -> Response {
        self.router.handle(
            event,
            &mut self.controller,
            &mut self.scene,
            &self.hit_tester,
        )
    }

    /// Cancels every running gesture.
    pub fn cancel_gestures(&mut self) -> bool {
        self.router.cancel_all(&mut self.controller, &mut self.scene)
    }

    /// The entity under a screen point.
    #[must_use]
    pub fn hit_test(&self, screen: Point) -> Option<Hit> {
        self.hit_tester
            .hit_test(self.controller.transform(), &self.scene, screen)
    }

    /// The entity under a screen point, resolved to its data.
    #[must_use]
    pub fn entity_at(&self, screen: Point) -> Option<&Entity> {
        self.hit_test(screen)
            .and_then(|hit| self.scene.entity_by_key(hit.key))
    }

    /// Maps a screen point to world space, or `None` while the transform is singular.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Option<Point> {
        self.controller.screen_to_world(screen)
    }

    /// Maps a world point to screen space.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        self.controller.world_to_screen(world)
    }

    /// World-space bounding box of the viewport, or `None` while the transform
    /// is singular.
    #[must_use]
    pub fn visible_world_rect(&self) -> Option<Rect> {
        let inverse = self.controller.transform().invert().ok()?;
        Some(
            inverse
                .to_affine()
                .transform_rect_bbox(self.viewport.to_rect()),
        )
    }

    /// Entities whose centers fall within the visible world rectangle,
    /// widened by the largest entity radius so partly visible ones are kept.
    #[must_use]
    pub fn visible_entities(&self) -> Vec<EntityKey> {
        let Some(rect) = self.visible_world_rect() else {
            return Vec::new();
        };
        self.scene
            .entities_in_rect(rect.inflate(self.scene.max_radius(), self.scene.max_radius()))
    }

    /// Pans so that `world` appears at the center of the viewport.
    pub fn center_on(&mut self, world: Point) -> bool {
        let center = self.viewport.to_rect().center();
        let delta = center - self.controller.world_to_screen(world);
        self.controller
            .set_transform(self.controller.transform().then_translate(delta))
    }

    /// Replaces the scene contents, cancelling running gestures first.
    ///
    /// # Errors
    ///
    /// See [`SceneStore::replace_all`]. On error the scene is unchanged.
    pub fn replace_scene<E, G>(&mut self, entities: E, edges: G) -> Result<(), SceneError>
    where
        E: IntoIterator<Item = Entity>,
        G: IntoIterator<Item = Edge>,
    {
        self.router.cancel_all(&mut self.controller, &mut self.scene);
        self.scene.replace_all(entities, edges)
    }
}
