// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless gesture script.
//!
//! Builds the 400-node phyllotaxis scene, fits it into a phone-sized
//! viewport and replays a fixed sequence of wheel, pan, pinch, rotate, drag
//! and long-press gestures, printing what each one did.
//!
//! Run:
//! - `cargo run -p canopy_demos --example gesture_script`
//! - `RUST_LOG=debug cargo run -p canopy_demos --example gesture_script`

use canopy::event_state::touch::{TwoFingerSample, TwoFingerTracker};
use canopy::{GestureEvent, SceneView};
use canopy_demos::{DEFAULT_NODES, fill_color, hex, phyllotaxis_view};
use kurbo::{Point, Size, Vec2};

fn describe(label: &str, view: &SceneView) {
    let t = view.transform();
    let origin = view.world_to_screen(Point::ZERO);
    println!(
        "{label:<28} zoom {:>6.3}  world origin at ({:>7.1}, {:>7.1})  revision {}",
        t.uniform_scale(),
        origin.x,
        origin.y,
        view.controller().revision()
    );
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let viewport = Size::new(390.0, 844.0);
    let center = viewport.to_rect().center();
    let mut view = phyllotaxis_view(DEFAULT_NODES);
    view.layout(viewport);
    describe("initial fit", &view);

    // Two wheel notches in, one out, all about the viewport center.
    for direction in [-1.0, -1.0, 1.0] {
        view.handle(GestureEvent::Wheel {
            position: center,
            direction,
        });
    }
    describe("wheel in, in, out", &view);

    // Pan from an empty corner.
    let corner = Point::new(5.0, 5.0);
    println!("corner hit: {:?}", view.entity_at(corner).map(|e| &e.id));
    view.handle(GestureEvent::PanBegin { position: corner });
    for step in 1..=5 {
        view.handle(GestureEvent::PanChange {
            position: corner + Vec2::new(f64::from(step) * 4.0, f64::from(step) * 8.0),
            delta: Vec2::new(4.0, 8.0),
        });
    }
    view.handle(GestureEvent::PanEnd);
    describe("pan (20, 40)", &view);

    // Spread and twist two fingers around the center.
    let start = TwoFingerSample::new(center - Vec2::new(30.0, 0.0), center + Vec2::new(30.0, 0.0));
    let mut tracker = TwoFingerTracker::new(start);
    let pinned = view.screen_to_world(center);
    view.handle(GestureEvent::PinchBegin {
        focal: start.focal(),
    });
    view.handle(GestureEvent::RotateBegin {
        anchor: start.focal(),
    });
    for step in 1..=10 {
        let half = Vec2::from_angle(f64::from(step) * 0.05) * (30.0 + f64::from(step) * 3.0);
        let update = tracker.update(TwoFingerSample::new(center - half, center + half));
        view.handle(GestureEvent::PinchChange {
            focal: update.focal,
            scale: update.scale,
        });
        view.handle(GestureEvent::RotateChange {
            anchor: update.focal,
            angle: update.rotation,
        });
    }
    view.handle(GestureEvent::PinchEnd);
    view.handle(GestureEvent::RotateEnd);
    describe("pinch x2, rotate 0.5 rad", &view);
    if let Some(pinned) = pinned {
        let drift = (view.world_to_screen(pinned) - center).hypot();
        println!("focal drift after pinch+rotate: {drift:.2e} px");
    }

    // Drag the node nearest the center of the spiral.
    let grab = view.world_to_screen(Point::ZERO);
    let response = view.handle(GestureEvent::PanBegin { position: grab });
    println!("pan begin on node 0: {response:?}");
    for step in 1..=6 {
        let position = grab + Vec2::new(f64::from(step) * 10.0, 0.0);
        view.handle(GestureEvent::PanChange {
            position,
            delta: Vec2::new(10.0, 0.0),
        });
        let under = view.entity_at(position).map(|e| e.id.clone());
        println!("  pointer {position:?} -> under pointer {under:?}");
    }
    if let Some(node) = view.scene().entity("0") {
        println!(
            "node 0 now at ({:.2}, {:.2}), fill {}",
            node.position.x,
            node.position.y,
            hex(fill_color(node))
        );
    }
    println!("pan end: {:?}", view.handle(GestureEvent::PanEnd));

    // Long-press node 1 to select it.
    if let Some(node_1) = view.scene().entity("1").map(|e| e.position) {
        let at = view.world_to_screen(node_1);
        view.handle(GestureEvent::LongPressBegin { position: at });
        println!(
            "long press on node 1: {:?}",
            view.handle(GestureEvent::LongPressEnd { position: at })
        );
    }
    let selected: Vec<_> = view.scene().selected_entities().map(|e| &e.id).collect();
    println!("selected: {selected:?}");

    let damage = view.scene_mut().take_damage();
    println!(
        "damage: {} added, {} moved, selection changed: {}, dirty world bounds {:?}",
        damage.added.len(),
        damage.moved.len(),
        damage.selection_changed,
        damage.union()
    );
    println!("visible nodes: {}", view.visible_entities().len());
    println!(
        "index consistent: {}",
        view.scene().is_index_consistent()
    );
}
