// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `understory_viewport` crate.
//!
//! These exercise conversions over a spread of pseudo-random viewport states,
//! plus the notification, laziness and copy contracts of `Viewport`.

use std::sync::{Arc, Mutex};

use kurbo::{Point, Rect};
use understory_viewport::{Viewport, ViewportProperty};

const TOLERANCE: f64 = 1e-6;

struct Lcg(u64);

impl Lcg {
    fn next_f64(&mut self) -> f64 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 11) as f64 / (1_u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

fn assert_close(a: Point, b: Point, what: &str) {
    let scale = 1.0_f64.max(b.x.abs()).max(b.y.abs());
    assert!(
        (a - b).hypot() <= TOLERANCE * scale,
        "{what}: {a:?} != {b:?}"
    );
}

fn random_viewport(rng: &mut Lcg, rotated: bool) -> Viewport {
    let mut vp = Viewport::new();
    vp.set_center_xy(rng.range(-1e5, 1e5), rng.range(-1e5, 1e5));
    vp.set_resolution(rng.range(0.01, 500.0));
    vp.set_size(rng.range(1.0, 2000.0), rng.range(1.0, 2000.0));
    if rotated {
        vp.set_rotation(rng.range(-720.0, 720.0));
    }
    vp
}

fn recorder(vp: &mut Viewport) -> Arc<Mutex<Vec<ViewportProperty>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    vp.subscribe(move |p| sink.lock().unwrap().push(p));
    seen
}

#[test]
fn unrotated_round_trip() {
    let mut rng = Lcg(1);
    for _ in 0..200 {
        let vp = random_viewport(&mut rng, false);
        let screen = Point::new(rng.range(-500.0, 2500.0), rng.range(-500.0, 2500.0));
        let back = vp.world_to_screen_unrotated(vp.screen_to_world(screen));
        assert_close(back, screen, "screen -> world -> screen");

        let world = vp.screen_to_world(Point::new(rng.range(0.0, 100.0), rng.range(0.0, 100.0)));
        let again = vp.screen_to_world(vp.world_to_screen_unrotated(world));
        assert_close(again, world, "world -> screen -> world");
    }
}

#[test]
fn rotated_round_trip() {
    let mut rng = Lcg(7);
    for _ in 0..200 {
        let vp = random_viewport(&mut rng, true);
        let screen = Point::new(rng.range(-500.0, 2500.0), rng.range(-500.0, 2500.0));
        let back = vp.world_to_screen(vp.screen_to_world(screen));
        assert_close(back, screen, "rotated screen -> world -> screen");
    }
}

#[test]
fn rotation_is_normalized_on_assignment() {
    let mut vp = Viewport::new();
    vp.set_rotation(370.0);
    assert!((vp.rotation() - 10.0).abs() < 1e-12);
    vp.set_rotation(-30.0);
    assert!((vp.rotation() - 330.0).abs() < 1e-12);
    vp.set_rotation(360.0);
    assert_eq!(vp.rotation(), 0.0);
    assert!(!vp.is_rotated());
    vp.set_rotation(f64::NAN);
    assert!(!vp.is_rotated());
}

#[test]
fn rotated_near_full_turn_counts_as_unrotated() {
    let mut vp = Viewport::new();
    vp.set_rotation(359.999);
    vp.set_rotation_epsilon(0.01);
    assert!(!vp.is_rotated());
    vp.set_rotation(0.5);
    assert!(vp.is_rotated());
}

#[test]
fn extent_unrotated_and_rotated() {
    let mut vp = Viewport::new();
    vp.set_center_xy(0.0, 0.0);
    vp.set_size(100.0, 50.0);
    vp.set_resolution(2.0);
    let flat = vp.extent();
    assert_eq!(flat, Rect::new(-100.0, -50.0, 100.0, 50.0));

    vp.set_rotation(90.0);
    let turned = vp.extent();
    assert_eq!(turned, vp.window_extent().bounding_box());
    assert!(turned.area() >= flat.area() - TOLERANCE);
    assert_close(turned.origin(), Point::new(-50.0, -100.0), "rotated min");
}

#[test]
fn square_window_keeps_area_at_quarter_turns() {
    let mut vp = Viewport::new();
    vp.set_size(64.0, 64.0);
    vp.set_resolution(1.0);
    let flat = vp.extent().area();
    for r in [90.0, 180.0, 270.0] {
        vp.set_rotation(r);
        assert!((vp.extent().area() - flat).abs() < 1e-6);
    }
    vp.set_rotation(45.0);
    assert!(vp.extent().area() > flat);
}

#[test]
fn center_edit_notifies_like_setter() {
    let mut vp = Viewport::new();
    let _ = vp.extent();
    let seen = recorder(&mut vp);

    vp.center_mut().x = 42.0;
    assert!(vp.is_modified());
    assert_eq!(*seen.lock().unwrap(), [ViewportProperty::Center]);

    let _ = vp.extent();
    vp.set_center(Point::new(1.0, 2.0));
    assert!(vp.is_modified());
    assert_eq!(
        *seen.lock().unwrap(),
        [ViewportProperty::Center, ViewportProperty::Center]
    );
}

#[test]
fn pan_moves_previous_world_point_under_current() {
    let mut rng = Lcg(11);
    for rotated in [false, true] {
        for _ in 0..50 {
            let mut vp = random_viewport(&mut rng, rotated);
            let previous = Point::new(rng.range(0.0, 800.0), rng.range(0.0, 600.0));
            let current = Point::new(rng.range(0.0, 800.0), rng.range(0.0, 600.0));
            let grabbed = vp.screen_to_world(previous);
            vp.transform(current, previous, 1.0);
            assert_close(vp.screen_to_world(current), grabbed, "pan anchor");
        }
    }
}

#[test]
fn pinch_keeps_touch_point_fixed() {
    let mut rng = Lcg(23);
    for rotated in [false, true] {
        for _ in 0..50 {
            let mut vp = random_viewport(&mut rng, rotated);
            let touch = Point::new(rng.range(0.0, 800.0), rng.range(0.0, 600.0));
            let scale = rng.range(0.25, 4.0);
            let before = vp.screen_to_world(touch);
            let resolution = vp.resolution();
            vp.transform(touch, touch, scale);
            assert!((vp.resolution() - resolution / scale).abs() < 1e-9 * resolution);
            assert_close(vp.screen_to_world(touch), before, "pinch anchor");
        }
    }
}

#[test]
fn pinch_with_drag_tracks_previous_point() {
    let mut vp = Viewport::new();
    vp.set_size(800.0, 600.0);
    vp.set_resolution(3.0);
    vp.set_rotation(15.0);
    let previous = Point::new(100.0, 200.0);
    let current = Point::new(140.0, 260.0);
    let grabbed = vp.screen_to_world(previous);
    vp.transform(current, previous, 1.5);
    assert_close(vp.screen_to_world(current), grabbed, "pinch + drag anchor");
}

#[test]
fn gesture_emits_one_notification() {
    let mut vp = Viewport::new();
    vp.set_size(800.0, 600.0);
    vp.set_resolution(1.0);
    let seen = recorder(&mut vp);

    vp.transform(Point::new(10.0, 10.0), Point::new(0.0, 0.0), 1.0);
    vp.transform(Point::new(10.0, 10.0), Point::new(0.0, 0.0), 2.0);
    assert_eq!(
        *seen.lock().unwrap(),
        [ViewportProperty::Center, ViewportProperty::Resolution]
    );
}

#[test]
fn pan_gesture_notifies_center_only() {
    let mut vp = Viewport::new();
    vp.set_size(800.0, 600.0);
    vp.set_resolution(1.0);
    let _ = vp.take_changes();
    let seen = recorder(&mut vp);

    vp.transform(Point::new(10.0, 10.0), Point::new(0.0, 0.0), 1.0);
    assert_eq!(*seen.lock().unwrap(), [ViewportProperty::Center]);
    assert_eq!(vp.resolution(), 1.0);
    assert_eq!(vp.take_changes(), ViewportProperty::Center.into_set());
}

#[test]
fn unsubscribed_listener_is_silent() {
    let mut vp = Viewport::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let id = vp.subscribe(move |p| sink.lock().unwrap().push(p));

    vp.set_width(10.0);
    assert!(vp.unsubscribe(id));
    assert!(!vp.unsubscribe(id));
    vp.set_height(20.0);
    vp.center_mut().y = 5.0;
    vp.transform(Point::new(1.0, 1.0), Point::ORIGIN, 2.0);

    assert_eq!(*seen.lock().unwrap(), [ViewportProperty::Width]);
    assert_eq!(vp.debug_info().listeners, 0);
}

#[test]
fn viewport_is_shareable_behind_a_mutex() {
    fn assert_send<T: Send>() {}
    assert_send::<Viewport>();

    let shared = Arc::new(Mutex::new(Viewport::new()));
    let worker = Arc::clone(&shared);
    std::thread::spawn(move || worker.lock().unwrap().set_resolution(4.0))
        .join()
        .unwrap();
    assert_eq!(shared.lock().unwrap().resolution(), 4.0);
}

#[test]
fn derived_reads_are_lazy_and_idempotent() {
    let mut vp = Viewport::new();
    vp.set_size(10.0, 10.0);
    vp.set_resolution(1.0);
    vp.set_rotation(30.0);
    assert!(vp.is_modified());

    let extent = vp.extent();
    let window = vp.window_extent();
    assert!(!vp.is_modified());
    for _ in 0..3 {
        assert_eq!(vp.extent(), extent);
        assert_eq!(vp.window_extent(), window);
    }

    vp.set_height(20.0);
    assert!(vp.is_modified());
    assert_ne!(vp.extent(), extent);
}

#[test]
fn unset_state_keeps_stale_geometry() {
    let mut vp = Viewport::new();
    vp.set_size(10.0, 10.0);
    vp.set_resolution(1.0);
    let extent = vp.extent();

    vp.set_center_xy(f64::NAN, 3.0);
    assert_eq!(vp.extent(), extent);
    assert!(vp.is_modified());

    vp.set_center_xy(5.0, 5.0);
    assert_eq!(vp.extent(), Rect::new(0.0, 0.0, 10.0, 10.0));
}

#[test]
fn clone_is_independent() {
    let mut original = Viewport::new();
    original.set_size(100.0, 100.0);
    original.set_resolution(1.0);
    let extent = original.extent();
    let window = original.window_extent();

    let mut copy = original.clone();
    copy.center_mut().x = 500.0;
    copy.set_rotation(45.0);
    let _ = copy.extent();

    assert_eq!(original.center(), Point::ORIGIN);
    assert_eq!(original.extent(), extent);
    assert_eq!(original.window_extent(), window);
    assert_ne!(copy.extent(), extent);
}

#[test]
fn degenerate_state_does_not_panic() {
    let mut vp = Viewport::new();
    let p = vp.world_to_screen(Point::new(1.0, 1.0));
    assert!(!p.x.is_finite());
    assert_eq!(vp.screen_to_world(Point::new(3.0, 4.0)), Point::ORIGIN);
    assert_eq!(vp.extent().area(), 0.0);
    vp.transform(Point::new(1.0, 1.0), Point::ORIGIN, 2.0);
    assert!(vp.validate().is_err());
}
