// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_viewport --heading-base-level=0

//! Understory Viewport: a rotatable 2D viewport transform engine.
//!
//! This crate maps a rectangular screen area onto a continuous world plane
//! and converts points between the two spaces. A [`Viewport`] is described by
//! a world‑space center, a resolution (world units per screen unit), a screen
//! size, and a rotation in degrees. From those it derives:
//! - The axis‑aligned world [`extent`](Viewport::extent) covering the screen,
//!   suitable for tile selection and culling.
//! - The exact, possibly rotated, world footprint of the screen as a [`Quad`].
//! - World ↔ screen point conversion, with and without rotation.
//! - Combined drag + pinch gestures anchored at the touch point.
//!
//! It does **not** render, tile, reproject between coordinate reference
//! systems, or animate. Callers are expected to:
//! - Decode their own input events into screen positions and scale deltas.
//! - Subscribe to change notifications (or poll
//!   [`take_changes`](Viewport::take_changes)) to schedule redraws.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use understory_viewport::Viewport;
//!
//! let mut view = Viewport::new();
//! view.set_size(100.0, 50.0);
//! view.set_resolution(2.0);
//!
//! assert_eq!(view.extent(), Rect::new(-100.0, -50.0, 100.0, 50.0));
//!
//! // Screen y grows downward, world y upward.
//! let world = view.screen_to_world(Point::new(0.0, 0.0));
//! assert_eq!(world, Point::new(-100.0, 50.0));
//! ```
//!
//! ## Rotation
//!
//! Rotation is stored normalized into `[0, 360)`. Rotations within
//! [`Viewport::rotation_epsilon`] of zero take the cheaper unrotated path.
//!
//! ```rust
//! use kurbo::Point;
//! use understory_viewport::Viewport;
//!
//! let mut view = Viewport::new();
//! view.set_size(400.0, 300.0);
//! view.set_resolution(0.25);
//! view.set_rotation(-30.0);
//! assert_eq!(view.rotation(), 330.0);
//!
//! let screen = Point::new(12.0, 34.0);
//! let back = view.world_to_screen(view.screen_to_world(screen));
//! assert!((back - screen).hypot() < 1e-9);
//! ```
//!
//! ## Change notification
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use understory_viewport::{Viewport, ViewportProperty};
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let mut view = Viewport::new();
//! let sink = Arc::clone(&seen);
//! view.subscribe(move |p| sink.lock().unwrap().push(p));
//!
//! view.center_mut().x = 10.0;
//! view.set_resolution(3.0);
//! assert_eq!(
//!     *seen.lock().unwrap(),
//!     [ViewportProperty::Center, ViewportProperty::Resolution]
//! );
//! ```
//!
//! Derived geometry is recomputed lazily on the first read after a change.
//! While the center or resolution is NaN the previous geometry is kept.
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod center;
mod change;
mod quad;
mod rotation;
mod viewport;

pub use center::CenterMut;
pub use change::{
    ChangeCallback, ChangeListeners, ListenerId, ViewportProperties, ViewportProperty,
};
pub use quad::Quad;
pub use rotation::{
    DEFAULT_ROTATION_EPSILON, is_rotated, normalize_rotation, rotate_point, rotation_about,
};
pub use viewport::{Viewport, ViewportDebugInfo, ViewportError};
