// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rotation angle helpers.
//!
//! Angles are in degrees. A viewport rotation of `r` means the screen is
//! turned `r` degrees clockwise relative to the world axes.

use kurbo::{Affine, Point};

/// Default threshold, in degrees, below which a rotation counts as none.
pub const DEFAULT_ROTATION_EPSILON: f64 = 1e-6;

/// Normalizes `degrees` into the half‑open range `[0, 360)`.
///
/// NaN stays NaN.
///
/// ```rust
/// use understory_viewport::normalize_rotation;
///
/// assert_eq!(normalize_rotation(370.0), 10.0);
/// assert_eq!(normalize_rotation(-30.0), 330.0);
/// assert_eq!(normalize_rotation(360.0), 0.0);
/// ```
#[must_use]
pub fn normalize_rotation(degrees: f64) -> f64 {
    let r = degrees % 360.0;
    let r = if r < 0.0 { r + 360.0 } else { r };
    // -1e-20 % 360 + 360 rounds to exactly 360.
    if r >= 360.0 { 0.0 } else { r }
}

/// Returns `true` if a normalized rotation is visibly different from zero.
///
/// The rotation must lie strictly inside `(epsilon, 360 - epsilon)`. NaN is
/// never rotated.
#[must_use]
pub fn is_rotated(degrees: f64, epsilon: f64) -> bool {
    degrees > epsilon && degrees < 360.0 - epsilon
}

/// Affine rotation by `degrees` (counterclockwise in a y‑up frame) about `pivot`.
#[must_use]
pub fn rotation_about(degrees: f64, pivot: Point) -> Affine {
    Affine::rotate_about(degrees.to_radians(), pivot)
}

/// Rotates `point` by `degrees` about `pivot`.
#[must_use]
pub fn rotate_point(point: Point, degrees: f64, pivot: Point) -> Point {
    rotation_about(degrees, pivot) * point
}
