// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect};

use crate::rotation::rotation_about;

/// A quadrilateral described by four ordered corners.
///
/// The corners are named for an unrotated, y‑up world rectangle. After a
/// rotation they keep their names, so `bottom_left` is always the corner that
/// maps to the bottom‑left of the screen.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Quad {
    /// Corner shown at the bottom‑left of the screen.
    pub bottom_left: Point,
    /// Corner shown at the top‑left of the screen.
    pub top_left: Point,
    /// Corner shown at the top‑right of the screen.
    pub top_right: Point,
    /// Corner shown at the bottom‑right of the screen.
    pub bottom_right: Point,
}

impl Quad {
    /// Creates a quad from its four corners.
    #[must_use]
    pub const fn new(
        bottom_left: Point,
        top_left: Point,
        top_right: Point,
        bottom_right: Point,
    ) -> Self {
        Self {
            bottom_left,
            top_left,
            top_right,
            bottom_right,
        }
    }

    /// Creates the axis‑aligned quad covering `rect` in a y‑up frame.
    ///
    /// `rect.y0` is treated as the bottom edge.
    #[must_use]
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            bottom_left: Point::new(rect.x0, rect.y0),
            top_left: Point::new(rect.x0, rect.y1),
            top_right: Point::new(rect.x1, rect.y1),
            bottom_right: Point::new(rect.x1, rect.y0),
        }
    }

    /// Returns the corners in order: bottom‑left, top‑left, top‑right, bottom‑right.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        [
            self.bottom_left,
            self.top_left,
            self.top_right,
            self.bottom_right,
        ]
    }

    /// Applies an affine transform to every corner.
    #[must_use]
    pub fn transform(&self, affine: Affine) -> Self {
        Self {
            bottom_left: affine * self.bottom_left,
            top_left: affine * self.top_left,
            top_right: affine * self.top_right,
            bottom_right: affine * self.bottom_right,
        }
    }

    /// Rotates the quad by `degrees` (counterclockwise, y‑up) about `pivot`.
    #[must_use]
    pub fn rotate(&self, degrees: f64, pivot: Point) -> Self {
        self.transform(rotation_about(degrees, pivot))
    }

    /// Returns the axis‑aligned box enclosing all four corners.
    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        let [a, b, c, d] = self.corners();
        Rect::new(
            a.x.min(b.x).min(c.x).min(d.x),
            a.y.min(b.y).min(c.y).min(d.y),
            a.x.max(b.x).max(c.x).max(d.x),
            a.y.max(b.y).max(c.y).max(d.y),
        )
    }
}
