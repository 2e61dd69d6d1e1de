// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::ops::{Deref, DerefMut};

use kurbo::Point;

use crate::change::ViewportProperty;
use crate::viewport::Viewport;

/// In‑place editing access to a viewport's center point.
///
/// Returned by [`Viewport::center_mut`]. Reading through the guard is free.
/// If the point is mutably accessed at least once, dropping the guard marks
/// the viewport dirty and emits a single [`ViewportProperty::Center`]
/// notification, exactly as [`Viewport::set_center`] would.
///
/// ```rust
/// use kurbo::Point;
/// use understory_viewport::Viewport;
///
/// let mut vp = Viewport::new();
/// vp.center_mut().x = 25.0;
/// assert_eq!(vp.center(), Point::new(25.0, 0.0));
/// ```
pub struct CenterMut<'a> {
    viewport: &'a mut Viewport,
    touched: bool,
}

impl<'a> CenterMut<'a> {
    pub(crate) fn new(viewport: &'a mut Viewport) -> Self {
        Self {
            viewport,
            touched: false,
        }
    }
}

impl Deref for CenterMut<'_> {
    type Target = Point;

    fn deref(&self) -> &Point {
        self.viewport.center_ref()
    }
}

impl DerefMut for CenterMut<'_> {
    fn deref_mut(&mut self) -> &mut Point {
        self.touched = true;
        self.viewport.center_slot()
    }
}

impl Drop for CenterMut<'_> {
    fn drop(&mut self) {
        if self.touched {
            self.viewport.mark_changed(ViewportProperty::Center);
        }
    }
}

impl fmt::Debug for CenterMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CenterMut")
            .field("center", self.viewport.center_ref())
            .field("touched", &self.touched)
            .finish()
    }
}
