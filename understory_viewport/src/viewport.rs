// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::cell::Cell;
use core::fmt;

use kurbo::{Affine, Point, Rect, Vec2};

use crate::center::CenterMut;
use crate::change::{ChangeListeners, ListenerId, ViewportProperties, ViewportProperty};
use crate::quad::Quad;
use crate::rotation::{
    DEFAULT_ROTATION_EPSILON, is_rotated, normalize_rotation, rotate_point, rotation_about,
};

/// Derived geometry, recomputed together from the primary attributes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Derived {
    extent: Rect,
    window_extent: Quad,
}

/// Mapping between a rectangular screen area and the world plane.
///
/// The viewport is described by five primary attributes:
/// - `center`: the world point shown at the geometric center of the screen.
/// - `resolution`: world units per screen unit (the inverse of zoom).
/// - `width` / `height`: screen size.
/// - `rotation`: clockwise screen rotation in degrees, always in `[0, 360)`.
///
/// Screen space has its origin at the top‑left with y pointing down; world
/// space has y pointing up.
///
/// The world [`extent`](Self::extent) and [`window_extent`](Self::window_extent)
/// are cached and recomputed lazily on the first read after any mutation.
///
/// Every mutator reports the changed attribute to listeners registered with
/// [`subscribe`](Self::subscribe) and records it in the set returned by
/// [`take_changes`](Self::take_changes).
#[derive(Debug)]
pub struct Viewport {
    center: Point,
    resolution: f64,
    width: f64,
    height: f64,
    rotation: f64,
    rotation_epsilon: f64,
    derived: Cell<Derived>,
    modified: Cell<bool>,
    changes: ViewportProperties,
    listeners: ChangeListeners,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies all geometry. Listeners are not copied and the clone starts with an
/// empty change set.
impl Clone for Viewport {
    fn clone(&self) -> Self {
        Self {
            center: self.center,
            resolution: self.resolution,
            width: self.width,
            height: self.height,
            rotation: self.rotation,
            rotation_epsilon: self.rotation_epsilon,
            derived: self.derived.clone(),
            modified: self.modified.clone(),
            changes: ViewportProperties::empty(),
            listeners: ChangeListeners::new(),
        }
    }
}

impl Viewport {
    /// Creates a viewport with all attributes zero.
    ///
    /// The derived geometry is considered stale until first read.
    #[must_use]
    pub fn new() -> Self {
        Self {
            center: Point::ORIGIN,
            resolution: 0.0,
            width: 0.0,
            height: 0.0,
            rotation: 0.0,
            rotation_epsilon: DEFAULT_ROTATION_EPSILON,
            derived: Cell::new(Derived::default()),
            modified: Cell::new(true),
            changes: ViewportProperties::empty(),
            listeners: ChangeListeners::new(),
        }
    }

    /// Creates an unrotated viewport that shows exactly `extent` at `resolution`.
    ///
    /// ```rust
    /// use kurbo::Rect;
    /// use understory_viewport::Viewport;
    ///
    /// let vp = Viewport::from_extent(Rect::new(0.0, 0.0, 400.0, 200.0), 2.0);
    /// assert_eq!(vp.width(), 200.0);
    /// assert_eq!(vp.height(), 100.0);
    /// assert_eq!(vp.extent(), Rect::new(0.0, 0.0, 400.0, 200.0));
    /// ```
    #[must_use]
    pub fn from_extent(extent: Rect, resolution: f64) -> Self {
        let mut vp = Self::new();
        vp.center = extent.center();
        vp.resolution = resolution;
        vp.width = extent.width() / resolution;
        vp.height = extent.height() / resolution;
        vp
    }

    // --- Change notification ---

    /// Registers a callback invoked after every change to a primary attribute.
    ///
    /// Callbacks run synchronously on the mutating call, in subscription order.
    ///
    /// Callbacks must be `Send` so that the viewport itself stays `Send` and
    /// can be handed between an input thread and a render thread behind a
    /// `Mutex`. UI-thread state can be reached through `Arc<Mutex<_>>` or a
    /// channel sender instead of `Rc<RefCell<_>>`.
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(ViewportProperty) + Send + 'static,
    ) -> ListenerId {
        self.listeners.subscribe(callback)
    }

    /// Removes a callback. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Returns the properties changed since the last call, and clears the set.
    pub fn take_changes(&mut self) -> ViewportProperties {
        core::mem::take(&mut self.changes)
    }

    /// Returns the properties changed since [`take_changes`](Self::take_changes)
    /// was last called, without clearing them.
    #[must_use]
    pub fn pending_changes(&self) -> ViewportProperties {
        self.changes
    }

    /// Returns `true` if derived geometry must be recomputed before use.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.modified.get()
    }

    pub(crate) fn mark_changed(&mut self, property: ViewportProperty) {
        self.modified.set(true);
        self.changes.insert(property);
        self.listeners.notify(property);
    }

    // --- Primary attributes ---

    /// Returns the world point at the screen center.
    #[must_use]
    pub fn center(&self) -> Point {
        self.center
    }

    /// Sets the world point at the screen center.
    pub fn set_center(&mut self, center: Point) {
        self.center.x = center.x;
        self.center.y = center.y;
        self.mark_changed(ViewportProperty::Center);
    }

    /// Sets the world point at the screen center from its coordinates.
    pub fn set_center_xy(&mut self, x: f64, y: f64) {
        self.set_center(Point::new(x, y));
    }

    /// Returns a guard for editing the center point in place.
    ///
    /// See [`CenterMut`] for the notification contract.
    pub fn center_mut(&mut self) -> CenterMut<'_> {
        CenterMut::new(self)
    }

    pub(crate) fn center_ref(&self) -> &Point {
        &self.center
    }

    pub(crate) fn center_slot(&mut self) -> &mut Point {
        &mut self.center
    }

    /// Returns the number of world units per screen unit.
    #[must_use]
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Sets the number of world units per screen unit.
    pub fn set_resolution(&mut self, resolution: f64) {
        self.resolution = resolution;
        self.mark_changed(ViewportProperty::Resolution);
    }

    /// Alias for [`resolution`](Self::resolution).
    #[must_use]
    pub fn world_units_per_pixel(&self) -> f64 {
        self.resolution
    }

    /// Returns the screen width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Sets the screen width.
    pub fn set_width(&mut self, width: f64) {
        self.width = width;
        self.mark_changed(ViewportProperty::Width);
    }

    /// Returns the screen height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Sets the screen height.
    pub fn set_height(&mut self, height: f64) {
        self.height = height;
        self.mark_changed(ViewportProperty::Height);
    }

    /// Sets both screen dimensions, notifying `Width` then `Height`.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.set_width(width);
        self.set_height(height);
    }

    /// Returns `true` if both screen dimensions are positive.
    #[must_use]
    pub fn has_size(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Returns the rotation in degrees, in `[0, 360)`.
    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Sets the rotation in degrees. The stored value is normalized into `[0, 360)`.
    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = normalize_rotation(degrees);
        self.mark_changed(ViewportProperty::Rotation);
    }

    /// Returns the threshold used by [`is_rotated`](Self::is_rotated).
    #[must_use]
    pub fn rotation_epsilon(&self) -> f64 {
        self.rotation_epsilon
    }

    /// Sets the threshold, in degrees, below which a rotation counts as none.
    ///
    /// This is configuration, not viewport state: no notification is emitted,
    /// but derived geometry is recomputed on next read.
    pub fn set_rotation_epsilon(&mut self, epsilon: f64) {
        self.rotation_epsilon = epsilon.abs();
        self.modified.set(true);
    }

    /// Returns `true` if the rotation is far enough from zero to matter.
    #[must_use]
    pub fn is_rotated(&self) -> bool {
        is_rotated(self.rotation, self.rotation_epsilon)
    }

    /// Returns `true` if center and resolution are set (not NaN).
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        !self.center.x.is_nan() && !self.center.y.is_nan() && !self.resolution.is_nan()
    }

    /// Checks that the state can produce meaningful geometry.
    ///
    /// Transforms never fail; this is for callers that need to know whether
    /// their results are meaningful.
    pub fn validate(&self) -> Result<(), ViewportError> {
        if self.center.x.is_nan() || self.center.y.is_nan() {
            return Err(ViewportError::CenterUnset);
        }
        if self.resolution.is_nan() {
            return Err(ViewportError::ResolutionUnset);
        }
        if self.resolution <= 0.0 || !self.resolution.is_finite() {
            return Err(ViewportError::InvalidResolution(self.resolution));
        }
        if !self.has_size() {
            return Err(ViewportError::EmptySize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    // --- Derived geometry ---

    /// Returns the axis‑aligned world box covering the whole screen.
    ///
    /// When rotated, this is the bounding box of [`window_extent`](Self::window_extent).
    /// While center or resolution is NaN the last computed value is returned.
    #[must_use]
    pub fn extent(&self) -> Rect {
        self.refresh();
        self.derived.get().extent
    }

    /// Returns the exact world footprint of the screen rectangle.
    #[must_use]
    pub fn window_extent(&self) -> Quad {
        self.refresh();
        self.derived.get().window_extent
    }

    fn refresh(&self) {
        if !self.modified.get() {
            return;
        }
        if !self.is_initialized() {
            log::debug!("viewport center or resolution unset; keeping previous extent");
            return;
        }

        let half_x = self.width * self.resolution * 0.5;
        let half_y = self.height * self.resolution * 0.5;
        let left = self.center.x - half_x;
        let bottom = self.center.y - half_y;
        let right = self.center.x + half_x;
        let top = self.center.y + half_y;

        let mut derived = self.derived.get();
        derived.window_extent = Quad::new(
            Point::new(left, bottom),
            Point::new(left, top),
            Point::new(right, top),
            Point::new(right, bottom),
        );

        if self.is_rotated() {
            derived.window_extent = derived.window_extent.rotate(-self.rotation, self.center);
            derived.extent = derived.window_extent.bounding_box();
        } else {
            derived.extent.x0 = left;
            derived.extent.y0 = bottom;
            derived.extent.x1 = right;
            derived.extent.y1 = top;
        }

        log::trace!("recomputed viewport extent {:?}", derived.extent);
        self.derived.set(derived);
        self.modified.set(false);
    }

    // --- Coordinate conversion ---

    fn screen_center(&self) -> Point {
        Point::new(self.width * 0.5, self.height * 0.5)
    }

    /// Converts a world point to screen coordinates, ignoring rotation.
    #[must_use]
    pub fn world_to_screen_unrotated(&self, world: Point) -> Point {
        Point::new(
            (world.x - self.center.x) / self.resolution + self.width * 0.5,
            (self.center.y - world.y) / self.resolution + self.height * 0.5,
        )
    }

    /// Converts a world point to screen coordinates.
    ///
    /// ```rust
    /// use kurbo::Point;
    /// use understory_viewport::Viewport;
    ///
    /// let mut vp = Viewport::new();
    /// vp.set_size(100.0, 50.0);
    /// vp.set_resolution(2.0);
    /// assert_eq!(vp.world_to_screen(Point::new(0.0, 0.0)), Point::new(50.0, 25.0));
    /// assert_eq!(vp.world_to_screen(Point::new(-100.0, 50.0)), Point::new(0.0, 0.0));
    /// ```
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        let screen = self.world_to_screen_unrotated(world);
        if self.is_rotated() {
            rotate_point(screen, -self.rotation, self.screen_center())
        } else {
            screen
        }
    }

    /// Coordinate form of [`world_to_screen`](Self::world_to_screen).
    #[must_use]
    pub fn world_to_screen_xy(&self, x: f64, y: f64) -> Point {
        self.world_to_screen(Point::new(x, y))
    }

    /// Converts a screen point to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        let screen = if self.is_rotated() {
            rotate_point(screen, self.rotation, self.screen_center())
        } else {
            screen
        };
        Point::new(
            self.center.x + (screen.x - self.width * 0.5) * self.resolution,
            self.center.y - (screen.y - self.height * 0.5) * self.resolution,
        )
    }

    /// Coordinate form of [`screen_to_world`](Self::screen_to_world).
    #[must_use]
    pub fn screen_to_world_xy(&self, x: f64, y: f64) -> Point {
        self.screen_to_world(Point::new(x, y))
    }

    /// Returns the affine transform equivalent to [`world_to_screen`](Self::world_to_screen).
    ///
    /// Suitable for handing to a renderer. Degenerate (zero or NaN)
    /// resolution yields a non‑finite transform.
    #[must_use]
    pub fn world_to_screen_transform(&self) -> Affine {
        let scale = 1.0 / self.resolution;
        let unrotated = Affine::translate(self.screen_center().to_vec2())
            * Affine::scale_non_uniform(scale, -scale)
            * Affine::translate(-self.center.to_vec2());
        if self.is_rotated() {
            rotation_about(-self.rotation, self.screen_center()) * unrotated
        } else {
            unrotated
        }
    }

    /// Returns the affine transform equivalent to [`screen_to_world`](Self::screen_to_world).
    #[must_use]
    pub fn screen_to_world_transform(&self) -> Affine {
        self.world_to_screen_transform().inverse()
    }

    /// Returns the screen box covering a world rectangle.
    #[must_use]
    pub fn world_to_screen_rect(&self, rect: Rect) -> Rect {
        let q = Quad::from_rect(rect);
        Quad::new(
            self.world_to_screen(q.bottom_left),
            self.world_to_screen(q.top_left),
            self.world_to_screen(q.top_right),
            self.world_to_screen(q.bottom_right),
        )
        .bounding_box()
    }

    /// Returns the world box covering a screen rectangle.
    #[must_use]
    pub fn screen_to_world_rect(&self, rect: Rect) -> Rect {
        let q = Quad::from_rect(rect);
        Quad::new(
            self.screen_to_world(q.bottom_left),
            self.screen_to_world(q.top_left),
            self.screen_to_world(q.top_right),
            self.screen_to_world(q.bottom_right),
        )
        .bounding_box()
    }

    // --- Gestures ---

    /// Applies a combined drag and pinch gesture.
    ///
    /// The world point under `previous` before the call ends up under
    /// `current` afterwards, and resolution is divided by `delta_scale`
    /// (values above one zoom in). With `delta_scale == 1.0` this is a
    /// plain pan.
    ///
    /// Exactly one notification is emitted: `Resolution` when zooming,
    /// `Center` for a plain pan. [`take_changes`](Self::take_changes) reports
    /// both attributes when both moved.
    ///
    /// Zero or NaN resolution is not guarded against.
    ///
    /// ```rust
    /// use kurbo::Point;
    /// use understory_viewport::Viewport;
    ///
    /// let mut vp = Viewport::new();
    /// vp.set_size(800.0, 600.0);
    /// vp.set_resolution(1.0);
    ///
    /// let touch = Point::new(600.0, 100.0);
    /// let before = vp.screen_to_world(touch);
    /// vp.transform(touch, touch, 2.0);
    /// let after = vp.screen_to_world(touch);
    ///
    /// assert_eq!(vp.resolution(), 0.5);
    /// assert!((after - before).hypot() < 1e-9);
    /// ```
    pub fn transform(&mut self, current: Point, previous: Point, delta_scale: f64) {
        let previous_world = self.screen_to_world(previous);
        let current_world = self.screen_to_world(current);
        let mut new_center = self.center + (previous_world - current_world);

        if delta_scale == 1.0 {
            self.set_center(new_center);
            return;
        }

        self.set_resolution(self.resolution / delta_scale);
        let rescaled_world = self.screen_to_world(current);
        let correction: Vec2 = (rescaled_world - self.center) * (1.0 - delta_scale);
        new_center -= correction;

        self.center = new_center;
        self.changes.insert(ViewportProperty::Center);
    }

    /// Coordinate form of [`transform`](Self::transform).
    pub fn transform_xy(
        &mut self,
        screen_x: f64,
        screen_y: f64,
        previous_screen_x: f64,
        previous_screen_y: f64,
        delta_scale: f64,
    ) {
        self.transform(
            Point::new(screen_x, screen_y),
            Point::new(previous_screen_x, previous_screen_y),
            delta_scale,
        );
    }

    /// Snapshot of the current viewport state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> ViewportDebugInfo {
        ViewportDebugInfo {
            center: self.center,
            resolution: self.resolution,
            width: self.width,
            height: self.height,
            rotation: self.rotation,
            is_rotated: self.is_rotated(),
            extent: self.extent(),
            window_extent: self.window_extent(),
            modified: self.is_modified(),
            listeners: self.listeners.len(),
        }
    }
}

/// Debug snapshot of a [`Viewport`] state.
#[derive(Clone, Copy, Debug)]
pub struct ViewportDebugInfo {
    /// World point at the screen center.
    pub center: Point,
    /// World units per screen unit.
    pub resolution: f64,
    /// Screen width.
    pub width: f64,
    /// Screen height.
    pub height: f64,
    /// Normalized rotation in degrees.
    pub rotation: f64,
    /// Whether the rotated transform path is in use.
    pub is_rotated: bool,
    /// Axis‑aligned world extent.
    pub extent: Rect,
    /// World footprint of the screen.
    pub window_extent: Quad,
    /// Whether derived geometry is still stale (state unset).
    pub modified: bool,
    /// Number of registered change listeners.
    pub listeners: usize,
}

/// Reason a [`Viewport`] cannot produce meaningful geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewportError {
    /// Center x or y is NaN.
    CenterUnset,
    /// Resolution is NaN.
    ResolutionUnset,
    /// Resolution is zero, negative or infinite.
    InvalidResolution(f64),
    /// Width or height is not positive.
    EmptySize {
        /// Screen width.
        width: f64,
        /// Screen height.
        height: f64,
    },
}

impl fmt::Display for ViewportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CenterUnset => f.write_str("viewport center is unset"),
            Self::ResolutionUnset => f.write_str("viewport resolution is unset"),
            Self::InvalidResolution(r) => {
                write!(f, "viewport resolution {r} is not positive and finite")
            }
            Self::EmptySize { width, height } => {
                write!(f, "viewport size {width}x{height} is empty")
            }
        }
    }
}

impl core::error::Error for ViewportError {}
