// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change notification for viewport state.
//!
//! Every mutation of a primary viewport attribute is reported as a
//! [`ViewportProperty`]. Observers can either register a callback with
//! [`ChangeListeners`] (through [`Viewport::subscribe`](crate::Viewport::subscribe))
//! or poll the accumulated [`ViewportProperties`] set.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::ops::{BitOr, BitOrAssign};

/// Identifies one primary attribute of a [`Viewport`](crate::Viewport).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewportProperty {
    /// The world‑space point shown at the screen center.
    Center,
    /// World units per screen unit.
    Resolution,
    /// Screen width.
    Width,
    /// Screen height.
    Height,
    /// Clockwise screen rotation in degrees.
    Rotation,
}

impl ViewportProperty {
    /// All properties, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Center,
        Self::Resolution,
        Self::Width,
        Self::Height,
        Self::Rotation,
    ];

    /// Returns the attribute name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Center => "Center",
            Self::Resolution => "Resolution",
            Self::Width => "Width",
            Self::Height => "Height",
            Self::Rotation => "Rotation",
        }
    }

    /// Converts this property into a single‑element [`ViewportProperties`].
    #[must_use]
    pub const fn into_set(self) -> ViewportProperties {
        ViewportProperties(1 << self as u8)
    }
}

impl fmt::Display for ViewportProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A compact set of [`ViewportProperty`] values.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ViewportProperties(u8);

impl ViewportProperties {
    /// Returns the empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Returns `true` if no property is in the set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if `property` is in the set.
    #[must_use]
    pub const fn contains(self, property: ViewportProperty) -> bool {
        self.0 & property.into_set().0 != 0
    }

    /// Adds `property` to the set.
    pub fn insert(&mut self, property: ViewportProperty) {
        self.0 |= property.into_set().0;
    }

    /// Returns the number of properties in the set.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates the properties in the set, in declaration order.
    pub fn iter(self) -> impl Iterator<Item = ViewportProperty> {
        ViewportProperty::ALL
            .into_iter()
            .filter(move |p| self.contains(*p))
    }
}

impl fmt::Debug for ViewportProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl BitOr for ViewportProperties {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ViewportProperties {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl From<ViewportProperty> for ViewportProperties {
    fn from(property: ViewportProperty) -> Self {
        property.into_set()
    }
}

/// Callback invoked with the identity of a changed property.
pub type ChangeCallback = Box<dyn FnMut(ViewportProperty) + Send>;

/// Handle returned by [`ChangeListeners::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u32);

/// Ordered registry of change callbacks.
///
/// Callbacks are invoked synchronously, in subscription order.
#[derive(Default)]
pub struct ChangeListeners {
    next_id: u32,
    entries: Vec<(ListenerId, ChangeCallback)>,
}

impl ChangeListeners {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` and returns its handle.
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(ViewportProperty) + Send + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push((id, Box::new(callback)));
        id
    }

    /// Removes the callback registered under `id`.
    ///
    /// Returns `false` if no such callback exists.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    /// Returns the number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no callbacks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Invokes every callback with `property`.
    pub fn notify(&mut self, property: ViewportProperty) {
        for (_, callback) in &mut self.entries {
            callback(property);
        }
    }
}

// Manual Debug impl since callbacks aren't Debug
impl fmt::Debug for ChangeListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeListeners")
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}
