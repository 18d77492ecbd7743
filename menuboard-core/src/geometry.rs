//! Screen geometry and rotation.
//!
//! A kiosk's panel is mounted in whatever physical aspect it came in. The
//! operator decides the *intended* orientation per device, and this module
//! works out how far the content must rotate to get there, and whether the
//! logical layout rectangle is the measured viewport with width and height
//! swapped.

use crate::model::Device;

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────
// Rect
// ────────────────────────────────────────────────────────────────

/// An axis-aligned rectangle. `y` grows downward, `x` rightward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle of the given size at the origin.
    pub fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Taller than wide. A square counts as landscape.
    pub fn is_portrait(&self) -> bool {
        self.height > self.width
    }

    /// Same origin, width and height exchanged.
    pub fn swapped(&self) -> Self {
        Self::new(self.x, self.y, self.height, self.width)
    }

    /// True when the interiors intersect. Shared edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// True when `other` lies entirely inside `self`, within `tolerance`.
    pub fn contains_rect(&self, other: &Rect, tolerance: f64) -> bool {
        other.x >= self.x - tolerance
            && other.y >= self.y - tolerance
            && other.right() <= self.right() + tolerance
            && other.bottom() <= self.bottom() + tolerance
    }
}

// ────────────────────────────────────────────────────────────────
// Orientation & rotation
// ────────────────────────────────────────────────────────────────

/// The orientation an operator wants a display to read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Rotation applied to the content, about its center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "i32")]
pub enum Rotation {
    None,
    Clockwise,
    CounterClockwise,
    HalfTurn,
}

impl Rotation {
    /// One of `{-90, 0, 90, 180}`.
    pub fn degrees(self) -> i32 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise => 90,
            Rotation::CounterClockwise => -90,
            Rotation::HalfTurn => 180,
        }
    }

    pub fn is_quarter_turn(self) -> bool {
        self.degrees().abs() == 90
    }
}

impl From<Rotation> for i32 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// The resolved rotation for one (native aspect, intended orientation,
/// invert) combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    pub rotation: Rotation,
    /// Content is drawn a quarter turn from the physical screen, so the
    /// logical width is the physical height and vice versa.
    pub needs_dimension_swap: bool,
}

impl Transform {
    /// Total over all eight inputs.
    ///
    /// | native    | desired   | invert=false | invert=true |
    /// |-----------|-----------|--------------|-------------|
    /// | portrait  | portrait  | 0            | 180         |
    /// | landscape | portrait  | 90           | -90         |
    /// | portrait  | landscape | -90          | 90          |
    /// | landscape | landscape | 0            | 180         |
    pub fn resolve(native_is_portrait: bool, desired: Orientation, invert: bool) -> Self {
        let rotation = match (native_is_portrait, desired, invert) {
            (true, Orientation::Portrait, false) => Rotation::None,
            (true, Orientation::Portrait, true) => Rotation::HalfTurn,
            (false, Orientation::Portrait, false) => Rotation::Clockwise,
            (false, Orientation::Portrait, true) => Rotation::CounterClockwise,
            (true, Orientation::Landscape, false) => Rotation::CounterClockwise,
            (true, Orientation::Landscape, true) => Rotation::Clockwise,
            (false, Orientation::Landscape, false) => Rotation::None,
            (false, Orientation::Landscape, true) => Rotation::HalfTurn,
        };

        Self {
            rotation,
            needs_dimension_swap: rotation.is_quarter_turn(),
        }
    }

    pub fn rotation_degrees(&self) -> i32 {
        self.rotation.degrees()
    }

    /// The layout rectangle for a physically measured viewport: origin at
    /// zero, dimensions swapped when the content is a quarter turn off.
    pub fn logical_screen(&self, physical: Rect) -> Rect {
        if self.needs_dimension_swap {
            Rect::sized(physical.height, physical.width)
        } else {
            Rect::sized(physical.width, physical.height)
        }
    }

    /// Transform string for surfaces that speak CSS.
    pub fn css(&self) -> String {
        format!("rotate({}deg)", self.rotation_degrees())
    }
}

// ────────────────────────────────────────────────────────────────
// Stage
// ────────────────────────────────────────────────────────────────

/// Everything the layout engine needs to know about where it draws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    /// The measured viewport, before any swap.
    pub viewport: Rect,
    /// The layout rectangle, after the swap.
    pub screen: Rect,
    pub orientation: Orientation,
    pub transform: Transform,
}

impl Stage {
    pub fn new(viewport: Rect, orientation: Orientation, invert: bool) -> Self {
        let transform = Transform::resolve(viewport.is_portrait(), orientation, invert);
        Self {
            viewport,
            screen: transform.logical_screen(viewport),
            orientation,
            transform,
        }
    }

    pub fn for_device(viewport: Rect, device: &Device) -> Self {
        Self::new(viewport, device.orientation, device.invert)
    }

    pub fn is_portrait(&self) -> bool {
        self.orientation == Orientation::Portrait
    }
}
