//! Screen geometry in points.
//!
//! Skins are authored in absolute points for a particular device, so all
//! geometry here is plain `f64` with the origin at the top-left corner and
//! `y` growing downwards.

use serde::{Deserialize, Serialize};

/// A point in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The shorter of the two sides.
    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }

    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.max_x() && p.y >= self.y && p.y < self.max_y()
    }

    /// Convert a screen point into this rectangle's local coordinates.
    pub fn to_local(&self, p: Point) -> Point {
        Point::new(p.x - self.x, p.y - self.y)
    }

    /// Shrink the rectangle by the given insets. Sizes never go negative.
    pub fn inset_by(&self, insets: Insets) -> Rect {
        Rect::new(
            self.x + insets.left,
            self.y + insets.top,
            (self.width - insets.left - insets.right).max(0.0),
            (self.height - insets.top - insets.bottom).max(0.0),
        )
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }
}

/// Safe-area insets (notch, home indicator, rounded corners).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Insets {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default)]
    pub right: f64,
}

impl Insets {
    pub const ZERO: Insets = Insets {
        top: 0.0,
        left: 0.0,
        bottom: 0.0,
        right: 0.0,
    };

    pub const fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }
}

/// Runtime interface orientation reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    /// The host could not determine an orientation; treated as portrait.
    #[default]
    Unknown,
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
}

impl Orientation {
    pub fn is_landscape(self) -> bool {
        matches!(self, Self::LandscapeLeft | Self::LandscapeRight)
    }

    /// Key used for this orientation in skin documents.
    pub fn key(self) -> &'static str {
        match self {
            Self::Unknown | Self::Portrait => "portrait",
            Self::PortraitUpsideDown => "portraitUpsideDown",
            Self::LandscapeLeft => "landscapeLeft",
            Self::LandscapeRight => "landscapeRight",
        }
    }
}

/// Coarse device size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    /// Compact phones (shorter side under 376 points).
    Mini,
    #[default]
    Standard,
    /// Tablets (shorter side of 744 points or more).
    Pad,
}

impl DeviceClass {
    /// Classify a device from its screen bounds in points.
    pub fn from_bounds(bounds: Size) -> Self {
        let side = bounds.min_side();
        if side < 376.0 {
            Self::Mini
        } else if side >= 744.0 {
            Self::Pad
        } else {
            Self::Standard
        }
    }
}

/// The drawable area a layout is materialized into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub bounds: Size,
    pub safe_area: Insets,
    pub device: DeviceClass,
}

impl Viewport {
    /// Build a viewport, classifying the device from its bounds.
    pub fn new(bounds: Size, safe_area: Insets) -> Self {
        Self {
            bounds,
            safe_area,
            device: DeviceClass::from_bounds(bounds),
        }
    }

    /// Swap width and height (and rotate the insets) for the orientation.
    pub fn oriented(&self, orientation: Orientation) -> Self {
        let wants_landscape = orientation.is_landscape();
        if wants_landscape == self.bounds.is_landscape() {
            return *self;
        }
        let i = self.safe_area;
        Self {
            bounds: Size::new(self.bounds.height, self.bounds.width),
            safe_area: Insets::new(i.left, i.bottom, i.right, i.top),
            device: self.device,
        }
    }

    /// The full-screen rectangle minus safe-area insets.
    pub fn safe_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.bounds.width, self.bounds.height).inset_by(self.safe_area)
    }
}
