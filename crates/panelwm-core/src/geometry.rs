#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Two coordinate spaces meet here. Panel [`Bounds`] are percentages of the
//! container, while pointer input and container measurements arrive in host
//! pixels. Conversions between the two are always explicit.

use serde::{Deserialize, Serialize};

/// Scale of the percentage space: a full container extent is `100.0`.
pub const PERCENT_SCALE: f64 = 100.0;

/// Convert a pixel length into a percentage of `extent` pixels.
#[inline]
#[must_use]
pub fn percent_of(pixels: f64, extent: f64) -> f64 {
    pixels * PERCENT_SCALE / extent
}

/// Convert a percentage of `extent` pixels back into pixels.
#[inline]
#[must_use]
pub fn pixels_of(percent: f64, extent: f64) -> f64 {
    percent * extent / PERCENT_SCALE
}

/// A panel rectangle relative to its container.
///
/// All four fields are percentages (nominally `0.0..=100.0`) of the
/// container's current pixel size, so a panel scales with its container.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    /// Width as a percentage of container width.
    pub width: f64,
    /// Height as a percentage of container height.
    pub height: f64,
    /// Left edge as a percentage of container width.
    pub left: f64,
    /// Top edge as a percentage of container height.
    pub top: f64,
}

impl Bounds {
    /// Create bounds from percentages.
    #[inline]
    #[must_use]
    pub const fn new(width: f64, height: f64, left: f64, top: f64) -> Self {
        Self {
            width,
            height,
            left,
            top,
        }
    }

    /// Right edge in percent.
    #[inline]
    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge in percent.
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Rendered pixel offset of the top-left corner inside `container`.
    #[must_use]
    pub fn pixel_offset(&self, container: PixelSize) -> PixelPoint {
        PixelPoint::new(
            pixels_of(self.left, container.width),
            pixels_of(self.top, container.height),
        )
    }

    /// Rendered pixel rectangle inside `container` (container-local origin).
    #[must_use]
    pub fn to_pixels(&self, container: PixelSize) -> PixelRect {
        let offset = self.pixel_offset(container);
        PixelRect::new(
            offset.x,
            offset.y,
            pixels_of(self.width, container.width),
            pixels_of(self.height, container.height),
        )
    }

    /// Whether every component is a finite number.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.width.is_finite()
            && self.height.is_finite()
            && self.left.is_finite()
            && self.top.is_finite()
    }
}

/// A pixel extent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelSize {
    pub width: f64,
    pub height: f64,
}

impl PixelSize {
    #[inline]
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either extent is zero, negative, or not finite.
    ///
    /// Percentage conversion divides by these extents, so a degenerate size
    /// cannot host panels.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }
}

/// A point in host pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate by `delta`.
    #[inline]
    #[must_use]
    pub fn offset(self, delta: PixelDelta) -> Self {
        Self::new(self.x + delta.dx, self.y + delta.dy)
    }

    /// Movement from `self` to `other`.
    #[inline]
    #[must_use]
    pub fn delta_to(self, other: Self) -> PixelDelta {
        PixelDelta::new(other.x - self.x, other.y - self.y)
    }
}

/// Incremental pointer movement in host pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelDelta {
    pub dx: f64,
    pub dy: f64,
}

impl PixelDelta {
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    #[inline]
    #[must_use]
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

/// An axis-aligned rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// The container's rectangle in client (viewport) pixels.
///
/// Pointer positions reported by the host use the same client space, so
/// edge distances can be computed directly.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContainerRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ContainerRect {
    #[inline]
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A container anchored at the client origin.
    #[inline]
    #[must_use]
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> PixelSize {
        PixelSize::new(self.width, self.height)
    }

    #[inline]
    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Distances from `point` to the left, top, right and bottom edges.
    ///
    /// Distances are signed: a point outside the container yields a negative
    /// distance for the edge it crossed.
    #[must_use]
    pub fn edge_distances(&self, point: PixelPoint) -> EdgeDistances {
        EdgeDistances {
            left: point.x - self.left,
            top: point.y - self.top,
            right: self.right() - point.x,
            bottom: self.bottom() - point.y,
        }
    }
}

/// Signed distances from a point to each container edge, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeDistances {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}
