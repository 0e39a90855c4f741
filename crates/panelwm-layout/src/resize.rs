#![forbid(unsafe_code)]

//! Edge and corner resize processor.
//!
//! A resize moves exactly the edges named by the active [`ResizeEdge`]; the
//! opposite edges stay fixed. Pointer deltas arrive in pixels and are
//! converted to container percentages before they are applied.
//!
//! The processor never clamps. Candidates below the minimum size or above
//! the top edge are rejected by the gesture layer (see
//! [`crate::constraints::check_resize_candidate`]).

use std::fmt;
use std::str::FromStr;

use panelwm_core::{Bounds, PixelDelta, PixelSize, percent_of};
use serde::{Deserialize, Serialize};

/// Resize handle selector: four edges and four corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeEdge {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Which end of an axis a handle drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisEnd {
    /// Left or top: the edge moves and the extent shrinks by the same amount.
    Start,
    /// Right or bottom: only the extent changes.
    End,
}

impl ResizeEdge {
    pub const ALL: [Self; 8] = [
        Self::Left,
        Self::Right,
        Self::Top,
        Self::Bottom,
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        }
    }

    /// True for the four corner handles.
    #[must_use]
    pub const fn is_corner(self) -> bool {
        matches!(
            self,
            Self::TopLeft | Self::TopRight | Self::BottomLeft | Self::BottomRight
        )
    }

    const fn horizontal(self) -> Option<AxisEnd> {
        match self {
            Self::Left | Self::TopLeft | Self::BottomLeft => Some(AxisEnd::Start),
            Self::Right | Self::TopRight | Self::BottomRight => Some(AxisEnd::End),
            Self::Top | Self::Bottom => None,
        }
    }

    const fn vertical(self) -> Option<AxisEnd> {
        match self {
            Self::Top | Self::TopLeft | Self::TopRight => Some(AxisEnd::Start),
            Self::Bottom | Self::BottomLeft | Self::BottomRight => Some(AxisEnd::End),
            Self::Left | Self::Right => None,
        }
    }
}

/// Apply one pointer delta to `current` for the handle `edge`.
#[must_use]
pub fn compute_resize_bounds(
    delta: PixelDelta,
    container: PixelSize,
    current: Bounds,
    edge: ResizeEdge,
) -> Bounds {
    let dx = percent_of(delta.dx, container.width);
    let dy = percent_of(delta.dy, container.height);
    let mut next = current;

    match edge.horizontal() {
        Some(AxisEnd::Start) => {
            next.width -= dx;
            next.left += dx;
        }
        Some(AxisEnd::End) => next.width += dx,
        None => {}
    }
    match edge.vertical() {
        Some(AxisEnd::Start) => {
            next.height -= dy;
            next.top += dy;
        }
        Some(AxisEnd::End) => next.height += dy,
        None => {}
    }
    next
}

impl fmt::Display for ResizeEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResizeEdge {
    type Err = ParseResizeEdgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|edge| edge.as_str() == s)
            .ok_or_else(|| ParseResizeEdgeError {
                token: s.to_owned(),
            })
    }
}

/// A resize selector outside the eight known handles.
///
/// This is a caller bug, not a runtime condition: hosts map their own
/// handle identifiers to [`ResizeEdge`] once at setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResizeEdgeError {
    pub token: String,
}

impl fmt::Display for ParseResizeEdgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unhandled resizer position {:?}", self.token)
    }
}

impl std::error::Error for ParseResizeEdgeError {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CONTAINER: PixelSize = PixelSize::new(1000.0, 800.0);
    const START: Bounds = Bounds::new(30.0, 25.0, 20.0, 20.0);

    fn resize(edge: ResizeEdge, dx: f64, dy: f64) -> Bounds {
        compute_resize_bounds(PixelDelta::new(dx, dy), CONTAINER, START, edge)
    }

    #[test]
    fn bottom_right_grows_both_extents_only() {
        let next = resize(ResizeEdge::BottomRight, 100.0, 50.0);
        assert_eq!(next, Bounds::new(40.0, 31.25, 20.0, 20.0));
    }

    #[test]
    fn left_keeps_right_edge_fixed() {
        let next = resize(ResizeEdge::Left, 50.0, 999.0);
        assert_eq!(next.left, 25.0);
        assert_eq!(next.width, 25.0);
        assert_eq!(next.right(), START.right());
        assert_eq!((next.top, next.height), (START.top, START.height));
    }

    #[test]
    fn top_keeps_bottom_edge_fixed() {
        let next = resize(ResizeEdge::Top, 999.0, -40.0);
        assert_eq!(next.top, 15.0);
        assert_eq!(next.height, 30.0);
        assert_eq!(next.bottom(), START.bottom());
        assert_eq!((next.left, next.width), (START.left, START.width));
    }

    #[test]
    fn single_axis_handles_ignore_the_other_axis() {
        assert_eq!(resize(ResizeEdge::Right, 100.0, 300.0), Bounds::new(40.0, 25.0, 20.0, 20.0));
        assert_eq!(resize(ResizeEdge::Bottom, 300.0, 80.0), Bounds::new(30.0, 35.0, 20.0, 20.0));
    }

    #[test]
    fn corners_combine_edge_rules() {
        assert_eq!(
            resize(ResizeEdge::TopLeft, 100.0, 80.0),
            Bounds::new(20.0, 15.0, 30.0, 30.0)
        );
        assert_eq!(
            resize(ResizeEdge::TopRight, 100.0, 80.0),
            Bounds::new(40.0, 15.0, 20.0, 30.0)
        );
        assert_eq!(
            resize(ResizeEdge::BottomLeft, 100.0, 80.0),
            Bounds::new(20.0, 35.0, 30.0, 20.0)
        );
    }

    #[test]
    fn output_is_not_clamped() {
        let next = resize(ResizeEdge::Top, 0.0, -400.0);
        assert!(next.top < 0.0);
        let next = resize(ResizeEdge::Right, -600.0, 0.0);
        assert!(next.width < 0.0);
    }

    #[test]
    fn selector_names_parse_and_reject_unknowns() {
        for edge in ResizeEdge::ALL {
            assert_eq!(edge.as_str().parse::<ResizeEdge>(), Ok(edge));
        }
        assert_eq!(
            "middle".parse::<ResizeEdge>(),
            Err(ParseResizeEdgeError {
                token: "middle".into()
            })
        );
        assert!(ResizeEdge::TopRight.is_corner());
        assert!(!ResizeEdge::Bottom.is_corner());
    }
}
