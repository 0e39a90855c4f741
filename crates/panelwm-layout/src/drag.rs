#![forbid(unsafe_code)]

//! Drag (move) processor.
//!
//! A drag translates the panel by the pointer delta. The new origin is taken
//! from the panel's rendered pixel offset, so rounding in the percentage
//! space never accumulates across moves. Width and height are untouched.

use panelwm_core::{Bounds, PixelDelta, PixelPoint, PixelSize, percent_of};

/// Candidate bounds after moving a panel whose rendered top-left corner is
/// `element_offset` (container-local pixels) by `delta`.
#[must_use]
pub fn compute_drag_bounds(
    delta: PixelDelta,
    container: PixelSize,
    element_offset: PixelPoint,
    current: Bounds,
) -> Bounds {
    let origin = element_offset.offset(delta);
    Bounds {
        left: percent_of(origin.x, container.width),
        top: percent_of(origin.y, container.height),
        ..current
    }
}
