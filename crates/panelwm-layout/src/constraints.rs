#![forbid(unsafe_code)]

//! Frame policy: size limits, candidate rejection and header reachability.
//!
//! The drag and resize processors produce raw candidates. This module decides
//! which candidates may be committed and, once a gesture ends, nudges the
//! panel back so its header can still be grabbed.
//!
//! # Invariants
//!
//! 1. A committed drag frame never has `top < 0`. `top == 0` is allowed.
//! 2. A committed resize frame is at least the minimum size (in percent of
//!    the current container) and never has `top < 0`.
//! 3. After [`correct_header_reachability`], at least one header height of
//!    the panel lies above the container's bottom edge whenever the
//!    container is taller than the header.
//! 4. Non-finite candidates are never committed.

use std::fmt;

use panelwm_core::{Bounds, PixelSize, percent_of, pixels_of};
use serde::{Deserialize, Serialize};

/// Default minimum panel width in pixels.
pub const DEFAULT_MIN_WINDOW_WIDTH: f64 = 200.0;
/// Default minimum panel height in pixels.
pub const DEFAULT_MIN_WINDOW_HEIGHT: f64 = 100.0;
/// Default height of the draggable header strip in pixels.
pub const DEFAULT_HEADER_HEIGHT: f64 = 32.0;

/// Minimum panel size, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeLimits {
    pub min_width: f64,
    pub min_height: f64,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            min_width: DEFAULT_MIN_WINDOW_WIDTH,
            min_height: DEFAULT_MIN_WINDOW_HEIGHT,
        }
    }
}

impl SizeLimits {
    #[must_use]
    pub const fn new(min_width: f64, min_height: f64) -> Self {
        Self {
            min_width,
            min_height,
        }
    }

    /// Minimum width and height as percentages of `container`.
    #[must_use]
    pub fn min_percent(&self, container: PixelSize) -> (f64, f64) {
        (
            percent_of(self.min_width, container.width),
            percent_of(self.min_height, container.height),
        )
    }
}

/// Why a candidate frame was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameRejection {
    BelowMinWidth,
    BelowMinHeight,
    AboveTopEdge,
    NonFinite,
}

impl FrameRejection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BelowMinWidth => "below_min_width",
            Self::BelowMinHeight => "below_min_height",
            Self::AboveTopEdge => "above_top_edge",
            Self::NonFinite => "non_finite",
        }
    }
}

impl fmt::Display for FrameRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accept or reject a drag candidate. Only the top edge is policed mid-drag.
pub fn check_drag_candidate(candidate: &Bounds) -> Result<(), FrameRejection> {
    if !candidate.is_finite() {
        return Err(FrameRejection::NonFinite);
    }
    if candidate.top < 0.0 {
        return Err(FrameRejection::AboveTopEdge);
    }
    Ok(())
}

/// Accept or reject a resize candidate against `limits` in `container`.
pub fn check_resize_candidate(
    candidate: &Bounds,
    container: PixelSize,
    limits: SizeLimits,
) -> Result<(), FrameRejection> {
    if !candidate.is_finite() {
        return Err(FrameRejection::NonFinite);
    }
    let (min_width, min_height) = limits.min_percent(container);
    if candidate.width < min_width {
        return Err(FrameRejection::BelowMinWidth);
    }
    if candidate.height < min_height {
        return Err(FrameRejection::BelowMinHeight);
    }
    if candidate.top < 0.0 {
        return Err(FrameRejection::AboveTopEdge);
    }
    Ok(())
}

/// Pull `bounds` up if its header sits (partly) below the container's bottom.
///
/// Returns the corrected bounds, or `None` when no correction is needed.
#[must_use]
pub fn correct_header_reachability(
    bounds: Bounds,
    container: PixelSize,
    header_height: f64,
) -> Option<Bounds> {
    let top_px = pixels_of(bounds.top, container.height);
    if container.height - top_px >= header_height {
        return None;
    }
    let reachable_top = (container.height - header_height).max(0.0);
    Some(Bounds {
        top: percent_of(reachable_top, container.height),
        ..bounds
    })
}
