#![forbid(unsafe_code)]

//! Snap zone detection for drag-to-preset.
//!
//! While a panel is dragged, the pointer position is classified against six
//! margin zones along the container's edges and corners. A match proposes
//! the corresponding [`PresetBound`] as the drop target.
//!
//! Zones are mutually exclusive and evaluated in the fixed order of
//! [`SnapZone::PRIORITY`]; the first match wins. Edge zones exclude the
//! corner margins, so a pointer in a corner always maps to the corner zone.

use std::fmt;

use panelwm_core::{ContainerRect, EdgeDistances, PixelPoint, PixelRect, PixelSize};
use serde::{Deserialize, Serialize};

use crate::preset::PresetBound;

/// Default activation margin in pixels.
pub const DEFAULT_SNAP_THRESHOLD: f64 = 10.0;

/// A margin region that proposes a preset when the pointer enters it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapZone {
    Right,
    Left,
    TopRight,
    TopLeft,
    BottomRight,
    BottomLeft,
}

impl SnapZone {
    /// Evaluation order. First match wins.
    pub const PRIORITY: [Self; 6] = [
        Self::Right,
        Self::Left,
        Self::TopRight,
        Self::TopLeft,
        Self::BottomRight,
        Self::BottomLeft,
    ];

    /// Preset committed when a drag ends inside this zone.
    #[must_use]
    pub const fn preset(self) -> PresetBound {
        match self {
            Self::Right => PresetBound::Right,
            Self::Left => PresetBound::Left,
            Self::TopRight => PresetBound::TopRight,
            Self::TopLeft => PresetBound::TopLeft,
            Self::BottomRight => PresetBound::BottomRight,
            Self::BottomLeft => PresetBound::BottomLeft,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.preset().as_str()
    }

    /// Ghost rectangle (container-local pixels) a host can draw as a preview.
    #[must_use]
    pub fn preview_rect(self, container: PixelSize) -> PixelRect {
        self.preset().bounds().to_pixels(container)
    }

    fn matches(self, d: EdgeDistances, threshold: f64) -> bool {
        let near = |distance: f64| distance < threshold;
        let clear = |distance: f64| distance > threshold;
        match self {
            Self::Right => near(d.right) && clear(d.top) && clear(d.bottom),
            Self::Left => near(d.left) && clear(d.top) && clear(d.bottom),
            Self::TopRight => near(d.right) && near(d.top),
            Self::TopLeft => near(d.left) && near(d.top),
            Self::BottomRight => near(d.right) && near(d.bottom),
            Self::BottomLeft => near(d.left) && near(d.bottom),
        }
    }
}

impl From<SnapZone> for PresetBound {
    fn from(zone: SnapZone) -> Self {
        zone.preset()
    }
}

impl fmt::Display for SnapZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify `pointer` (client pixels) against the snap zones of `container`.
#[must_use]
pub fn detect_snap(pointer: PixelPoint, container: ContainerRect, threshold: f64) -> Option<SnapZone> {
    let distances = container.edge_distances(pointer);
    SnapZone::PRIORITY
        .into_iter()
        .find(|zone| zone.matches(distances, threshold))
}

/// Snap detector bound to one activation threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapDetector {
    threshold: f64,
}

impl Default for SnapDetector {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SNAP_THRESHOLD,
        }
    }
}

impl SnapDetector {
    #[must_use]
    pub const fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }

    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    #[must_use]
    pub fn detect(&self, pointer: PixelPoint, container: ContainerRect) -> Option<SnapZone> {
        detect_snap(pointer, container, self.threshold)
    }
}
