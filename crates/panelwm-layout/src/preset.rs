#![forbid(unsafe_code)]

//! Canonical preset layouts.
//!
//! A [`PresetBound`] names one of seven fixed placements. The table is not
//! configurable: every preset resolves to the same [`Bounds`] on every call.

use std::fmt;
use std::str::FromStr;

use panelwm_core::Bounds;
use serde::{Deserialize, Serialize};

/// One of the seven canonical panel placements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresetBound {
    /// Whole container. Reachable only through the expand toggle.
    Maximized,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl PresetBound {
    pub const ALL: [Self; 7] = [
        Self::Maximized,
        Self::Left,
        Self::Right,
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    /// Token name used in host-facing strings (`"top-left"`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Maximized => "maximized",
            Self::Left => "left",
            Self::Right => "right",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        }
    }

    /// Canonical bounds for this preset.
    #[must_use]
    pub const fn bounds(self) -> Bounds {
        resolve(self)
    }
}

/// Resolve a preset to its canonical percentage bounds.
#[must_use]
pub const fn resolve(preset: PresetBound) -> Bounds {
    match preset {
        PresetBound::Maximized => Bounds::new(100.0, 100.0, 0.0, 0.0),
        PresetBound::Left => Bounds::new(50.0, 100.0, 0.0, 0.0),
        PresetBound::Right => Bounds::new(50.0, 100.0, 50.0, 0.0),
        PresetBound::TopLeft => Bounds::new(50.0, 50.0, 0.0, 0.0),
        PresetBound::TopRight => Bounds::new(50.0, 50.0, 50.0, 0.0),
        PresetBound::BottomLeft => Bounds::new(50.0, 50.0, 0.0, 50.0),
        PresetBound::BottomRight => Bounds::new(50.0, 50.0, 50.0, 50.0),
    }
}

impl fmt::Display for PresetBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetBound {
    type Err = ParsePresetBoundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.as_str() == s)
            .ok_or_else(|| ParsePresetBoundError {
                token: s.to_owned(),
            })
    }
}

/// A preset name outside the seven known tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePresetBoundError {
    pub token: String,
}

impl fmt::Display for ParsePresetBoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown preset bound {:?}", self.token)
    }
}

impl std::error::Error for ParsePresetBoundError {}
