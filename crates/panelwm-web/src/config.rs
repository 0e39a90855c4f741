#![forbid(unsafe_code)]

//! Window manager options.
//!
//! Every knob is optional. Unset values fall back to the documented
//! defaults, so `WindowManagerOptions::default()` behaves exactly like the
//! hardcoded constants in `panelwm-layout`.
//!
//! # Loading
//!
//! ```toml
//! # panelwm.toml
//! snap_threshold = 16.0
//! min_window_width = 240.0
//! ```
//!
//! ```rust,ignore
//! let options = WindowManagerOptions::from_toml_file("panelwm.toml")?;
//! let options = WindowManagerOptions::from_json_str(r#"{"header_height": 28.0}"#)?;
//! ```
//!
//! TOML loading requires the `config-file` feature.

#[cfg(feature = "config-file")]
use std::path::Path;

use panelwm_core::ContainerRect;
use panelwm_layout::{
    DEFAULT_HEADER_HEIGHT, DEFAULT_MIN_WINDOW_HEIGHT, DEFAULT_MIN_WINDOW_WIDTH,
    DEFAULT_SNAP_THRESHOLD, SizeLimits,
};
use serde::{Deserialize, Serialize};

use crate::gesture::GestureContext;

/// Panels are closable unless their schema says otherwise.
pub const DEFAULT_IS_CLOSABLE: bool = true;
/// Panels are expandable unless their schema says otherwise.
pub const DEFAULT_IS_EXPANDABLE: bool = true;

/// Host-supplied manager options. All fields are optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowManagerOptions {
    /// Snap activation margin in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snap_threshold: Option<f64>,
    /// Minimum panel width in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_window_width: Option<f64>,
    /// Minimum panel height in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_window_height: Option<f64>,
    /// Header strip height in pixels, used by the reachability correction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_height: Option<f64>,
}

impl WindowManagerOptions {
    /// Load from a TOML string.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Validate every set field.
    ///
    /// Returns a list of validation errors. An empty list means the options
    /// are valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let fields = [
            ("snap_threshold", self.snap_threshold),
            ("min_window_width", self.min_window_width),
            ("min_window_height", self.min_window_height),
            ("header_height", self.header_height),
        ];
        for (name, value) in fields {
            let Some(value) = value else { continue };
            if !value.is_finite() {
                errors.push(format!("{name} must be finite, got {value}"));
            } else if value < 0.0 {
                errors.push(format!("{name} must be >= 0, got {value}"));
            }
        }
        errors
    }

    /// Fill in defaults after validating.
    pub fn resolve(&self) -> Result<ResolvedOptions, ConfigError> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }
        Ok(ResolvedOptions {
            snap_threshold: self.snap_threshold.unwrap_or(DEFAULT_SNAP_THRESHOLD),
            limits: SizeLimits::new(
                self.min_window_width.unwrap_or(DEFAULT_MIN_WINDOW_WIDTH),
                self.min_window_height.unwrap_or(DEFAULT_MIN_WINDOW_HEIGHT),
            ),
            header_height: self.header_height.unwrap_or(DEFAULT_HEADER_HEIGHT),
        })
    }
}

/// Options with every default applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedOptions {
    pub snap_threshold: f64,
    pub limits: SizeLimits,
    pub header_height: f64,
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        Self {
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
            limits: SizeLimits::default(),
            header_height: DEFAULT_HEADER_HEIGHT,
        }
    }
}

impl ResolvedOptions {
    /// Gesture parameters for a container of the given client rectangle.
    #[must_use]
    pub const fn gesture_context(&self, container: ContainerRect) -> GestureContext {
        GestureContext {
            container,
            limits: self.limits,
            header_height: self.header_height,
            snap_threshold: self.snap_threshold,
        }
    }
}

/// Options loading or validation failure.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config-file")]
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config-file")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config-file")]
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
