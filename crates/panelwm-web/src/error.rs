#![forbid(unsafe_code)]

//! Error types for the window manager surface.
//!
//! Only setup-time problems are errors. Geometric policy rejections during a
//! gesture are reported in the dispatch and never surface here.

use std::fmt;

use crate::config::ConfigError;
use crate::panel::PanelId;

/// Invalid panel identifier construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelIdError {
    /// Panel ids start at 1.
    Zero,
    /// The id allocator ran past `u64::MAX`.
    Overflow { current: PanelId },
}

impl fmt::Display for PanelIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => write!(f, "panel id 0 is invalid"),
            Self::Overflow { current } => {
                write!(f, "panel id overflow after {}", current.get())
            }
        }
    }
}

impl std::error::Error for PanelIdError {}

/// Window manager setup and lookup failures.
#[derive(Debug)]
pub enum WmError {
    /// The container has zero, negative or non-finite pixel extent.
    InvalidContainer { width: f64, height: f64 },
    /// A content constructor was registered twice under the same name.
    DuplicateConstructor { name: String },
    /// No content constructor is registered for a schema's name.
    MissingConstructor { name: String },
    /// The id does not refer to a live panel.
    UnknownPanel { id: PanelId },
    /// Expand toggle requested on a panel created with `is_expandable = false`.
    NotExpandable { id: PanelId },
    /// Options failed to load or validate.
    Config(ConfigError),
    /// Panel id allocation failed.
    PanelId(PanelIdError),
    /// Schema export failed.
    Serialize(serde_json::Error),
}

impl fmt::Display for WmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidContainer { width, height } => {
                write!(f, "container size {width}x{height} cannot host panels")
            }
            Self::DuplicateConstructor { name } => {
                write!(f, "constructor for {name:?} is already registered")
            }
            Self::MissingConstructor { name } => {
                write!(f, "constructor for {name:?} is not defined")
            }
            Self::UnknownPanel { id } => write!(f, "panel {} not found", id.get()),
            Self::NotExpandable { id } => write!(f, "panel {} is not expandable", id.get()),
            Self::Config(err) => write!(f, "invalid options: {err}"),
            Self::PanelId(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "schema serialization failed: {err}"),
        }
    }
}

impl std::error::Error for WmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::PanelId(err) => Some(err),
            Self::Serialize(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for WmError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<PanelIdError> for WmError {
    fn from(err: PanelIdError) -> Self {
        Self::PanelId(err)
    }
}
