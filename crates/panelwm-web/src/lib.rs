#![forbid(unsafe_code)]

//! `panelwm-web` drives the panelwm layout processors from host pointer
//! events.
//!
//! Design goals:
//! - **Host-driven input**: the embedding page pushes pointer lifecycle
//!   signals and container size changes.
//! - **Explicit capture**: instead of attaching document listeners, every
//!   session hands back `Acquire`/`Release` capture commands for the host to
//!   apply.
//! - **No blocking / no threads**: every call returns synchronously.
//!
//! This crate does not bind to a DOM. It provides the state the host renders
//! from: per-panel bounds, stack order, snap preview and notifications.

pub mod config;
pub mod error;
pub mod gesture;
pub mod manager;
pub mod panel;

pub use config::{
    ConfigError, DEFAULT_IS_CLOSABLE, DEFAULT_IS_EXPANDABLE, ResolvedOptions, WindowManagerOptions,
};
pub use error::{PanelIdError, WmError};
pub use gesture::{
    CancelReason, CaptureCommand, GestureContext, GestureDispatch, GestureEffect,
    GestureIgnoredReason, GestureKind, GestureMachine, GestureState, PointerButton,
};
pub use manager::{ClosedPanel, HitTarget, ManagerEvent, WindowManager};
pub use panel::{
    ContentCtor, ExpandToggle, Panel, PanelEvent, PanelHandle, PanelId, PanelSchema, SchemaCtor,
};
