#![forbid(unsafe_code)]

//! panelwm public facade crate.
//!
//! Re-exports the types a host page needs from the internal crates and
//! offers a prelude for day-to-day usage.

// --- Core re-exports -------------------------------------------------------

pub use panelwm_core::{
    Bounds, ContainerRect, EventChannel, PixelDelta, PixelPoint, PixelRect, PixelSize,
    Subscription,
};

// --- Layout re-exports -----------------------------------------------------

pub use panelwm_layout::{
    FrameRejection, ParsePresetBoundError, ParseResizeEdgeError, PresetBound, ResizeEdge,
    SizeLimits, SnapDetector, SnapZone, StackChange, StackOrder,
};

// --- Web re-exports --------------------------------------------------------

pub use panelwm_web::{
    CaptureCommand, ClosedPanel, ConfigError, GestureDispatch, GestureEffect, HitTarget,
    ManagerEvent, Panel, PanelEvent, PanelHandle, PanelId, PanelSchema, PointerButton,
    WindowManager, WindowManagerOptions, WmError,
};

/// Standard result type for panelwm APIs.
pub type Result<T> = std::result::Result<T, WmError>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Bounds, CaptureCommand, ContainerRect, HitTarget, ManagerEvent, PanelEvent, PanelId,
        PanelSchema, PixelPoint, PointerButton, PresetBound, ResizeEdge, Result, SnapZone,
        WindowManager, WindowManagerOptions, WmError,
    };

    pub use crate::{core, layout, web};
}

pub use panelwm_core as core;
pub use panelwm_layout as layout;
pub use panelwm_web as web;

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn prelude_drives_a_manager() -> Result<()> {
        let schema = vec![PanelSchema::new(
            "Editor",
            "editor",
            Bounds::new(50.0, 50.0, 10.0, 10.0),
        )];
        let mut wm = WindowManager::new(
            ContainerRect::from_size(800.0, 600.0),
            schema,
            WindowManagerOptions::default(),
        )?;
        wm.register_constructor("editor", |_| {})?;
        let ids = wm.init()?;
        assert_eq!(ids, vec![PanelId::MIN]);

        let down = wm.pointer_down(
            PanelId::MIN,
            HitTarget::Header,
            1,
            PointerButton::Primary,
            PixelPoint::new(100.0, 70.0),
        )?;
        assert_eq!(
            down.and_then(|d| d.capture_command),
            Some(CaptureCommand::Acquire { pointer_id: 1 })
        );
        Ok(())
    }

    #[test]
    fn preset_tokens_parse_through_facade() {
        let preset: PresetBound = "top-left".parse().expect("known token");
        assert_eq!(preset.bounds(), Bounds::new(50.0, 50.0, 0.0, 0.0));
        assert!("middle".parse::<PresetBound>().is_err());
        assert!("north".parse::<ResizeEdge>().is_err());
    }
}
