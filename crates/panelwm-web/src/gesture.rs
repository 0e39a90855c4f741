#![forbid(unsafe_code)]

//! Per-panel gesture state machine with explicit pointer-capture commands.
//!
//! The machine sequences host pointer lifecycle signals into drag and resize
//! sessions for one panel. It owns no geometry: callers pass the panel's
//! committed [`Bounds`] in by reference and the machine commits accepted
//! candidates into it.
//!
//! It enforces:
//! - one open session per panel, started by the primary button only,
//! - an `Acquire` capture command when a session opens and a `Release` when
//!   it closes (except after `lostpointercapture`, where the host already
//!   lost it), and
//! - cancellation on interruption paths (pointer-cancel, lost capture, blur,
//!   programmatic teardown).
//!
//! # Invariants
//!
//! 1. Every non-ignored dispatch carries a strictly increasing sequence.
//! 2. Ignored dispatches never mutate state or bounds.
//! 3. Exactly one session-closing dispatch follows every session-opening one.
//! 4. Rejected candidates leave the committed bounds untouched; the session
//!    continues from the new pointer position.

use panelwm_core::{Bounds, ContainerRect, PixelPoint};
use panelwm_layout::{
    FrameRejection, PresetBound, ResizeEdge, SizeLimits, SnapZone, check_drag_candidate,
    check_resize_candidate, compute_drag_bounds, compute_resize_bounds,
    correct_header_reachability, detect_snap,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::panel::PanelId;

/// Pointer button reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Host command for document-scoped pointer capture.
///
/// Hosts wire these to `setPointerCapture()` / `releasePointerCapture()` or
/// to attaching and detaching document-level move/up listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CaptureCommand {
    Acquire { pointer_id: u32 },
    Release { pointer_id: u32 },
}

/// Kind of an open gesture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    Drag,
    Resize,
}

/// Current machine state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    Idle,
    Dragging {
        pointer_id: u32,
        button: PointerButton,
        last_position: PixelPoint,
        /// Snap zone under the pointer at the last move.
        snap: Option<SnapZone>,
    },
    Resizing {
        pointer_id: u32,
        button: PointerButton,
        edge: ResizeEdge,
        last_position: PixelPoint,
    },
}

impl GestureState {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    #[must_use]
    pub const fn pointer_id(&self) -> Option<u32> {
        match self {
            Self::Idle => None,
            Self::Dragging { pointer_id, .. } | Self::Resizing { pointer_id, .. } => {
                Some(*pointer_id)
            }
        }
    }

    #[must_use]
    pub const fn kind(&self) -> Option<GestureKind> {
        match self {
            Self::Idle => None,
            Self::Dragging { .. } => Some(GestureKind::Drag),
            Self::Resizing { .. } => Some(GestureKind::Resize),
        }
    }
}

/// Why an open session was canceled instead of completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    PointerCancel,
    LostPointerCapture,
    Blur,
    /// Teardown paths: expand toggle, panel close, manager destroy.
    Programmatic,
}

/// Deterministic reason why an incoming lifecycle signal was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureIgnoredReason {
    ButtonNotAllowed,
    SessionAlreadyOpen,
    NoActiveSession,
    PointerMismatch,
    ButtonMismatch,
    /// Gestures are disabled (panel is expanded).
    Unavailable,
}

/// What one dispatch did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum GestureEffect {
    DragStarted {
        pointer_id: u32,
    },
    DragMoved {
        snap: Option<SnapZone>,
        rejection: Option<FrameRejection>,
    },
    DragEnded {
        snapped: Option<PresetBound>,
        corrected: bool,
    },
    ResizeStarted {
        pointer_id: u32,
        edge: ResizeEdge,
    },
    ResizeMoved {
        edge: ResizeEdge,
        rejection: Option<FrameRejection>,
    },
    ResizeEnded {
        edge: ResizeEdge,
        corrected: bool,
    },
    Canceled {
        kind: GestureKind,
        reason: CancelReason,
        corrected: bool,
    },
    Ignored {
        reason: GestureIgnoredReason,
    },
}

/// Result of one lifecycle dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureDispatch {
    /// `None` for ignored dispatches.
    pub sequence: Option<u64>,
    pub effect: GestureEffect,
    /// Committed bounds after this step.
    pub bounds: Bounds,
    /// False when the step was ignored or its candidate frame was rejected.
    pub applied: bool,
    pub capture_command: Option<CaptureCommand>,
}

impl GestureDispatch {
    /// Dispatch for a signal that changed nothing.
    #[must_use]
    pub const fn ignored(reason: GestureIgnoredReason, bounds: Bounds) -> Self {
        Self {
            sequence: None,
            effect: GestureEffect::Ignored { reason },
            bounds,
            applied: false,
            capture_command: None,
        }
    }

    #[must_use]
    pub const fn ignored_reason(&self) -> Option<GestureIgnoredReason> {
        match self.effect {
            GestureEffect::Ignored { reason } => Some(reason),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        self.ignored_reason().is_some()
    }
}

/// Geometry and policy inputs for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureContext {
    /// Container rectangle in client pixels.
    pub container: ContainerRect,
    pub limits: SizeLimits,
    pub header_height: f64,
    pub snap_threshold: f64,
}

/// Gesture state machine for a single panel.
#[derive(Debug, Clone)]
pub struct GestureMachine {
    panel: PanelId,
    state: GestureState,
    available: bool,
    next_sequence: u64,
}

impl GestureMachine {
    #[must_use]
    pub const fn new(panel: PanelId) -> Self {
        Self {
            panel,
            state: GestureState::Idle,
            available: true,
            next_sequence: 1,
        }
    }

    #[must_use]
    pub const fn state(&self) -> GestureState {
        self.state
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.state.is_active()
    }

    #[must_use]
    pub const fn active_pointer_id(&self) -> Option<u32> {
        self.state.pointer_id()
    }

    /// Snap zone proposed by the last drag move, if dragging.
    #[must_use]
    pub const fn snap_candidate(&self) -> Option<SnapZone> {
        match self.state {
            GestureState::Dragging { snap, .. } => snap,
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.available
    }

    /// Enable or disable new sessions. Does not touch an open session.
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Pointer-down on the panel header.
    pub fn begin_drag(
        &mut self,
        pointer_id: u32,
        button: PointerButton,
        position: PixelPoint,
        bounds: &Bounds,
    ) -> GestureDispatch {
        if let Some(reason) = self.start_blocker(button) {
            return self.ignored(reason, *bounds);
        }
        self.state = GestureState::Dragging {
            pointer_id,
            button,
            last_position: position,
            snap: None,
        };
        debug!(panel = self.panel.get(), pointer_id, "gesture: drag started");
        self.forward(
            GestureEffect::DragStarted { pointer_id },
            *bounds,
            true,
            Some(CaptureCommand::Acquire { pointer_id }),
        )
    }

    /// Pointer-down on a resize handle.
    pub fn begin_resize(
        &mut self,
        edge: ResizeEdge,
        pointer_id: u32,
        button: PointerButton,
        position: PixelPoint,
        bounds: &Bounds,
    ) -> GestureDispatch {
        if let Some(reason) = self.start_blocker(button) {
            return self.ignored(reason, *bounds);
        }
        self.state = GestureState::Resizing {
            pointer_id,
            button,
            edge,
            last_position: position,
        };
        debug!(panel = self.panel.get(), pointer_id, edge = %edge, "gesture: resize started");
        self.forward(
            GestureEffect::ResizeStarted { pointer_id, edge },
            *bounds,
            true,
            Some(CaptureCommand::Acquire { pointer_id }),
        )
    }

    /// Pointer-move anywhere in the document while a session is open.
    pub fn pointer_move(
        &mut self,
        pointer_id: u32,
        position: PixelPoint,
        bounds: &mut Bounds,
        ctx: &GestureContext,
    ) -> GestureDispatch {
        let size = ctx.container.size();
        match self.state {
            GestureState::Idle => self.ignored(GestureIgnoredReason::NoActiveSession, *bounds),
            GestureState::Dragging {
                pointer_id: active,
                button,
                last_position,
                ..
            } => {
                if active != pointer_id {
                    return self.mismatch(pointer_id, active, *bounds);
                }
                let delta = last_position.delta_to(position);
                let candidate =
                    compute_drag_bounds(delta, size, bounds.pixel_offset(size), *bounds);
                let snap = detect_snap(position, ctx.container, ctx.snap_threshold);
                self.state = GestureState::Dragging {
                    pointer_id,
                    button,
                    last_position: position,
                    snap,
                };
                let rejection = self.commit(check_drag_candidate(&candidate), candidate, bounds);
                trace!(
                    panel = self.panel.get(),
                    x = position.x,
                    y = position.y,
                    snap = ?snap,
                    applied = rejection.is_none(),
                    "gesture: drag move"
                );
                self.forward(
                    GestureEffect::DragMoved { snap, rejection },
                    *bounds,
                    rejection.is_none(),
                    None,
                )
            }
            GestureState::Resizing {
                pointer_id: active,
                button,
                edge,
                last_position,
            } => {
                if active != pointer_id {
                    return self.mismatch(pointer_id, active, *bounds);
                }
                let delta = last_position.delta_to(position);
                let candidate = compute_resize_bounds(delta, size, *bounds, edge);
                self.state = GestureState::Resizing {
                    pointer_id,
                    button,
                    edge,
                    last_position: position,
                };
                let rejection = self.commit(
                    check_resize_candidate(&candidate, size, ctx.limits),
                    candidate,
                    bounds,
                );
                trace!(
                    panel = self.panel.get(),
                    edge = %edge,
                    dx = delta.dx,
                    dy = delta.dy,
                    applied = rejection.is_none(),
                    "gesture: resize move"
                );
                self.forward(
                    GestureEffect::ResizeMoved { edge, rejection },
                    *bounds,
                    rejection.is_none(),
                    None,
                )
            }
        }
    }

    /// Pointer-up: complete the session and release capture.
    pub fn pointer_up(
        &mut self,
        pointer_id: u32,
        button: PointerButton,
        bounds: &mut Bounds,
        ctx: &GestureContext,
    ) -> GestureDispatch {
        let effect = match self.state {
            GestureState::Idle => {
                return self.ignored(GestureIgnoredReason::NoActiveSession, *bounds);
            }
            GestureState::Dragging {
                pointer_id: active,
                button: active_button,
                snap,
                ..
            } => {
                if let Some(ignored) =
                    self.release_blocker(pointer_id, button, active, active_button, *bounds)
                {
                    return ignored;
                }
                match snap {
                    Some(zone) => {
                        let preset = zone.preset();
                        *bounds = preset.bounds();
                        GestureEffect::DragEnded {
                            snapped: Some(preset),
                            corrected: false,
                        }
                    }
                    None => GestureEffect::DragEnded {
                        snapped: None,
                        corrected: correct_in_place(bounds, ctx),
                    },
                }
            }
            GestureState::Resizing {
                pointer_id: active,
                button: active_button,
                edge,
                ..
            } => {
                if let Some(ignored) =
                    self.release_blocker(pointer_id, button, active, active_button, *bounds)
                {
                    return ignored;
                }
                GestureEffect::ResizeEnded {
                    edge,
                    corrected: correct_in_place(bounds, ctx),
                }
            }
        };
        self.state = GestureState::Idle;
        debug!(panel = self.panel.get(), pointer_id, effect = ?effect, "gesture: session ended");
        self.forward(
            effect,
            *bounds,
            true,
            Some(CaptureCommand::Release { pointer_id }),
        )
    }

    /// Browser `pointercancel`. `None` matches any active pointer.
    pub fn pointer_cancel(
        &mut self,
        pointer_id: Option<u32>,
        bounds: &mut Bounds,
        ctx: &GestureContext,
    ) -> GestureDispatch {
        self.cancel_active(CancelReason::PointerCancel, pointer_id, true, bounds, ctx)
    }

    /// Browser `lostpointercapture`. Capture is already gone, so no release
    /// command is emitted.
    pub fn lost_pointer_capture(
        &mut self,
        pointer_id: u32,
        bounds: &mut Bounds,
        ctx: &GestureContext,
    ) -> GestureDispatch {
        self.cancel_active(
            CancelReason::LostPointerCapture,
            Some(pointer_id),
            false,
            bounds,
            ctx,
        )
    }

    /// Window blur.
    pub fn blur(&mut self, bounds: &mut Bounds, ctx: &GestureContext) -> GestureDispatch {
        self.cancel_active(CancelReason::Blur, None, true, bounds, ctx)
    }

    /// Cancel any open session from a teardown path.
    ///
    /// Returns `None` when already idle.
    pub fn force_cancel(
        &mut self,
        bounds: &mut Bounds,
        ctx: &GestureContext,
    ) -> Option<GestureDispatch> {
        if !self.state.is_active() {
            return None;
        }
        Some(self.cancel_active(CancelReason::Programmatic, None, true, bounds, ctx))
    }

    fn cancel_active(
        &mut self,
        reason: CancelReason,
        pointer_id: Option<u32>,
        release_capture: bool,
        bounds: &mut Bounds,
        ctx: &GestureContext,
    ) -> GestureDispatch {
        let (Some(active), Some(kind)) = (self.state.pointer_id(), self.state.kind()) else {
            return self.ignored(GestureIgnoredReason::NoActiveSession, *bounds);
        };
        if let Some(id) = pointer_id
            && id != active
        {
            return self.mismatch(id, active, *bounds);
        }
        let corrected = correct_in_place(bounds, ctx);
        self.state = GestureState::Idle;
        debug!(
            panel = self.panel.get(),
            pointer_id = active,
            reason = ?reason,
            corrected,
            "gesture: session canceled"
        );
        self.forward(
            GestureEffect::Canceled {
                kind,
                reason,
                corrected,
            },
            *bounds,
            true,
            release_capture.then_some(CaptureCommand::Release { pointer_id: active }),
        )
    }

    fn start_blocker(&self, button: PointerButton) -> Option<GestureIgnoredReason> {
        if !self.available {
            Some(GestureIgnoredReason::Unavailable)
        } else if button != PointerButton::Primary {
            Some(GestureIgnoredReason::ButtonNotAllowed)
        } else if self.state.is_active() {
            Some(GestureIgnoredReason::SessionAlreadyOpen)
        } else {
            None
        }
    }

    fn release_blocker(
        &self,
        pointer_id: u32,
        button: PointerButton,
        active: u32,
        active_button: PointerButton,
        bounds: Bounds,
    ) -> Option<GestureDispatch> {
        if pointer_id != active {
            Some(self.mismatch(pointer_id, active, bounds))
        } else if button != active_button {
            Some(self.ignored(GestureIgnoredReason::ButtonMismatch, bounds))
        } else {
            None
        }
    }

    fn commit(
        &self,
        verdict: Result<(), FrameRejection>,
        candidate: Bounds,
        bounds: &mut Bounds,
    ) -> Option<FrameRejection> {
        match verdict {
            Ok(()) => {
                *bounds = candidate;
                None
            }
            Err(rejection) => {
                trace!(
                    panel = self.panel.get(),
                    rejection = %rejection,
                    top = candidate.top,
                    width = candidate.width,
                    height = candidate.height,
                    "gesture: candidate rejected"
                );
                Some(rejection)
            }
        }
    }

    fn mismatch(&self, pointer_id: u32, active: u32, bounds: Bounds) -> GestureDispatch {
        warn!(
            panel = self.panel.get(),
            pointer_id,
            active_pointer_id = active,
            "gesture: pointer mismatch"
        );
        GestureDispatch::ignored(GestureIgnoredReason::PointerMismatch, bounds)
    }

    fn ignored(&self, reason: GestureIgnoredReason, bounds: Bounds) -> GestureDispatch {
        trace!(panel = self.panel.get(), reason = ?reason, "gesture: ignored");
        GestureDispatch::ignored(reason, bounds)
    }

    fn forward(
        &mut self,
        effect: GestureEffect,
        bounds: Bounds,
        applied: bool,
        capture_command: Option<CaptureCommand>,
    ) -> GestureDispatch {
        GestureDispatch {
            sequence: Some(self.next_sequence()),
            effect,
            bounds,
            applied,
            capture_command,
        }
    }

    fn next_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.saturating_add(1);
        sequence
    }
}

fn correct_in_place(bounds: &mut Bounds, ctx: &GestureContext) -> bool {
    match correct_header_reachability(*bounds, ctx.container.size(), ctx.header_height) {
        Some(fixed) => {
            *bounds = fixed;
            true
        }
        None => false,
    }
}
