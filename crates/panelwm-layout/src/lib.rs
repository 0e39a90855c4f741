#![forbid(unsafe_code)]

//! Layout: pure geometry processors for panels.
//!
//! # Role in panelwm
//! Everything here is a deterministic function of its inputs. The gesture
//! layer in `panelwm-web` feeds pointer deltas in and decides what to commit;
//! this crate only computes candidates and classifies positions.
//!
//! | Module | Responsibility |
//! |---|---|
//! | [`drag`] | translate a panel by a pointer delta |
//! | [`resize`] | move the edges selected by a [`ResizeEdge`] |
//! | [`preset`] | the seven canonical placements |
//! | [`snap`] | pointer position to [`SnapZone`] |
//! | [`constraints`] | candidate rejection and header reachability |
//! | [`stack`] | dense paint-order ordinals |

pub mod constraints;
pub mod drag;
pub mod preset;
pub mod resize;
pub mod snap;
pub mod stack;

pub use constraints::{
    DEFAULT_HEADER_HEIGHT, DEFAULT_MIN_WINDOW_HEIGHT, DEFAULT_MIN_WINDOW_WIDTH, FrameRejection,
    SizeLimits, check_drag_candidate, check_resize_candidate, correct_header_reachability,
};
pub use drag::compute_drag_bounds;
pub use preset::{ParsePresetBoundError, PresetBound, resolve};
pub use resize::{ParseResizeEdgeError, ResizeEdge, compute_resize_bounds};
pub use snap::{DEFAULT_SNAP_THRESHOLD, SnapDetector, SnapZone, detect_snap};
pub use stack::{StackChange, StackOrder};
