#![forbid(unsafe_code)]

//! Core: geometry and notification primitives shared by every panelwm crate.
//!
//! # Role in panelwm
//! `panelwm-core` owns the vocabulary. Panel rectangles are [`Bounds`] in
//! container percentages; pointer input and container measurements are
//! pixel types. Components publish notifications through their own typed
//! [`EventChannel`].
//!
//! # How it fits in the system
//! `panelwm-layout` builds the pure processors (drag, resize, snap, presets,
//! stacking) on these types, and `panelwm-web` drives them from host pointer
//! events.

pub mod event_channel;
pub mod geometry;

pub use event_channel::{EventChannel, Subscription};
pub use geometry::{
    Bounds, ContainerRect, EdgeDistances, PixelDelta, PixelPoint, PixelRect, PixelSize,
    percent_of, pixels_of,
};
