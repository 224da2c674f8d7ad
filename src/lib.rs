//! Grab-handle overlay for window move/resize gestures.
//!
//! Nine handles sit at the corners, edge midpoints and center of a window.
//! [`layout::layout_for_mask`] picks which of them are meaningful for the
//! window's maximization state and allowed actions,
//! [`handle::GrabHandleGroup`] positions them and fades them in and out, and
//! a press on a handle is turned into a move/resize request on the
//! [`client::WindowClient`] that owns the window. The overlay never moves a
//! window itself.
//!
//! The [`term`] module and [`app`] provide a terminal front-end built on
//! `ratatui`.

pub mod app;
pub mod client;
pub mod config;
pub mod constants;
pub mod drivers;
pub mod event_loop;
pub mod geometry;
pub mod gesture;
pub mod handle;
pub mod layout;
pub mod term;
pub mod tracing_sub;
