//! Shared crate-wide constants.

/// Number of grab handles owned by every group: four corners, four edges
/// and the center.
pub const HANDLE_COUNT: usize = 9;

/// Fully opaque handle group.
pub const OPACITY_MAX: u16 = u16::MAX;

/// Duration of a complete fade, in milliseconds.
///
/// A single `animate(1)` step moves the opacity by `round(65535 / 450)`,
/// i.e. 146. A fade-in therefore saturates within `FADE_MSEC` one-millisecond
/// steps and a fade-out reaches zero within `FADE_MSEC - 1` of them.
pub const FADE_MSEC: u32 = 450;

/// Handle texture size used by the terminal front-end, in cells.
pub const DEFAULT_HANDLE_WIDTH: u32 = 3;
pub const DEFAULT_HANDLE_HEIGHT: u32 = 1;
