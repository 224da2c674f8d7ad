//! Selection of the active grab-handle subset from window state.
//!
//! A maximized axis has no free edge to drag along, so the edge handles for
//! that axis disappear, and any maximization removes the corners (a corner
//! always resizes along both axes). The center handle moves the window and is
//! only offered while moving is allowed.

use bitflags::bitflags;

use crate::handle::HandleSet;

bitflags! {
    /// Axes along which a window is currently maximized.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MaximizedMask: u32 {
        const HORZ = 1 << 0;
        const VERT = 1 << 1;
    }
}

bitflags! {
    /// Window operations the window manager currently permits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ActionsMask: u32 {
        const MOVE = 1 << 0;
        const RESIZE = 1 << 1;
    }
}

/// Returns the handles that should be active for a window with the given
/// maximization state and allowed actions.
///
/// An empty result is a valid outcome (e.g. a fully maximized window that
/// may only be resized), not an error.
pub fn layout_for_mask(maximized: MaximizedMask, actions: ActionsMask) -> HandleSet {
    let mut handles = HandleSet::empty();

    if actions.contains(ActionsMask::RESIZE) {
        handles |= HandleSet::EDGES;
        if !maximized.is_empty() {
            handles -= HandleSet::CORNERS;
        }
        if maximized.contains(MaximizedMask::HORZ) {
            handles -= HandleSet::LEFT | HandleSet::RIGHT;
        }
        if maximized.contains(MaximizedMask::VERT) {
            handles -= HandleSet::TOP | HandleSet::BOTTOM;
        }
    }

    if actions.contains(ActionsMask::MOVE) {
        handles |= HandleSet::MIDDLE;
    }

    handles
}
