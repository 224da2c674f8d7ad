//! The window side of the overlay.
//!
//! A [`WindowClient`] receives the gestures that handle presses start; it
//! owns drag tracking and the actual move/resize. [`HandleSlot`] keeps a
//! window's group in step with its state: created when the window becomes
//! eligible, dropped when it stops being so.

use std::rc::Weak;

use crate::config::GroupConfig;
use crate::geometry::Geometry;
use crate::handle::{Direction, GrabHandle, GrabHandleGroup, HandleFactories, HandleSet};
use crate::layout::{ActionsMask, MaximizedMask, layout_for_mask};

pub trait WindowClient {
    /// Begin a move (`Direction::MOVE`) or a resize along the given edges.
    /// Called synchronously from the press; never retried.
    fn request_movement(&self, x: i32, y: i32, direction: Direction, button: u32);

    /// Stack `handle` above sibling windows for the duration of a gesture.
    fn raise_grab_handle(&self, handle: &GrabHandle);
}

/// The bits of window state the overlay cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowState {
    pub geometry: Geometry,
    pub maximized: MaximizedMask,
    pub actions: ActionsMask,
    pub fullscreen: bool,
    pub decorated: bool,
}

impl WindowState {
    /// Movable or resizable, decorated, and not fullscreen.
    pub fn is_eligible(&self) -> bool {
        self.actions.intersects(ActionsMask::MOVE | ActionsMask::RESIZE)
            && !self.fullscreen
            && self.decorated
    }

    pub fn active_handles(&self) -> HandleSet {
        layout_for_mask(self.maximized, self.actions)
    }
}

/// Holds the group of one window, if it currently has one.
#[derive(Debug, Default)]
pub struct HandleSlot {
    group: Option<GrabHandleGroup>,
    config: GroupConfig,
}

impl HandleSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups created by this slot use `config`.
    pub fn with_config(config: GroupConfig) -> Self {
        Self {
            group: None,
            config,
        }
    }

    pub fn group(&self) -> Option<&GrabHandleGroup> {
        self.group.as_ref()
    }

    pub fn group_mut(&mut self) -> Option<&mut GrabHandleGroup> {
        self.group.as_mut()
    }

    /// Brings the group in line with `state`: creates or drops it on
    /// eligibility changes, then applies the layout policy and relayouts.
    pub fn sync(
        &mut self,
        state: &WindowState,
        owner: &Weak<dyn WindowClient>,
        factories: &HandleFactories,
        use_animation: bool,
    ) -> Option<&mut GrabHandleGroup> {
        if !state.is_eligible() {
            if self.group.take().is_some() {
                tracing::debug!(?state, "window no longer eligible for grab handles");
            }
            return None;
        }

        let config = self.config;
        let group = self.group.get_or_insert_with(|| {
            tracing::debug!(geometry = ?state.geometry, "window became eligible for grab handles");
            GrabHandleGroup::with_config(owner.clone(), factories, config)
        });
        group.set_active_handles(state.active_handles());
        group.relayout(state.geometry, use_animation);
        Some(group)
    }

    /// Drops the group, e.g. when its window is destroyed.
    pub fn clear(&mut self) {
        self.group = None;
    }
}
