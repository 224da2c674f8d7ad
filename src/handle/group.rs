use std::rc::{Rc, Weak};

use super::{GrabHandle, HandleFactories, HandlePosition, HandleSet};
use crate::client::WindowClient;
use crate::config::GroupConfig;
use crate::constants::{HANDLE_COUNT, OPACITY_MAX};
use crate::geometry::Geometry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FadeState {
    FadeIn,
    FadeOut,
    #[default]
    Idle,
}

/// The nine handles of one window plus their shared fade animation.
///
/// The group is driven from the compositor thread: geometry changes arrive
/// through [`relayout`](Self::relayout), visibility changes through
/// [`show`](Self::show) / [`hide`](Self::hide), and a frame source calls
/// [`animate`](Self::animate) for as long as
/// [`needs_animate`](Self::needs_animate) reports `true`. A fade that stops
/// receiving frames simply holds its current opacity.
#[derive(Debug)]
pub struct GrabHandleGroup {
    handles: [GrabHandle; HANDLE_COUNT],
    active: HandleSet,
    /// Handles the caller asked to show since the last `hide`.
    requested: HandleSet,
    /// Handles the compositor should paint; survives `hide` until the
    /// fade-out has finished.
    painted: HandleSet,
    /// Window rectangle of the last relayout.
    laid_out: Option<Geometry>,
    state: FadeState,
    opacity: u16,
    config: GroupConfig,
}

impl GrabHandleGroup {
    pub fn create(owner: Weak<dyn WindowClient>, factories: &HandleFactories) -> Self {
        Self::with_config(owner, factories, GroupConfig::default())
    }

    pub fn with_config(
        owner: Weak<dyn WindowClient>,
        factories: &HandleFactories,
        config: GroupConfig,
    ) -> Self {
        let texture = factories.textures.create();
        let handles = HandlePosition::ALL.map(|position| {
            GrabHandle::new(
                position,
                Rc::clone(&texture),
                factories.impls.create(position),
                owner.clone(),
            )
        });
        tracing::debug!(
            size = ?texture.size(),
            ready = texture.is_ready(),
            fade_msec = config.fade_msec(),
            "created grab handle group"
        );
        Self {
            handles,
            active: HandleSet::all(),
            requested: HandleSet::empty(),
            painted: HandleSet::empty(),
            laid_out: None,
            state: FadeState::Idle,
            opacity: 0,
            config,
        }
    }

    pub fn handle(&self, position: HandlePosition) -> &GrabHandle {
        &self.handles[position.index()]
    }

    pub fn handles(&self) -> impl Iterator<Item = &GrabHandle> {
        self.handles.iter()
    }

    pub fn active_handles(&self) -> HandleSet {
        self.active
    }

    pub fn state(&self) -> FadeState {
        self.state
    }

    pub fn opacity(&self) -> u16 {
        self.opacity
    }

    pub fn visible(&self) -> bool {
        self.opacity > 0
    }

    pub fn needs_animate(&self) -> bool {
        self.state != FadeState::Idle
    }

    /// Whether the group is on its way to (or at) being shown.
    fn showing(&self) -> bool {
        match self.state {
            FadeState::FadeIn => true,
            FadeState::FadeOut => false,
            FadeState::Idle => self.opacity > 0,
        }
    }

    /// Replaces the set of meaningful handles. Handles leaving the set are
    /// unmapped right away; handles entering it are moved to the last laid
    /// out rectangle, then mapped when the group is currently shown and the
    /// caller had asked for them.
    pub fn set_active_handles(&mut self, active: HandleSet) {
        if active == self.active {
            return;
        }
        tracing::debug!(from = ?self.active, to = ?active, "active handles changed");
        for position in (self.active - active).positions() {
            self.handles[position.index()].hide();
        }
        if let Some(rect) = self.laid_out {
            for position in (active - self.active).positions() {
                self.handles[position.index()].reposition(position.anchor(rect), false);
            }
        }
        self.active = active;
        self.painted &= active;
        if self.showing() {
            let entering = self.requested & active;
            for position in entering.positions() {
                self.handles[position.index()].show();
            }
            self.painted |= entering;
        }
    }

    /// Repositions every active handle around the window rectangle `rect`.
    pub fn relayout(&mut self, rect: Geometry, use_animation: bool) {
        self.laid_out = Some(rect);
        for position in self.active.positions() {
            self.handles[position.index()].reposition(position.anchor(rect), use_animation);
        }
    }

    /// Maps the requested handles (restricted to the active set) and starts
    /// fading in from the current opacity.
    pub fn show(&mut self, handles: HandleSet) {
        let mapped = handles & self.active;
        for position in mapped.positions() {
            self.handles[position.index()].show();
        }
        self.requested |= handles;
        self.painted |= mapped;
        if self.opacity < OPACITY_MAX {
            self.transition(FadeState::FadeIn);
        } else {
            self.transition(FadeState::Idle);
        }
    }

    pub fn show_all(&mut self) {
        self.show(HandleSet::all());
    }

    /// Unmaps every handle and starts fading out from the current opacity.
    pub fn hide(&mut self) {
        for handle in &mut self.handles {
            handle.hide();
        }
        self.requested = HandleSet::empty();
        if self.opacity > 0 {
            self.transition(FadeState::FadeOut);
        } else {
            self.painted = HandleSet::empty();
            self.transition(FadeState::Idle);
        }
    }

    pub fn toggle(&mut self) {
        if self.showing() {
            self.hide();
        } else {
            self.show_all();
        }
    }

    /// Advances the fade by `elapsed_ms` and returns whether more frames
    /// are needed. A no-op while idle.
    pub fn animate(&mut self, elapsed_ms: u32) -> bool {
        let step = self.fade_step(elapsed_ms);
        match self.state {
            FadeState::Idle => return false,
            FadeState::FadeIn => {
                let next = u32::from(self.opacity) + step;
                if next >= u32::from(OPACITY_MAX) {
                    self.opacity = OPACITY_MAX;
                    self.transition(FadeState::Idle);
                } else {
                    self.opacity = next as u16;
                }
            }
            FadeState::FadeOut => {
                let next = u32::from(self.opacity).saturating_sub(step);
                if next == 0 {
                    self.opacity = 0;
                    self.transition(FadeState::Idle);
                } else {
                    self.opacity = next as u16;
                }
            }
        }
        for position in self.painted.positions() {
            self.handles[position.index()].damage();
        }
        if self.opacity == 0 {
            self.painted = HandleSet::empty();
        }
        self.needs_animate()
    }

    /// `round(elapsed_ms * 65535 / fade_msec)`, saturated to a full fade.
    fn fade_step(&self, elapsed_ms: u32) -> u32 {
        let fade = u64::from(self.config.fade_msec());
        let scaled = u64::from(elapsed_ms) * u64::from(OPACITY_MAX) + fade / 2;
        (scaled / fade).min(u64::from(OPACITY_MAX)) as u32
    }

    fn transition(&mut self, next: FadeState) {
        if self.state != next {
            tracing::trace!(from = ?self.state, to = ?next, opacity = self.opacity, "fade state");
            self.state = next;
        }
    }

    /// Mapped handle under `(x, y)`, corners and edges taking precedence
    /// over the center when they overlap.
    pub fn handle_at(&self, x: i32, y: i32) -> Option<HandlePosition> {
        self.handles
            .iter()
            .find(|handle| handle.is_mapped() && handle.rect().contains(x, y))
            .map(GrabHandle::position)
    }

    /// Routes a press to the handle under the pointer. Returns `false` when
    /// no mapped handle is hit.
    pub fn button_press_at(&self, x: i32, y: i32, button: u32) -> bool {
        match self.handle_at(x, y) {
            Some(position) => {
                self.handles[position.index()].button_press(x, y, button);
                true
            }
            None => false,
        }
    }

    /// Handles the compositor should paint this frame, at
    /// [`opacity`](Self::opacity). Handles whose texture is not ready are
    /// skipped.
    pub fn drawable_handles(&self) -> impl Iterator<Item = &GrabHandle> {
        let painted = if self.visible() {
            self.painted
        } else {
            HandleSet::empty()
        };
        self.handles.iter().filter(move |handle| {
            painted.contains(handle.position().flag()) && handle.texture().is_ready()
        })
    }
}
