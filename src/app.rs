//! Interactive front-end: one floating window with its grab-handle overlay.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use indoc::indoc;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;

use crate::client::{HandleSlot, WindowClient, WindowState};
use crate::config::{ConfigError, GroupConfig};
use crate::event_loop::ControlFlow;
use crate::geometry::{Geometry, Point};
use crate::gesture::Gesture;
use crate::handle::{
    CachedTextureFactory, Direction, GrabHandle, GrabHandleGroup, HandleFactories, HandlePosition,
    TextureSize,
};
use crate::layout::{ActionsMask, MaximizedMask};
use crate::term::decorator::{OpenStepDecorator, WindowDecorator};
use crate::term::{CellTextureFactory, HandleSurface, SharedSurface, TerminalImplFactory};

const HELP: &str = indoc! {"
    click window: toggle handles  drag handle: move/resize
    h handles  x/y maximize horz/vert  m/r allow move/resize
    f fullscreen  d decorations  q quit
"};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoConfig {
    pub group: GroupConfig,
    pub handle_size: TextureSize,
    pub frame_interval: Duration,
}

impl DemoConfig {
    pub fn new(
        fade_ms: u32,
        handle_width: u32,
        handle_height: u32,
        fps: u32,
    ) -> Result<Self, ConfigError> {
        if handle_width == 0 || handle_height == 0 {
            return Err(ConfigError::EmptyHandle {
                width: handle_width,
                height: handle_height,
            });
        }
        if !(1..=240).contains(&fps) {
            return Err(ConfigError::FrameRate(fps));
        }
        Ok(Self {
            group: GroupConfig::new(fade_ms)?,
            handle_size: TextureSize::new(handle_width, handle_height),
            frame_interval: Duration::from_secs(1) / fps,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovementRequest {
    pub origin: Point,
    pub direction: Direction,
    pub button: u32,
}

/// Receives the requests of the demo window's handles. Requests are queued
/// and applied by [`DemoApp`] once the press has returned.
#[derive(Debug, Default)]
pub struct DemoClient {
    pending: RefCell<Option<MovementRequest>>,
    raised: Cell<Option<HandlePosition>>,
}

impl DemoClient {
    pub fn take_request(&self) -> Option<MovementRequest> {
        self.pending.borrow_mut().take()
    }

    pub fn raised(&self) -> Option<HandlePosition> {
        self.raised.get()
    }
}

impl WindowClient for DemoClient {
    fn request_movement(&self, x: i32, y: i32, direction: Direction, button: u32) {
        tracing::debug!(x, y, ?direction, button, "movement requested");
        *self.pending.borrow_mut() = Some(MovementRequest {
            origin: Point::new(x, y),
            direction,
            button,
        });
    }

    fn raise_grab_handle(&self, handle: &GrabHandle) {
        self.raised.set(Some(handle.position()));
    }
}

pub struct DemoApp {
    client: Rc<DemoClient>,
    factories: HandleFactories,
    surface: SharedSurface,
    slot: HandleSlot,
    config: DemoConfig,
    bounds: Rect,
    /// Geometry while not maximized.
    floating: Geometry,
    state: WindowState,
    gesture: Option<Gesture>,
    animating: bool,
    carry: Duration,
    dirty: bool,
}

impl DemoApp {
    pub fn new(config: DemoConfig, bounds: Rect) -> Self {
        let surface = HandleSurface::shared();
        let factories = HandleFactories::new(
            TerminalImplFactory::new(Rc::clone(&surface)),
            CachedTextureFactory::new(CellTextureFactory::new(config.handle_size)),
        );
        let floating = Geometry::new(
            i32::from(bounds.x) + i32::from(bounds.width / 4),
            i32::from(bounds.y) + i32::from(bounds.height / 4),
            u32::from(bounds.width / 2),
            u32::from(bounds.height / 2),
        );
        let mut app = Self {
            client: Rc::new(DemoClient::default()),
            factories,
            surface,
            slot: HandleSlot::with_config(config.group),
            config,
            bounds,
            floating,
            state: WindowState {
                geometry: floating,
                maximized: MaximizedMask::empty(),
                actions: ActionsMask::MOVE | ActionsMask::RESIZE,
                fullscreen: false,
                decorated: true,
            },
            gesture: None,
            animating: false,
            carry: Duration::ZERO,
            dirty: true,
        };
        app.sync(false);
        app
    }

    fn owner(&self) -> Weak<dyn WindowClient> {
        let client: Rc<dyn WindowClient> = self.client.clone();
        Rc::downgrade(&client)
    }

    pub fn client(&self) -> &DemoClient {
        &self.client
    }

    pub fn state(&self) -> &WindowState {
        &self.state
    }

    pub fn group(&self) -> Option<&GrabHandleGroup> {
        self.slot.group()
    }

    fn effective_geometry(&self) -> Geometry {
        let bounds = Geometry::from(self.bounds);
        if self.state.fullscreen {
            return bounds;
        }
        let mut geometry = self.floating;
        if self.state.maximized.contains(MaximizedMask::HORZ) {
            geometry.x = bounds.x;
            geometry.width = bounds.width;
        }
        if self.state.maximized.contains(MaximizedMask::VERT) {
            geometry.y = bounds.y;
            geometry.height = bounds.height;
        }
        geometry
    }

    fn sync(&mut self, use_animation: bool) {
        self.state.geometry = self.effective_geometry();
        let owner = self.owner();
        self.slot.sync(&self.state, &owner, &self.factories, use_animation);
        self.dirty = true;
    }

    pub fn resize(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.sync(false);
    }

    pub fn toggle_handles(&mut self) {
        if let Some(group) = self.slot.group_mut() {
            group.toggle();
        }
    }

    pub fn toggle_maximized(&mut self, axis: MaximizedMask) {
        self.state.maximized.toggle(axis);
        self.sync(true);
    }

    pub fn toggle_action(&mut self, action: ActionsMask) {
        self.state.actions.toggle(action);
        self.sync(false);
    }

    pub fn toggle_fullscreen(&mut self) {
        self.state.fullscreen = !self.state.fullscreen;
        self.sync(false);
    }

    pub fn toggle_decorated(&mut self) {
        self.state.decorated = !self.state.decorated;
        self.sync(false);
    }

    /// Returns `true` when a handle took the press and a gesture started.
    pub fn press(&mut self, x: i32, y: i32, button: u32) -> bool {
        let Some(group) = self.slot.group() else {
            return false;
        };
        if !group.button_press_at(x, y, button) {
            if self.state.geometry.contains(x, y) {
                self.toggle_handles();
            }
            return false;
        }
        let Some(request) = self.client.take_request() else {
            return false;
        };
        if !self.state.maximized.is_empty() {
            // Dragging a maximized window restores it around its current
            // geometry first.
            self.floating = self.state.geometry;
            self.state.maximized = MaximizedMask::empty();
            self.sync(false);
        }
        self.gesture = Some(Gesture::new(
            request.direction,
            request.button,
            request.origin,
            self.floating,
        ));
        true
    }

    pub fn drag(&mut self, x: i32, y: i32) {
        let Some(gesture) = self.gesture else {
            return;
        };
        let next = gesture.apply(Point::new(x, y));
        if next != self.floating {
            self.floating = next;
            self.sync(false);
        }
    }

    pub fn release(&mut self) {
        if self.gesture.take().is_some() {
            tracing::debug!(geometry = ?self.floating, "gesture finished");
        }
    }

    /// Feeds elapsed frame time into the fade. Returns whether more frames
    /// are wanted.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        let Some(group) = self.slot.group_mut().filter(|group| group.needs_animate()) else {
            self.animating = false;
            self.carry = Duration::ZERO;
            return false;
        };
        // Time spent idle before the fade started does not count.
        let elapsed = if self.animating {
            elapsed
        } else {
            Duration::ZERO
        };
        self.animating = true;
        let total = self.carry + elapsed;
        let ms = total.as_millis().min(u128::from(u32::MAX)) as u32;
        self.carry = total.saturating_sub(Duration::from_millis(u64::from(ms)));
        let more = group.animate(ms);
        if !more {
            self.animating = false;
            self.carry = Duration::ZERO;
        }
        more
    }

    /// Whether anything changed since the last frame was drawn.
    pub fn take_redraw(&mut self) -> bool {
        let damaged = !self.surface.borrow_mut().take_damage().is_empty();
        std::mem::take(&mut self.dirty) || damaged
    }

    pub fn frame_interval(&self) -> Duration {
        self.config.frame_interval
    }

    pub fn handle_event(&mut self, event: &Event) -> ControlFlow {
        match event {
            Event::Key(key) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    return ControlFlow::Quit;
                }
                match key.code {
                    KeyCode::Char('q') => return ControlFlow::Quit,
                    KeyCode::Char('h') => self.toggle_handles(),
                    KeyCode::Char('x') => self.toggle_maximized(MaximizedMask::HORZ),
                    KeyCode::Char('y') => self.toggle_maximized(MaximizedMask::VERT),
                    KeyCode::Char('m') => self.toggle_action(ActionsMask::MOVE),
                    KeyCode::Char('r') => self.toggle_action(ActionsMask::RESIZE),
                    KeyCode::Char('f') => self.toggle_fullscreen(),
                    KeyCode::Char('d') => self.toggle_decorated(),
                    _ => {}
                }
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => self.resize(Rect::new(0, 0, *width, *height)),
            _ => {}
        }
        ControlFlow::Continue
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) {
        let (x, y) = (i32::from(mouse.column), i32::from(mouse.row));
        match mouse.kind {
            MouseEventKind::Down(button) => {
                self.press(x, y, button_code(button));
            }
            MouseEventKind::Drag(_) => self.drag(x, y),
            MouseEventKind::Up(_) => self.release(),
            _ => {}
        }
    }

    pub fn render(&self, frame: &mut Frame<'_>) {
        let area = frame.area();
        let help_height = (HELP.lines().count() as u16).min(area.height);
        let help_area = Rect {
            y: area.bottom().saturating_sub(help_height),
            height: help_height,
            ..area
        };

        let decorator = OpenStepDecorator;
        if let Some(window) = self.state.geometry.to_cell_rect() {
            let title = self.title();
            decorator.render_window(frame.buffer_mut(), window, area, &title);
        }
        if let Some(group) = self.slot.group() {
            decorator.render_handles(frame.buffer_mut(), group, area);
        }
        frame.render_widget(
            Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray)),
            help_area,
        );
    }

    fn title(&self) -> String {
        let handles = match self.slot.group() {
            Some(group) => format!("{:?} {:>3}%", group.state(), pct(group.opacity())),
            None => "no handles".to_string(),
        };
        let surface = self.surface.borrow();
        let mapped = surface.mapped().bits().count_ones();
        let presses = surface.presses();
        format!(
            "max {:?} | actions {:?} | {handles} | mapped {mapped} presses {presses}",
            self.state.maximized, self.state.actions
        )
    }
}

fn pct(opacity: u16) -> u32 {
    u32::from(opacity) * 100 / u32::from(u16::MAX)
}

fn button_code(button: MouseButton) -> u32 {
    match button {
        MouseButton::Left => 1,
        MouseButton::Middle => 2,
        MouseButton::Right => 3,
    }
}
