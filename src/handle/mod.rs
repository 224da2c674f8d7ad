pub mod factory;
mod group;

use std::rc::{Rc, Weak};

use bitflags::bitflags;

use crate::client::WindowClient;
use crate::constants::HANDLE_COUNT;
use crate::geometry::{Geometry, Point, to_i32};

pub use factory::{
    CachedTextureFactory, HandleFactories, HandleImpl, HandleTexture, ImplFactory, TextureFactory,
    TextureSize,
};
pub use group::{FadeState, GrabHandleGroup};

bitflags! {
    /// A set of handles, one bit per [`HandlePosition`] in clockwise order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HandleSet: u32 {
        const TOP_LEFT = 1 << 0;
        const TOP = 1 << 1;
        const TOP_RIGHT = 1 << 2;
        const RIGHT = 1 << 3;
        const BOTTOM_RIGHT = 1 << 4;
        const BOTTOM = 1 << 5;
        const BOTTOM_LEFT = 1 << 6;
        const LEFT = 1 << 7;
        const MIDDLE = 1 << 8;
    }
}

impl HandleSet {
    pub const CORNERS: Self = Self::TOP_LEFT
        .union(Self::TOP_RIGHT)
        .union(Self::BOTTOM_RIGHT)
        .union(Self::BOTTOM_LEFT);

    /// Every handle except the center one.
    pub const EDGES: Self = Self::all().difference(Self::MIDDLE);

    pub fn positions(self) -> impl Iterator<Item = HandlePosition> {
        HandlePosition::ALL
            .into_iter()
            .filter(move |position| self.contains(position.flag()))
    }
}

bitflags! {
    /// Direction of a requested move/resize gesture.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Direction: u32 {
        const NORTH = 1 << 0;
        const EAST = 1 << 1;
        const SOUTH = 1 << 2;
        const WEST = 1 << 3;
        const MOVE = 1 << 4;
    }
}

bitflags! {
    /// Flags passed along with a position lock to the platform impl.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PositionFlags: u32 {
        const SET_X = 1 << 0;
        const SET_Y = 1 << 1;
        /// The impl may interpolate towards the new position.
        const ANIMATE = 1 << 2;
    }
}

/// Identity of one of the nine handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HandlePosition {
    TopLeft = 0,
    Top = 1,
    TopRight = 2,
    Right = 3,
    BottomRight = 4,
    Bottom = 5,
    BottomLeft = 6,
    Left = 7,
    Middle = 8,
}

impl HandlePosition {
    pub const ALL: [HandlePosition; HANDLE_COUNT] = [
        HandlePosition::TopLeft,
        HandlePosition::Top,
        HandlePosition::TopRight,
        HandlePosition::Right,
        HandlePosition::BottomRight,
        HandlePosition::Bottom,
        HandlePosition::BottomLeft,
        HandlePosition::Left,
        HandlePosition::Middle,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn flag(self) -> HandleSet {
        HandleSet::from_bits_retain(1 << self as u32)
    }

    /// The point of `rect` this handle is centered on.
    pub fn anchor(self, rect: Geometry) -> Point {
        let half_w = to_i32(rect.width / 2);
        let half_h = to_i32(rect.height / 2);
        let (left, top) = (rect.x, rect.y);
        let (right, bottom) = (rect.right(), rect.bottom());
        let (mid_x, mid_y) = (left.saturating_add(half_w), top.saturating_add(half_h));
        match self {
            HandlePosition::TopLeft => Point::new(left, top),
            HandlePosition::Top => Point::new(mid_x, top),
            HandlePosition::TopRight => Point::new(right, top),
            HandlePosition::Right => Point::new(right, mid_y),
            HandlePosition::BottomRight => Point::new(right, bottom),
            HandlePosition::Bottom => Point::new(mid_x, bottom),
            HandlePosition::BottomLeft => Point::new(left, bottom),
            HandlePosition::Left => Point::new(left, mid_y),
            HandlePosition::Middle => Point::new(mid_x, mid_y),
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            HandlePosition::TopLeft => Direction::NORTH | Direction::WEST,
            HandlePosition::Top => Direction::NORTH,
            HandlePosition::TopRight => Direction::NORTH | Direction::EAST,
            HandlePosition::Right => Direction::EAST,
            HandlePosition::BottomRight => Direction::SOUTH | Direction::EAST,
            HandlePosition::Bottom => Direction::SOUTH,
            HandlePosition::BottomLeft => Direction::SOUTH | Direction::WEST,
            HandlePosition::Left => Direction::WEST,
            HandlePosition::Middle => Direction::MOVE,
        }
    }

    /// EWMH `_NET_WM_MOVERESIZE` action for this handle. The clockwise
    /// ordering lines up with the protocol numbering (`SIZE_TOPLEFT` = 0
    /// through `SIZE_LEFT` = 7, `MOVE` = 8).
    pub const fn moveresize_code(self) -> u32 {
        self as u32
    }
}

/// One interactive region of a window overlay.
///
/// The handle owns its platform impl exclusively; its link to the window is
/// a weak observer reference so that group and window never keep each other
/// alive.
pub struct GrabHandle {
    position: HandlePosition,
    rect: Geometry,
    texture: Rc<dyn HandleTexture>,
    imp: Box<dyn HandleImpl>,
    owner: Weak<dyn WindowClient>,
    mapped: bool,
}

impl std::fmt::Debug for GrabHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrabHandle")
            .field("position", &self.position)
            .field("rect", &self.rect)
            .field("mapped", &self.mapped)
            .finish_non_exhaustive()
    }
}

impl GrabHandle {
    pub(crate) fn new(
        position: HandlePosition,
        texture: Rc<dyn HandleTexture>,
        imp: Box<dyn HandleImpl>,
        owner: Weak<dyn WindowClient>,
    ) -> Self {
        let size = texture.size();
        Self {
            position,
            rect: Geometry::new(0, 0, size.width, size.height),
            texture,
            imp,
            owner,
            mapped: false,
        }
    }

    pub fn position(&self) -> HandlePosition {
        self.position
    }

    pub fn rect(&self) -> Geometry {
        self.rect
    }

    pub fn texture(&self) -> &Rc<dyn HandleTexture> {
        &self.texture
    }

    pub fn is_mapped(&self) -> bool {
        self.mapped
    }

    /// Centers the handle on `anchor` and locks the impl to the new top-left.
    pub fn reposition(&mut self, anchor: Point, use_animation: bool) {
        let previous = self.rect;
        self.rect = Geometry::centered_on(anchor, self.rect.width, self.rect.height);

        let mut flags = PositionFlags::SET_X | PositionFlags::SET_Y;
        if use_animation {
            flags |= PositionFlags::ANIMATE;
        }
        self.imp.lock_position(self.rect.x, self.rect.y, flags);

        if self.mapped && previous != self.rect {
            self.imp.damage(previous);
            self.imp.damage(self.rect);
        }
    }

    /// Asks the owning window to start a gesture in this handle's direction.
    pub fn button_press(&self, x: i32, y: i32, button: u32) {
        self.imp.button_press(x, y, button);
        let Some(owner) = self.owner.upgrade() else {
            tracing::debug!(handle = ?self.position, "press on handle of a destroyed window");
            return;
        };
        let direction = self.position.direction();
        tracing::trace!(
            handle = ?self.position,
            code = self.position.moveresize_code(),
            x,
            y,
            ?direction,
            button,
            "requesting movement"
        );
        owner.request_movement(x, y, direction, button);
        owner.raise_grab_handle(self);
    }

    pub fn show(&mut self) {
        if self.mapped {
            return;
        }
        self.mapped = true;
        self.imp.show();
        self.imp.damage(self.rect);
    }

    pub fn hide(&mut self) {
        if !self.mapped {
            return;
        }
        self.mapped = false;
        self.imp.hide();
        self.imp.damage(self.rect);
    }

    pub(crate) fn damage(&mut self) {
        self.imp.damage(self.rect);
    }
}
