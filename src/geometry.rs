use ratatui::layout::Rect;

/// A point in window-manager coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Signed origin with unsigned size, so a rectangle can sit partially
/// offscreen but can never be inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Geometry {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a rectangle from possibly degenerate signed extents. Negative
    /// sizes collapse to zero instead of flipping the rectangle.
    pub fn from_signed(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: width.max(0) as u32,
            height: height.max(0) as u32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(to_i32(self.width))
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(to_i32(self.height))
    }

    /// Half-open containment test: the right and bottom edges are outside.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Rectangle of the given size centered on `anchor`.
    pub fn centered_on(anchor: Point, width: u32, height: u32) -> Self {
        Self {
            x: anchor.x.saturating_sub(to_i32(width / 2)),
            y: anchor.y.saturating_sub(to_i32(height / 2)),
            width,
            height,
        }
    }

    /// Clips to the non-negative quadrant and the `u16` range of terminal
    /// cells. Returns `None` when nothing of the rectangle survives.
    pub fn to_cell_rect(&self) -> Option<Rect> {
        let x0 = self.x.clamp(0, u16::MAX as i32);
        let y0 = self.y.clamp(0, u16::MAX as i32);
        let x1 = self.right().clamp(0, u16::MAX as i32);
        let y1 = self.bottom().clamp(0, u16::MAX as i32);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Rect {
            x: x0 as u16,
            y: y0 as u16,
            width: (x1 - x0) as u16,
            height: (y1 - y0) as u16,
        })
    }
}

impl From<Rect> for Geometry {
    fn from(rect: Rect) -> Self {
        Self {
            x: rect.x as i32,
            y: rect.y as i32,
            width: rect.width as u32,
            height: rect.height as u32,
        }
    }
}

pub(crate) fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
