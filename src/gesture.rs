//! Drag tracking for the move/resize gestures that handle presses start.

use crate::geometry::{Geometry, Point, to_i32};
use crate::handle::Direction;

pub const MIN_WINDOW_WIDTH: i32 = 12;
pub const MIN_WINDOW_HEIGHT: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gesture {
    pub direction: Direction,
    pub button: u32,
    pub origin: Point,
    pub start: Geometry,
}

impl Gesture {
    pub fn new(direction: Direction, button: u32, origin: Point, start: Geometry) -> Self {
        Self {
            direction,
            button,
            origin,
            start,
        }
    }

    /// Window geometry with the pointer at `pointer`.
    pub fn apply(&self, pointer: Point) -> Geometry {
        apply_drag(
            self.start,
            self.direction,
            pointer.x.saturating_sub(self.origin.x),
            pointer.y.saturating_sub(self.origin.y),
        )
    }
}

/// Moves or resizes `start` by the pointer delta. Edges being dragged past
/// the minimum size push the opposite edge instead of inverting the window.
pub fn apply_drag(start: Geometry, direction: Direction, dx: i32, dy: i32) -> Geometry {
    if direction.contains(Direction::MOVE) {
        return Geometry {
            x: start.x.saturating_add(dx),
            y: start.y.saturating_add(dy),
            ..start
        };
    }

    let mut x = start.x;
    let mut y = start.y;
    let mut width = to_i32(start.width);
    let mut height = to_i32(start.height);

    if direction.contains(Direction::WEST) {
        x = x.saturating_add(dx);
        width = width.saturating_sub(dx);
    } else if direction.contains(Direction::EAST) {
        width = width.saturating_add(dx);
    }
    if direction.contains(Direction::NORTH) {
        y = y.saturating_add(dy);
        height = height.saturating_sub(dy);
    } else if direction.contains(Direction::SOUTH) {
        height = height.saturating_add(dy);
    }

    if width < MIN_WINDOW_WIDTH {
        if direction.contains(Direction::WEST) {
            x = x.saturating_sub(MIN_WINDOW_WIDTH.saturating_sub(width));
        }
        width = MIN_WINDOW_WIDTH;
    }
    if height < MIN_WINDOW_HEIGHT {
        if direction.contains(Direction::NORTH) {
            y = y.saturating_sub(MIN_WINDOW_HEIGHT.saturating_sub(height));
        }
        height = MIN_WINDOW_HEIGHT;
    }

    Geometry::from_signed(x, y, width, height)
}
