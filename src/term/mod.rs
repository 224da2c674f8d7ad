//! Terminal platform for grab handles.
//!
//! Handles are mapped into a shared [`HandleSurface`] that the front-end
//! reads when deciding what to repaint; the texture is a block of cells.

pub mod decorator;

use std::cell::RefCell;
use std::rc::Rc;

use crate::geometry::Geometry;
use crate::handle::{
    HandleImpl, HandlePosition, HandleSet, HandleTexture, ImplFactory, PositionFlags,
    TextureFactory, TextureSize,
};

/// What the handle impls of a terminal window have told the front-end.
#[derive(Debug, Default)]
pub struct HandleSurface {
    mapped: HandleSet,
    damage: Vec<Geometry>,
    presses: usize,
}

pub type SharedSurface = Rc<RefCell<HandleSurface>>;

impl HandleSurface {
    pub fn shared() -> SharedSurface {
        Rc::new(RefCell::new(Self::default()))
    }

    pub fn mapped(&self) -> HandleSet {
        self.mapped
    }

    pub fn presses(&self) -> usize {
        self.presses
    }

    /// Drains the regions marked for redraw since the last call.
    pub fn take_damage(&mut self) -> Vec<Geometry> {
        std::mem::take(&mut self.damage)
    }
}

pub struct TerminalHandleImpl {
    position: HandlePosition,
    surface: SharedSurface,
}

impl HandleImpl for TerminalHandleImpl {
    fn show(&mut self) {
        self.surface.borrow_mut().mapped |= self.position.flag();
    }

    fn hide(&mut self) {
        self.surface.borrow_mut().mapped -= self.position.flag();
    }

    fn button_press(&self, x: i32, y: i32, button: u32) {
        tracing::trace!(handle = ?self.position, x, y, button, "terminal handle pressed");
        self.surface.borrow_mut().presses += 1;
    }

    // Cells are painted from the handle rectangle, so there is nothing to
    // move here.
    fn lock_position(&mut self, x: i32, y: i32, flags: PositionFlags) {
        tracing::trace!(handle = ?self.position, x, y, ?flags, "terminal handle positioned");
    }

    fn damage(&mut self, rect: Geometry) {
        self.surface.borrow_mut().damage.push(rect);
    }
}

pub struct TerminalImplFactory {
    surface: SharedSurface,
}

impl TerminalImplFactory {
    pub fn new(surface: SharedSurface) -> Self {
        Self { surface }
    }
}

impl ImplFactory for TerminalImplFactory {
    fn create(&self, position: HandlePosition) -> Box<dyn HandleImpl> {
        Box::new(TerminalHandleImpl {
            position,
            surface: Rc::clone(&self.surface),
        })
    }
}

/// A solid block of terminal cells.
#[derive(Debug, Clone, Copy)]
pub struct CellTexture {
    size: TextureSize,
}

impl HandleTexture for CellTexture {
    fn size(&self) -> TextureSize {
        self.size
    }
}

pub struct CellTextureFactory {
    size: TextureSize,
}

impl CellTextureFactory {
    pub fn new(size: TextureSize) -> Self {
        Self { size }
    }
}

impl TextureFactory for CellTextureFactory {
    fn create(&self) -> Rc<dyn HandleTexture> {
        Rc::new(CellTexture { size: self.size })
    }
}
