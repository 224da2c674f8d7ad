//! Platform seams for grab handles.
//!
//! The group never talks to a display server directly. Everything that draws,
//! maps input regions or reacts to presses lives behind [`HandleImpl`], and
//! the shared visual resource lives behind [`HandleTexture`]. Both are
//! obtained from factories handed to the group at construction, which is how
//! tests substitute recording doubles.

use std::cell::OnceCell;
use std::rc::Rc;

use super::{HandlePosition, PositionFlags};
use crate::geometry::Geometry;

/// Size of a handle texture in window-manager units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextureSize {
    pub width: u32,
    pub height: u32,
}

impl TextureSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Read-only visual resource shared by every handle of a group, and possibly
/// by several groups.
pub trait HandleTexture: std::fmt::Debug {
    fn size(&self) -> TextureSize;

    /// A texture that is still loading has nothing to draw. Layout and
    /// animation proceed regardless.
    fn is_ready(&self) -> bool {
        true
    }
}

/// Platform realization of a single handle.
pub trait HandleImpl {
    fn show(&mut self);
    fn hide(&mut self);
    fn button_press(&self, x: i32, y: i32, button: u32);
    fn lock_position(&mut self, x: i32, y: i32, flags: PositionFlags);
    fn damage(&mut self, rect: Geometry);
}

pub trait ImplFactory {
    fn create(&self, position: HandlePosition) -> Box<dyn HandleImpl>;
}

pub trait TextureFactory {
    fn create(&self) -> Rc<dyn HandleTexture>;
}

/// Creates the texture once and hands out the same instance afterwards, so
/// every window using the same handle graphics shares one resource.
pub struct CachedTextureFactory<F> {
    inner: F,
    texture: OnceCell<Rc<dyn HandleTexture>>,
}

impl<F: TextureFactory> CachedTextureFactory<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            texture: OnceCell::new(),
        }
    }
}

impl<F: TextureFactory> TextureFactory for CachedTextureFactory<F> {
    fn create(&self) -> Rc<dyn HandleTexture> {
        Rc::clone(self.texture.get_or_init(|| self.inner.create()))
    }
}

/// The pair of factories a group is built from. Constructed once by the
/// owner of all windows and passed to every `GrabHandleGroup::create`.
pub struct HandleFactories {
    pub impls: Box<dyn ImplFactory>,
    pub textures: Box<dyn TextureFactory>,
}

impl HandleFactories {
    pub fn new(impls: impl ImplFactory + 'static, textures: impl TextureFactory + 'static) -> Self {
        Self {
            impls: Box::new(impls),
            textures: Box::new(textures),
        }
    }
}
