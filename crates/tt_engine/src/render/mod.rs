//! Rendering seam
//!
//! The engine never draws pixels itself. Render systems queue draw calls in
//! a [`RenderQueue`], which flushes them in batches through a
//! [`DrawBackend`]; the backends in [`backends`] record or log them.

pub mod backends;
pub mod queue;

pub use backends::{DrawCommand, LogBackend, RecordingBackend};
pub use queue::RenderQueue;

use thiserror::Error;

use crate::foundation::math::{Color, Rect, Vec2};

/// Identifier of an off-screen render target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderTargetId(pub u32);

/// Identifier of a loaded texture asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Identifier of a loaded font
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontHandle(pub u32);

/// Where a texture's pixels come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSource {
    /// A loaded image
    Asset(TextureHandle),
    /// The contents of a render target, e.g. a channel's screen
    RenderTarget(RenderTargetId),
}

/// A drawable texture and its pixel size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Texture {
    /// Pixel source
    pub source: TextureSource,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Texture {
    /// Create a texture description
    pub const fn new(source: TextureSource, width: u32, height: u32) -> Self {
        Self { source, width, height }
    }
}

/// Parameters of one textured or text draw call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawParams {
    /// Pixel position
    pub position: Vec2,
    /// Rotation in radians
    pub rotation: f32,
    /// Origin in texture pixels
    pub origin: Vec2,
    /// Uniform scale
    pub scale: f32,
    /// Tint
    pub color: Color,
    /// Depth within the batch
    pub depth: f32,
    /// Part of the texture to draw in texture pixels, `None` for all of it
    pub source: Option<Rect>,
}

/// Rendering errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A render target could not be created
    #[error("Failed to create {width}x{height} render target: {reason}")]
    TargetCreation {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Backend message
        reason: String,
    },

    /// A draw call referenced a render target the backend does not know
    #[error("Unknown render target: {0:?}")]
    UnknownTarget(RenderTargetId),
}

/// Graphics device operations the render systems rely on
///
/// Calls happen in batches: `begin_batch`, any number of `draw`/`draw_rect`/
/// `draw_string`, then `end_batch`. `set_render_target(None)` selects the
/// backbuffer.
pub trait DrawBackend {
    /// Allocate an off-screen render target
    fn create_render_target(&mut self, width: u32, height: u32) -> Result<RenderTargetId, RenderError>;

    /// Select where the following batches draw to
    fn set_render_target(&mut self, target: Option<RenderTargetId>) -> Result<(), RenderError>;

    /// Clear the current target
    fn clear(&mut self, color: Color);

    /// Start a batch of draw calls
    fn begin_batch(&mut self);

    /// Draw a texture
    fn draw(&mut self, texture: &Texture, params: &DrawParams);

    /// Draw a texture stretched into a rectangle
    fn draw_rect(&mut self, texture: &Texture, destination: Rect, color: Color);

    /// Draw a string
    fn draw_string(&mut self, font: FontHandle, text: &str, params: &DrawParams);

    /// Submit the current batch
    fn end_batch(&mut self);
}
