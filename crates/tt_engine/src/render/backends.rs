//! Draw backends that do not touch a GPU

use std::sync::{Arc, Mutex, PoisonError};

use super::{DrawBackend, DrawParams, FontHandle, RenderError, RenderTargetId, Texture};
use crate::foundation::math::{Color, Rect};

/// One recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// `create_render_target`
    CreateTarget {
        /// Assigned id
        id: RenderTargetId,
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },
    /// `set_render_target`
    SetTarget(Option<RenderTargetId>),
    /// `clear`
    Clear(Color),
    /// `begin_batch`
    BeginBatch,
    /// `draw`
    Draw {
        /// Texture drawn
        texture: Texture,
        /// Call parameters
        params: DrawParams,
    },
    /// `draw_rect`
    DrawRect {
        /// Texture drawn
        texture: Texture,
        /// Destination rectangle
        destination: Rect,
        /// Tint
        color: Color,
    },
    /// `draw_string`
    DrawString {
        /// Font used
        font: FontHandle,
        /// Text drawn
        text: String,
        /// Call parameters
        params: DrawParams,
    },
    /// `end_batch`
    EndBatch,
}

/// Backend recording every call, for tests and inspection
///
/// Clones share the same log, so a test can keep one handle while the
/// engine owns the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    commands: Arc<Mutex<Vec<DrawCommand>>>,
    next_target: u32,
}

impl RecordingBackend {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all commands recorded so far
    pub fn commands(&self) -> Vec<DrawCommand> {
        self.commands.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Take all commands recorded so far
    pub fn take_commands(&self) -> Vec<DrawCommand> {
        std::mem::take(&mut *self.commands.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn record(&self, command: DrawCommand) {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command);
    }
}

impl DrawBackend for RecordingBackend {
    fn create_render_target(&mut self, width: u32, height: u32) -> Result<RenderTargetId, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::TargetCreation {
                width,
                height,
                reason: "empty size".to_string(),
            });
        }
        self.next_target += 1;
        let id = RenderTargetId(self.next_target);
        self.record(DrawCommand::CreateTarget { id, width, height });
        Ok(id)
    }

    fn set_render_target(&mut self, target: Option<RenderTargetId>) -> Result<(), RenderError> {
        if let Some(id) = target {
            if id.0 == 0 || id.0 > self.next_target {
                return Err(RenderError::UnknownTarget(id));
            }
        }
        self.record(DrawCommand::SetTarget(target));
        Ok(())
    }

    fn clear(&mut self, color: Color) {
        self.record(DrawCommand::Clear(color));
    }

    fn begin_batch(&mut self) {
        self.record(DrawCommand::BeginBatch);
    }

    fn draw(&mut self, texture: &Texture, params: &DrawParams) {
        self.record(DrawCommand::Draw {
            texture: *texture,
            params: *params,
        });
    }

    fn draw_rect(&mut self, texture: &Texture, destination: Rect, color: Color) {
        self.record(DrawCommand::DrawRect {
            texture: *texture,
            destination,
            color,
        });
    }

    fn draw_string(&mut self, font: FontHandle, text: &str, params: &DrawParams) {
        self.record(DrawCommand::DrawString {
            font,
            text: text.to_string(),
            params: *params,
        });
    }

    fn end_batch(&mut self) {
        self.record(DrawCommand::EndBatch);
    }
}

/// Backend that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogBackend {
    next_target: u32,
    draws_this_batch: usize,
}

impl LogBackend {
    /// Create a logging backend
    pub fn new() -> Self {
        Self::default()
    }
}

impl DrawBackend for LogBackend {
    fn create_render_target(&mut self, width: u32, height: u32) -> Result<RenderTargetId, RenderError> {
        self.next_target += 1;
        log::debug!("Created {width}x{height} render target #{}", self.next_target);
        Ok(RenderTargetId(self.next_target))
    }

    fn set_render_target(&mut self, target: Option<RenderTargetId>) -> Result<(), RenderError> {
        log::trace!("Render target: {target:?}");
        Ok(())
    }

    fn clear(&mut self, color: Color) {
        log::trace!("Clear to {color:?}");
    }

    fn begin_batch(&mut self) {
        self.draws_this_batch = 0;
    }

    fn draw(&mut self, texture: &Texture, params: &DrawParams) {
        self.draws_this_batch += 1;
        log::trace!("Draw {:?} at ({:.1}, {:.1})", texture.source, params.position.x, params.position.y);
    }

    fn draw_rect(&mut self, texture: &Texture, destination: Rect, _color: Color) {
        self.draws_this_batch += 1;
        log::trace!("Draw {:?} into {destination:?}", texture.source);
    }

    fn draw_string(&mut self, _font: FontHandle, text: &str, params: &DrawParams) {
        self.draws_this_batch += 1;
        log::trace!("Text '{text}' at ({:.1}, {:.1})", params.position.x, params.position.y);
    }

    fn end_batch(&mut self) {
        log::trace!("Batch submitted with {} draws", self.draws_this_batch);
    }
}
