//! Draw calls collected per render target during a draw pass
//!
//! Sprite and text systems queue their calls here instead of talking to the
//! backend directly. The flush orders the per-target batches so that a
//! buffer is complete before any batch that samples it as a texture.

use super::{DrawBackend, DrawParams, FontHandle, RenderError, RenderTargetId, Texture, TextureSource};

#[derive(Debug, Clone, PartialEq)]
enum QueuedDraw {
    Sprite(Texture, DrawParams),
    Text(FontHandle, String, DrawParams),
}

#[derive(Debug, Clone, PartialEq)]
struct TargetBatch {
    target: Option<RenderTargetId>,
    draws: Vec<QueuedDraw>,
}

impl TargetBatch {
    /// Other render targets this batch reads from
    fn sampled(&self) -> impl Iterator<Item = RenderTargetId> + '_ {
        self.draws.iter().filter_map(move |draw| match draw {
            QueuedDraw::Sprite(texture, _) => match texture.source {
                TextureSource::RenderTarget(id) if Some(id) != self.target => Some(id),
                _ => None,
            },
            QueuedDraw::Text(..) => None,
        })
    }
}

/// Pending draw calls of one draw pass, grouped by target
#[derive(Debug, Default)]
pub struct RenderQueue {
    batches: Vec<TargetBatch>,
}

impl RenderQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a textured draw on `target` (`None` is the backbuffer)
    pub fn sprite(&mut self, target: Option<RenderTargetId>, texture: Texture, params: DrawParams) {
        self.batch(target).push(QueuedDraw::Sprite(texture, params));
    }

    /// Queue a string draw on `target`
    pub fn text(&mut self, target: Option<RenderTargetId>, font: FontHandle, text: &str, params: DrawParams) {
        self.batch(target).push(QueuedDraw::Text(font, text.to_string(), params));
    }

    /// Number of queued draw calls
    pub fn len(&self) -> usize {
        self.batches.iter().map(|batch| batch.draws.len()).sum()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Drop everything queued
    pub fn clear(&mut self) {
        self.batches.clear();
    }

    /// Issue one backend batch per target and empty the queue
    ///
    /// Targets are flushed children first: a batch drawing the buffer of
    /// another target comes after that target's own batch. Otherwise the
    /// order is the order in which targets were first drawn to. Within a
    /// batch, calls keep their queue order.
    pub fn flush(&mut self, renderer: &mut dyn DrawBackend) -> Result<(), RenderError> {
        for batch in self.in_dependency_order() {
            renderer.set_render_target(batch.target)?;
            renderer.begin_batch();
            for draw in &batch.draws {
                match draw {
                    QueuedDraw::Sprite(texture, params) => renderer.draw(texture, params),
                    QueuedDraw::Text(font, text, params) => renderer.draw_string(*font, text, params),
                }
            }
            renderer.end_batch();
        }
        Ok(())
    }

    fn in_dependency_order(&mut self) -> Vec<TargetBatch> {
        let mut pending: Vec<TargetBatch> = self.batches.drain(..).collect();
        let mut ordered = Vec::with_capacity(pending.len());

        while !pending.is_empty() {
            let ready = pending.iter().position(|batch| {
                batch
                    .sampled()
                    .all(|source| !pending.iter().any(|other| other.target == Some(source)))
            });
            let index = ready.unwrap_or_else(|| {
                log::warn!("Screens draw each other's buffers in a cycle; flushing in first-use order");
                0
            });
            ordered.push(pending.remove(index));
        }
        ordered
    }

    fn batch(&mut self, target: Option<RenderTargetId>) -> &mut Vec<QueuedDraw> {
        let index = match self.batches.iter().position(|batch| batch.target == target) {
            Some(index) => index,
            None => {
                self.batches.push(TargetBatch {
                    target,
                    draws: Vec::new(),
                });
                self.batches.len() - 1
            }
        };
        &mut self.batches[index].draws
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Color, Vec2};
    use crate::render::{DrawCommand, RecordingBackend, TextureHandle};

    fn params() -> DrawParams {
        DrawParams {
            position: Vec2::zeros(),
            rotation: 0.0,
            origin: Vec2::zeros(),
            scale: 1.0,
            color: Color::WHITE,
            depth: 0.0,
            source: None,
        }
    }

    fn buffer(id: RenderTargetId) -> Texture {
        Texture::new(TextureSource::RenderTarget(id), 64, 64)
    }

    fn targets_in_order(commands: &[DrawCommand]) -> Vec<Option<RenderTargetId>> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::SetTarget(target) => Some(*target),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_buffers_flush_before_the_batches_showing_them() {
        let mut backend = RecordingBackend::new();
        let outer = backend.create_render_target(64, 64).unwrap();
        let inner = backend.create_render_target(64, 64).unwrap();
        backend.take_commands();
        let asset = Texture::new(TextureSource::Asset(TextureHandle(1)), 8, 8);

        // Queued parent-first: backbuffer shows outer, outer shows inner
        let mut queue = RenderQueue::new();
        queue.sprite(None, buffer(outer), params());
        queue.sprite(Some(outer), buffer(inner), params());
        queue.text(Some(inner), FontHandle(1), "deep", params());
        queue.sprite(Some(inner), asset, params());
        assert_eq!(queue.len(), 4);

        queue.flush(&mut backend).unwrap();
        assert!(queue.is_empty());
        assert_eq!(
            targets_in_order(&backend.take_commands()),
            vec![Some(inner), Some(outer), None]
        );
    }

    #[test]
    fn test_independent_targets_keep_first_use_order() {
        let mut backend = RecordingBackend::new();
        let side = backend.create_render_target(64, 64).unwrap();
        backend.take_commands();
        let asset = Texture::new(TextureSource::Asset(TextureHandle(1)), 8, 8);

        let mut queue = RenderQueue::new();
        queue.sprite(None, asset, params());
        queue.sprite(Some(side), asset, params());
        queue.sprite(None, asset, params());
        queue.flush(&mut backend).unwrap();

        let commands = backend.take_commands();
        assert_eq!(targets_in_order(&commands), vec![None, Some(side)]);
        let draws = commands.iter().filter(|c| matches!(c, DrawCommand::Draw { .. })).count();
        assert_eq!(draws, 3);
    }

    #[test]
    fn test_cycle_still_flushes_every_batch() {
        let mut backend = RecordingBackend::new();
        let a = backend.create_render_target(64, 64).unwrap();
        let b = backend.create_render_target(64, 64).unwrap();
        backend.take_commands();

        let mut queue = RenderQueue::new();
        queue.sprite(Some(a), buffer(b), params());
        queue.sprite(Some(b), buffer(a), params());
        queue.sprite(Some(a), buffer(a), params());
        queue.flush(&mut backend).unwrap();

        assert_eq!(targets_in_order(&backend.take_commands()), vec![Some(a), Some(b)]);
    }
}
