//! Submission of queued draw calls

use super::schedule;
use crate::ecs::components::ScreenComponent;
use crate::ecs::{ComponentSet, EntityId, System, SystemContext, SystemPhase};
use crate::engine::EngineError;
use crate::services::Services;

/// Flushes the render queue filled by the sprite and text systems
///
/// Runs once per draw pass after all drawing systems and before screens are
/// composited. Buffers drawn on by a screen shown in another buffer are
/// flushed first; see [`crate::render::RenderQueue::flush`].
#[derive(Debug, Default)]
pub struct RenderFlushSystem;

impl RenderFlushSystem {
    /// Create the system
    pub const fn new() -> Self {
        Self
    }
}

impl System for RenderFlushSystem {
    fn name(&self) -> &str {
        "RenderFlushSystem"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Draw
    }

    fn layer(&self) -> i32 {
        schedule::RENDER_FLUSH_DRAW
    }

    // Only `end` does work; screens are the cheapest set to walk
    fn requirements(&self) -> ComponentSet {
        ComponentSet::new().with::<ScreenComponent>()
    }

    fn process(&mut self, _entity: EntityId, _ctx: &mut SystemContext<'_>) -> Result<(), EngineError> {
        Ok(())
    }

    fn end(&mut self, ctx: &mut SystemContext<'_>) -> Result<(), EngineError> {
        let Services {
            renderer, render_queue, ..
        } = &mut *ctx.services;
        render_queue.flush(renderer.as_mut())?;
        Ok(())
    }
}
