//! Screen compositing

use super::schedule;
use crate::ecs::components::{DrawComponent, ScreenComponent};
use crate::ecs::{ComponentSet, EntityId, System, SystemContext, SystemPhase};
use crate::engine::EngineError;
use crate::render::{Texture, TextureSource};

/// Draws each active screen's buffer onto the backbuffer
///
/// Runs after all sprite and text batches of the frame were flushed, so the
/// buffers are complete. Screens without a buffer already draw straight to
/// the backbuffer and are skipped.
#[derive(Debug, Default)]
pub struct ScreenletSystem;

impl ScreenletSystem {
    /// Create the system
    pub const fn new() -> Self {
        Self
    }
}

impl System for ScreenletSystem {
    fn name(&self) -> &str {
        "ScreenletSystem"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Draw
    }

    fn layer(&self) -> i32 {
        schedule::SCREENLET_DRAW
    }

    fn requirements(&self) -> ComponentSet {
        ComponentSet::new().with::<ScreenComponent>().with::<DrawComponent>()
    }

    fn process(&mut self, entity: EntityId, ctx: &mut SystemContext<'_>) -> Result<(), EngineError> {
        let (Some(screen), Some(draw)) = (
            ctx.world.get_component::<ScreenComponent>(entity),
            ctx.world.get_component::<DrawComponent>(entity),
        ) else {
            return Ok(());
        };
        let Some(target) = screen.render_target else {
            return Ok(());
        };
        if !screen.active {
            return Ok(());
        }

        let buffer = Texture::new(TextureSource::RenderTarget(target), screen.width, screen.height);
        let renderer = &mut ctx.services.renderer;
        renderer.set_render_target(None)?;
        renderer.begin_batch();
        renderer.draw_rect(&buffer, screen.destination, draw.color);
        renderer.end_batch();
        Ok(())
    }
}
