//! Text drawing

use super::{resolve_screen, schedule};
use crate::ecs::components::{DrawComponent, PositionComponent, TextComponent};
use crate::ecs::{ComponentSet, EntityId, System, SystemContext, SystemPhase};
use crate::engine::EngineError;
use crate::foundation::math::{Vec2, Vec3};
use crate::render::DrawParams;

/// Draws visible text on its screen, or on the active screen
#[derive(Default)]
pub struct TextRenderSystem {
    active_screen: Option<EntityId>,
}

impl TextRenderSystem {
    /// Create the system
    pub fn new() -> Self {
        Self::default()
    }
}

impl System for TextRenderSystem {
    fn name(&self) -> &str {
        "TextRenderSystem"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Draw
    }

    fn layer(&self) -> i32 {
        schedule::TEXT_RENDER_DRAW
    }

    fn requirements(&self) -> ComponentSet {
        ComponentSet::new()
            .with::<TextComponent>()
            .with::<PositionComponent>()
            .with::<DrawComponent>()
    }

    fn begin(&mut self, ctx: &mut SystemContext<'_>) -> Result<(), EngineError> {
        self.active_screen = ctx.world.active_screen();
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn process(&mut self, entity: EntityId, ctx: &mut SystemContext<'_>) -> Result<(), EngineError> {
        let world = &mut *ctx.world;
        let (Some(text), Some(draw)) = (
            world.get_component::<TextComponent>(entity),
            world.get_component::<DrawComponent>(entity),
        ) else {
            return Ok(());
        };
        if !draw.is_visible {
            return Ok(());
        }

        let (_, screen) = resolve_screen(world, entity, draw.screen, self.active_screen)?;
        let position = world.absolute_position(entity).unwrap_or_else(Vec3::zeros);
        let pixels = screen.to_pixels(&position);
        let params = DrawParams {
            position: pixels,
            rotation: 0.0,
            origin: Vec2::zeros(),
            scale: draw.draw_scale as f32,
            color: draw.color,
            depth: position.z,
            source: None,
        };
        ctx.services.render_queue.text(screen.render_target, text.font, &text.text, params);

        if let Some(draw) = world.get_component_mut::<DrawComponent>(entity) {
            draw.draw_position = pixels;
            draw.layer_depth = position.z;
        }
        Ok(())
    }
}
