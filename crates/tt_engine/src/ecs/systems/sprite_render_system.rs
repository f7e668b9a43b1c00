//! Sprite drawing

use super::{resolve_screen, schedule};
use crate::ecs::components::{
    AnimatedSpriteComponent, DrawComponent, PositionComponent, SpriteComponent, SpriteFieldComponent, VelocityComponent,
};
use crate::ecs::{ComponentSet, EntityId, System, SystemContext, SystemPhase};
use crate::engine::EngineError;
use crate::foundation::math::{Vec2, Vec3};
use crate::render::DrawParams;

/// Draws visible textured sprites, batched per screen
///
/// Positions are extrapolated by `velocity * interpolation * dt` so motion
/// looks smooth between fixed ticks. Animated sprites draw their current
/// atlas frame; sprite fields draw once per occupied cell. Calls go to the
/// render queue, flushed later by [`super::RenderFlushSystem`].
#[derive(Default)]
pub struct SpriteRenderSystem {
    active_screen: Option<EntityId>,
}

impl SpriteRenderSystem {
    /// Create the system
    pub fn new() -> Self {
        Self::default()
    }
}

impl System for SpriteRenderSystem {
    fn name(&self) -> &str {
        "SpriteRenderSystem"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Draw
    }

    fn layer(&self) -> i32 {
        schedule::SPRITE_RENDER_DRAW
    }

    fn requirements(&self) -> ComponentSet {
        ComponentSet::new()
            .with::<SpriteComponent>()
            .with::<PositionComponent>()
            .with::<DrawComponent>()
    }

    fn begin(&mut self, ctx: &mut SystemContext<'_>) -> Result<(), EngineError> {
        self.active_screen = ctx.world.active_screen();
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn process(&mut self, entity: EntityId, ctx: &mut SystemContext<'_>) -> Result<(), EngineError> {
        let world = &mut *ctx.world;
        let (Some(sprite), Some(draw)) = (
            world.get_component::<SpriteComponent>(entity),
            world.get_component::<DrawComponent>(entity),
        ) else {
            return Ok(());
        };
        let Some(texture) = sprite.texture else {
            return Ok(());
        };
        if !draw.is_visible || !world.is_active(entity) {
            return Ok(());
        }

        let (_, screen) = resolve_screen(world, entity, draw.screen.or(sprite.screen()), self.active_screen)?;
        let lead = world
            .get_component::<VelocityComponent>(entity)
            .map_or_else(Vec3::zeros, |v| v.velocity * (ctx.time.interpolation * ctx.time.dt) as f32);
        let position = world.absolute_position(entity).unwrap_or_else(Vec3::zeros) + lead;
        let pixels = screen.to_pixels(&position);
        let target = screen.render_target;

        let source = world
            .get_component::<AnimatedSpriteComponent>(entity)
            .map(|animation| animation.frame_rect(&texture));
        let origin = source.map_or_else(
            || sprite.origin(),
            |frame| Vec2::new(sprite.center.x * frame.width as f32, sprite.center.y * frame.height as f32),
        );
        let params = DrawParams {
            position: pixels,
            rotation: draw.rotation,
            origin,
            scale: draw.draw_scale as f32,
            color: draw.color,
            depth: position.z,
            source,
        };

        let queue = &mut ctx.services.render_queue;
        match world.get_component::<SpriteFieldComponent>(entity) {
            Some(field) => {
                for (offset, color) in field.placements(params.scale, params.color) {
                    let cell = DrawParams {
                        position: pixels + offset,
                        color,
                        ..params
                    };
                    queue.sprite(target, texture, cell);
                }
            }
            None => queue.sprite(target, texture, params),
        }

        if let Some(draw) = world.get_component_mut::<DrawComponent>(entity) {
            draw.draw_position = pixels;
            draw.layer_depth = position.z;
        }
        Ok(())
    }
}
