//! Sprite animation

use super::schedule;
use crate::ecs::components::AnimatedSpriteComponent;
use crate::ecs::{ComponentSet, EntityId, System, SystemContext, SystemPhase};
use crate::engine::EngineError;

/// Advances animated sprites by the fixed timestep
///
/// Inactive entities keep their current frame.
#[derive(Debug, Default)]
pub struct AnimationSystem;

impl AnimationSystem {
    /// Create the system
    pub const fn new() -> Self {
        Self
    }
}

impl System for AnimationSystem {
    fn name(&self) -> &str {
        "AnimationSystem"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Update
    }

    fn layer(&self) -> i32 {
        schedule::ANIMATION_UPDATE
    }

    fn requirements(&self) -> ComponentSet {
        ComponentSet::new().with::<AnimatedSpriteComponent>()
    }

    fn process(&mut self, entity: EntityId, ctx: &mut SystemContext<'_>) -> Result<(), EngineError> {
        if !ctx.world.is_active(entity) {
            return Ok(());
        }
        if let Some(animation) = ctx.world.get_component_mut::<AnimatedSpriteComponent>(entity) {
            animation.advance(ctx.time.dt);
        }
        Ok(())
    }
}
