//! Clears screens before anything is drawn on them

use super::schedule;
use crate::ecs::components::ScreenComponent;
use crate::ecs::{ComponentSet, EntityId, System, SystemContext, SystemPhase};
use crate::engine::EngineError;

/// Clears every active screen to its background color
#[derive(Debug, Default)]
pub struct ScreenClearSystem;

impl ScreenClearSystem {
    /// Create the system
    pub const fn new() -> Self {
        Self
    }
}

impl System for ScreenClearSystem {
    fn name(&self) -> &str {
        "ScreenClearSystem"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Draw
    }

    fn layer(&self) -> i32 {
        schedule::SCREEN_CLEAR_DRAW
    }

    fn requirements(&self) -> ComponentSet {
        ComponentSet::new().with::<ScreenComponent>()
    }

    fn process(&mut self, entity: EntityId, ctx: &mut SystemContext<'_>) -> Result<(), EngineError> {
        let Some(screen) = ctx.world.get_component::<ScreenComponent>(entity) else {
            return Ok(());
        };
        if !screen.active {
            return Ok(());
        }
        ctx.services.renderer.set_render_target(screen.render_target)?;
        ctx.services.renderer.clear(screen.background);
        Ok(())
    }
}
