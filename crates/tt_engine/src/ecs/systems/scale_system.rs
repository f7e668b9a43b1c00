//! Scale easing

use super::schedule;
use crate::ecs::components::{DrawComponent, ScaleComponent};
use crate::ecs::{ComponentSet, EntityId, System, SystemContext, SystemPhase};
use crate::engine::EngineError;

/// Eases scales towards their targets and publishes them for drawing
#[derive(Debug, Default)]
pub struct ScaleSystem;

impl ScaleSystem {
    /// Create the system
    pub const fn new() -> Self {
        Self
    }

    /// One easing step: cover `speed` of the remaining distance, never past the target
    pub fn step(scale: &mut ScaleComponent) {
        if !scale.active || scale.speed <= 0.0 {
            return;
        }
        let next = scale.scale + scale.speed * (scale.target - scale.scale);
        let crossed = if scale.scale < scale.target {
            next > scale.target
        } else {
            next < scale.target
        };
        scale.scale = if crossed { scale.target } else { next };
    }
}

impl System for ScaleSystem {
    fn name(&self) -> &str {
        "ScaleSystem"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Update
    }

    fn layer(&self) -> i32 {
        schedule::SCALE_UPDATE
    }

    fn requirements(&self) -> ComponentSet {
        ComponentSet::new().with::<ScaleComponent>()
    }

    fn process(&mut self, entity: EntityId, ctx: &mut SystemContext<'_>) -> Result<(), EngineError> {
        let Some(scale) = ctx.world.get_component_mut::<ScaleComponent>(entity) else {
            return Ok(());
        };
        Self::step(scale);
        let value = scale.scale;

        if let Some(draw) = ctx.world.get_component_mut::<DrawComponent>(entity) {
            draw.draw_scale = value;
        }
        Ok(())
    }
}
