//! Velocity integration

use super::schedule;
use crate::ecs::components::{PositionComponent, VelocityComponent};
use crate::ecs::{ComponentSet, EntityId, System, SystemContext, SystemPhase};
use crate::engine::EngineError;

/// Moves every entity by its velocity times the fixed timestep
#[derive(Debug, Default)]
pub struct MovementSystem;

impl MovementSystem {
    /// Create the system
    pub const fn new() -> Self {
        Self
    }
}

impl System for MovementSystem {
    fn name(&self) -> &str {
        "MovementSystem"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Update
    }

    fn layer(&self) -> i32 {
        schedule::MOVEMENT_UPDATE
    }

    fn requirements(&self) -> ComponentSet {
        ComponentSet::new().with::<PositionComponent>().with::<VelocityComponent>()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn process(&mut self, entity: EntityId, ctx: &mut SystemContext<'_>) -> Result<(), EngineError> {
        let Some(velocity) = ctx.world.get_component::<VelocityComponent>(entity).map(|v| v.velocity) else {
            return Ok(());
        };
        if let Some(position) = ctx.world.get_component_mut::<PositionComponent>(entity) {
            position.position += velocity * ctx.time.dt as f32;
        }
        Ok(())
    }
}
