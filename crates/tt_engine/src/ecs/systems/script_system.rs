//! Runs entity scripts

use super::schedule;
use crate::ecs::components::{ScriptComponent, ScriptContext};
use crate::ecs::{ComponentSet, EntityId, System, SystemContext, SystemPhase};
use crate::engine::EngineError;

/// Calls every script of every [`ScriptComponent`] once per tick
///
/// Scripts see the component's simulated time at the start of the tick;
/// it advances by `dt` afterwards. Scripts may add scripts to their own
/// entity or destroy it.
#[derive(Debug, Default)]
pub struct ScriptSystem;

impl ScriptSystem {
    /// Create the system
    pub const fn new() -> Self {
        Self
    }
}

impl System for ScriptSystem {
    fn name(&self) -> &str {
        "ScriptSystem"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Update
    }

    fn layer(&self) -> i32 {
        schedule::SCRIPT_UPDATE
    }

    fn requirements(&self) -> ComponentSet {
        ComponentSet::new().with::<ScriptComponent>()
    }

    fn process(&mut self, entity: EntityId, ctx: &mut SystemContext<'_>) -> Result<(), EngineError> {
        let Some(component) = ctx.world.get_component_mut::<ScriptComponent>(entity) else {
            return Ok(());
        };
        let mut scripts = std::mem::take(&mut component.scripts);
        let sim_time = component.sim_time;

        let mut script_ctx = ScriptContext {
            entity,
            world: &mut *ctx.world,
            keys: &ctx.services.keys,
            dt: ctx.time.dt,
            sim_time,
        };
        for script in &mut scripts {
            script.on_update(&mut script_ctx);
        }

        if let Some(component) = ctx.world.get_component_mut::<ScriptComponent>(entity) {
            // Scripts added while running go after the existing ones
            scripts.append(&mut component.scripts);
            component.scripts = scripts;
            component.sim_time += ctx.time.dt;
        }
        Ok(())
    }
}
