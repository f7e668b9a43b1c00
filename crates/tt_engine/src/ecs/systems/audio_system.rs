//! Sound event playback

use super::schedule;
use crate::ecs::components::AudioComponent;
use crate::ecs::{ComponentSet, EntityId, System, SystemContext, SystemPhase};
use crate::engine::EngineError;

/// Plays each audio component's event once, or every tick when repeating
#[derive(Debug, Default)]
pub struct AudioSystem;

impl AudioSystem {
    /// Create the system
    pub const fn new() -> Self {
        Self
    }
}

impl System for AudioSystem {
    fn name(&self) -> &str {
        "AudioSystem"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Update
    }

    fn layer(&self) -> i32 {
        schedule::AUDIO_UPDATE
    }

    fn requirements(&self) -> ComponentSet {
        ComponentSet::new().with::<AudioComponent>()
    }

    fn process(&mut self, entity: EntityId, ctx: &mut SystemContext<'_>) -> Result<(), EngineError> {
        let Some(audio) = ctx.world.get_component_mut::<AudioComponent>(entity) else {
            return Ok(());
        };
        if audio.played && !audio.repeat {
            return Ok(());
        }
        ctx.services.audio.play(&audio.event)?;
        audio.played = true;
        Ok(())
    }
}
