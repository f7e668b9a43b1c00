//! System scheduling
//!
//! Systems run sequentially, grouped by phase and ordered by layer. Ties are
//! broken by registration order, which makes the order fully deterministic.

use super::systems::{
    AnimationSystem, AudioSystem, CollisionSystem, MovementSystem, RenderFlushSystem, ScaleSystem, ScreenClearSystem,
    ScreenletSystem, ScriptSystem, SpriteRenderSystem, TextRenderSystem,
};
use super::{EcsError, FrameTime, System, SystemContext, SystemPhase, World};
use crate::engine::EngineError;
use crate::services::Services;

/// Unique identifier for systems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SystemId(pub u64);

/// Ordered set of systems run over one world
#[derive(Default)]
pub struct SystemScheduler {
    systems: Vec<(SystemId, Box<dyn System>)>,
    next_id: u64,
}

impl SystemScheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scheduler with every built-in engine system registered
    pub fn with_default_systems() -> Self {
        let mut scheduler = Self::new();
        scheduler.add_system(ScriptSystem::new());
        scheduler.add_system(MovementSystem::new());
        scheduler.add_system(ScaleSystem::new());
        scheduler.add_system(AnimationSystem::new());
        scheduler.add_system(AudioSystem::new());
        scheduler.add_system(CollisionSystem::new());
        scheduler.add_system(ScreenClearSystem::new());
        scheduler.add_system(SpriteRenderSystem::new());
        scheduler.add_system(TextRenderSystem::new());
        scheduler.add_system(RenderFlushSystem::new());
        scheduler.add_system(ScreenletSystem::new());
        scheduler
    }

    /// Add a system to the scheduler
    pub fn add_system(&mut self, system: impl System + 'static) -> SystemId {
        let id = SystemId(self.next_id);
        self.next_id += 1;
        log::debug!(
            "Registered system '{}' ({:?}, layer {})",
            system.name(),
            system.phase(),
            system.layer()
        );
        self.systems.push((id, Box::new(system)));
        id
    }

    /// Remove a system, returning whether it was registered
    pub fn remove_system(&mut self, id: SystemId) -> bool {
        let before = self.systems.len();
        self.systems.retain(|(system_id, _)| *system_id != id);
        self.systems.len() != before
    }

    /// Number of registered systems
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Whether no systems are registered
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Systems of `phase` in the order they run
    pub fn execution_order(&self, phase: SystemPhase) -> Vec<SystemId> {
        self.ordered_indices(phase)
            .into_iter()
            .map(|index| self.systems[index].0)
            .collect()
    }

    /// Names of the systems of `phase` in the order they run
    pub fn system_names(&self, phase: SystemPhase) -> Vec<String> {
        self.ordered_indices(phase)
            .into_iter()
            .map(|index| self.systems[index].1.name().to_string())
            .collect()
    }

    /// Run every system of `phase` once over `world`
    ///
    /// Each system sees the entities that matched its requirements when it
    /// started. Entities destroyed or stripped of a requirement by an earlier
    /// entity's processing are skipped. Removing a requirement from the entity
    /// currently being processed is an error in debug builds. Deferred
    /// destroys are applied after every system.
    pub fn run_phase(
        &mut self,
        phase: SystemPhase,
        world: &mut World,
        services: &mut Services,
        time: FrameTime,
    ) -> Result<(), EngineError> {
        for index in self.ordered_indices(phase) {
            let system = &mut self.systems[index].1;
            let requirements = system.requirements();
            let mut ctx = SystemContext {
                world: &mut *world,
                services: &mut *services,
                time,
            };

            system.begin(&mut ctx)?;
            for entity in ctx.world.entities_with(&requirements) {
                if !ctx.world.has_all(entity, &requirements) {
                    continue;
                }
                system.process(entity, &mut ctx)?;

                if ctx.world.is_alive(entity) && !ctx.world.has_all(entity, &requirements) {
                    let error = EcsError::InvalidIterationMutation {
                        system: system.name().to_string(),
                        entity,
                    };
                    if cfg!(debug_assertions) {
                        return Err(error.into());
                    }
                    log::warn!("{error}");
                }
            }
            system.end(&mut ctx)?;
            ctx.world.flush_destroyed();
        }
        Ok(())
    }

    fn ordered_indices(&self, phase: SystemPhase) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .systems
            .iter()
            .enumerate()
            .filter(|(_, (_, system))| system.phase() == phase)
            .map(|(index, _)| index)
            .collect();
        // Stable sort keeps registration order within a layer
        indices.sort_by_key(|index| self.systems[*index].1.layer());
        indices
    }
}
