//! System trait and per-pass context

use super::{ComponentSet, EntityId, World};
use crate::engine::EngineError;
use crate::services::Services;

/// When a system runs in the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SystemPhase {
    /// Once per fixed-timestep tick, zero or more times per frame
    Update,
    /// Exactly once per frame, after all update ticks
    Draw,
}

/// Timing information handed to systems
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Fixed timestep in seconds
    pub dt: f64,
    /// Simulated time in seconds
    pub sim_time: f64,
    /// Fraction of a step left over after the update ticks, for drawing
    pub interpolation: f64,
    /// Number of update ticks run so far
    pub tick: u64,
}

/// What a system can reach while it runs
pub struct SystemContext<'a> {
    /// World being processed
    pub world: &'a mut World,
    /// External collaborators
    pub services: &'a mut Services,
    /// Timing of this pass
    pub time: FrameTime,
}

/// A unit of per-entity processing
///
/// The scheduler calls `begin`, then `process` once for every live entity
/// holding all `requirements`, then `end`. Systems of a phase run in
/// ascending `layer`; equal layers run in registration order.
pub trait System {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    /// Phase the system runs in
    fn phase(&self) -> SystemPhase;

    /// Ordering within the phase
    fn layer(&self) -> i32 {
        0
    }

    /// Components an entity needs to be processed
    fn requirements(&self) -> ComponentSet;

    /// Called once before the entities of this pass
    fn begin(&mut self, _ctx: &mut SystemContext<'_>) -> Result<(), EngineError> {
        Ok(())
    }

    /// Process one entity
    fn process(&mut self, entity: EntityId, ctx: &mut SystemContext<'_>) -> Result<(), EngineError>;

    /// Called once after the entities of this pass
    fn end(&mut self, _ctx: &mut SystemContext<'_>) -> Result<(), EngineError> {
        Ok(())
    }
}
