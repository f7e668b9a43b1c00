//! Collision state and handler components

use std::collections::HashSet;
use std::fmt;

use crate::ecs::{Component, EntityId, World};

/// Collision state of one entity, updated by the collision system
///
/// `colliding_with` is the set found on the entity's last check. It is what
/// the next check compares against to find collisions that just started.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CollisionStateComponent {
    /// All entities we're currently colliding with
    pub colliding_with: HashSet<EntityId>,

    /// Entities we started colliding with this tick, in detection order
    pub collision_entered: Vec<EntityId>,
}

impl Component for CollisionStateComponent {}

impl CollisionStateComponent {
    /// Check if we're currently colliding with any entity
    pub fn is_colliding(&self) -> bool {
        !self.colliding_with.is_empty()
    }

    /// Check if we're colliding with a specific entity
    pub fn is_colliding_with(&self, entity: EntityId) -> bool {
        self.colliding_with.contains(&entity)
    }

    /// Check if we just started colliding with a specific entity this tick
    pub fn just_collided_with(&self, entity: EntityId) -> bool {
        self.collision_entered.contains(&entity)
    }

    /// Clear per-tick data (called by collision system at start of update)
    pub(crate) fn clear_tick_data(&mut self) {
        self.collision_entered.clear();
    }

    /// Drop a destroyed entity from the state
    pub(crate) fn forget(&mut self, entity: EntityId) {
        self.colliding_with.remove(&entity);
        self.collision_entered.retain(|e| *e != entity);
    }

    pub(crate) fn reset(&mut self) {
        self.colliding_with.clear();
        self.collision_entered.clear();
    }
}

/// Callback run when a collision starts: `(world, entity, other)`
pub type CollisionHandler = Box<dyn FnMut(&mut World, EntityId, EntityId) + Send + Sync>;

/// Reacts to collisions of its entity as they start
#[derive(Default)]
pub struct CollisionHandlerComponent {
    handler: Option<CollisionHandler>,
}

impl Component for CollisionHandlerComponent {}

impl fmt::Debug for CollisionHandlerComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollisionHandlerComponent")
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

impl CollisionHandlerComponent {
    /// Create a component running `handler` on every new collision
    pub fn new(handler: impl FnMut(&mut World, EntityId, EntityId) + Send + Sync + 'static) -> Self {
        Self {
            handler: Some(Box::new(handler)),
        }
    }

    pub(crate) fn take(&mut self) -> Option<CollisionHandler> {
        self.handler.take()
    }

    pub(crate) fn restore(&mut self, handler: CollisionHandler) {
        if self.handler.is_none() {
            self.handler = Some(handler);
        }
    }
}
