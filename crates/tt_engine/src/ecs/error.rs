//! ECS error types

use thiserror::Error;

use super::EntityId;

/// Errors raised by the entity/component store and the scheduler
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// The entity does not exist (never created or already destroyed)
    #[error("entity {0:?} does not exist")]
    NoSuchEntity(EntityId),

    /// A component of this type is already attached
    #[error("entity {entity:?} already has a {component} component")]
    DuplicateComponent {
        /// Target entity
        entity: EntityId,
        /// Component type name
        component: &'static str,
    },

    /// A required component is missing
    #[error("entity {entity:?} has no {component} component")]
    MissingComponent {
        /// Target entity
        entity: EntityId,
        /// Component type name
        component: &'static str,
    },

    /// The entity needs a screen but neither it nor the world names one
    #[error("entity {entity:?} has no screen to render or collide on")]
    NoScreen {
        /// Target entity
        entity: EntityId,
    },

    /// A system removed a required component from the entity it was processing
    #[error("system '{system}' removed a required component from {entity:?} while processing it")]
    InvalidIterationMutation {
        /// Offending system
        system: String,
        /// Entity being processed
        entity: EntityId,
    },
}
