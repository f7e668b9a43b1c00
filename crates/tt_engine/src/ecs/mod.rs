//! Entity-Component-System implementation
//!
//! Game objects are plain entity ids. Behaviour comes from the components
//! attached to them and from the systems the scheduler runs over them.

pub mod world;
pub mod entity;
pub mod component;
pub mod system;
pub mod scheduler;
pub mod factory;
pub mod components;
pub mod systems;
mod error;

#[cfg(test)]
mod tests;

pub use world::World;
pub use entity::EntityId;
pub use component::{Component, ComponentSet};
pub use system::{FrameTime, System, SystemContext, SystemPhase};
pub use scheduler::{SystemId, SystemScheduler};
pub use factory::EntityFactory;
pub use error::EcsError;
