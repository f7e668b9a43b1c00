//! Component trait and requirement sets

use std::any::{Any, TypeId};

use super::{EntityId, World};

/// Trait for data attached to entities
///
/// An entity holds at most one component of each type. The hooks let a
/// component keep structures outside the entity consistent, e.g. a sprite
/// registering itself with its screen's collision registry.
pub trait Component: Any + Send + Sync {
    /// Called just before the component is stored on `entity`
    fn on_attach(&mut self, _entity: EntityId, _world: &mut World) {}

    /// Called after the component was taken off `entity`, either through
    /// removal or because the entity was destroyed
    fn on_detach(&mut self, _entity: EntityId, _world: &mut World) {}

    /// Carry over the state the hooks maintain from the value being replaced
    ///
    /// Called when a stored component is overwritten in place without the
    /// hooks running, as a [`Modifier`](super::components::Modifier) does.
    /// Components whose hooks keep outside structures in sync copy the
    /// fields those structures depend on.
    fn keep_managed_state(&mut self, _previous: &Self)
    where
        Self: Sized,
    {
    }
}

/// A set of component types a system requires on an entity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentSet {
    types: Vec<(TypeId, &'static str)>,
}

impl ComponentSet {
    /// Create an empty set, matching every entity
    pub const fn new() -> Self {
        Self { types: Vec::new() }
    }

    /// Add a component type to the set
    #[must_use]
    pub fn with<T: Component>(mut self) -> Self {
        let id = TypeId::of::<T>();
        if !self.types.iter().any(|(t, _)| *t == id) {
            self.types.push((id, std::any::type_name::<T>()));
        }
        self
    }

    /// Component type ids in this set
    pub fn type_ids(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.types.iter().map(|(id, _)| *id)
    }

    /// Component type names, for diagnostics
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.types.iter().map(|(_, name)| *name)
    }

    /// Number of component types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
