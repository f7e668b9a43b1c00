//! ECS World implementation
//!
//! The world maps entity ids to a type-indexed set of components. Each
//! component type gets its own column (`SecondaryMap` keyed by entity), so a
//! lookup is one hash of the `TypeId` plus a slot access.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use slotmap::{SecondaryMap, SlotMap};

use super::components::{CollisionStateComponent, PositionComponent, ScaleComponent, ScreenComponent, SpriteComponent};
use super::entity::EntityMeta;
use super::{Component, ComponentSet, EcsError, EntityId};
use crate::events::{CollisionEvent, EventQueue};
use crate::foundation::math::Vec3;

/// Parent chains longer than this are treated as cyclic and cut off
const MAX_PARENT_DEPTH: usize = 64;

/// Type-erased access to a component column
trait ComponentColumn: Any + Send + Sync {
    fn contains(&self, entity: EntityId) -> bool;
    fn remove_boxed(&mut self, entity: EntityId) -> Option<Box<dyn Component>>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct Column<T: Component>(SecondaryMap<EntityId, T>);

impl<T: Component> ComponentColumn for Column<T> {
    fn contains(&self, entity: EntityId) -> bool {
        self.0.contains_key(entity)
    }

    fn remove_boxed(&mut self, entity: EntityId) -> Option<Box<dyn Component>> {
        self.0.remove(entity).map(|c| Box::new(c) as Box<dyn Component>)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// ECS World containing all entities and components of one simulation
pub struct World {
    entities: SlotMap<EntityId, EntityMeta>,
    columns: HashMap<TypeId, Box<dyn ComponentColumn>>,
    next_serial: u64,
    active_screen: Option<EntityId>,
    collision_events: EventQueue<CollisionEvent>,
    pending_destroy: Vec<EntityId>,
}

impl World {
    /// Create a new world
    pub fn new() -> Self {
        Self {
            entities: SlotMap::with_key(),
            columns: HashMap::new(),
            next_serial: 0,
            active_screen: None,
            collision_events: EventQueue::new(),
            pending_destroy: Vec::new(),
        }
    }

    /// Create a new entity without components
    pub fn create_entity(&mut self) -> EntityId {
        let serial = self.next_serial;
        self.next_serial += 1;
        let entity = self.entities.insert(EntityMeta { serial, active: true });
        log::debug!("Created entity {entity:?}");
        entity
    }

    /// Whether the entity exists
    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.entities.contains_key(entity)
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Whether the entity is active; dead entities are never active
    pub fn is_active(&self, entity: EntityId) -> bool {
        self.entities.get(entity).is_some_and(|meta| meta.active)
    }

    /// Activate or deactivate an entity
    pub fn set_active(&mut self, entity: EntityId, active: bool) -> Result<(), EcsError> {
        let meta = self.entities.get_mut(entity).ok_or(EcsError::NoSuchEntity(entity))?;
        meta.active = active;
        Ok(())
    }

    /// Add a component to an entity
    ///
    /// Fails with [`EcsError::DuplicateComponent`] if the entity already has
    /// a component of this type; use [`World::replace_component`] to swap one.
    pub fn add_component<T: Component>(&mut self, entity: EntityId, mut component: T) -> Result<(), EcsError> {
        if !self.is_alive(entity) {
            return Err(EcsError::NoSuchEntity(entity));
        }
        if self.has_component::<T>(entity) {
            return Err(EcsError::DuplicateComponent {
                entity,
                component: std::any::type_name::<T>(),
            });
        }

        component.on_attach(entity, self);
        if !self.is_alive(entity) {
            return Err(EcsError::NoSuchEntity(entity));
        }
        self.insert_raw(entity, component);
        Ok(())
    }

    /// Replace a component, returning the previous one if there was any
    pub fn replace_component<T: Component>(&mut self, entity: EntityId, component: T) -> Result<Option<T>, EcsError> {
        if !self.is_alive(entity) {
            return Err(EcsError::NoSuchEntity(entity));
        }
        let previous = self.remove_component::<T>(entity);
        self.add_component(entity, component)?;
        Ok(previous)
    }

    /// Get the component, inserting a default one first if it is missing
    pub fn ensure_component<T: Component + Default>(&mut self, entity: EntityId) -> Result<&mut T, EcsError> {
        if !self.has_component::<T>(entity) {
            self.add_component(entity, T::default())?;
        }
        self.get_component_mut::<T>(entity).ok_or(EcsError::MissingComponent {
            entity,
            component: std::any::type_name::<T>(),
        })
    }

    /// Get a component from an entity
    pub fn get_component<T: Component>(&self, entity: EntityId) -> Option<&T> {
        self.column::<T>()?.get(entity)
    }

    /// Get a mutable component from an entity
    pub fn get_component_mut<T: Component>(&mut self, entity: EntityId) -> Option<&mut T> {
        self.column_mut::<T>()?.get_mut(entity)
    }

    /// Whether the entity has a component of this type
    pub fn has_component<T: Component>(&self, entity: EntityId) -> bool {
        self.column::<T>().is_some_and(|column| column.contains_key(entity))
    }

    /// Whether the entity is alive and holds every component in `set`
    pub fn has_all(&self, entity: EntityId, set: &ComponentSet) -> bool {
        self.is_alive(entity)
            && set
                .type_ids()
                .all(|type_id| self.columns.get(&type_id).is_some_and(|column| column.contains(entity)))
    }

    /// Remove a component from an entity, running its detach hook
    pub fn remove_component<T: Component>(&mut self, entity: EntityId) -> Option<T> {
        let mut component = self.column_mut::<T>()?.remove(entity)?;
        component.on_detach(entity, self);
        Some(component)
    }

    /// Destroy an entity and all of its components
    ///
    /// Detach hooks run for every component, which deregisters the entity
    /// from collision registries. Other entities' collision state forgets it.
    pub fn destroy_entity(&mut self, entity: EntityId) -> Result<(), EcsError> {
        if self.entities.remove(entity).is_none() {
            return Err(EcsError::NoSuchEntity(entity));
        }

        let mut attached: Vec<TypeId> = self
            .columns
            .iter()
            .filter(|(_, column)| column.contains(entity))
            .map(|(type_id, _)| *type_id)
            .collect();
        attached.sort_unstable();

        for type_id in attached {
            let removed = self.columns.get_mut(&type_id).and_then(|column| column.remove_boxed(entity));
            if let Some(mut component) = removed {
                component.on_detach(entity, self);
            }
        }

        for (_, state) in self.iter_mut::<CollisionStateComponent>() {
            state.forget(entity);
        }
        self.pending_destroy.retain(|pending| *pending != entity);
        if self.active_screen == Some(entity) {
            self.active_screen = None;
        }

        log::debug!("Destroyed entity {entity:?}");
        Ok(())
    }

    /// Ask for an entity to be destroyed once the running system finishes
    ///
    /// Safe to call from inside a system or script for any entity, including
    /// the one being processed.
    pub fn request_destroy(&mut self, entity: EntityId) {
        if self.is_alive(entity) && !self.pending_destroy.contains(&entity) {
            self.pending_destroy.push(entity);
        }
    }

    /// Apply deferred destroy requests, returning how many entities were destroyed
    pub fn flush_destroyed(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending_destroy);
        pending
            .into_iter()
            .filter(|entity| self.destroy_entity(*entity).is_ok())
            .count()
    }

    /// Live entities holding every component in `set`, in creation order
    pub fn entities_with(&self, set: &ComponentSet) -> Vec<EntityId> {
        let mut found: Vec<(u64, EntityId)> = self
            .entities
            .iter()
            .filter(|(entity, _)| self.has_all(*entity, set))
            .map(|(entity, meta)| (meta.serial, entity))
            .collect();
        found.sort_unstable_by_key(|(serial, _)| *serial);
        found.into_iter().map(|(_, entity)| entity).collect()
    }

    /// Iterate over all components of one type
    pub fn iter<T: Component>(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.column::<T>().into_iter().flat_map(SecondaryMap::iter)
    }

    /// Iterate mutably over all components of one type
    pub fn iter_mut<T: Component>(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.column_mut::<T>().into_iter().flat_map(SecondaryMap::iter_mut)
    }

    /// Turn collision checks on or off for an entity with a sprite
    ///
    /// Enabling registers the entity with its sprite's screen (or the active
    /// screen if the sprite names none); disabling deregisters it.
    pub fn set_checks_collisions(&mut self, entity: EntityId, enabled: bool) -> Result<(), EcsError> {
        let sprite = self.get_component::<SpriteComponent>(entity).ok_or(EcsError::MissingComponent {
            entity,
            component: std::any::type_name::<SpriteComponent>(),
        })?;
        if sprite.checks_collisions() == enabled {
            return Ok(());
        }

        if enabled {
            let screen = sprite
                .screen()
                .or(self.active_screen)
                .ok_or(EcsError::NoScreen { entity })?;
            let registry = self.get_component_mut::<ScreenComponent>(screen).ok_or(EcsError::MissingComponent {
                entity: screen,
                component: std::any::type_name::<ScreenComponent>(),
            })?;
            registry.register_collider(entity);
            if let Some(sprite) = self.get_component_mut::<SpriteComponent>(entity) {
                sprite.mark_registered(screen);
            }
            self.ensure_component::<CollisionStateComponent>(entity)?;
        } else {
            if let Some(screen) = sprite.screen() {
                if let Some(registry) = self.get_component_mut::<ScreenComponent>(screen) {
                    registry.unregister_collider(entity);
                }
            }
            if let Some(sprite) = self.get_component_mut::<SpriteComponent>(entity) {
                sprite.mark_unregistered();
            }
            if let Some(state) = self.get_component_mut::<CollisionStateComponent>(entity) {
                state.reset();
            }
        }
        Ok(())
    }

    /// Absolute position: the sum of positions along the parent chain
    pub fn absolute_position(&self, entity: EntityId) -> Option<Vec3> {
        let mut position = self.get_component::<PositionComponent>(entity)?;
        let mut absolute = position.position;
        for _ in 0..MAX_PARENT_DEPTH {
            let Some(parent) = position.parent.and_then(|p| self.get_component::<PositionComponent>(p)) else {
                break;
            };
            absolute += parent.position;
            position = parent;
        }
        Some(absolute)
    }

    /// Cumulative scale: the product of scales along the parent chain
    ///
    /// Entities without a scale component count as scale 1.
    #[allow(clippy::cast_possible_truncation)]
    pub fn absolute_scale(&self, entity: EntityId) -> f32 {
        let mut scale = 1.0_f64;
        let mut current = Some(entity);
        for _ in 0..MAX_PARENT_DEPTH {
            let Some(node) = current else { break };
            if let Some(s) = self.get_component::<ScaleComponent>(node) {
                scale *= s.scale;
            }
            current = self.get_component::<PositionComponent>(node).and_then(|p| p.parent);
        }
        scale as f32
    }

    /// The screen drawing falls back to when an entity names none
    pub const fn active_screen(&self) -> Option<EntityId> {
        self.active_screen
    }

    /// Set the screen drawing falls back to
    pub fn set_active_screen(&mut self, screen: Option<EntityId>) {
        self.active_screen = screen;
    }

    /// Collision notifications raised during update ticks
    pub fn collision_events(&self) -> &EventQueue<CollisionEvent> {
        &self.collision_events
    }

    /// Mutable access to the collision notification queue
    pub fn collision_events_mut(&mut self) -> &mut EventQueue<CollisionEvent> {
        &mut self.collision_events
    }

    /// Get an iterator over all entities
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys()
    }

    fn column<T: Component>(&self) -> Option<&SecondaryMap<EntityId, T>> {
        self.columns
            .get(&TypeId::of::<T>())?
            .as_any()
            .downcast_ref::<Column<T>>()
            .map(|column| &column.0)
    }

    fn column_mut<T: Component>(&mut self) -> Option<&mut SecondaryMap<EntityId, T>> {
        self.columns
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<Column<T>>()
            .map(|column| &mut column.0)
    }

    fn insert_raw<T: Component>(&mut self, entity: EntityId, component: T) {
        let column = self
            .columns
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Column::<T>(SecondaryMap::new())));
        match column.as_any_mut().downcast_mut::<Column<T>>() {
            Some(column) => {
                column.0.insert(entity, component);
            }
            None => unreachable!("component column stored under a foreign TypeId"),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
