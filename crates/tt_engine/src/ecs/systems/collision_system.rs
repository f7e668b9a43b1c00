//! Collision detection
//!
//! Every collidable entity is tested against the other members of its
//! screen's collision registry, O(n²) per screen per tick. A pair collides
//! only if both sprites' tests accept it. Only collisions that started this
//! tick are reported, to the entity's [`CollisionHandlerComponent`] and as a
//! [`CollisionEvent`] on the world's queue.

use super::schedule;
use crate::ecs::components::{
    ColliderView, CollisionHandlerComponent, CollisionStateComponent, DrawComponent, ScreenComponent,
    SpriteComponent,
};
use crate::ecs::{ComponentSet, EntityId, System, SystemContext, SystemPhase, World};
use crate::engine::EngineError;
use crate::events::CollisionEvent;
use crate::foundation::math::Vec3;

/// Rising-edge collision detector
#[derive(Debug, Default)]
pub struct CollisionSystem;

impl CollisionSystem {
    /// Create the system
    pub const fn new() -> Self {
        Self
    }

    fn collider_view(world: &World, entity: EntityId, sprite: &SpriteComponent) -> ColliderView {
        ColliderView {
            entity,
            position: world.absolute_position(entity).unwrap_or_else(Vec3::zeros),
            radius: sprite.radius * world.absolute_scale(entity),
        }
    }

    /// Entities in `entity`'s registry that collide with it right now
    fn current_collisions(world: &World, entity: EntityId, sprite: &SpriteComponent) -> Vec<EntityId> {
        let Some(registry) = sprite
            .screen()
            .and_then(|screen| world.get_component::<ScreenComponent>(screen))
        else {
            return Vec::new();
        };

        let me = Self::collider_view(world, entity, sprite);
        registry
            .collision_objects()
            .iter()
            .copied()
            .filter(|other| *other != entity && world.is_active(*other))
            .filter(|other| {
                world.get_component::<SpriteComponent>(*other).is_some_and(|other_sprite| {
                    let them = Self::collider_view(world, *other, other_sprite);
                    sprite.test_collision(&me, &them) && other_sprite.test_collision(&them, &me)
                })
            })
            .collect()
    }
}

impl System for CollisionSystem {
    fn name(&self) -> &str {
        "CollisionSystem"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Update
    }

    fn layer(&self) -> i32 {
        schedule::COLLISION_UPDATE
    }

    fn requirements(&self) -> ComponentSet {
        ComponentSet::new()
            .with::<SpriteComponent>()
            .with::<CollisionStateComponent>()
    }

    fn begin(&mut self, ctx: &mut SystemContext<'_>) -> Result<(), EngineError> {
        for (_, state) in ctx.world.iter_mut::<CollisionStateComponent>() {
            state.clear_tick_data();
        }
        Ok(())
    }

    fn process(&mut self, entity: EntityId, ctx: &mut SystemContext<'_>) -> Result<(), EngineError> {
        let world = &mut *ctx.world;
        let Some(sprite) = world.get_component::<SpriteComponent>(entity) else {
            return Ok(());
        };
        let visible = world
            .get_component::<DrawComponent>(entity)
            .map_or(true, |draw| draw.is_visible);
        if !sprite.checks_collisions() || !world.is_active(entity) || !visible {
            return Ok(());
        }

        let current = Self::current_collisions(world, entity, sprite);
        let Some(state) = world.get_component_mut::<CollisionStateComponent>(entity) else {
            return Ok(());
        };
        let entered: Vec<EntityId> = current
            .iter()
            .copied()
            .filter(|other| !state.colliding_with.contains(other))
            .collect();
        state.colliding_with = current.into_iter().collect();
        state.collision_entered.extend(entered.iter().copied());

        for other in entered {
            log::debug!("Collision started: {entity:?} with {other:?}");
            world.collision_events_mut().send(CollisionEvent {
                entity,
                other,
                tick: ctx.time.tick,
            });

            let handler = world
                .get_component_mut::<CollisionHandlerComponent>(entity)
                .and_then(CollisionHandlerComponent::take);
            if let Some(mut handler) = handler {
                handler(world, entity, other);
                if let Some(component) = world.get_component_mut::<CollisionHandlerComponent>(entity) {
                    component.restore(handler);
                }
            }
            if !world.is_alive(entity) {
                break;
            }
        }
        Ok(())
    }
}
