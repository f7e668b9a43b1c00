use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::{recording_services, tick, world_with_screen};
use crate::ecs::components::{
    CollisionHandlerComponent, CollisionStateComponent, DrawComponent, PositionComponent, ScaleComponent,
    ScreenComponent, SpriteComponent,
};
use crate::ecs::systems::CollisionSystem;
use crate::ecs::{EntityId, SystemPhase, SystemScheduler, World};
use crate::services::Services;

struct Arena {
    world: World,
    screen: EntityId,
    scheduler: SystemScheduler,
    services: Services,
    ticks: u64,
}

impl Arena {
    fn new() -> Self {
        let (world, screen) = world_with_screen();
        let mut scheduler = SystemScheduler::new();
        scheduler.add_system(CollisionSystem::new());
        let (services, _, _) = recording_services();
        Self {
            world,
            screen,
            scheduler,
            services,
            ticks: 0,
        }
    }

    /// A collidable ball counting the collisions it starts
    fn ball(&mut self, x: f32, mut sprite: SpriteComponent) -> (EntityId, Arc<AtomicUsize>) {
        sprite.radius = 0.1;
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let entity = self.world.create_entity();
        self.world.add_component(entity, PositionComponent::new(x, 0.5, 0.0)).unwrap();
        self.world
            .add_component(entity, sprite.with_collisions())
            .unwrap();
        self.world
            .add_component(
                entity,
                CollisionHandlerComponent::new(move |_, _, _| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();
        (entity, hits)
    }

    fn move_to(&mut self, entity: EntityId, x: f32) {
        self.world.get_component_mut::<PositionComponent>(entity).unwrap().position.x = x;
    }

    fn step(&mut self) {
        self.ticks += 1;
        self.scheduler
            .run_phase(SystemPhase::Update, &mut self.world, &mut self.services, tick(self.ticks))
            .unwrap();
    }

    fn registry(&self) -> Vec<EntityId> {
        self.world
            .get_component::<ScreenComponent>(self.screen)
            .unwrap()
            .collision_objects()
            .to_vec()
    }
}

#[test]
fn test_collision_reported_once_per_approach() {
    let mut arena = Arena::new();
    let (a, hits_a) = arena.ball(0.0, SpriteComponent::default());
    let (b, hits_b) = arena.ball(1.0, SpriteComponent::default());

    arena.step();
    assert_eq!(hits_a.load(Ordering::SeqCst), 0);

    arena.move_to(b, 0.15);
    arena.step();
    assert_eq!(hits_a.load(Ordering::SeqCst), 1);
    assert_eq!(hits_b.load(Ordering::SeqCst), 1);
    assert!(arena.world.get_component::<CollisionStateComponent>(a).unwrap().just_collided_with(b));

    let events = arena.world.collision_events_mut().drain();
    assert_eq!(events.len(), 2);
    assert_eq!((events[0].entity, events[0].other, events[0].tick), (a, b, 2));
    assert_eq!((events[1].entity, events[1].other), (b, a));

    // Still overlapping: no new notifications
    for _ in 0..3 {
        arena.step();
    }
    assert_eq!(hits_a.load(Ordering::SeqCst), 1);
    assert!(arena.world.collision_events().is_empty());
    let state = arena.world.get_component::<CollisionStateComponent>(a).unwrap();
    assert!(state.is_colliding_with(b));
    assert!(state.collision_entered.is_empty());

    // Separate, then approach again
    arena.move_to(b, 1.0);
    arena.step();
    assert!(!arena.world.get_component::<CollisionStateComponent>(a).unwrap().is_colliding());
    arena.move_to(b, 0.15);
    arena.step();
    assert_eq!(hits_a.load(Ordering::SeqCst), 2);
    assert_eq!(hits_b.load(Ordering::SeqCst), 2);
}

#[test]
fn test_scale_enlarges_collision_radius() {
    let mut arena = Arena::new();
    let (a, hits) = arena.ball(0.0, SpriteComponent::default());
    arena.ball(0.3, SpriteComponent::default());
    arena.step();
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    arena.world.add_component(a, ScaleComponent::new(2.5)).unwrap();
    arena.step();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_asymmetric_rejection_yields_no_collision() {
    let mut arena = Arena::new();
    let (_, hits_a) = arena.ball(0.0, SpriteComponent::default());
    let (_, hits_b) = arena.ball(0.05, SpriteComponent::default().with_collision_test(|_, _| false));

    arena.step();
    assert_eq!(hits_a.load(Ordering::SeqCst), 0);
    assert_eq!(hits_b.load(Ordering::SeqCst), 0);
    assert!(arena.world.collision_events().is_empty());
}

#[test]
fn test_inactive_and_invisible_entities_skip_checks() {
    let mut arena = Arena::new();
    let (a, hits_a) = arena.ball(0.0, SpriteComponent::default());
    let (b, hits_b) = arena.ball(0.05, SpriteComponent::default());

    arena.world.set_active(b, false).unwrap();
    arena.step();
    assert_eq!(hits_a.load(Ordering::SeqCst), 0);
    assert_eq!(hits_b.load(Ordering::SeqCst), 0);

    arena.world.set_active(b, true).unwrap();
    let mut hidden = DrawComponent::default();
    hidden.is_visible = false;
    arena.world.add_component(a, hidden).unwrap();
    arena.step();
    // a is invisible and skips its own check, but b still sees a
    assert_eq!(hits_a.load(Ordering::SeqCst), 0);
    assert_eq!(hits_b.load(Ordering::SeqCst), 1);
}

#[test]
fn test_destroyed_entity_leaves_registry_and_state() {
    let mut arena = Arena::new();
    let (a, hits_a) = arena.ball(0.0, SpriteComponent::default());
    let (b, _) = arena.ball(0.05, SpriteComponent::default());
    arena.step();
    assert_eq!(arena.registry(), vec![a, b]);
    assert!(arena.world.get_component::<CollisionStateComponent>(a).unwrap().is_colliding_with(b));

    arena.world.destroy_entity(b).unwrap();
    assert_eq!(arena.registry(), vec![a]);
    assert!(!arena.world.get_component::<CollisionStateComponent>(a).unwrap().is_colliding());

    arena.world.collision_events_mut().clear();
    for _ in 0..3 {
        arena.step();
    }
    assert_eq!(hits_a.load(Ordering::SeqCst), 1);
    assert!(arena.world.collision_events().iter().all(|e| e.other != b && e.entity != b));
}

#[test]
fn test_handler_may_destroy_the_other_entity() {
    let mut arena = Arena::new();
    let a = arena.world.create_entity();
    arena.world.add_component(a, PositionComponent::new(0.0, 0.5, 0.0)).unwrap();
    let mut sprite = SpriteComponent::default().with_collisions();
    sprite.radius = 0.1;
    arena.world.add_component(a, sprite).unwrap();
    arena
        .world
        .add_component(
            a,
            CollisionHandlerComponent::new(|world, _, other| {
                world.request_destroy(other);
            }),
        )
        .unwrap();
    let (b, hits_b) = arena.ball(0.05, SpriteComponent::default());

    arena.step();
    assert!(!arena.world.is_alive(b));
    assert_eq!(hits_b.load(Ordering::SeqCst), 1);
    assert_eq!(arena.registry(), vec![a]);
    arena.step();
}

#[test]
fn test_checks_collisions_toggle_keeps_registry_consistent() {
    let mut arena = Arena::new();
    let entity = arena.world.create_entity();
    arena.world.add_component(entity, SpriteComponent::default()).unwrap();
    assert!(arena.registry().is_empty());

    arena.world.set_checks_collisions(entity, true).unwrap();
    assert_eq!(arena.registry(), vec![entity]);
    assert!(arena.world.has_component::<CollisionStateComponent>(entity));
    arena.world.set_checks_collisions(entity, true).unwrap();
    assert_eq!(arena.registry().len(), 1);

    arena.world.set_checks_collisions(entity, false).unwrap();
    assert!(arena.registry().is_empty());

    arena.world.set_checks_collisions(entity, true).unwrap();
    arena.world.remove_component::<SpriteComponent>(entity);
    assert!(arena.registry().is_empty());
    assert!(arena.world.set_checks_collisions(entity, true).is_err());
}

#[test]
fn test_destroying_screen_unregisters_sprites() {
    let mut arena = Arena::new();
    let (a, _) = arena.ball(0.0, SpriteComponent::default());
    arena.world.destroy_entity(arena.screen).unwrap();

    assert!(arena.world.active_screen().is_none());
    assert!(!arena.world.get_component::<SpriteComponent>(a).unwrap().checks_collisions());
    arena.step();
}
