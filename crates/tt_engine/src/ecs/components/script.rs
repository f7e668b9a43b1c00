//! Script component
//!
//! Scripts are small pieces of per-entity behaviour run once per update tick
//! by the script system. A [`Modifier`] is a script that rewrites one
//! component as a function of simulated time.

use std::fmt;

use crate::ecs::{Component, EntityId, World};
use crate::input::{Key, KeyState};

/// Everything a script can touch while it runs
pub struct ScriptContext<'a> {
    /// Entity the script is attached to
    pub entity: EntityId,
    /// World the entity lives in
    pub world: &'a mut World,
    /// Keyboard state sampled for this tick
    pub keys: &'a KeyState,
    /// Fixed timestep in seconds
    pub dt: f64,
    /// Time this script component has been running, in seconds
    pub sim_time: f64,
}

impl ScriptContext<'_> {
    /// Whether `key` is held during this tick
    pub fn is_key_down(&self, key: Key) -> bool {
        self.keys.is_down(key)
    }
}

/// Behaviour attached to an entity through a [`ScriptComponent`]
pub trait Script: Send + Sync {
    /// Called once per update tick
    fn on_update(&mut self, ctx: &mut ScriptContext<'_>);
}

/// Script backed by a closure
pub struct BasicScript<F>(F);

impl<F> BasicScript<F>
where
    F: FnMut(&mut ScriptContext<'_>) + Send + Sync,
{
    /// Wrap a closure
    pub const fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Script for BasicScript<F>
where
    F: FnMut(&mut ScriptContext<'_>) + Send + Sync,
{
    fn on_update(&mut self, ctx: &mut ScriptContext<'_>) {
        (self.0)(ctx);
    }
}

type ModifierFn<T> = Box<dyn Fn(&T, f64) -> T + Send + Sync>;
type SignalFn = Box<dyn Fn(f64) -> f64 + Send + Sync>;

/// Script that rewrites a component of type `T` every tick
///
/// Each tick the signal maps the script component's simulated time to a
/// value, and the modifier function computes the new component from the
/// current one and that value. The default signal is the time itself.
///
/// The new value is written in place without running the attach and detach
/// hooks. State those hooks manage, such as a sprite's collision
/// registration, is carried over from the current value through
/// [`Component::keep_managed_state`]; use
/// [`World::set_checks_collisions`] to change it.
pub struct Modifier<T: Component> {
    /// Inactive modifiers do nothing
    pub active: bool,
    target: Option<EntityId>,
    code: ModifierFn<T>,
    signal: SignalFn,
}

impl<T: Component> Modifier<T> {
    /// Create a modifier acting on the component of the entity it is attached to
    pub fn new(code: impl Fn(&T, f64) -> T + Send + Sync + 'static) -> Self {
        Self {
            active: true,
            target: None,
            code: Box::new(code),
            signal: Box::new(|time| time),
        }
    }

    /// Modify the component of another entity
    #[must_use]
    pub const fn targeting(mut self, entity: EntityId) -> Self {
        self.target = Some(entity);
        self
    }

    /// Replace the signal, e.g. with a sine wave of time
    #[must_use]
    pub fn with_signal(mut self, signal: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        self.signal = Box::new(signal);
        self
    }

    /// Signal value at `time` seconds
    pub fn value(&self, time: f64) -> f64 {
        (self.signal)(time)
    }
}

impl<T: Component> Script for Modifier<T> {
    fn on_update(&mut self, ctx: &mut ScriptContext<'_>) {
        if !self.active {
            return;
        }
        let value = self.value(ctx.sim_time);
        let entity = self.target.unwrap_or(ctx.entity);
        if let Some(component) = ctx.world.get_component_mut::<T>(entity) {
            let mut next = (self.code)(component, value);
            next.keep_managed_state(component);
            *component = next;
        }
    }
}

/// Scripts of one entity, run in insertion order
#[derive(Default)]
pub struct ScriptComponent {
    /// Attached scripts
    pub scripts: Vec<Box<dyn Script>>,
    /// Seconds of simulated time this component has been updated for
    pub sim_time: f64,
}

impl Component for ScriptComponent {}

impl fmt::Debug for ScriptComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptComponent")
            .field("scripts", &self.scripts.len())
            .field("sim_time", &self.sim_time)
            .finish()
    }
}

impl ScriptComponent {
    /// Create a component with one script
    pub fn with_script(script: impl Script + 'static) -> Self {
        Self {
            scripts: vec![Box::new(script)],
            sim_time: 0.0,
        }
    }

    /// Append a script
    pub fn add(&mut self, script: impl Script + 'static) {
        self.scripts.push(Box::new(script));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{ScaleComponent, ScreenComponent, SpriteComponent};

    fn run_once<T: Component>(modifier: &mut Modifier<T>, world: &mut World, entity: EntityId) {
        let keys = KeyState::default();
        let mut ctx = ScriptContext {
            entity,
            world,
            keys: &keys,
            dt: 0.1,
            sim_time: 0.5,
        };
        modifier.on_update(&mut ctx);
    }

    #[test]
    fn test_modifier_rewrites_component_from_signal() {
        let mut world = World::new();
        let entity = world.create_entity();
        world.add_component(entity, ScaleComponent::new(1.0)).unwrap();

        let mut modifier = Modifier::new(|scale: &ScaleComponent, value| ScaleComponent::new(scale.scale + value))
            .with_signal(|time| time * 2.0);
        let keys = KeyState::default();
        let mut ctx = ScriptContext {
            entity,
            world: &mut world,
            keys: &keys,
            dt: 0.1,
            sim_time: 0.5,
        };
        modifier.on_update(&mut ctx);
        assert!((world.get_component::<ScaleComponent>(entity).unwrap().scale - 2.0).abs() < 1e-12);

        modifier.active = false;
        let mut ctx = ScriptContext {
            entity,
            world: &mut world,
            keys: &keys,
            dt: 0.1,
            sim_time: 0.5,
        };
        modifier.on_update(&mut ctx);
        assert!((world.get_component::<ScaleComponent>(entity).unwrap().scale - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_modifier_from_default_keeps_collision_registration() {
        let mut world = World::new();
        let screen = world.create_entity();
        world.add_component(screen, ScreenComponent::new(None, 800, 600)).unwrap();
        world.set_active_screen(Some(screen));
        let ball = world.create_entity();
        world
            .add_component(ball, SpriteComponent::default().with_collisions())
            .unwrap();

        let mut sprite_modifier = Modifier::new(|_: &SpriteComponent, value| SpriteComponent {
            radius: value as f32,
            ..SpriteComponent::default()
        });
        run_once(&mut sprite_modifier, &mut world, ball);
        let sprite = world.get_component::<SpriteComponent>(ball).unwrap();
        assert!((sprite.radius - 0.5).abs() < f32::EPSILON);
        assert!(sprite.checks_collisions());
        assert_eq!(sprite.screen(), Some(screen));

        let mut screen_modifier = Modifier::new(|current: &ScreenComponent, value| {
            let mut next = ScreenComponent::new(current.render_target, current.width, current.height);
            next.zoom = 1.0 + value as f32;
            next
        });
        run_once(&mut screen_modifier, &mut world, screen);
        let component = world.get_component::<ScreenComponent>(screen).unwrap();
        assert!((component.zoom - 1.5).abs() < f32::EPSILON);
        assert_eq!(component.collision_objects(), &[ball]);

        // Registration still unwinds cleanly after the rewrites
        world.destroy_entity(ball).unwrap();
        assert!(world.get_component::<ScreenComponent>(screen).unwrap().collision_objects().is_empty());
    }
}
