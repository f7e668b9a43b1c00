//! Sprite component
//!
//! A sprite is a textured shape with normalized dimensions. When
//! `checks_collisions` is on, the sprite's entity is a member of exactly one
//! screen's collision registry; attaching and detaching the component keeps
//! that registry up to date.

use std::sync::Arc;

use crate::ecs::components::{CollisionStateComponent, ScreenComponent};
use crate::ecs::{Component, EntityId, World};
use crate::foundation::math::{Vec2, Vec3};
use crate::render::Texture;

/// What a collision test sees of one participant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderView {
    /// The participating entity
    pub entity: EntityId,
    /// Absolute position
    pub position: Vec3,
    /// Radius after applying the cumulative scale
    pub radius: f32,
}

/// Custom collision test replacing the default circle check
pub type CollisionTest = Arc<dyn Fn(&ColliderView, &ColliderView) -> bool + Send + Sync>;

/// Default test: strict circle overlap in the x/y plane
pub fn circles_overlap(me: &ColliderView, other: &ColliderView) -> bool {
    (me.position.xy() - other.position.xy()).norm() < me.radius + other.radius
}

/// Textured shape with a circular collision model
#[derive(Clone)]
pub struct SpriteComponent {
    /// Texture drawn for this sprite
    pub texture: Option<Texture>,
    /// Width in normalized units
    pub width: f32,
    /// Height in normalized units
    pub height: f32,
    /// Collision radius in normalized units, before scaling
    pub radius: f32,
    /// Draw origin as a fraction of the texture size
    pub center: Vec2,
    /// Custom collision test; `None` uses [`circles_overlap`]
    pub collides_with: Option<CollisionTest>,
    pub(crate) checks_collisions: bool,
    pub(crate) screen: Option<EntityId>,
}

impl Default for SpriteComponent {
    fn default() -> Self {
        Self {
            texture: None,
            width: 0.0,
            height: 0.0,
            radius: 0.0,
            center: Vec2::new(0.5, 0.5),
            collides_with: None,
            checks_collisions: false,
            screen: None,
        }
    }
}

impl SpriteComponent {
    /// Create a sprite sized after its texture
    ///
    /// `to_normalized` converts pixels to normalized units, normally the
    /// target screen's [`ScreenComponent::scaling_to_normalized`].
    #[allow(clippy::cast_precision_loss)]
    pub fn from_texture(texture: Texture, to_normalized: f32) -> Self {
        let width = texture.width as f32 * to_normalized;
        let height = texture.height as f32 * to_normalized;
        Self {
            texture: Some(texture),
            width,
            height,
            radius: width / 2.0,
            ..Self::default()
        }
    }

    /// Draw and collide on a specific screen
    #[must_use]
    pub const fn on_screen(mut self, screen: EntityId) -> Self {
        self.screen = Some(screen);
        self
    }

    /// Take part in collision detection from the moment it is attached
    #[must_use]
    pub const fn with_collisions(mut self) -> Self {
        self.checks_collisions = true;
        self
    }

    /// Replace the default circle test
    #[must_use]
    pub fn with_collision_test(
        mut self,
        test: impl Fn(&ColliderView, &ColliderView) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.collides_with = Some(Arc::new(test));
        self
    }

    /// Whether the sprite is in its screen's collision registry
    ///
    /// Use [`World::set_checks_collisions`] to change this on an attached sprite.
    pub const fn checks_collisions(&self) -> bool {
        self.checks_collisions
    }

    /// Screen this sprite draws and collides on
    pub const fn screen(&self) -> Option<EntityId> {
        self.screen
    }

    /// Run this sprite's collision test of `me` against `other`
    pub fn test_collision(&self, me: &ColliderView, other: &ColliderView) -> bool {
        self.collides_with
            .as_ref()
            .map_or_else(|| circles_overlap(me, other), |test| test(me, other))
    }

    /// Draw origin in texture pixels
    #[allow(clippy::cast_precision_loss)]
    pub fn origin(&self) -> Vec2 {
        self.texture.as_ref().map_or_else(Vec2::zeros, |texture| {
            Vec2::new(
                self.center.x * texture.width as f32,
                self.center.y * texture.height as f32,
            )
        })
    }

    pub(crate) fn mark_registered(&mut self, screen: EntityId) {
        self.checks_collisions = true;
        self.screen = Some(screen);
    }

    pub(crate) fn mark_unregistered(&mut self) {
        self.checks_collisions = false;
    }
}

impl Component for SpriteComponent {
    fn on_attach(&mut self, entity: EntityId, world: &mut World) {
        if self.screen.is_none() {
            self.screen = world.active_screen();
        }
        if !self.checks_collisions {
            return;
        }

        let registry = self
            .screen
            .and_then(|screen| world.get_component_mut::<ScreenComponent>(screen));
        match registry {
            Some(registry) => {
                registry.register_collider(entity);
                if !world.has_component::<CollisionStateComponent>(entity) {
                    // Cannot fail: the entity is alive while its components attach
                    let _ = world.add_component(entity, CollisionStateComponent::default());
                }
            }
            None => {
                log::warn!("Sprite on {entity:?} has no screen to collide on; collisions disabled");
                self.checks_collisions = false;
            }
        }
    }

    fn keep_managed_state(&mut self, previous: &Self) {
        self.checks_collisions = previous.checks_collisions;
        self.screen = previous.screen;
    }

    fn on_detach(&mut self, entity: EntityId, world: &mut World) {
        if !self.checks_collisions {
            return;
        }
        if let Some(registry) = self
            .screen
            .and_then(|screen| world.get_component_mut::<ScreenComponent>(screen))
        {
            registry.unregister_collider(entity);
        }
        if let Some(state) = world.get_component_mut::<CollisionStateComponent>(entity) {
            state.reset();
        }
        self.checks_collisions = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{TextureHandle, TextureSource};

    fn view(x: f32, radius: f32) -> ColliderView {
        ColliderView {
            entity: EntityId::default(),
            position: Vec3::new(x, 0.0, 0.0),
            radius,
        }
    }

    #[test]
    fn test_circle_overlap_is_strict() {
        assert!(circles_overlap(&view(0.0, 0.5), &view(0.9, 0.5)));
        assert!(!circles_overlap(&view(0.0, 0.5), &view(1.0, 0.5)));
    }

    #[test]
    fn test_from_texture_sizes_in_normalized_units() {
        let texture = Texture::new(TextureSource::Asset(TextureHandle(1)), 200, 100);
        let sprite = SpriteComponent::from_texture(texture, 1.0 / 400.0);
        assert!((sprite.width - 0.5).abs() < f32::EPSILON);
        assert!((sprite.height - 0.25).abs() < f32::EPSILON);
        assert!((sprite.radius - 0.25).abs() < f32::EPSILON);
        assert_eq!(sprite.origin(), Vec2::new(100.0, 50.0));
    }
}
