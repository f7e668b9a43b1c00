//! Position and velocity components

use crate::ecs::{Component, EntityId};
use crate::foundation::math::Vec3;

/// Position relative to an optional parent entity
///
/// `z` carries the draw depth. The absolute position is the sum of positions
/// along the parent chain, see [`crate::ecs::World::absolute_position`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PositionComponent {
    /// Position relative to the parent (x, y, depth)
    pub position: Vec3,
    /// Entity this position is relative to
    pub parent: Option<EntityId>,
}

impl Component for PositionComponent {}

impl PositionComponent {
    /// Create a root position
    pub fn new(x: f32, y: f32, depth: f32) -> Self {
        Self {
            position: Vec3::new(x, y, depth),
            parent: None,
        }
    }

    /// Make the position relative to `parent`
    #[must_use]
    pub const fn with_parent(mut self, parent: EntityId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Depth, used as the layer depth when drawing
    pub fn depth(&self) -> f32 {
        self.position.z
    }
}

/// Linear velocity in normalized units per second
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VelocityComponent {
    /// Velocity (x, y, depth)
    pub velocity: Vec3,
}

impl Component for VelocityComponent {}

impl VelocityComponent {
    /// Create a planar velocity
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            velocity: Vec3::new(x, y, 0.0),
        }
    }
}
