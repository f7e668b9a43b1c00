//! Draw component

use crate::ecs::{Component, EntityId};
use crate::foundation::math::{Color, Vec2};

/// Visual properties shared by everything that gets drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawComponent {
    /// Tint color
    pub color: Color,
    /// Scale applied when drawing, written by the scale system
    pub draw_scale: f64,
    /// Rotation in radians
    pub rotation: f32,
    /// Depth in the batch, written by the render systems
    pub layer_depth: f32,
    /// Invisible entities are not drawn and do not collide
    pub is_visible: bool,
    /// Screen to draw on instead of the world's active screen
    pub screen: Option<EntityId>,
    /// Last computed pixel position, written by the render systems
    pub draw_position: Vec2,
}

impl Component for DrawComponent {}

impl Default for DrawComponent {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            draw_scale: 1.0,
            rotation: 0.0,
            layer_depth: 0.0,
            is_visible: true,
            screen: None,
            draw_position: Vec2::zeros(),
        }
    }
}

impl DrawComponent {
    /// Draw with a tint
    pub fn with_color(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    /// Draw on a specific screen
    #[must_use]
    pub const fn on_screen(mut self, screen: EntityId) -> Self {
        self.screen = Some(screen);
        self
    }
}
