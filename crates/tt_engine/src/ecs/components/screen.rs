//! Screen component
//!
//! A screen is a render target plus the coordinate system of everything
//! drawn on it. Coordinates are normalized so the screen height is 1.0 and
//! the width is the aspect ratio.

use crate::ecs::components::SpriteComponent;
use crate::ecs::{Component, EntityId, World};
use crate::foundation::math::{Color, Rect, Vec2, Vec3};
use crate::render::RenderTargetId;

/// Render target and collision registry of a screen
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenComponent {
    /// Off-screen buffer; `None` draws straight to the backbuffer
    pub render_target: Option<RenderTargetId>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Color the buffer is cleared to before drawing
    pub background: Color,
    /// Zoom about the screen centre
    pub zoom: f32,
    /// Where the buffer is composited onto the backbuffer
    pub destination: Rect,
    /// Inactive screens are neither cleared nor composited
    pub active: bool,
    collision_objects: Vec<EntityId>,
}

impl ScreenComponent {
    /// Create a screen of the given pixel size
    pub fn new(render_target: Option<RenderTargetId>, width: u32, height: u32) -> Self {
        Self {
            render_target,
            width,
            height,
            background: Color::BLACK,
            zoom: 1.0,
            destination: Rect::new(0, 0, width, height),
            active: true,
            collision_objects: Vec::new(),
        }
    }

    /// Width divided by height
    #[allow(clippy::cast_precision_loss)]
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Screen centre in normalized units
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.aspect_ratio() / 2.0, 0.5)
    }

    /// Factor converting pixels to normalized units
    #[allow(clippy::cast_precision_loss)]
    pub fn scaling_to_normalized(&self) -> f32 {
        1.0 / self.height.max(1) as f32
    }

    /// Convert a normalized position to pixels, applying zoom
    #[allow(clippy::cast_precision_loss)]
    pub fn to_pixels(&self, position: &Vec3) -> Vec2 {
        let center = self.center();
        ((position.xy() - center) * self.zoom + center) * self.height as f32
    }

    /// Entities whose sprites collide on this screen, in registration order
    pub fn collision_objects(&self) -> &[EntityId] {
        &self.collision_objects
    }

    pub(crate) fn register_collider(&mut self, entity: EntityId) {
        if !self.collision_objects.contains(&entity) {
            self.collision_objects.push(entity);
        }
    }

    pub(crate) fn unregister_collider(&mut self, entity: EntityId) {
        self.collision_objects.retain(|e| *e != entity);
    }
}

impl Component for ScreenComponent {
    fn keep_managed_state(&mut self, previous: &Self) {
        self.collision_objects.clone_from(&previous.collision_objects);
    }

    fn on_detach(&mut self, entity: EntityId, world: &mut World) {
        for collider in self.collision_objects.drain(..) {
            if let Some(sprite) = world.get_component_mut::<SpriteComponent>(collider) {
                sprite.mark_unregistered();
            }
        }
        if world.active_screen() == Some(entity) {
            world.set_active_screen(None);
        }
    }
}
