//! Built-in engine systems

pub mod script_system;
pub mod movement_system;
pub mod scale_system;
pub mod animation_system;
pub mod audio_system;
pub mod collision_system;
pub mod screen_clear_system;
pub mod sprite_render_system;
pub mod text_render_system;
pub mod render_flush_system;
pub mod screenlet_system;

pub use script_system::ScriptSystem;
pub use movement_system::MovementSystem;
pub use scale_system::ScaleSystem;
pub use animation_system::AnimationSystem;
pub use audio_system::AudioSystem;
pub use collision_system::CollisionSystem;
pub use screen_clear_system::ScreenClearSystem;
pub use sprite_render_system::SpriteRenderSystem;
pub use text_render_system::TextRenderSystem;
pub use render_flush_system::RenderFlushSystem;
pub use screenlet_system::ScreenletSystem;

use super::components::ScreenComponent;
use super::{EcsError, EntityId, World};

/// Layers of the built-in systems
///
/// Sprite and text calls are queued, flushed together, and only then are
/// screens composited, so every buffer is complete when it is shown.
pub mod schedule {
    /// Scripts run before anything moves
    pub const SCRIPT_UPDATE: i32 = 0;
    /// Movement integrates velocity
    pub const MOVEMENT_UPDATE: i32 = 0;
    /// Scale easing
    pub const SCALE_UPDATE: i32 = 1;
    /// Atlas frame selection
    pub const ANIMATION_UPDATE: i32 = 1;
    /// Sound events
    pub const AUDIO_UPDATE: i32 = 2;
    /// Collision detection sees the final positions of the tick
    pub const COLLISION_UPDATE: i32 = 3;
    /// Screen buffers are cleared first
    pub const SCREEN_CLEAR_DRAW: i32 = 0;
    /// Sprites
    pub const SPRITE_RENDER_DRAW: i32 = 2;
    /// Text goes on top of sprites
    pub const TEXT_RENDER_DRAW: i32 = 3;
    /// Queued sprite and text calls are submitted, child buffers first
    pub const RENDER_FLUSH_DRAW: i32 = 9;
    /// Screen buffers are composited onto the backbuffer
    pub const SCREENLET_DRAW: i32 = 10;
}

/// Find the screen `entity` draws on
///
/// The explicit screen wins; otherwise the fallback (the world's active
/// screen) is used.
pub(crate) fn resolve_screen(
    world: &World,
    entity: EntityId,
    explicit: Option<EntityId>,
    fallback: Option<EntityId>,
) -> Result<(EntityId, &ScreenComponent), EcsError> {
    let screen = explicit.or(fallback).ok_or(EcsError::NoScreen { entity })?;
    let component = world
        .get_component::<ScreenComponent>(screen)
        .ok_or(EcsError::MissingComponent {
            entity: screen,
            component: std::any::type_name::<ScreenComponent>(),
        })?;
    Ok((screen, component))
}
