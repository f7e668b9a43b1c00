//! Keyboard-driven screen zoom

use crate::ecs::components::{Script, ScriptContext, ScreenComponent};
use crate::ecs::EntityId;
use crate::input::Key;

/// Script zooming a screen in with Page Up and out with Page Down
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenZoomer {
    /// Zoom change per tick while a key is held
    pub step: f32,
    screen: Option<EntityId>,
}

impl Default for ScreenZoomer {
    fn default() -> Self {
        Self {
            step: Self::DEFAULT_STEP,
            screen: None,
        }
    }
}

impl ScreenZoomer {
    /// Zoom change per tick
    pub const DEFAULT_STEP: f32 = 0.003;

    /// Zoom the screen the script is attached to
    pub fn new() -> Self {
        Self::default()
    }

    /// Zoom another screen entity
    pub fn for_screen(screen: EntityId) -> Self {
        Self {
            screen: Some(screen),
            ..Self::default()
        }
    }
}

impl Script for ScreenZoomer {
    fn on_update(&mut self, ctx: &mut ScriptContext<'_>) {
        let delta = match (ctx.is_key_down(Key::PageUp), ctx.is_key_down(Key::PageDown)) {
            (true, false) => self.step,
            (false, true) => -self.step,
            _ => return,
        };

        let target = self.screen.unwrap_or(ctx.entity);
        if let Some(screen) = ctx.world.get_component_mut::<ScreenComponent>(target) {
            screen.zoom += delta;
            log::debug!("Zoom={}", screen.zoom);
        }
    }
}
