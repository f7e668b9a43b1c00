//! Audio component

use crate::audio::SoundEventHandle;
use crate::ecs::Component;

/// A sound event played by the audio system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioComponent {
    /// Event to play
    pub event: SoundEventHandle,
    /// Set once the event was played
    pub played: bool,
    /// Play again on every tick instead of once
    pub repeat: bool,
}

impl Component for AudioComponent {}

impl AudioComponent {
    /// Play `event` once
    pub const fn once(event: SoundEventHandle) -> Self {
        Self {
            event,
            played: false,
            repeat: false,
        }
    }
}
