//! External collaborators the systems talk to

use crate::assets::{AssetProvider, MemoryAssetProvider};
use crate::audio::{AudioEngine, NullAudio};
use crate::input::{InputProvider, KeyState, ScriptedInput};
use crate::render::{DrawBackend, LogBackend, RenderQueue};

/// Draw, audio, input and asset collaborators plus the sampled key state
pub struct Services {
    /// Graphics device
    pub renderer: Box<dyn DrawBackend>,
    /// Sound output
    pub audio: Box<dyn AudioEngine>,
    /// Keyboard source
    pub input: Box<dyn InputProvider>,
    /// Texture and font source
    pub assets: Box<dyn AssetProvider>,
    /// Keys sampled at the start of the current update tick
    pub keys: KeyState,
    /// Draw calls of the current draw pass, flushed by `RenderFlushSystem`
    pub render_queue: RenderQueue,
}

impl Services {
    /// Bundle the given collaborators
    pub fn new(
        renderer: impl DrawBackend + 'static,
        audio: impl AudioEngine + 'static,
        input: impl InputProvider + 'static,
        assets: impl AssetProvider + 'static,
    ) -> Self {
        Self {
            renderer: Box::new(renderer),
            audio: Box::new(audio),
            input: Box::new(input),
            assets: Box::new(assets),
            keys: KeyState::default(),
            render_queue: RenderQueue::new(),
        }
    }

    /// Collaborators that log draws, stay silent and never see a key press
    pub fn headless() -> Self {
        Self::new(LogBackend::new(), NullAudio, ScriptedInput::new(), MemoryAssetProvider::new())
    }

    /// Sample the keyboard for the next update tick
    pub fn poll_input(&mut self) {
        self.keys = self.input.poll();
    }
}
