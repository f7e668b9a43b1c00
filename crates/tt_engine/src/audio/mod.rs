//! Audio seam
//!
//! Sound events are fire-and-forget: the audio system asks an
//! [`AudioEngine`] to play an event and forgets about it.

use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

/// Name of a sound event known to the audio engine
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SoundEventHandle(pub String);

impl SoundEventHandle {
    /// Create a handle from an event name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Audio errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// The event is not known to the audio engine
    #[error("Unknown sound event: {0}")]
    UnknownEvent(String),
}

/// Plays sound events
pub trait AudioEngine {
    /// Start playing an event
    fn play(&mut self, event: &SoundEventHandle) -> Result<(), AudioError>;
}

/// Audio engine that plays nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioEngine for NullAudio {
    fn play(&mut self, event: &SoundEventHandle) -> Result<(), AudioError> {
        log::trace!("Sound event {} (muted)", event.0);
        Ok(())
    }
}

/// Audio engine remembering which events were played
///
/// Clones share the same log.
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    played: Arc<Mutex<Vec<SoundEventHandle>>>,
}

impl RecordingAudio {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Events played so far, oldest first
    pub fn played(&self) -> Vec<SoundEventHandle> {
        self.played.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl AudioEngine for RecordingAudio {
    fn play(&mut self, event: &SoundEventHandle) -> Result<(), AudioError> {
        self.played
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
        Ok(())
    }
}
