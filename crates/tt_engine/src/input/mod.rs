//! Keyboard input seam
//!
//! Input is sampled once per update tick through an [`InputProvider`] and
//! handed to scripts as a [`KeyState`].

pub mod zoomer;

pub use zoomer::ScreenZoomer;

use std::collections::{HashSet, VecDeque};

/// Keys the engine knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Page up
    PageUp,
    /// Page down
    PageDown,
}

/// Keys held down at one sample
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyState {
    down: HashSet<Key>,
}

impl KeyState {
    /// State with the given keys held
    pub fn with_keys(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            down: keys.into_iter().collect(),
        }
    }

    /// Whether `key` is held
    pub fn is_down(&self, key: Key) -> bool {
        self.down.contains(&key)
    }

    /// Mark `key` as held or released
    pub fn set(&mut self, key: Key, down: bool) {
        if down {
            self.down.insert(key);
        } else {
            self.down.remove(&key);
        }
    }
}

/// Source of keyboard state
pub trait InputProvider {
    /// Sample the keyboard
    fn poll(&mut self) -> KeyState;
}

/// Input replaying a fixed sequence of samples, then reporting no keys
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    samples: VecDeque<KeyState>,
}

impl ScriptedInput {
    /// Input without any key presses
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue samples to be returned by successive polls
    pub fn with_samples(samples: impl IntoIterator<Item = KeyState>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
        }
    }

    /// Queue one more sample
    pub fn push(&mut self, sample: KeyState) {
        self.samples.push_back(sample);
    }
}

impl InputProvider for ScriptedInput {
    fn poll(&mut self) -> KeyState {
        self.samples.pop_front().unwrap_or_default()
    }
}
