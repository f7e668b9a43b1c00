//! Text component

use crate::ecs::Component;
use crate::render::FontHandle;

/// A string drawn with a font
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextComponent {
    /// Font to draw with
    pub font: FontHandle,
    /// Text content
    pub text: String,
}

impl Component for TextComponent {}

impl TextComponent {
    /// Create a text component
    pub fn new(font: FontHandle, text: impl Into<String>) -> Self {
        Self { font, text: text.into() }
    }
}
