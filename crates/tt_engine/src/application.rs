//! Application trait and lifecycle management

use crate::engine::{Engine, EngineError, FrameStats};
use thiserror::Error;

/// Application lifecycle trait
///
/// Implement this trait to create your game or application using the engine.
pub trait Application {
    /// Initialize the application
    ///
    /// Called once after the engine is initialized. Use this to set up your
    /// initial entities, load assets and add channels.
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Called after every frame with what the frame did
    fn update(&mut self, engine: &mut Engine, stats: &FrameStats) -> Result<(), AppError>;

    /// Cleanup the application
    ///
    /// Called once when the main loop stops.
    fn cleanup(&mut self, _engine: &mut Engine) {}
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error propagated to application level
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),
}
