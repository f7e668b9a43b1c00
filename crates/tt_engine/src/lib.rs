//! # TT Engine
//!
//! A 2D game engine core: entities built from components, updated on a fixed
//! timestep and drawn through layered screens.
//!
//! ## Features
//!
//! - **Fixed timestep**: deterministic update ticks with interpolated drawing
//! - **ECS Architecture**: type-indexed component store and a layered system scheduler
//! - **Collision detection**: per-screen registries with rising-edge notifications
//! - **Screens and channels**: nested render targets composited onto the backbuffer
//! - **Pluggable collaborators**: drawing, audio, input and assets behind traits
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tt_engine::prelude::*;
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         let factory = engine.factory();
//!         let ball = factory.create_drawlet(&mut engine.world).map_err(EngineError::from)?;
//!         engine.world.get_component_mut::<VelocityComponent>(ball).unwrap().velocity.x = 0.1;
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, engine: &mut Engine, _stats: &FrameStats) -> Result<(), AppError> {
//!         if engine.timestep().sim_time() > 5.0 {
//!             engine.quit();
//!         }
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut app = MyApp;
//!     Engine::run(EngineConfig::default(), Services::headless(), &mut app)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod ecs;
pub mod events;
pub mod assets;
pub mod render;
pub mod input;
pub mod audio;
pub mod services;

mod application;
mod engine;

pub use application::{AppError, Application};
pub use engine::{Channel, ChannelId, Engine, EngineConfig, EngineError, FrameStats};
pub use services::Services;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        AppError, Application, Channel, ChannelId, Engine, EngineConfig, EngineError, FrameStats, Services,
        config::Config,
        foundation::{
            math::{Color, Rect, Vec2, Vec3},
            time::{FixedTimestep, Stopwatch},
        },
        ecs::{
            Component, ComponentSet, EcsError, EntityFactory, EntityId, FrameTime, System, SystemContext,
            SystemPhase, SystemScheduler, World,
        },
        ecs::components::{
            AnimatedSpriteComponent, AnimationType, AudioComponent, BasicScript, CollisionHandlerComponent,
            CollisionStateComponent, DrawComponent, Modifier, PositionComponent, ScaleComponent, ScreenComponent,
            Script, ScriptComponent, ScriptContext, SpriteComponent, SpriteFieldComponent, TextComponent,
            VelocityComponent,
        },
        events::CollisionEvent,
        assets::{AssetError, AssetProvider, FieldMap, FileAssetProvider, MemoryAssetProvider},
        render::{DrawBackend, FontHandle, LogBackend, RecordingBackend, RenderQueue, Texture},
        input::{InputProvider, Key, KeyState, ScreenZoomer, ScriptedInput},
        audio::{AudioEngine, NullAudio, SoundEventHandle},
    };
}
