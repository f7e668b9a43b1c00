//! Core engine implementation
//!
//! The engine owns the root world, any channels, and the external services.
//! Each frame it runs zero or more fixed-timestep update ticks followed by
//! exactly one draw pass.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::Application;
use crate::assets::AssetError;
use crate::audio::AudioError;
use crate::config::{Config, ConfigError};
use crate::ecs::components::ScreenComponent;
use crate::ecs::{EcsError, EntityFactory, EntityId, FrameTime, SystemPhase, SystemScheduler, World};
use crate::foundation::math::Color;
use crate::foundation::time::{FixedTimestep, Stopwatch};
use crate::render::{FontHandle, RenderError, RenderTargetId, Texture, TextureSource};
use crate::services::Services;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed update step in seconds
    pub fixed_dt: f64,
    /// Optional cap on update ticks per frame; excess lag is dropped
    pub max_steps_per_frame: Option<u32>,
    /// Backbuffer width in pixels
    pub screen_width: u32,
    /// Backbuffer height in pixels
    pub screen_height: u32,
    /// Backbuffer clear color
    pub background_color: Color,
    /// Directory assets are loaded from
    pub content_root: PathBuf,
    /// Font loaded for the application at start-up
    pub default_font: Option<String>,
    /// Frame rate `Engine::run` sleeps towards; `None` runs unthrottled
    pub target_frame_rate: Option<f64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_steps_per_frame: None,
            screen_width: 1280,
            screen_height: 720,
            background_color: Color::BLACK,
            content_root: PathBuf::from("content"),
            default_font: None,
            target_frame_rate: Some(60.0),
        }
    }
}

impl Config for EngineConfig {}

impl EngineConfig {
    /// Check values the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_dt.is_finite() && self.fixed_dt > 0.0) {
            return Err(ConfigError::Invalid(format!("fixed_dt must be positive, got {}", self.fixed_dt)));
        }
        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "screen size must be non-zero, got {}x{}",
                self.screen_width, self.screen_height
            )));
        }
        if self.max_steps_per_frame == Some(0) {
            return Err(ConfigError::Invalid("max_steps_per_frame must be at least 1".to_string()));
        }
        if let Some(rate) = self.target_frame_rate {
            if !(rate.is_finite() && rate > 0.0) {
                return Err(ConfigError::Invalid(format!("target_frame_rate must be positive, got {rate}")));
            }
        }
        Ok(())
    }
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Engine initialization failed
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    /// Entity store or scheduler error
    #[error("ECS error: {0}")]
    Ecs(#[from] EcsError),

    /// Asset loading error
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// Rendering error
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Audio error
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A channel id that no channel of this engine carries
    #[error("Unknown channel: {0:?}")]
    UnknownChannel(ChannelId),

    /// Application error
    #[error("Application error: {0}")]
    ApplicationError(String),
}

/// What happened during one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameStats {
    /// Update ticks run
    pub ticks: u32,
    /// Interpolation fraction the draw pass used
    pub interpolation: f64,
}

/// Identifier of a channel, unique within its engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(u32);

/// A sub-simulation with its own world, rendered into its own buffer
///
/// Show a channel in its parent's world with a sprite made from
/// [`Channel::texture`]. Channels can hold child channels; a child updates
/// after its parent and draws before it, so the parent always shows the
/// child's finished buffer. Deactivating a channel pauses its whole subtree.
pub struct Channel {
    /// World of the channel
    pub world: World,
    /// Systems run over the channel's world
    pub scheduler: SystemScheduler,
    /// Inactive channels and their children are neither updated nor drawn
    pub active: bool,
    id: ChannelId,
    screen: EntityId,
    render_target: RenderTargetId,
    width: u32,
    height: u32,
    children: Vec<Channel>,
}

impl Channel {
    fn new(
        id: ChannelId,
        services: &mut Services,
        width: u32,
        height: u32,
        background: Color,
    ) -> Result<Self, EngineError> {
        let render_target = services.renderer.create_render_target(width, height)?;

        let mut world = World::new();
        let screen = world.create_entity();
        let mut component = ScreenComponent::new(Some(render_target), width, height);
        component.background = background;
        world.add_component(screen, component)?;
        world.set_active_screen(Some(screen));

        Ok(Self {
            world,
            scheduler: SystemScheduler::with_default_systems(),
            active: true,
            id,
            screen,
            render_target,
            width,
            height,
            children: Vec::new(),
        })
    }

    /// This channel's identifier
    pub const fn id(&self) -> ChannelId {
        self.id
    }

    /// Screen entity inside the channel's world
    pub const fn screen(&self) -> EntityId {
        self.screen
    }

    /// The channel's buffer as a texture
    pub const fn texture(&self) -> Texture {
        Texture::new(TextureSource::RenderTarget(self.render_target), self.width, self.height)
    }

    /// Factory building onto the channel's screen
    pub fn factory(&self) -> EntityFactory {
        let mut factory = EntityFactory::new(self.width, self.height);
        factory.build_to(self.screen);
        factory
    }

    /// Channels nested in this one
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    fn find(&self, id: ChannelId) -> Option<&Self> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    fn find_mut(&mut self, id: ChannelId) -> Option<&mut Self> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    fn update(&mut self, services: &mut Services, time: FrameTime) -> Result<(), EngineError> {
        if !self.active {
            return Ok(());
        }
        self.scheduler
            .run_phase(SystemPhase::Update, &mut self.world, services, time)?;
        for child in &mut self.children {
            child.update(services, time)?;
        }
        Ok(())
    }

    fn draw(&mut self, services: &mut Services, time: FrameTime) -> Result<(), EngineError> {
        if !self.active {
            return Ok(());
        }
        for child in &mut self.children {
            child.draw(services, time)?;
        }
        self.scheduler
            .run_phase(SystemPhase::Draw, &mut self.world, services, time)
    }

    fn clear_events(&mut self) {
        self.world.collision_events_mut().clear();
        for child in &mut self.children {
            child.clear_events();
        }
    }
}

/// Main engine struct
pub struct Engine {
    /// Root world, drawn to the backbuffer
    pub world: World,
    /// Systems run over the root world
    pub scheduler: SystemScheduler,
    /// External collaborators
    pub services: Services,
    channels: Vec<Channel>,
    next_channel: u32,
    default_font: Option<FontHandle>,
    timestep: FixedTimestep,
    root_screen: EntityId,
    update_timer: Stopwatch,
    draw_timer: Stopwatch,
    config: EngineConfig,
    running: bool,
}

impl Engine {
    /// Create an engine with the default systems and a backbuffer screen
    pub fn new(config: EngineConfig, mut services: Services) -> Result<Self, EngineError> {
        log::info!("Initializing engine...");
        config.validate()?;

        let default_font = match config.default_font.as_deref() {
            Some(name) => Some(services.assets.load_font(name)?),
            None => None,
        };

        let mut world = World::new();
        let root_screen = world.create_entity();
        let mut screen = ScreenComponent::new(None, config.screen_width, config.screen_height);
        screen.background = config.background_color;
        world.add_component(root_screen, screen)?;
        world.set_active_screen(Some(root_screen));

        let timestep = FixedTimestep::new(config.fixed_dt).with_max_steps_per_frame(config.max_steps_per_frame);
        log::info!(
            "Engine ready: {}x{} backbuffer, dt = {:.4}s",
            config.screen_width,
            config.screen_height,
            config.fixed_dt
        );

        Ok(Self {
            world,
            scheduler: SystemScheduler::with_default_systems(),
            services,
            channels: Vec::new(),
            next_channel: 0,
            default_font,
            timestep,
            root_screen,
            update_timer: Stopwatch::new(),
            draw_timer: Stopwatch::new(),
            config,
            running: true,
        })
    }

    /// Run the engine main loop with the given application
    pub fn run<T: Application>(config: EngineConfig, services: Services, app: &mut T) -> Result<(), EngineError> {
        let mut engine = Self::new(config, services)?;

        app.initialize(&mut engine)
            .map_err(|e| EngineError::ApplicationError(format!("App initialization: {e}")))?;

        log::info!("Starting main loop...");
        let frame_budget = engine
            .config
            .target_frame_rate
            .map(|rate| Duration::from_secs_f64(1.0 / rate));
        let mut last = Instant::now();

        while engine.running {
            let frame_start = Instant::now();
            let elapsed = frame_start.duration_since(last).as_secs_f64();
            last = frame_start;

            let stats = engine.frame(elapsed)?;
            app.update(&mut engine, &stats)
                .map_err(|e| EngineError::ApplicationError(format!("App update: {e}")))?;

            if let Some(budget) = frame_budget {
                if let Some(remaining) = budget.checked_sub(frame_start.elapsed()) {
                    std::thread::sleep(remaining);
                }
            }
        }

        app.cleanup(&mut engine);
        log::info!("Engine shutdown complete");
        Ok(())
    }

    /// Advance by `elapsed` wall-clock seconds: update ticks, then one draw
    ///
    /// Collision events of the previous frame are discarded first, so every
    /// world's event queue holds exactly what this frame's ticks produced
    /// until the next call.
    pub fn frame(&mut self, elapsed: f64) -> Result<FrameStats, EngineError> {
        self.world.collision_events_mut().clear();
        for channel in &mut self.channels {
            channel.clear_events();
        }
        self.timestep.advance(elapsed);

        self.update_timer.start();
        let updated = self.run_updates();
        self.update_timer.stop();
        let ticks = updated?;

        self.draw()?;
        Ok(FrameStats {
            ticks,
            interpolation: self.timestep.interpolation(),
        })
    }

    /// Run the draw pass once
    ///
    /// Channels render into their buffers first, innermost first, so sprites
    /// showing them see finished content.
    pub fn draw(&mut self) -> Result<(), EngineError> {
        self.draw_timer.start();
        let drawn = self.draw_worlds();
        self.draw_timer.stop();
        drawn
    }

    fn run_updates(&mut self) -> Result<u32, EngineError> {
        let mut ticks = 0;
        while self.timestep.should_step() {
            self.services.poll_input();
            let time = self.frame_time();
            self.scheduler
                .run_phase(SystemPhase::Update, &mut self.world, &mut self.services, time)?;
            for channel in &mut self.channels {
                channel.update(&mut self.services, time)?;
            }
            ticks += 1;
        }
        Ok(ticks)
    }

    fn draw_worlds(&mut self) -> Result<(), EngineError> {
        // Leftovers of a pass that failed before its flush
        self.services.render_queue.clear();
        let time = self.frame_time();
        for channel in &mut self.channels {
            channel.draw(&mut self.services, time)?;
        }
        self.scheduler
            .run_phase(SystemPhase::Draw, &mut self.world, &mut self.services, time)
    }

    /// Create a top-level channel with its own world, screen and buffer
    pub fn add_channel(&mut self, width: u32, height: u32, background: Color) -> Result<ChannelId, EngineError> {
        let id = self.next_channel_id();
        let channel = Channel::new(id, &mut self.services, width, height, background)?;
        self.channels.push(channel);
        log::info!("Created {width}x{height} channel {id:?}");
        Ok(id)
    }

    /// Create a channel nested in `parent`
    ///
    /// The child is drawn before its parent every frame. Show it in the
    /// parent's world with a sprite made from the child's texture.
    pub fn add_child_channel(
        &mut self,
        parent: ChannelId,
        width: u32,
        height: u32,
        background: Color,
    ) -> Result<ChannelId, EngineError> {
        if self.channel(parent).is_none() {
            return Err(EngineError::UnknownChannel(parent));
        }
        let id = self.next_channel_id();
        let channel = Channel::new(id, &mut self.services, width, height, background)?;
        self.channel_mut(parent)
            .ok_or(EngineError::UnknownChannel(parent))?
            .children
            .push(channel);
        log::info!("Created {width}x{height} channel {id:?} inside {parent:?}");
        Ok(id)
    }

    /// Get a channel, at any nesting depth
    pub fn channel(&self, id: ChannelId) -> Option<&Channel> {
        self.channels.iter().find_map(|channel| channel.find(id))
    }

    /// Get mutable access to a channel, at any nesting depth
    pub fn channel_mut(&mut self, id: ChannelId) -> Option<&mut Channel> {
        self.channels.iter_mut().find_map(|channel| channel.find_mut(id))
    }

    /// Top-level channels in creation order
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Factory building onto the backbuffer screen
    pub fn factory(&self) -> EntityFactory {
        let mut factory = EntityFactory::new(self.config.screen_width, self.config.screen_height);
        factory.build_to(self.root_screen);
        factory
    }

    /// Font named by `EngineConfig::default_font`, loaded at start-up
    pub const fn default_font(&self) -> Option<FontHandle> {
        self.default_font
    }

    /// The backbuffer screen entity of the root world
    pub const fn root_screen(&self) -> EntityId {
        self.root_screen
    }

    /// Engine configuration
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The fixed-timestep accumulator
    pub const fn timestep(&self) -> &FixedTimestep {
        &self.timestep
    }

    /// Total time spent in update ticks, in milliseconds
    pub fn update_millis(&self) -> f64 {
        self.update_timer.elapsed_millis()
    }

    /// Total time spent drawing, in milliseconds
    pub fn draw_millis(&self) -> f64 {
        self.draw_timer.elapsed_millis()
    }

    /// Get the ECS world
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Get mutable access to the ECS world
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Whether the main loop keeps going
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    fn next_channel_id(&mut self) -> ChannelId {
        self.next_channel += 1;
        ChannelId(self.next_channel)
    }

    fn frame_time(&self) -> FrameTime {
        FrameTime {
            dt: self.timestep.dt(),
            sim_time: self.timestep.sim_time(),
            interpolation: self.timestep.interpolation(),
            tick: self.timestep.total_ticks(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{ComponentSet, System, SystemContext};

    struct FailingSystem(SystemPhase);

    impl System for FailingSystem {
        fn name(&self) -> &str {
            "FailingSystem"
        }

        fn phase(&self) -> SystemPhase {
            self.0
        }

        fn requirements(&self) -> ComponentSet {
            ComponentSet::new().with::<ScreenComponent>()
        }

        fn process(&mut self, _entity: EntityId, _ctx: &mut SystemContext<'_>) -> Result<(), EngineError> {
            Err(EngineError::ApplicationError("failing system".to_string()))
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(EngineConfig::default().validate().is_ok());

        let config = EngineConfig {
            fixed_dt: 0.0,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = EngineConfig {
            screen_height: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(matches!(
            Engine::new(config, Services::headless()),
            Err(EngineError::Config(ConfigError::Invalid(_)))
        ));
    }

    #[test]
    fn test_config_round_trips_through_toml_and_ron() {
        let dir = std::env::temp_dir().join(format!("tt_engine_config_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let config = EngineConfig {
            fixed_dt: 0.01,
            max_steps_per_frame: Some(5),
            default_font: Some("default".to_string()),
            ..EngineConfig::default()
        };

        for name in ["engine.toml", "engine.ron"] {
            let path = dir.join(name);
            config.save_to_file(&path).unwrap();
            assert_eq!(EngineConfig::load_from_file(&path).unwrap(), config);
        }
        assert!(matches!(
            config.save_to_file(dir.join("engine.json")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: EngineConfig = toml::from_str("fixed_dt = 0.02\nscreen_width = 640").unwrap();
        assert!((config.fixed_dt - 0.02).abs() < f64::EPSILON);
        assert_eq!(config.screen_width, 640);
        assert_eq!(config.screen_height, EngineConfig::default().screen_height);
    }

    #[test]
    fn test_default_font_is_loaded_at_start_up() {
        let config = EngineConfig {
            default_font: Some("mono".to_string()),
            ..EngineConfig::default()
        };
        let services = Services::new(
            crate::render::LogBackend::new(),
            crate::audio::NullAudio,
            crate::input::ScriptedInput::new(),
            crate::assets::MemoryAssetProvider::new().with_font("mono"),
        );
        let engine = Engine::new(config.clone(), services).unwrap();
        assert!(engine.default_font().is_some());

        assert!(matches!(
            Engine::new(config, Services::headless()),
            Err(EngineError::Asset(crate::assets::AssetError::NotFound(_)))
        ));
    }

    #[test]
    fn test_timers_stop_when_a_phase_fails() {
        let config = EngineConfig {
            fixed_dt: 0.25,
            ..EngineConfig::default()
        };
        let mut engine = Engine::new(config, Services::headless()).unwrap();
        let failing = engine.scheduler.add_system(FailingSystem(SystemPhase::Update));

        assert!(engine.frame(0.25).is_err());
        assert!(!engine.update_timer.is_running());
        let spent = engine.update_millis();
        std::thread::sleep(Duration::from_millis(5));
        assert!((engine.update_millis() - spent).abs() < f64::EPSILON);

        engine.scheduler.remove_system(failing);
        engine.scheduler.add_system(FailingSystem(SystemPhase::Draw));
        assert!(engine.draw().is_err());
        assert!(!engine.draw_timer.is_running());
        assert!(engine.frame(0.0).is_err());
        assert!(!engine.update_timer.is_running());
        assert!(!engine.draw_timer.is_running());
    }

    #[test]
    fn test_child_channel_needs_known_parent() {
        let mut engine = Engine::new(EngineConfig::default(), Services::headless()).unwrap();
        assert!(matches!(
            engine.add_child_channel(ChannelId(7), 10, 10, Color::BLACK),
            Err(EngineError::UnknownChannel(ChannelId(7)))
        ));

        let outer = engine.add_channel(100, 100, Color::BLACK).unwrap();
        let inner = engine.add_child_channel(outer, 10, 10, Color::BLACK).unwrap();
        assert_ne!(outer, inner);
        assert_eq!(engine.channels().len(), 1);
        assert_eq!(engine.channel(inner).map(Channel::id), Some(inner));
        assert!(engine.channel(outer).unwrap().children()[0].children().is_empty());
    }

    #[test]
    fn test_quit_stops_engine() {
        let mut engine = Engine::new(EngineConfig::default(), Services::headless()).unwrap();
        assert!(engine.is_running());
        engine.quit();
        assert!(!engine.is_running());
    }
}
