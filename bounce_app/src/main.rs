//! Bouncing balls demo
//!
//! Runs the engine headless: balls bounce off the screen edges and off each
//! other, a channel shows a pulsing ball in a corner, and draw calls go to
//! the log. Pass a `.toml` or `.ron` engine configuration file as the first
//! argument to override the defaults.

use rand::prelude::*;
use thiserror::Error;

use tt_engine::config::ConfigError;
use tt_engine::prelude::*;

// Configuration constants
const BALL_COUNT: usize = 12;
const RUN_SECONDS: f64 = 10.0;
const BALL_SPEED: f32 = 0.3;

#[derive(Error, Debug)]
enum DemoError {
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

struct BounceApp {
    rng: StdRng,
    balls: Vec<EntityId>,
    score: Option<EntityId>,
    collisions: usize,
    last_report: f64,
}

impl BounceApp {
    fn new() -> Self {
        Self {
            rng: StdRng::seed_from_u64(7),
            balls: Vec::new(),
            score: None,
            collisions: 0,
            last_report: 0.0,
        }
    }

    fn spawn_ball(&mut self, engine: &mut Engine, aspect: f32) -> Result<EntityId, EngineError> {
        let factory = engine.factory();
        let ball = factory.create_spritelet(&mut engine.world, engine.services.assets.as_mut(), "ball")?;

        let x = self.rng.gen_range(0.1..aspect - 0.1);
        let y = self.rng.gen_range(0.1..0.9);
        let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
        let world = &mut engine.world;
        if let Some(position) = world.get_component_mut::<PositionComponent>(ball) {
            position.position = Vec3::new(x, y, 0.5);
        }
        if let Some(velocity) = world.get_component_mut::<VelocityComponent>(ball) {
            velocity.velocity = Vec3::new(angle.cos(), angle.sin(), 0.0) * BALL_SPEED;
        }
        if let Some(draw) = world.get_component_mut::<DrawComponent>(ball) {
            draw.color = Color::rgb(self.rng.gen(), self.rng.gen(), self.rng.gen());
        }

        world.set_checks_collisions(ball, true)?;
        world.add_component(ball, CollisionHandlerComponent::new(bounce_off))?;
        EntityFactory::add_script(world, ball, BasicScript::new(move |ctx: &mut ScriptContext<'_>| {
            keep_inside(ctx, aspect);
        }))?;
        Ok(ball)
    }

    fn add_pulsing_channel(engine: &mut Engine) -> Result<(), EngineError> {
        let id = engine.add_channel(200, 200, Color::rgb(0.1, 0.1, 0.2))?;
        let texture = engine.services.assets.load_texture("ball")?;

        let Some(channel) = engine.channel_mut(id) else {
            return Ok(());
        };
        let factory = channel.factory();
        let ball = factory.create_spritelet_from_texture(&mut channel.world, texture)?;
        if let Some(position) = channel.world.get_component_mut::<PositionComponent>(ball) {
            position.position = Vec3::new(0.5, 0.5, 0.0);
        }
        channel.world.add_component(ball, ScaleComponent::new(1.0))?;
        EntityFactory::add_modifier(
            &mut channel.world,
            ball,
            Modifier::new(|_: &ScaleComponent, value| ScaleComponent::new(1.0 + 0.5 * value))
                .with_signal(|time| (time * 2.0).sin()),
        )?;
        let channel_texture = channel.texture();

        // A drifting ball in a channel nested inside the pulsing one
        let inner_id = engine.add_child_channel(id, 100, 100, Color::rgb(0.2, 0.1, 0.1))?;
        if let Some(inner) = engine.channel_mut(inner_id) {
            let drifter = inner.factory().create_spritelet_from_texture(&mut inner.world, texture)?;
            if let Some(velocity) = inner.world.get_component_mut::<VelocityComponent>(drifter) {
                velocity.velocity = Vec3::new(0.05, 0.03, 0.0);
            }
            let inner_texture = inner.texture();
            if let Some(channel) = engine.channel_mut(id) {
                let window = channel.factory().create_spritelet_from_texture(&mut channel.world, inner_texture)?;
                if let Some(position) = channel.world.get_component_mut::<PositionComponent>(window) {
                    position.position = Vec3::new(0.25, 0.25, 0.5);
                }
            }
        }

        let viewer = engine.factory().create_spritelet_from_texture(&mut engine.world, channel_texture)?;
        if let Some(position) = engine.world.get_component_mut::<PositionComponent>(viewer) {
            position.position = Vec3::new(0.2, 0.2, 0.9);
        }
        Ok(())
    }
}

/// Reflect the velocity away from the other ball
fn bounce_off(world: &mut World, entity: EntityId, other: EntityId) {
    let (Some(me), Some(them)) = (world.absolute_position(entity), world.absolute_position(other)) else {
        return;
    };
    let offset = (me - them).xy();
    if offset.norm() <= f32::EPSILON {
        return;
    }
    let normal = offset.normalize();
    if let Some(velocity) = world.get_component_mut::<VelocityComponent>(entity) {
        let along = velocity.velocity.xy().dot(&normal);
        if along < 0.0 {
            velocity.velocity.x -= 2.0 * along * normal.x;
            velocity.velocity.y -= 2.0 * along * normal.y;
        }
    }
}

/// Flip the velocity when the ball leaves the screen
fn keep_inside(ctx: &mut ScriptContext<'_>, aspect: f32) {
    let Some(position) = ctx.world.get_component::<PositionComponent>(ctx.entity).map(|p| p.position) else {
        return;
    };
    if let Some(velocity) = ctx.world.get_component_mut::<VelocityComponent>(ctx.entity) {
        if (position.x < 0.0 && velocity.velocity.x < 0.0) || (position.x > aspect && velocity.velocity.x > 0.0) {
            velocity.velocity.x = -velocity.velocity.x;
        }
        if (position.y < 0.0 && velocity.velocity.y < 0.0) || (position.y > 1.0 && velocity.velocity.y > 0.0) {
            velocity.velocity.y = -velocity.velocity.y;
        }
    }
}

impl Application for BounceApp {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        log::info!("Spawning {BALL_COUNT} balls");
        #[allow(clippy::cast_precision_loss)]
        let aspect = engine.config().screen_width as f32 / engine.config().screen_height as f32;
        for _ in 0..BALL_COUNT {
            let ball = self.spawn_ball(engine, aspect)?;
            self.balls.push(ball);
        }

        Self::add_pulsing_channel(engine)?;

        let root = engine.root_screen();
        EntityFactory::add_script(&mut engine.world, root, ScreenZoomer::new()).map_err(EngineError::from)?;

        let font = match engine.default_font() {
            Some(font) => font,
            None => engine.services.assets.load_font("default").map_err(EngineError::from)?,
        };
        let factory = engine.factory();
        let score = factory
            .create_textlet(&mut engine.world, font, "Collisions: 0")
            .map_err(EngineError::from)?;
        if let Some(position) = engine.world.get_component_mut::<PositionComponent>(score) {
            position.position = Vec3::new(0.05, 0.05, 1.0);
        }
        self.score = Some(score);

        factory
            .create_audiolet(&mut engine.world, SoundEventHandle::new("start"))
            .map_err(EngineError::from)?;
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, _stats: &FrameStats) -> Result<(), AppError> {
        let started = engine.world.collision_events_mut().drain().len();
        if started > 0 {
            self.collisions += started;
            if let Some(text) = self
                .score
                .and_then(|score| engine.world.get_component_mut::<TextComponent>(score))
            {
                text.text = format!("Collisions: {}", self.collisions);
            }
        }

        let sim_time = engine.timestep().sim_time();
        if sim_time - self.last_report >= 1.0 {
            self.last_report = sim_time;
            log::info!(
                "t={sim_time:.1}s collisions={} update={:.1}ms draw={:.1}ms",
                self.collisions,
                engine.update_millis(),
                engine.draw_millis()
            );
        }
        if sim_time >= RUN_SECONDS {
            engine.quit();
        }
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        log::info!(
            "Bounced {} balls through {} collisions in {} ticks",
            self.balls.len(),
            self.collisions,
            engine.timestep().total_ticks()
        );
    }
}

fn load_config() -> Result<EngineConfig, DemoError> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading engine configuration from {path}");
            EngineConfig::load_from_file(path)?
        }
        None => EngineConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn run() -> Result<(), DemoError> {
    let config = load_config()?;
    let input = ScriptedInput::with_samples((0..30).map(|_| KeyState::with_keys([Key::PageUp])));
    let services = if config.content_root.is_dir() {
        log::info!("Loading assets from {}", config.content_root.display());
        Services::new(LogBackend::new(), NullAudio, input, FileAssetProvider::new(&config.content_root))
    } else {
        let assets = MemoryAssetProvider::new().with_texture("ball", 32, 32).with_font("default");
        Services::new(LogBackend::new(), NullAudio, input, assets)
    };

    let mut app = BounceApp::new();
    Engine::run(config, services, &mut app)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    log::info!("Starting bounce demo");

    if let Err(e) = run() {
        log::error!("Bounce demo failed: {e}");
        return Err(e.into());
    }
    Ok(())
}
