use std::sync::{Arc, Mutex};

use crate::assets::MemoryAssetProvider;
use crate::audio::NullAudio;
use crate::ecs::components::{BasicScript, PositionComponent, ScreenComponent, ScriptContext};
use crate::ecs::{EntityFactory, SystemPhase, World};
use crate::engine::{Engine, EngineConfig};
use crate::foundation::math::{Color, Vec3};
use crate::input::{Key, KeyState, ScreenZoomer, ScriptedInput};
use crate::render::{DrawCommand, RecordingBackend, RenderTargetId, Texture, TextureHandle, TextureSource};
use crate::services::Services;

fn recording_engine(input: ScriptedInput) -> (Engine, RecordingBackend) {
    let recorder = RecordingBackend::new();
    let services = Services::new(
        recorder.clone(),
        NullAudio,
        input,
        MemoryAssetProvider::new().with_texture("ball", 32, 32),
    );
    let config = EngineConfig {
        fixed_dt: 0.25,
        screen_width: 800,
        screen_height: 600,
        background_color: Color::rgb(0.0, 0.0, 0.5),
        ..EngineConfig::default()
    };
    (Engine::new(config, services).unwrap(), recorder)
}

fn draw_index(commands: &[DrawCommand], source: TextureSource) -> usize {
    commands
        .iter()
        .position(|c| matches!(c, DrawCommand::Draw { texture, .. } if texture.source == source))
        .unwrap()
}

fn buffer_of(texture: Texture) -> RenderTargetId {
    let TextureSource::RenderTarget(target) = texture.source else {
        panic!("texture must come from a render target");
    };
    target
}

/// Two colliding sprites; one jumps `apart` away and back on alternate ticks
fn blinking_pair(world: &mut World, factory: EntityFactory, texture: Texture, apart: f32) {
    let still = factory.create_spritelet_from_texture(world, texture).unwrap();
    let blinker = factory.create_spritelet_from_texture(world, texture).unwrap();
    for entity in [still, blinker] {
        world.get_component_mut::<PositionComponent>(entity).unwrap().position = Vec3::new(0.5, 0.5, 0.0);
        world.set_checks_collisions(entity, true).unwrap();
    }
    let jump = BasicScript::new(move |ctx: &mut ScriptContext<'_>| {
        if let Some(position) = ctx.world.get_component_mut::<PositionComponent>(ctx.entity) {
            position.position.x = if position.position.x > 0.5 { 0.5 } else { 0.5 + apart };
        }
    });
    EntityFactory::add_script(world, blinker, jump).unwrap();
}

#[test]
fn test_zero_tick_frame_still_draws_once() {
    let (mut engine, recorder) = recording_engine(ScriptedInput::new());
    let stats = engine.frame(0.1).unwrap();
    assert_eq!(stats.ticks, 0);
    assert!((stats.interpolation - 0.4).abs() < 1e-9);

    let clears = recorder
        .take_commands()
        .into_iter()
        .filter(|c| matches!(c, DrawCommand::Clear(_)))
        .count();
    assert_eq!(clears, 1);
}

#[test]
fn test_frames_run_floor_of_accumulated_ticks() {
    let (mut engine, _) = recording_engine(ScriptedInput::new());
    let counted = Arc::new(Mutex::new(0u32));
    let counter = Arc::clone(&counted);
    let factory = engine.factory();
    factory
        .create_scriptlet(
            &mut engine.world,
            BasicScript::new(move |_: &mut ScriptContext<'_>| *counter.lock().unwrap() += 1),
        )
        .unwrap();

    let mut ticks = 0;
    for elapsed in [0.125, 0.625, 0.0625, 1.0] {
        ticks += engine.frame(elapsed).unwrap().ticks;
    }
    // 1.8125 seconds at 0.25 per tick
    assert_eq!(ticks, 7);
    assert_eq!(*counted.lock().unwrap(), 7);
    assert_eq!(engine.timestep().total_ticks(), 7);
}

#[test]
fn test_input_polled_each_tick_drives_zoomer() {
    let input = ScriptedInput::with_samples([
        KeyState::with_keys([Key::PageUp]),
        KeyState::with_keys([Key::PageUp]),
        KeyState::default(),
    ]);
    let (mut engine, _) = recording_engine(input);
    let root = engine.root_screen();
    EntityFactory::add_script(&mut engine.world, root, ScreenZoomer::new()).unwrap();

    engine.frame(0.75).unwrap();
    let zoom = engine.world.get_component::<ScreenComponent>(root).unwrap().zoom;
    assert!((zoom - 1.006).abs() < 1e-6);
}

#[test]
fn test_channels_render_before_root_world() {
    let (mut engine, recorder) = recording_engine(ScriptedInput::new());
    let channel_id = engine.add_channel(200, 100, Color::BLACK).unwrap();

    let channel = engine.channel_mut(channel_id).unwrap();
    let factory = channel.factory();
    let texture = Texture::new(TextureSource::Asset(TextureHandle(1)), 16, 16);
    factory
        .create_spritelet_from_texture(&mut channel.world, texture)
        .unwrap();
    let channel_texture = channel.texture();

    let root_factory = engine.factory();
    root_factory
        .create_spritelet_from_texture(&mut engine.world, channel_texture)
        .unwrap();
    recorder.take_commands();

    engine.frame(0.0).unwrap();
    let commands = recorder.take_commands();
    let inner = draw_index(&commands, TextureSource::Asset(TextureHandle(1)));
    let outer = draw_index(&commands, channel_texture.source);
    assert!(inner < outer);

    assert_eq!(
        commands.first(),
        Some(&DrawCommand::SetTarget(Some(buffer_of(channel_texture))))
    );
}

#[test]
fn test_screenlet_content_renders_before_its_display() {
    let (mut engine, recorder) = recording_engine(ScriptedInput::new());
    let root_factory = engine.factory();
    let screenlet = root_factory
        .create_screenlet(&mut engine.world, engine.services.renderer.as_mut(), true, 200, 100, Color::BLACK)
        .unwrap();
    let buffer = engine
        .world
        .get_component::<ScreenComponent>(screenlet)
        .unwrap()
        .render_target
        .unwrap();

    // Display first, content second: first-use order would flush the backbuffer first
    root_factory
        .create_spritelet_from_screen(&mut engine.world, screenlet)
        .unwrap();
    let mut child_factory = engine.factory();
    child_factory.build_to(screenlet);
    child_factory
        .create_spritelet(&mut engine.world, engine.services.assets.as_mut(), "ball")
        .unwrap();
    recorder.take_commands();

    engine.frame(0.0).unwrap();
    let commands = recorder.take_commands();
    let content = draw_index(&commands, TextureSource::Asset(TextureHandle(1)));
    let display = draw_index(&commands, TextureSource::RenderTarget(buffer));
    assert!(content < display);
    let content_target = commands[..content]
        .iter()
        .rev()
        .find_map(|c| match c {
            DrawCommand::SetTarget(target) => Some(*target),
            _ => None,
        })
        .unwrap();
    assert_eq!(content_target, Some(buffer));
}

#[test]
fn test_nested_channels_draw_innermost_first() {
    let (mut engine, recorder) = recording_engine(ScriptedInput::new());
    let outer_id = engine.add_channel(400, 300, Color::BLACK).unwrap();
    let middle_id = engine.add_child_channel(outer_id, 200, 200, Color::BLACK).unwrap();
    let leaf_id = engine.add_child_channel(middle_id, 100, 100, Color::WHITE).unwrap();
    assert_eq!(engine.channels().len(), 1);
    assert_eq!(engine.channel(outer_id).unwrap().children().len(), 1);
    assert_eq!(engine.channel(leaf_id).unwrap().id(), leaf_id);

    // Each level shows the level below it
    let ball = Texture::new(TextureSource::Asset(TextureHandle(1)), 16, 16);
    let mut shown = ball;
    for id in [leaf_id, middle_id, outer_id] {
        let channel = engine.channel_mut(id).unwrap();
        channel
            .factory()
            .create_spritelet_from_texture(&mut channel.world, shown)
            .unwrap();
        shown = channel.texture();
    }
    engine
        .factory()
        .create_spritelet_from_texture(&mut engine.world, shown)
        .unwrap();
    recorder.take_commands();

    engine.frame(0.0).unwrap();
    let commands = recorder.take_commands();
    let order: Vec<usize> = [
        ball,
        engine.channel(leaf_id).unwrap().texture(),
        engine.channel(middle_id).unwrap().texture(),
        engine.channel(outer_id).unwrap().texture(),
    ]
    .iter()
    .map(|texture| draw_index(&commands, texture.source))
    .collect();
    assert!(order.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn test_inactive_parent_pauses_nested_channels() {
    let (mut engine, recorder) = recording_engine(ScriptedInput::new());
    let outer_id = engine.add_channel(400, 300, Color::BLACK).unwrap();
    let inner_id = engine.add_child_channel(outer_id, 100, 100, Color::BLACK).unwrap();
    let inner_buffer = buffer_of(engine.channel(inner_id).unwrap().texture());

    let counted = Arc::new(Mutex::new(0u32));
    let counter = Arc::clone(&counted);
    let inner = engine.channel_mut(inner_id).unwrap();
    inner
        .factory()
        .create_scriptlet(
            &mut inner.world,
            BasicScript::new(move |_: &mut ScriptContext<'_>| *counter.lock().unwrap() += 1),
        )
        .unwrap();

    engine.frame(0.25).unwrap();
    assert_eq!(*counted.lock().unwrap(), 1);
    assert!(recorder
        .take_commands()
        .contains(&DrawCommand::SetTarget(Some(inner_buffer))));

    engine.channel_mut(outer_id).unwrap().active = false;
    engine.frame(0.25).unwrap();
    assert_eq!(*counted.lock().unwrap(), 1);
    assert!(!recorder
        .take_commands()
        .contains(&DrawCommand::SetTarget(Some(inner_buffer))));
}

#[test]
fn test_collision_events_last_one_frame() {
    let (mut engine, _) = recording_engine(ScriptedInput::new());
    let ball = engine.services.assets.load_texture("ball").unwrap();
    let root_factory = engine.factory();
    blinking_pair(&mut engine.world, root_factory, ball, 0.4);
    let channel_id = engine.add_channel(200, 100, Color::BLACK).unwrap();
    let channel = engine.channel_mut(channel_id).unwrap();
    let channel_factory = channel.factory();
    blinking_pair(&mut channel.world, channel_factory, ball, 1.0);

    let mut seen = 0;
    for _ in 0..100 {
        assert_eq!(engine.frame(0.25).unwrap().ticks, 1);
        let root = engine.world.collision_events().len();
        let inner = engine.channel(channel_id).unwrap().world.collision_events().len();
        assert!(root <= 2, "root world kept {root} events");
        assert!(inner <= 2, "channel world kept {inner} events");
        seen += root + inner;
    }
    // A pair starts touching every second tick and both sides report it
    assert_eq!(seen, 200);
}

#[test]
fn test_inactive_channel_is_not_drawn() {
    let (mut engine, recorder) = recording_engine(ScriptedInput::new());
    let channel_id = engine.add_channel(200, 100, Color::BLACK).unwrap();
    engine.channel_mut(channel_id).unwrap().active = false;
    recorder.take_commands();

    engine.draw().unwrap();
    assert_eq!(
        recorder
            .take_commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Clear(_)))
            .count(),
        1
    );
    assert_eq!(
        engine.scheduler.system_names(SystemPhase::Draw).last().map(String::as_str),
        Some("ScreenletSystem")
    );
}
