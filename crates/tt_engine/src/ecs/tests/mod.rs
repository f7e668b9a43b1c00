//! Integration tests across the store, scheduler and systems

mod collision_tests;
mod engine_tests;

use crate::assets::MemoryAssetProvider;
use crate::audio::RecordingAudio;
use crate::ecs::components::ScreenComponent;
use crate::ecs::{EntityId, FrameTime, World};
use crate::foundation::logging;
use crate::input::ScriptedInput;
use crate::render::RecordingBackend;
use crate::services::Services;

/// Services whose draw and audio calls can be inspected
pub(super) fn recording_services() -> (Services, RecordingBackend, RecordingAudio) {
    logging::init_for_tests();
    let renderer = RecordingBackend::new();
    let audio = RecordingAudio::new();
    let services = Services::new(renderer.clone(), audio.clone(), ScriptedInput::new(), MemoryAssetProvider::new());
    (services, renderer, audio)
}

/// A world whose active screen is an 800x600 backbuffer screen
pub(super) fn world_with_screen() -> (World, EntityId) {
    logging::init_for_tests();
    let mut world = World::new();
    let screen = world.create_entity();
    world.add_component(screen, ScreenComponent::new(None, 800, 600)).unwrap();
    world.set_active_screen(Some(screen));
    (world, screen)
}

#[allow(clippy::cast_precision_loss)]
pub(super) fn tick(n: u64) -> FrameTime {
    FrameTime {
        dt: 0.1,
        sim_time: n as f64 * 0.1,
        interpolation: 0.0,
        tick: n,
    }
}
