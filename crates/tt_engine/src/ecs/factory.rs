//! Entity factory
//!
//! Game objects are plain entities assembled from components. The factory
//! builds the common combinations:
//!
//! | kind       | components                                  |
//! |------------|---------------------------------------------|
//! | gamelet    | position, velocity                          |
//! | drawlet    | gamelet + draw                              |
//! | spritelet  | drawlet + sprite                            |
//! | animated   | spritelet + animated sprite                 |
//! | field      | spritelet + sprite field                    |
//! | textlet    | drawlet + scale + text                      |
//! | screenlet  | screen + draw                               |
//! | scriptlet  | script                                      |
//! | audiolet   | audio                                       |

use super::components::{
    AnimatedSpriteComponent, AnimationType, AudioComponent, DrawComponent, Modifier, PositionComponent,
    ScaleComponent, Script, ScriptComponent, ScreenComponent, SpriteComponent, SpriteFieldComponent, TextComponent,
    VelocityComponent,
};
use super::{Component, EcsError, EntityId, World};
use crate::assets::AssetProvider;
use crate::audio::SoundEventHandle;
use crate::engine::EngineError;
use crate::foundation::math::{Color, Vec2};
use crate::render::{DrawBackend, FontHandle, Texture, TextureSource};

/// Builds entities onto a chosen screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityFactory {
    build_screen: Option<EntityId>,
    default_width: u32,
    default_height: u32,
}

impl EntityFactory {
    /// Create a factory; screenlets without a size get the default size
    pub const fn new(default_width: u32, default_height: u32) -> Self {
        Self {
            build_screen: None,
            default_width,
            default_height,
        }
    }

    /// Build following entities onto `screen`
    pub fn build_to(&mut self, screen: EntityId) {
        self.build_screen = Some(screen);
    }

    /// Screen entities are currently built onto
    pub const fn build_screen(&self) -> Option<EntityId> {
        self.build_screen
    }

    /// Create an entity without components
    pub fn create_entity(&self, world: &mut World) -> EntityId {
        world.create_entity()
    }

    /// Create a movable entity
    pub fn create_gamelet(&self, world: &mut World) -> Result<EntityId, EcsError> {
        let entity = world.create_entity();
        world.add_component(entity, PositionComponent::default())?;
        world.add_component(entity, VelocityComponent::default())?;
        Ok(entity)
    }

    /// Create a movable, drawable entity
    pub fn create_drawlet(&self, world: &mut World) -> Result<EntityId, EcsError> {
        let entity = self.create_gamelet(world)?;
        world.add_component(entity, self.draw_component())?;
        Ok(entity)
    }

    /// Create a sprite from a named texture asset
    pub fn create_spritelet(
        &self,
        world: &mut World,
        assets: &mut dyn AssetProvider,
        name: &str,
    ) -> Result<EntityId, EngineError> {
        let texture = assets.load_texture(name)?;
        Ok(self.create_spritelet_from_texture(world, texture)?)
    }

    /// Create a sprite showing a texture
    pub fn create_spritelet_from_texture(&self, world: &mut World, texture: Texture) -> Result<EntityId, EcsError> {
        let entity = world.create_entity();
        let (screen, to_normalized) = match self.target_screen(world, entity) {
            Ok(found) => found,
            Err(e) => {
                world.destroy_entity(entity)?;
                return Err(e);
            }
        };
        world.add_component(entity, PositionComponent::default())?;
        world.add_component(entity, VelocityComponent::default())?;
        world.add_component(entity, self.draw_component())?;
        world.add_component(entity, SpriteComponent::from_texture(texture, to_normalized).on_screen(screen))?;
        Ok(entity)
    }

    /// Create a sprite showing the contents of a screen's buffer
    pub fn create_spritelet_from_screen(&self, world: &mut World, screen: EntityId) -> Result<EntityId, EcsError> {
        let component = world
            .get_component::<ScreenComponent>(screen)
            .ok_or(EcsError::MissingComponent {
                entity: screen,
                component: std::any::type_name::<ScreenComponent>(),
            })?;
        let target = component.render_target.ok_or(EcsError::NoScreen { entity: screen })?;
        let texture = Texture::new(TextureSource::RenderTarget(target), component.width, component.height);
        self.create_spritelet_from_texture(world, texture)
    }

    /// Create a sprite animated over a `columns` by `rows` atlas asset
    ///
    /// The sprite is sized after one frame, not the whole atlas.
    #[allow(clippy::cast_precision_loss)]
    pub fn create_animated_spritelet(
        &self,
        world: &mut World,
        assets: &mut dyn AssetProvider,
        name: &str,
        columns: u32,
        rows: u32,
        animation: AnimationType,
    ) -> Result<EntityId, EngineError> {
        let atlas = assets.load_texture(name)?;
        let entity = self.create_spritelet_from_texture(world, atlas)?;
        let animated = AnimatedSpriteComponent::new(columns, rows, animation);
        if let Some(sprite) = world.get_component_mut::<SpriteComponent>(entity) {
            sprite.width /= animated.columns() as f32;
            sprite.height /= animated.rows() as f32;
            sprite.radius = sprite.width / 2.0;
        }
        world.add_component(entity, animated)?;
        Ok(entity)
    }

    /// Create a field repeating one sprite over the occupied cells of a field map
    ///
    /// Cells are spaced by the sprite's pixel size.
    #[allow(clippy::cast_precision_loss)]
    pub fn create_sprite_field(
        &self,
        world: &mut World,
        assets: &mut dyn AssetProvider,
        field: &str,
        sprite: &str,
    ) -> Result<EntityId, EngineError> {
        let map = assets.load_field(field)?;
        let texture = assets.load_texture(sprite)?;
        let entity = self.create_spritelet_from_texture(world, texture)?;
        log::debug!("Created {}x{} sprite field {entity:?} from {field}", map.width(), map.height());
        let spacing = Vec2::new(texture.width as f32, texture.height as f32);
        world.add_component(entity, SpriteFieldComponent::new(map, spacing))?;
        Ok(entity)
    }

    /// Create a movable piece of text
    pub fn create_textlet(&self, world: &mut World, font: FontHandle, text: &str) -> Result<EntityId, EcsError> {
        let entity = self.create_drawlet(world)?;
        world.add_component(entity, ScaleComponent::default())?;
        world.add_component(entity, TextComponent::new(font, text))?;
        Ok(entity)
    }

    /// Create a screen
    ///
    /// With `has_buffer` the screen gets its own render target, composited
    /// onto the backbuffer by the screenlet system; otherwise it draws
    /// straight to the backbuffer. A zero width or height means the default
    /// size.
    pub fn create_screenlet(
        &self,
        world: &mut World,
        renderer: &mut dyn DrawBackend,
        has_buffer: bool,
        width: u32,
        height: u32,
        background: Color,
    ) -> Result<EntityId, EngineError> {
        let width = if width == 0 { self.default_width } else { width };
        let height = if height == 0 { self.default_height } else { height };
        let target = if has_buffer {
            Some(renderer.create_render_target(width, height)?)
        } else {
            None
        };

        let mut screen = ScreenComponent::new(target, width, height);
        screen.background = background;
        let entity = world.create_entity();
        world.add_component(entity, screen)?;
        world.add_component(entity, self.draw_component())?;
        log::debug!("Created {width}x{height} screenlet {entity:?} (buffer: {target:?})");
        Ok(entity)
    }

    /// Create an entity that only runs a script
    pub fn create_scriptlet(&self, world: &mut World, script: impl Script + 'static) -> Result<EntityId, EcsError> {
        let entity = world.create_entity();
        world.add_component(entity, ScriptComponent::with_script(script))?;
        Ok(entity)
    }

    /// Create an entity that plays a sound event once
    pub fn create_audiolet(&self, world: &mut World, event: SoundEventHandle) -> Result<EntityId, EcsError> {
        let entity = world.create_entity();
        world.add_component(entity, AudioComponent::once(event))?;
        Ok(entity)
    }

    /// Attach a script to an entity, adding a script component if needed
    pub fn add_script(world: &mut World, entity: EntityId, script: impl Script + 'static) -> Result<(), EcsError> {
        world.ensure_component::<ScriptComponent>(entity)?.add(script);
        Ok(())
    }

    /// Attach a modifier to an entity
    pub fn add_modifier<T: Component>(world: &mut World, entity: EntityId, modifier: Modifier<T>) -> Result<(), EcsError> {
        Self::add_script(world, entity, modifier)
    }

    fn draw_component(&self) -> DrawComponent {
        DrawComponent {
            screen: self.build_screen,
            ..DrawComponent::default()
        }
    }

    fn target_screen(&self, world: &World, entity: EntityId) -> Result<(EntityId, f32), EcsError> {
        let screen = self
            .build_screen
            .or(world.active_screen())
            .ok_or(EcsError::NoScreen { entity })?;
        let component = world
            .get_component::<ScreenComponent>(screen)
            .ok_or(EcsError::MissingComponent {
                entity: screen,
                component: std::any::type_name::<ScreenComponent>(),
            })?;
        Ok((screen, component.scaling_to_normalized()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{FieldMap, MemoryAssetProvider};
    use crate::render::{RecordingBackend, TextureHandle};

    fn world_with_screen() -> (World, EntityId) {
        let mut world = World::new();
        let screen = world.create_entity();
        world.add_component(screen, ScreenComponent::new(None, 800, 400)).unwrap();
        world.set_active_screen(Some(screen));
        (world, screen)
    }

    #[test]
    fn test_kinds_have_expected_components() {
        let (mut world, _) = world_with_screen();
        let factory = EntityFactory::new(800, 400);

        let gamelet = factory.create_gamelet(&mut world).unwrap();
        assert!(world.has_component::<PositionComponent>(gamelet));
        assert!(world.has_component::<VelocityComponent>(gamelet));
        assert!(!world.has_component::<DrawComponent>(gamelet));

        let textlet = factory.create_textlet(&mut world, FontHandle(1), "hi").unwrap();
        assert!(world.has_component::<ScaleComponent>(textlet));
        assert_eq!(world.get_component::<TextComponent>(textlet).unwrap().text, "hi");
    }

    #[test]
    fn test_spritelet_sized_for_its_screen() {
        let (mut world, screen) = world_with_screen();
        let factory = EntityFactory::new(800, 400);
        let texture = Texture::new(TextureSource::Asset(TextureHandle(1)), 100, 100);

        let sprite = factory.create_spritelet_from_texture(&mut world, texture).unwrap();
        let component = world.get_component::<SpriteComponent>(sprite).unwrap();
        assert!((component.width - 0.25).abs() < f32::EPSILON);
        assert_eq!(component.screen(), Some(screen));
    }

    #[test]
    fn test_animated_spritelet_sized_after_one_frame() {
        let (mut world, _) = world_with_screen();
        let factory = EntityFactory::new(800, 400);
        let mut assets = MemoryAssetProvider::new().with_texture("walk", 400, 200);

        let walker = factory
            .create_animated_spritelet(&mut world, &mut assets, "walk", 4, 2, AnimationType::Normal)
            .unwrap();
        let sprite = world.get_component::<SpriteComponent>(walker).unwrap();
        assert!((sprite.width - 0.25).abs() < f32::EPSILON);
        assert!((sprite.height - 0.25).abs() < f32::EPSILON);
        assert!((sprite.radius - 0.125).abs() < f32::EPSILON);
        let animation = world.get_component::<AnimatedSpriteComponent>(walker).unwrap();
        assert_eq!(animation.frame_count(), 8);
        assert_eq!(animation.animation, AnimationType::Normal);

        assert!(factory
            .create_animated_spritelet(&mut world, &mut assets, "run", 4, 2, AnimationType::Once)
            .is_err());
    }

    #[test]
    fn test_sprite_field_spaced_by_sprite_size() {
        let (mut world, _) = world_with_screen();
        let factory = EntityFactory::new(800, 400);
        let mut assets = MemoryAssetProvider::new()
            .with_texture("brick", 24, 12)
            .with_field("wall", FieldMap::from_rows(&["##", ".#"], Color::WHITE));

        let wall = factory
            .create_sprite_field(&mut world, &mut assets, "wall", "brick")
            .unwrap();
        let field = world.get_component::<SpriteFieldComponent>(wall).unwrap();
        assert_eq!(field.spacing, Vec2::new(24.0, 12.0));
        assert_eq!(field.field.occupied().count(), 3);
        assert!(world.has_component::<SpriteComponent>(wall));

        assert!(matches!(
            factory.create_sprite_field(&mut world, &mut assets, "missing", "brick"),
            Err(EngineError::Asset(_))
        ));
    }

    #[test]
    fn test_spritelet_needs_a_screen() {
        let mut world = World::new();
        let factory = EntityFactory::new(800, 400);
        let texture = Texture::new(TextureSource::Asset(TextureHandle(1)), 100, 100);
        assert!(matches!(
            factory.create_spritelet_from_texture(&mut world, texture),
            Err(EcsError::NoScreen { .. })
        ));
    }

    #[test]
    fn test_buffered_screenlet_gets_render_target() {
        let (mut world, _) = world_with_screen();
        let factory = EntityFactory::new(800, 400);
        let mut renderer = RecordingBackend::new();

        let screenlet = factory
            .create_screenlet(&mut world, &mut renderer, true, 0, 0, Color::BLACK)
            .unwrap();
        let screen = world.get_component::<ScreenComponent>(screenlet).unwrap();
        assert_eq!((screen.width, screen.height), (800, 400));
        let target = screen.render_target.unwrap();

        let viewer = factory.create_spritelet_from_screen(&mut world, screenlet).unwrap();
        let texture = world.get_component::<SpriteComponent>(viewer).unwrap().texture.unwrap();
        assert_eq!(texture.source, TextureSource::RenderTarget(target));
    }
}
