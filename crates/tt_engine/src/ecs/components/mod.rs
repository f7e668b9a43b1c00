//! ECS components
//!
//! Plain data attached to entities. A few components run hooks on attach and
//! detach to keep screen registries consistent.

pub mod position;
pub mod scale;
pub mod draw;
pub mod sprite;
pub mod animation;
pub mod field;
pub mod text;
pub mod script;
pub mod audio;
pub mod screen;
pub mod collision;

pub use position::{PositionComponent, VelocityComponent};
pub use scale::ScaleComponent;
pub use draw::DrawComponent;
pub use sprite::{circles_overlap, ColliderView, CollisionTest, SpriteComponent};
pub use animation::{AnimatedSpriteComponent, AnimationType};
pub use field::SpriteFieldComponent;
pub use text::TextComponent;
pub use script::{BasicScript, Modifier, Script, ScriptComponent, ScriptContext};
pub use audio::AudioComponent;
pub use screen::ScreenComponent;
pub use collision::{CollisionHandler, CollisionHandlerComponent, CollisionStateComponent};
