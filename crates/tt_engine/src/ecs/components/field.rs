//! Sprite field component

use crate::assets::FieldMap;
use crate::ecs::Component;
use crate::foundation::math::{Color, Vec2};

/// Repeats the entity's sprite on every occupied cell of a field map
///
/// Cell `(x, y)` is drawn `(x * spacing.x, y * spacing.y)` pixels from the
/// entity's own pixel position, before draw scaling, tinted with the cell's
/// color times the draw tint.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteFieldComponent {
    /// Occupied cells
    pub field: FieldMap,
    /// Distance between neighbouring cells in pixels
    pub spacing: Vec2,
}

impl Component for SpriteFieldComponent {}

impl SpriteFieldComponent {
    /// Place sprites on `field`, `spacing` pixels apart
    pub const fn new(field: FieldMap, spacing: Vec2) -> Self {
        Self { field, spacing }
    }

    /// Pixel offsets and tints of the occupied cells
    #[allow(clippy::cast_precision_loss)]
    pub fn placements(&self, scale: f32, tint: Color) -> impl Iterator<Item = (Vec2, Color)> + '_ {
        self.field.occupied().map(move |(x, y, cell)| {
            let offset = Vec2::new(x as f32 * self.spacing.x, y as f32 * self.spacing.y) * scale;
            let color = Color::rgba(cell.r * tint.r, cell.g * tint.g, cell.b * tint.b, cell.a * tint.a);
            (offset, color)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placements_follow_spacing_and_scale() {
        let field = FieldMap::from_rows(&["#.", ".#"], Color::rgb(0.5, 1.0, 1.0));
        let component = SpriteFieldComponent::new(field, Vec2::new(16.0, 8.0));

        let placements: Vec<_> = component.placements(2.0, Color::WHITE.with_alpha(0.5)).collect();
        assert_eq!(placements.len(), 2);
        assert_eq!(placements[0].0, Vec2::zeros());
        assert_eq!(placements[1].0, Vec2::new(32.0, 16.0));
        assert_eq!(placements[1].1, Color::rgba(0.5, 1.0, 1.0, 0.5));
    }
}
