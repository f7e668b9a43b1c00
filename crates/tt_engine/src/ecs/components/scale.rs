//! Scale component

use crate::ecs::Component;

/// Uniform scale that can ease towards a target value
///
/// While `active` with a positive `speed`, the scale system moves `scale`
/// towards `target` by `(target - scale) * speed` per tick and snaps to the
/// target once a step would cross it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleComponent {
    /// Current scale
    pub scale: f64,
    /// Scale being approached
    pub target: f64,
    /// Fraction of the remaining distance covered per tick
    pub speed: f64,
    /// Whether the scale is updated at all
    pub active: bool,
}

impl Component for ScaleComponent {}

impl Default for ScaleComponent {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl ScaleComponent {
    /// Create a static scale
    pub const fn new(scale: f64) -> Self {
        Self {
            scale,
            target: scale,
            speed: 0.0,
            active: true,
        }
    }

    /// Start easing towards `target` at `speed`
    #[must_use]
    pub const fn towards(mut self, target: f64, speed: f64) -> Self {
        self.target = target;
        self.speed = speed;
        self
    }

    /// Whether the scale reached its target
    #[allow(clippy::float_cmp)]
    pub fn is_settled(&self) -> bool {
        self.scale == self.target
    }
}
