use assert2::assert;
use bon::bon;

use crate::geometry::{Color, FloatType, WorldPoint};

/// Point light with a smooth bounded distance falloff.
#[derive(Clone, Debug)]
pub struct Light {
    pub position: WorldPoint,
    pub color: Color,
    base_strength: FloatType,
    falloff_radius: FloatType,
}

#[bon]
impl Light {
    #[builder]
    pub fn new(
        position: WorldPoint,
        #[builder(default = Color::new(1.0, 1.0, 1.0))] color: Color,
        base_strength: FloatType,
        #[builder(default = 0.0)] falloff_radius: FloatType,
    ) -> Self {
        assert!(base_strength >= 0.0);
        assert!(falloff_radius >= 0.0);

        Light {
            position,
            color,
            base_strength,
            falloff_radius,
        }
    }
}

impl Light {
    /// Attenuated intensity at the given point.
    ///
    /// Falls off as base / (1 + d^2 / r^2). With a zero falloff radius the
    /// falloff is base / (1 + d^2) instead. A point exactly at the light gets
    /// the unattenuated base strength, so the result is always finite.
    pub fn strength_at(&self, point: &WorldPoint) -> FloatType {
        let dist_squared = (self.position - point).norm_squared();

        if dist_squared == 0.0 {
            self.base_strength
        } else if self.falloff_radius > 0.0 {
            self.base_strength / (1.0 + dist_squared / (self.falloff_radius * self.falloff_radius))
        } else {
            self.base_strength / (1.0 + dist_squared)
        }
    }

    pub fn base_strength(&self) -> FloatType {
        self.base_strength
    }
}
