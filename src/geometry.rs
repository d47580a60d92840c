use thiserror::Error;

pub type FloatType = f64;

pub type ScreenPoint = nalgebra::Point2<u32>;
pub type ScreenSize = nalgebra::Vector2<u32>;

pub type WorldPoint = nalgebra::Point3<FloatType>;
pub type WorldVector = nalgebra::Vector3<FloatType>;

/// Linear RGB color with unbounded channels.
/// Clamping to a displayable range only happens in the film.
pub type Color = nalgebra::Vector3<FloatType>;

/// Distance below which an intersection counts as the ray's own surface and
/// gets rejected. Also used to offset shadow ray origins.
pub const EPSILON: FloatType = 1e-4;

/// Threshold for |direction . normal| under which a ray counts as parallel
/// to a plane.
pub const PARALLEL_EPSILON: FloatType = 1e-6;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("Attempted to divide a vector by zero")]
    DivisionByZero,
}

/// Vector operations with explicit degenerate-input policies.
pub trait VectorExt: Sized {
    /// Returns a unit-length copy, or the zero vector if the input has zero
    /// norm. Never divides by zero.
    fn normalize_or_zero(&self) -> Self;

    /// Scalar division that reports a zero divisor as an error instead of
    /// producing infinities.
    fn checked_div(&self, divisor: FloatType) -> Result<Self, GeometryError>;
}

impl VectorExt for WorldVector {
    fn normalize_or_zero(&self) -> WorldVector {
        self.try_normalize(0.0).unwrap_or_else(WorldVector::zeros)
    }

    fn checked_div(&self, divisor: FloatType) -> Result<WorldVector, GeometryError> {
        if divisor == 0.0 {
            Err(GeometryError::DivisionByZero)
        } else {
            Ok(self / divisor)
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Ray {
    pub origin: WorldPoint,
    /// Normalized direction of the ray.
    /// Zero if the ray was constructed from a zero vector; such a degenerate
    /// ray never hits anything.
    pub direction: WorldVector,
}

impl Ray {
    pub fn new(origin: WorldPoint, direction: WorldVector) -> Ray {
        Ray {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn point_at(&self, distance: FloatType) -> WorldPoint {
        self.origin + self.direction * distance
    }

    pub fn is_degenerate(&self) -> bool {
        self.direction == WorldVector::zeros()
    }
}

/// Intersection of a ray and a surface.
#[derive(Copy, Clone, Debug)]
pub struct HitRecord {
    /// Distance from the ray origin to the hit point
    pub t: FloatType,
    pub point: WorldPoint,
    /// Unit surface normal at the hit point
    pub normal: WorldVector,
}
