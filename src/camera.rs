use assert2::assert;
use bon::bon;

use crate::geometry::{FloatType, Ray, ScreenPoint, ScreenSize, WorldPoint, WorldVector};

/// Pinhole camera at a fixed position, looking along +Y with +Z up and +X to
/// the right.
#[derive(Copy, Clone, Debug)]
pub struct Camera {
    position: WorldPoint,

    resolution: ScreenSize,

    /// Film extents in camera space at unit distance, derived from the
    /// vertical field of view
    sensor_width: FloatType,
    sensor_height: FloatType,
}

#[bon]
impl Camera {
    #[builder]
    pub fn new(
        #[builder(default = WorldPoint::origin())] position: WorldPoint,
        resolution: ScreenSize,
        #[builder(default = 60.0)] vertical_fov_degrees: FloatType,
    ) -> Self {
        assert!(resolution.x > 0);
        assert!(resolution.y > 0);
        assert!(vertical_fov_degrees > 0.0);
        assert!(vertical_fov_degrees < 180.0);

        let aspect_ratio = resolution.x as FloatType / resolution.y as FloatType;
        let sensor_height = 2.0 * (vertical_fov_degrees.to_radians() / 2.0).tan();
        let sensor_width = sensor_height * aspect_ratio;

        Camera {
            position,

            resolution,

            sensor_width,
            sensor_height,
        }
    }
}

impl Camera {
    pub fn get_resolution(&self) -> ScreenSize {
        self.resolution
    }

    /// Builds the primary ray through the center of the given pixel.
    pub fn shoot_ray(&self, point: &ScreenPoint) -> Ray {
        self.ray_through(point.x as FloatType + 0.5, point.y as FloatType + 0.5)
    }

    /// Builds the primary ray through fractional pixel coordinates, e.g. for
    /// jittered sub-pixel sampling.
    pub fn ray_through(&self, x: FloatType, y: FloatType) -> Ray {
        let ndc_x = x / self.resolution.x as FloatType * 2.0 - 1.0;
        let ndc_y = y / self.resolution.y as FloatType * 2.0 - 1.0;

        // Pixel rows grow downward while world Z grows upward
        let direction = WorldVector::new(
            ndc_x * self.sensor_width / 2.0,
            1.0,
            -ndc_y * self.sensor_height / 2.0,
        );

        Ray::new(self.position, direction)
    }
}
