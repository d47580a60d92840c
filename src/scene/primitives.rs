use std::sync::Arc;

use itertools::Itertools as _;

use crate::geometry::{
    EPSILON, FloatType, HitRecord, PARALLEL_EPSILON, Ray, VectorExt as _, WorldPoint, WorldVector,
};
use crate::scene::{Material, Mesh};

#[derive(Clone, Debug)]
pub struct Sphere {
    pub center: WorldPoint,
    pub radius: FloatType,
}

impl Sphere {
    pub fn intersect(&self, ray: &Ray) -> Option<HitRecord> {
        if ray.is_degenerate() {
            return None;
        }

        let oc = ray.origin - self.center;
        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * oc.dot(&ray.direction);
        let c = oc.dot(&oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_disc = discriminant.sqrt();
        let t = [(-b - sqrt_disc) / (2.0 * a), (-b + sqrt_disc) / (2.0 * a)]
            .into_iter()
            .find(|&t| t > EPSILON)?;

        let point = ray.point_at(t);
        Some(HitRecord {
            t,
            point,
            normal: self.normal_at(&point),
        })
    }

    /// Unit normal pointing out of the sphere.
    /// Degenerates to +Z if the queried point sits exactly on the center.
    pub fn normal_at(&self, point: &WorldPoint) -> WorldVector {
        let normal = (point - self.center).normalize_or_zero();
        if normal == WorldVector::zeros() {
            WorldVector::z()
        } else {
            normal
        }
    }
}

/// Triangle with a precomputed plane.
/// The normal follows the right-handed winding of the vertices. Collinear
/// vertices would give a zero normal and must not be passed in.
#[derive(Clone, Debug)]
pub struct Triangle {
    vertices: [WorldPoint; 3],
    normal: WorldVector,
    plane_offset: FloatType,
}

impl Triangle {
    pub fn new(p0: WorldPoint, p1: WorldPoint, p2: WorldPoint) -> Triangle {
        let normal = (p1 - p0).cross(&(p2 - p0)).normalize_or_zero();
        let plane_offset = normal.dot(&p0.coords);

        Triangle {
            vertices: [p0, p1, p2],
            normal,
            plane_offset,
        }
    }

    pub fn vertices(&self) -> &[WorldPoint; 3] {
        &self.vertices
    }

    /// Unit normal of the triangle plane
    pub fn normal(&self) -> WorldVector {
        self.normal
    }

    pub fn intersect(&self, ray: &Ray) -> Option<HitRecord> {
        let denom = ray.direction.dot(&self.normal);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.plane_offset - ray.origin.coords.dot(&self.normal)) / denom;
        if t <= EPSILON {
            return None;
        }

        let point = ray.point_at(t);
        let inside = self
            .vertices
            .iter()
            .circular_tuple_windows()
            .all(|(a, b)| (b - a).cross(&(point - a)).dot(&self.normal) >= 0.0);

        if inside {
            Some(HitRecord {
                t,
                point,
                normal: self.normal,
            })
        } else {
            None
        }
    }
}

/// Closed set of renderable shape kinds.
#[derive(Clone, Debug)]
pub enum Shape {
    Sphere(Sphere),
    Triangle(Triangle),
    Mesh(Mesh),
}

impl Shape {
    /// Nearest intersection with the shape, if any.
    pub fn intersect(&self, ray: &Ray) -> Option<HitRecord> {
        match self {
            Shape::Sphere(sphere) => sphere.intersect(ray),
            Shape::Triangle(triangle) => triangle.intersect(ray),
            Shape::Mesh(mesh) => mesh.intersect(ray),
        }
    }
}

impl From<Sphere> for Shape {
    fn from(sphere: Sphere) -> Shape {
        Shape::Sphere(sphere)
    }
}

impl From<Triangle> for Shape {
    fn from(triangle: Triangle) -> Shape {
        Shape::Triangle(triangle)
    }
}

impl From<Mesh> for Shape {
    fn from(mesh: Mesh) -> Shape {
        Shape::Mesh(mesh)
    }
}

/// A shape plus the material it is rendered with.
#[derive(Clone, Debug)]
pub struct Primitive {
    pub shape: Shape,
    pub material: Arc<Material>,
}

impl Primitive {
    pub fn new(shape: impl Into<Shape>, material: Arc<Material>) -> Primitive {
        Primitive {
            shape: shape.into(),
            material,
        }
    }
}

index_vec::define_index_type! {
    pub struct PrimitiveIndex = u32;
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{assert, let_assert};
    use test_case::test_case;

    fn unit_sphere() -> Sphere {
        Sphere {
            center: [0.0, 0.0, 5.0].into(),
            radius: 1.0,
        }
    }

    #[test]
    fn test_direct_hit_through_center() {
        let ray = Ray::new([0.0, 0.0, 0.0].into(), [0.0, 0.0, 1.0].into());
        let hit = unit_sphere().intersect(&ray);

        let h = hit.expect("We should have a hit!");
        assert!((h.t - 4.0).abs() < 1e-9);
        assert!((h.point - WorldPoint::new(0.0, 0.0, 4.0)).norm() < 1e-9);
        assert!((h.normal - WorldVector::new(0.0, 0.0, -1.0)).norm() < 1e-9);
    }

    #[test]
    fn test_grazing_hit() {
        let ray = Ray::new([1.0, 0.0, 0.0].into(), [0.0, 0.0, 1.0].into());
        let hit = unit_sphere().intersect(&ray);

        let h = hit.expect("We should have a hit!");
        assert!((h.t - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_narrow_miss() {
        let ray = Ray::new([1.01, 0.0, 0.0].into(), [0.0, 0.0, 1.0].into());
        assert!(unit_sphere().intersect(&ray).is_none());
    }

    #[test]
    fn test_hit_from_inside_exits_forward() {
        let ray = Ray::new([0.0, 0.0, 5.0].into(), [0.0, 1.0, 0.0].into());
        let hit = unit_sphere().intersect(&ray);

        let h = hit.expect("We should have a hit!");
        assert!((h.t - 1.0).abs() < 1e-9);
        assert!((h.normal - WorldVector::new(0.0, 1.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn test_sphere_behind_the_ray_is_ignored() {
        let ray = Ray::new([0.0, 0.0, 10.0].into(), [0.0, 0.0, 1.0].into());
        assert!(unit_sphere().intersect(&ray).is_none());
    }

    #[test]
    fn test_degenerate_ray_hits_nothing() {
        let ray = Ray::new([0.0, 0.0, 5.0].into(), WorldVector::zeros());
        assert!(unit_sphere().intersect(&ray).is_none());
    }

    fn unit_triangle() -> Triangle {
        Triangle::new(
            [0.0, 0.0, 0.0].into(),
            [1.0, 0.0, 0.0].into(),
            [0.0, 1.0, 0.0].into(),
        )
    }

    #[test]
    fn test_triangle_normal_follows_the_winding() {
        assert!(unit_triangle().normal() == WorldVector::z());
    }

    #[test_case(0.2, 0.2, true ; "point inside the triangle")]
    #[test_case(2.0, 2.0, false ; "plane hit outside the triangle")]
    #[test_case(0.5, 0.0, true ; "point exactly on an edge")]
    #[test_case(0.0, 0.0, true ; "point exactly on a vertex")]
    fn test_triangle_membership(x: FloatType, y: FloatType, expect_hit: bool) {
        let ray = Ray::new(WorldPoint::new(x, y, 1.0), WorldVector::new(0.0, 0.0, -1.0));
        assert!(unit_triangle().intersect(&ray).is_some() == expect_hit);
    }

    #[test]
    fn test_triangle_hit_point_and_distance() {
        let ray = Ray::new([0.2, 0.2, 1.0].into(), [0.0, 0.0, -1.0].into());

        let_assert!(Some(hit) = unit_triangle().intersect(&ray));
        assert!((hit.t - 1.0).abs() < 1e-9);
        assert!((hit.point - WorldPoint::new(0.2, 0.2, 0.0)).norm() < 1e-9);
        assert!(hit.normal == WorldVector::z());
    }

    #[test]
    fn test_parallel_ray_misses() {
        let ray = Ray::new([0.2, 0.2, 1.0].into(), [1.0, 0.0, 0.0].into());
        assert!(unit_triangle().intersect(&ray).is_none());
    }

    #[test]
    fn test_plane_hit_behind_the_origin_is_rejected() {
        let ray = Ray::new([0.2, 0.2, -1.0].into(), [0.0, 0.0, -1.0].into());
        assert!(unit_triangle().intersect(&ray).is_none());
    }

    #[test]
    fn test_shape_dispatches_to_the_wrapped_kind() {
        let shape: Shape = unit_sphere().into();
        let ray = Ray::new([0.0, 0.0, 0.0].into(), [0.0, 0.0, 1.0].into());

        let_assert!(Some(hit) = shape.intersect(&ray));
        assert!((hit.t - 4.0).abs() < 1e-9);
    }
}
