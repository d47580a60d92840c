use index_vec::IndexSlice;

use crate::geometry::{Color, EPSILON, HitRecord, Ray, VectorExt as _, WorldPoint, WorldVector};
use crate::scene::{Light, Material, Primitive, PrimitiveIndex};

/// Phong color of one surface hit: ambient plus, when the light is not
/// blocked, attenuated diffuse and specular terms. The result is linear and
/// unclamped, the film clamps it when converting to output pixels.
pub fn shade(
    ray: &Ray,
    hit: &HitRecord,
    material: &Material,
    light: &Light,
    primitives: &IndexSlice<PrimitiveIndex, [Primitive]>,
) -> Color {
    let light_dir = (light.position - hit.point).normalize_or_zero();
    let view_dir = (ray.origin - hit.point).normalize_or_zero();

    let mut intensity = material.base_color * material.ambient;

    if !in_shadow(&hit.point, &hit.normal, light, primitives) {
        let strength = light.strength_at(&hit.point);

        let lambert = hit.normal.dot(&light_dir).max(0.0);
        let diffuse = light.color * (strength * material.diffuse * lambert);

        let reflection =
            (hit.normal * (2.0 * hit.normal.dot(&light_dir)) - light_dir).normalize_or_zero();
        let highlight = reflection.dot(&view_dir).max(0.0).powf(material.shininess);
        let specular = light.color * (strength * material.specular * highlight);

        intensity += diffuse + specular;
    }

    material.base_color.component_mul(&intensity)
}

/// Whether any primitive blocks the straight path from the point to the light.
///
/// The shadow ray starts slightly off the surface along its normal, so the
/// surface cannot occlude its own point, and only occluders strictly closer
/// than the light count.
pub fn in_shadow(
    point: &WorldPoint,
    normal: &WorldVector,
    light: &Light,
    primitives: &IndexSlice<PrimitiveIndex, [Primitive]>,
) -> bool {
    let to_light = light.position - point;
    let light_distance = to_light.norm();
    if light_distance == 0.0 {
        return false;
    }

    let shadow_ray = Ray::new(point + normal * EPSILON, to_light);
    primitives
        .iter()
        .filter_map(|primitive| primitive.shape.intersect(&shadow_ray))
        .any(|hit| hit.t < light_distance)
}
