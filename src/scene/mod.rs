mod light;
mod material;
mod mesh;
mod primitives;

use std::sync::Arc;

use index_vec::IndexVec;
use ordered_float::OrderedFloat;

use crate::geometry::{Color, HitRecord, Ray, WorldPoint, WorldVector};

pub use light::Light;
pub use material::{Material, MaterialPalette};
pub use mesh::{Mesh, ObjOpenError};
pub use primitives::{Primitive, PrimitiveIndex, Shape, Sphere, Triangle};

/// Everything a render sweep reads: the primitives, the light and the
/// palette the harness cycles materials through.
#[derive(Clone, Debug)]
pub struct Scene {
    pub primitives: IndexVec<PrimitiveIndex, Primitive>,
    pub light: Light,
    pub palette: MaterialPalette,
    /// Color of rays that hit nothing
    pub background: Color,
}

/// Scene mutation requested by the harness.
/// Commands are queued up while a sweep runs and applied between sweeps.
#[derive(Copy, Clone, Debug)]
pub enum SceneCommand {
    /// Translate the light by the given world space delta
    MoveLight(WorldVector),
    /// Swap every sphere's material for the next palette entry
    CycleMaterial,
}

impl Scene {
    /// Finds the closest primitive hit by the ray.
    pub fn find_nearest(&self, ray: &Ray) -> Option<(PrimitiveIndex, HitRecord)> {
        self.primitives
            .iter_enumerated()
            .filter_map(|(index, primitive)| {
                primitive.shape.intersect(ray).map(|hit| (index, hit))
            })
            .min_by_key(|(_, hit)| OrderedFloat(hit.t))
    }

    /// Applies a harness command.
    /// Must not be called while a sweep is reading the scene.
    pub fn apply(&mut self, command: SceneCommand) {
        match command {
            SceneCommand::MoveLight(delta) => {
                self.light.position += delta;
                log::debug!("Moved the light to {:?}", self.light.position);
            }
            SceneCommand::CycleMaterial => {
                let Some(material) = self.palette.advance() else {
                    return;
                };
                log::debug!("Switched sphere material to {:?}", material.name);

                for primitive in self.primitives.iter_mut() {
                    if matches!(primitive.shape, Shape::Sphere(_)) {
                        primitive.material = Arc::clone(&material);
                    }
                }
            }
        }
    }

    /// Builds the demo scene: a sphere resting on a chalk floor next to an
    /// octahedron, lit by a single white light.
    pub fn demo() -> Result<Scene, ObjOpenError> {
        let mut palette = MaterialPalette::default();

        let metal = palette.insert(
            Material::builder()
                .name("metal")
                .base_color(Color::new(0.4, 0.4, 0.5))
                .ambient(0.25)
                .diffuse(0.4)
                .specular(0.9)
                .shininess(300.0)
                .build(),
        );
        let chalk = palette.insert(
            Material::builder()
                .name("chalk")
                .base_color(Color::new(0.95, 0.95, 0.93))
                .ambient(0.2)
                .diffuse(0.85)
                .specular(0.05)
                .shininess(10.0)
                .build(),
        );
        palette.insert(
            Material::builder()
                .name("rubber")
                .base_color(Color::new(0.1, 0.1, 0.1))
                .ambient(0.1)
                .diffuse(0.7)
                .specular(0.2)
                .shininess(15.0)
                .build(),
        );
        let plastic = palette.insert(
            Material::builder()
                .name("plastic")
                .base_color(Color::new(0.1, 0.6, 0.2))
                .ambient(0.15)
                .diffuse(0.7)
                .specular(0.65)
                .shininess(80.0)
                .build(),
        );

        let mut primitives = IndexVec::new();
        primitives.push(Primitive::new(
            Sphere {
                center: WorldPoint::new(0.0, 2.0, 0.0),
                radius: 0.5,
            },
            metal,
        ));

        // Floor quad at z = -0.5, normals up
        let corners = [
            WorldPoint::new(-3.0, 0.8, -0.5),
            WorldPoint::new(3.0, 0.8, -0.5),
            WorldPoint::new(3.0, 6.0, -0.5),
            WorldPoint::new(-3.0, 6.0, -0.5),
        ];
        primitives.push(Primitive::new(
            Triangle::new(corners[0], corners[1], corners[2]),
            Arc::clone(&chalk),
        ));
        primitives.push(Primitive::new(
            Triangle::new(corners[0], corners[2], corners[3]),
            chalk,
        ));

        primitives.push(Primitive::new(
            Mesh::with_obj("data/octahedron.obj")?,
            plastic,
        ));

        Ok(Scene {
            primitives,
            light: Light::builder()
                .position(WorldPoint::new(1.5, 0.5, 2.0))
                .base_strength(1.5)
                .falloff_radius(10.0)
                .build(),
            palette,
            background: Color::zeros(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert2::{assert, let_assert};

    use crate::geometry::FloatType;

    fn gray(name: &str) -> Material {
        Material::builder()
            .name(name)
            .base_color(Color::new(0.5, 0.5, 0.5))
            .ambient(0.1)
            .diffuse(0.7)
            .specular(0.2)
            .shininess(10.0)
            .build()
    }

    fn single_light() -> Light {
        Light::builder()
            .position(WorldPoint::new(0.0, 0.0, 5.0))
            .base_strength(1.0)
            .falloff_radius(10.0)
            .build()
    }

    fn sphere_at(y: FloatType, material: Arc<Material>) -> Primitive {
        Primitive::new(
            Sphere {
                center: WorldPoint::new(0.0, y, 0.0),
                radius: 0.5,
            },
            material,
        )
    }

    #[test]
    fn find_nearest_prefers_the_closer_primitive() {
        let material = Arc::new(gray("gray"));
        let mut primitives = IndexVec::new();
        primitives.push(sphere_at(4.0, Arc::clone(&material)));
        let near = primitives.push(sphere_at(2.0, material));

        let scene = Scene {
            primitives,
            light: single_light(),
            palette: MaterialPalette::default(),
            background: Color::zeros(),
        };
        let ray = Ray::new(WorldPoint::origin(), WorldVector::y());

        let_assert!(Some((index, hit)) = scene.find_nearest(&ray));
        assert!(index == near);
        assert!((hit.t - 1.5).abs() < 1e-9);
    }

    #[test]
    fn find_nearest_returns_none_on_a_miss() {
        let material = Arc::new(gray("gray"));
        let mut primitives = IndexVec::new();
        primitives.push(sphere_at(2.0, material));

        let scene = Scene {
            primitives,
            light: single_light(),
            palette: MaterialPalette::default(),
            background: Color::zeros(),
        };
        let ray = Ray::new(WorldPoint::origin(), -WorldVector::y());

        assert!(scene.find_nearest(&ray).is_none());
    }

    #[test]
    fn move_light_translates_the_position() {
        let mut scene = Scene {
            primitives: IndexVec::new(),
            light: single_light(),
            palette: MaterialPalette::default(),
            background: Color::zeros(),
        };

        scene.apply(SceneCommand::MoveLight(WorldVector::new(0.2, 0.0, -0.2)));
        assert!(scene.light.position == WorldPoint::new(0.2, 0.0, 4.8));
    }

    #[test]
    fn cycle_material_touches_spheres_only() {
        let mut palette = MaterialPalette::default();
        let first = palette.insert(gray("first"));
        palette.insert(gray("second"));

        let mut primitives = IndexVec::new();
        let sphere = primitives.push(sphere_at(2.0, Arc::clone(&first)));
        let triangle = primitives.push(Primitive::new(
            Triangle::new(
                [0.0, 1.0, 0.0].into(),
                [1.0, 1.0, 0.0].into(),
                [0.0, 1.0, 1.0].into(),
            ),
            first,
        ));

        let mut scene = Scene {
            primitives,
            light: single_light(),
            palette,
            background: Color::zeros(),
        };
        scene.apply(SceneCommand::CycleMaterial);

        assert!(scene.primitives[sphere].material.name == "second");
        assert!(scene.primitives[triangle].material.name == "first");
    }

    #[test]
    fn cycle_material_on_an_empty_palette_is_a_no_op() {
        let first = Arc::new(gray("first"));
        let mut primitives = IndexVec::new();
        let sphere = primitives.push(sphere_at(2.0, Arc::clone(&first)));

        let mut scene = Scene {
            primitives,
            light: single_light(),
            palette: MaterialPalette::default(),
            background: Color::zeros(),
        };
        scene.apply(SceneCommand::CycleMaterial);

        assert!(scene.primitives[sphere].material.name == "first");
    }

    #[test]
    fn demo_scene_is_ready_to_render() {
        let_assert!(Ok(scene) = Scene::demo());
        assert!(scene.primitives.len() == 4);
        assert!(scene.palette.len() == 4);

        let_assert!(Some(current) = scene.palette.current());
        assert!(current.name == "metal");

        // The sphere sits straight ahead of the default camera
        let ray = Ray::new(WorldPoint::origin(), WorldVector::y());
        let_assert!(Some((_, hit)) = scene.find_nearest(&ray));
        assert!((hit.t - 1.5).abs() < 1e-9);
    }
}
