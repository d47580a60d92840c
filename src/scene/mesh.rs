use std::{fs, path::Path};

use ordered_float::OrderedFloat;
use thiserror::Error;

use crate::geometry::{HitRecord, Ray, WorldPoint};
use crate::scene::Triangle;

/// Triangle soup owned by a single primitive.
#[derive(Clone, Debug)]
pub struct Mesh {
    triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new(triangles: Vec<Triangle>) -> Mesh {
        Mesh { triangles }
    }

    /// Loads the triangles of a Wavefront OBJ file.
    /// Non-triangle primitives in the file are skipped with a warning.
    pub fn with_obj(p: impl AsRef<Path>) -> Result<Mesh, ObjOpenError> {
        let content = fs::read_to_string(p)?;
        let parsed = wavefront_obj::obj::parse(content)?;

        Self::from_obj_set(parsed)
    }

    fn from_obj_set(obj: wavefront_obj::obj::ObjSet) -> Result<Mesh, ObjOpenError> {
        let mut triangles = Vec::new();

        for o in obj.objects.into_iter() {
            for geometry in o.geometry {
                for shape in geometry.shapes {
                    let wavefront_obj::obj::Primitive::Triangle(a, b, c) = shape.primitive else {
                        log::warn!("Skipping a non-triangle primitive");
                        continue;
                    };

                    let vertex = |index: (usize, Option<usize>, Option<usize>)| {
                        let v = &o.vertices[index.0];
                        WorldPoint::new(v.x, v.y, v.z)
                    };

                    triangles.push(Triangle::new(vertex(a), vertex(b), vertex(c)));
                }
            }
        }

        if triangles.is_empty() {
            return Err(ObjOpenError::NoTriangles);
        }

        Ok(Mesh { triangles })
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Nearest triangle hit, by linear scan over all triangles.
    pub fn intersect(&self, ray: &Ray) -> Option<HitRecord> {
        self.triangles
            .iter()
            .filter_map(|triangle| triangle.intersect(ray))
            .min_by_key(|hit| OrderedFloat(hit.t))
    }
}

#[derive(Debug, Error)]
pub enum ObjOpenError {
    #[error("Failed to read file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse file: {0}")]
    ParseError(#[from] wavefront_obj::ParseError),

    #[error("The file contains no triangles")]
    NoTriangles,
}
