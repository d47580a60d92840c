use std::sync::Arc;

use assert2::assert;
use bon::bon;
use indexmap::IndexMap;

use crate::geometry::{Color, FloatType};

/// Phong coefficients of a surface.
/// Shared by reference between primitives, so swapping a material is a
/// pointer reassignment, not a copy.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    /// Base surface color, every channel in [0, 1]
    pub base_color: Color,
    pub ambient: FloatType,
    pub diffuse: FloatType,
    pub specular: FloatType,
    pub shininess: FloatType,
}

#[bon]
impl Material {
    #[builder]
    pub fn new(
        #[builder(into)] name: String,
        base_color: Color,
        ambient: FloatType,
        diffuse: FloatType,
        specular: FloatType,
        shininess: FloatType,
    ) -> Self {
        assert!(base_color.iter().all(|channel| (0.0..=1.0).contains(channel)));
        assert!(ambient >= 0.0);
        assert!(diffuse >= 0.0);
        assert!(specular >= 0.0);
        assert!(shininess > 0.0);

        Material {
            name,
            base_color,
            ambient,
            diffuse,
            specular,
            shininess,
        }
    }
}

/// Ordered set of named materials with a cycling cursor.
#[derive(Clone, Debug, Default)]
pub struct MaterialPalette {
    materials: IndexMap<String, Arc<Material>>,
    cursor: usize,
}

impl MaterialPalette {
    /// Adds a material at the end of the cycling order and returns its shared
    /// handle. Reinserting a name replaces the stored material but keeps its
    /// position in the order.
    pub fn insert(&mut self, material: Material) -> Arc<Material> {
        let material = Arc::new(material);
        self.materials
            .insert(material.name.clone(), Arc::clone(&material));
        material
    }

    /// The material the cursor currently points at.
    pub fn current(&self) -> Option<Arc<Material>> {
        self.materials
            .get_index(self.cursor)
            .map(|(_, material)| Arc::clone(material))
    }

    /// Moves the cursor to the next material, wrapping around at the end.
    pub fn advance(&mut self) -> Option<Arc<Material>> {
        if self.materials.is_empty() {
            return None;
        }

        self.cursor = (self.cursor + 1) % self.materials.len();
        self.current()
    }

    pub fn get(&self, name: &str) -> Option<Arc<Material>> {
        self.materials.get(name).map(Arc::clone)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
