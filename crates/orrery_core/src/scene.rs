//! Scene snapshot types.
//!
//! A `Scene` holds three parallel arrays: spheres, materials and textures.
//! A sphere's `material_index` selects both its material and its texture,
//! so the material and texture arrays always have the same length.

use std::sync::Arc;

use orrery_math::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::texture::TextureData;

/// Emission magnitude above which a material counts as a light source.
pub const LIGHT_EMISSION_THRESHOLD: f32 = 0.1;

/// Default index of refraction for refractive materials.
pub const DEFAULT_IOR: f32 = 1.45;

/// Errors describing a scene that breaks the snapshot contract.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("Scene has {materials} materials but {textures} textures")]
    MismatchedArrays { materials: usize, textures: usize },

    #[error("Sphere {sphere} uses material index {index}, but only {len} materials exist")]
    InvalidMaterialIndex {
        sphere: usize,
        index: usize,
        len: usize,
    },

    #[error("Sphere {sphere} has non-positive radius {radius}")]
    InvalidRadius { sphere: usize, radius: f32 },
}

/// How a surface interacts with light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MaterialKind {
    /// Lit directly by the scene's lights (Phong-style).
    Diffuse,
    /// Perfect mirror.
    Specular,
    /// Transparent, bends rays by Snell's law.
    Refractive { ior: f32 },
}

impl MaterialKind {
    /// Refractive kind with the default index of refraction.
    pub fn refractive() -> Self {
        Self::Refractive { ior: DEFAULT_IOR }
    }
}

/// Surface material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Base albedo (linear RGB, 0-1)
    pub color: Vec3,

    /// Emitted light; above `LIGHT_EMISSION_THRESHOLD` the sphere is a light
    pub emission: Vec3,

    pub kind: MaterialKind,

    /// Carried for scene authors, not used by shading yet
    pub roughness: f32,
}

impl Material {
    /// A diffuse material with the given albedo.
    pub fn diffuse(color: Vec3) -> Self {
        Self {
            color,
            emission: Vec3::ZERO,
            kind: MaterialKind::Diffuse,
            roughness: 0.0,
        }
    }

    /// A mirror material tinted by `color`.
    pub fn specular(color: Vec3) -> Self {
        Self {
            kind: MaterialKind::Specular,
            ..Self::diffuse(color)
        }
    }

    /// A refractive material with the given index of refraction.
    pub fn refractive(color: Vec3, ior: f32) -> Self {
        Self {
            kind: MaterialKind::Refractive { ior },
            ..Self::diffuse(color)
        }
    }

    /// A self-lit material that also lights the rest of the scene.
    pub fn emissive(color: Vec3, emission: Vec3) -> Self {
        Self {
            emission,
            ..Self::diffuse(color)
        }
    }

    /// Set the roughness.
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    /// True if this material is classified as a light source.
    #[inline]
    pub fn is_light(&self) -> bool {
        self.emission.length() > LIGHT_EMISSION_THRESHOLD
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::diffuse(Vec3::new(0.5, 0.5, 0.5)) // Grey default
    }
}

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,

    /// Index into both the material and the texture arrays
    pub material_index: usize,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material_index: usize) -> Self {
        Self {
            center,
            radius,
            material_index,
        }
    }
}

/// Per-frame scene snapshot.
///
/// Built by the caller before a render and only read while rendering.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub spheres: Vec<Sphere>,
    pub materials: Vec<Material>,
    pub textures: Vec<Arc<TextureData>>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sphere along with its own material and texture.
    ///
    /// Pass `TextureData::empty()` (wrapped in an `Arc`) for an untextured
    /// sphere. Returns the index of the new sphere.
    pub fn add_sphere(
        &mut self,
        center: Vec3,
        radius: f32,
        material: Material,
        texture: Arc<TextureData>,
    ) -> usize {
        let material_index = self.materials.len();
        self.materials.push(material);
        self.textures.push(texture);
        self.spheres.push(Sphere::new(center, radius, material_index));
        self.spheres.len() - 1
    }

    /// Get the number of spheres.
    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    /// Check if the scene has no spheres.
    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }

    /// Look up the material and texture of sphere `index`.
    ///
    /// Returns `None` if the sphere does not exist or its material index
    /// is out of range for either array.
    pub fn surface(&self, index: usize) -> Option<(&Material, &TextureData)> {
        let sphere = self.spheres.get(index)?;
        let material = self.materials.get(sphere.material_index)?;
        let texture = self.textures.get(sphere.material_index)?;
        Some((material, texture.as_ref()))
    }

    /// Check the snapshot contract: parallel arrays, valid indices,
    /// positive radii.
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.materials.len() != self.textures.len() {
            return Err(SceneError::MismatchedArrays {
                materials: self.materials.len(),
                textures: self.textures.len(),
            });
        }

        for (i, sphere) in self.spheres.iter().enumerate() {
            if sphere.material_index >= self.materials.len() {
                return Err(SceneError::InvalidMaterialIndex {
                    sphere: i,
                    index: sphere.material_index,
                    len: self.materials.len(),
                });
            }
            if !(sphere.radius > 0.0) {
                return Err(SceneError::InvalidRadius {
                    sphere: i,
                    radius: sphere.radius,
                });
            }
        }

        Ok(())
    }
}
