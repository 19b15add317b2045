//! Orrery Core - per-frame scene snapshot for the sphere ray tracer.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `Sphere`, `Material`, `MaterialKind`
//! - **Textures**: decoded `TextureData` and a disk-backed `TextureCache`
//!
//! A `Scene` is rebuilt by the caller every frame from whatever object
//! model it uses. The tracer only reads it.
//!
//! # Example
//!
//! ```ignore
//! use orrery_core::{Material, Scene, TextureCache};
//!
//! let mut cache = TextureCache::with_base_dir("assets");
//! let earth = cache.load("earth.png")?;
//!
//! let mut scene = Scene::new();
//! scene.add_sphere(Vec3::new(8.0, 0.0, 0.0), 0.6, Material::diffuse(Vec3::ONE), earth);
//! scene.validate()?;
//! ```

pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use scene::{
    Material, MaterialKind, Scene, SceneError, Sphere, DEFAULT_IOR, LIGHT_EMISSION_THRESHOLD,
};
pub use texture::{TextureCache, TextureData, TextureError, TextureResult, MISSING_TEXTURE_COLOR};

pub use orrery_math::{Ray, Vec3};
