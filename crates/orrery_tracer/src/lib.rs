//! Orrery Tracer - CPU ray tracing of a per-frame sphere scene.
//!
//! Whitted-style recursive tracing: analytic ray-sphere intersection,
//! mirror and refractive bounces, Phong-like direct lighting from emissive
//! spheres with hard shadows, textured albedo and an equirectangular
//! environment for rays that leave the scene.
//!
//! The `FrameCompositor` owns the output buffer and traces every pixel in
//! parallel with rayon.

mod camera;
mod compositor;
mod config;
mod environment;
mod error;
mod intersect;
mod shading;

pub use camera::RayGenerator;
pub use compositor::{color_to_rgb, FrameBuffer, FrameCompositor, FramePresenter};
pub use config::TracerConfig;
pub use environment::{spherical_uv, Environment, DEFAULT_ENVIRONMENT_INTENSITY};
pub use error::TracerError;
pub use intersect::{intersect_sphere, nearest_hit, occluded, HitRecord, HIT_EPSILON};
pub use shading::{
    reflect, refract_direction, Tracer, AMBIENT_STRENGTH, DIFFUSE_STRENGTH, SHININESS,
    SPECULAR_STRENGTH,
};

/// Re-export the scene and math types callers need to drive a render
pub use orrery_core::{Material, MaterialKind, Scene, Sphere, TextureData};
pub use orrery_math::{CameraState, Mat4, Ray, Vec3};
