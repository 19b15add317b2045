//! Equirectangular environment lookup for rays that leave the scene.

use std::f32::consts::{PI, TAU};
use std::sync::Arc;

use orrery_core::TextureData;
use orrery_math::Vec3;

/// Default multiplier applied to environment samples.
pub const DEFAULT_ENVIRONMENT_INTENSITY: f32 = 1.5;

/// Map a unit direction (or sphere normal) to equirectangular UVs.
///
/// `u = 0.5 + atan2(z, x) / 2pi`, `v = 0.5 - asin(y) / pi`.
#[inline]
pub fn spherical_uv(direction: Vec3) -> (f32, f32) {
    let u = 0.5 + direction.z.atan2(direction.x) / TAU;
    let v = 0.5 - direction.y.clamp(-1.0, 1.0).asin() / PI;
    (u, v)
}

/// Background seen by rays that miss every sphere.
#[derive(Debug, Clone)]
pub struct Environment {
    texture: Option<Arc<TextureData>>,
    pub intensity: f32,
}

impl Environment {
    /// An unset environment (black background) with the given intensity.
    pub fn new(intensity: f32) -> Self {
        Self {
            texture: None,
            intensity,
        }
    }

    /// Use `texture` as the environment map.
    ///
    /// An empty or zero-sized texture leaves the environment unset.
    pub fn set_texture(&mut self, texture: Arc<TextureData>) {
        if texture.is_empty() {
            log::debug!("Ignoring empty environment texture");
            self.texture = None;
        } else {
            log::debug!(
                "Environment texture set ({}x{}x{})",
                texture.width,
                texture.height,
                texture.channels
            );
            self.texture = Some(texture);
        }
    }

    /// Remove the environment map; misses go back to black.
    pub fn clear(&mut self) {
        self.texture = None;
    }

    pub fn is_set(&self) -> bool {
        self.texture.is_some()
    }

    /// Radiance arriving along `direction` from the environment.
    pub fn sample(&self, direction: Vec3) -> Vec3 {
        match &self.texture {
            None => Vec3::ZERO,
            Some(texture) => {
                let (u, v) = spherical_uv(direction.normalize_or_zero());
                texture.sample(u, v) * self.intensity
            }
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(DEFAULT_ENVIRONMENT_INTENSITY)
    }
}
