//! Decoded textures and a small on-disk texture cache.
//!
//! The tracer samples textures straight from their decoded 8-bit bytes,
//! keeping whatever channel count the image had on disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{DynamicImage, GenericImageView};
use orrery_math::Vec3;
use thiserror::Error;

/// Color returned when sampling a texture that has no pixel data.
///
/// Full-intensity magenta, so a missing texture is obvious on screen.
pub const MISSING_TEXTURE_COLOR: Vec3 = Vec3::new(1.0, 0.0, 1.0);

/// Errors that can occur while building or loading a texture.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Unsupported channel count: {0} (expected 1 to 4)")]
    InvalidChannels(u8),

    #[error("Texture data is {actual} bytes, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Failed to load texture: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A decoded texture, one byte per channel.
///
/// `data` holds `width * height * channels` bytes in row-major order.
/// A texture with no data is the "no texture" marker; materials paired
/// with it fall back to their flat color.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub data: Vec<u8>,
}

impl TextureData {
    /// Create a texture from already decoded bytes.
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> TextureResult<Self> {
        if !(1..=4).contains(&channels) {
            return Err(TextureError::InvalidChannels(channels));
        }

        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(TextureError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// The "no texture" marker.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a solid color texture (1x1, RGB).
    pub fn solid_color(color: Vec3) -> Self {
        let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self {
            width: 1,
            height: 1,
            channels: 3,
            data: vec![to_byte(color.x), to_byte(color.y), to_byte(color.z)],
        }
    }

    /// Convert a decoded image, keeping its channel count.
    ///
    /// Grayscale stays 1 channel, grayscale+alpha 2, RGB 3 and
    /// everything else is widened to RGBA.
    pub fn from_image(img: DynamicImage) -> Self {
        let (width, height) = img.dimensions();
        let (channels, data) = match img.color().channel_count() {
            1 => (1, img.into_luma8().into_raw()),
            2 => (2, img.into_luma_alpha8().into_raw()),
            3 => (3, img.into_rgb8().into_raw()),
            _ => (4, img.into_rgba8().into_raw()),
        };

        Self {
            width,
            height,
            channels,
            data,
        }
    }

    /// True when there is nothing to sample.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() || self.width == 0 || self.height == 0
    }

    /// Sample the texture at UV coordinates (nearest texel, repeat addressing).
    ///
    /// UVs wrap into [0, 1) with `u - floor(u)`. One- and two-channel
    /// textures replicate the first channel into RGB; alpha is ignored.
    pub fn sample(&self, u: f32, v: f32) -> Vec3 {
        if self.is_empty() {
            return MISSING_TEXTURE_COLOR;
        }

        let u = u - u.floor();
        let v = v - v.floor();

        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);

        let channels = self.channels as usize;
        let index = (y as usize * self.width as usize + x as usize) * channels;
        let texel = match self.data.get(index..index + channels) {
            Some(texel) if channels > 0 => texel,
            // Fields disagree with the data length
            _ => return MISSING_TEXTURE_COLOR,
        };

        let r = texel[0] as f32 / 255.0;
        match channels {
            1 | 2 => Vec3::splat(r),
            _ => Vec3::new(r, texel[1] as f32 / 255.0, texel[2] as f32 / 255.0),
        }
    }

    /// Get total size in bytes.
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

/// Cache for textures loaded from disk.
///
/// Scenes are rebuilt every frame, so textures are decoded once here and
/// handed out as shared `Arc`s.
#[derive(Default)]
pub struct TextureCache {
    textures: HashMap<String, Arc<TextureData>>,
    base_dir: Option<PathBuf>,
}

impl TextureCache {
    /// Create a new empty texture cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a texture cache that resolves relative paths against `base_dir`.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load a texture from file, using the cache if available.
    pub fn load(&mut self, path: &str) -> TextureResult<Arc<TextureData>> {
        if let Some(texture) = self.textures.get(path) {
            return Ok(texture.clone());
        }

        let full_path = self.resolve_path(path);
        let texture = Arc::new(load_texture_file(&full_path)?);
        self.textures.insert(path.to_string(), texture.clone());

        log::debug!(
            "Loaded texture: {} ({}x{}x{}, {:.1} KB)",
            path,
            texture.width,
            texture.height,
            texture.channels,
            texture.size_bytes() as f32 / 1024.0
        );

        Ok(texture)
    }

    /// Get a cached texture without loading.
    pub fn get(&self, path: &str) -> Option<Arc<TextureData>> {
        self.textures.get(path).cloned()
    }

    /// Get the number of cached textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

fn load_texture_file(path: &Path) -> TextureResult<TextureData> {
    let img = image::open(path)?;
    Ok(TextureData::from_image(img))
}
