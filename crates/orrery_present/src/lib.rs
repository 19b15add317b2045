//! Orrery Present - upload traced frames to a wgpu texture.
//!
//! `DisplayTexture` implements `FramePresenter`, so a `FrameCompositor`
//! can push every finished frame straight to the GPU. Drawing the texture
//! (usually as a full-screen quad) is left to the caller, who binds
//! `DisplayTexture::view()`.

use std::sync::Arc;

use anyhow::Result;
use orrery_tracer::{FrameBuffer, FramePresenter};
use wgpu::{
    Device, Extent3d, ImageCopyTexture, ImageDataLayout, Origin3d, Queue, Texture, TextureAspect,
    TextureDescriptor, TextureDimension, TextureFormat, TextureUsages, TextureView,
    TextureViewDescriptor,
};

/// GPU format of the display texture.
pub const DISPLAY_FORMAT: TextureFormat = TextureFormat::Rgba8Unorm;

/// A GPU texture that mirrors the compositor's frame buffer.
pub struct DisplayTexture {
    device: Arc<Device>,
    queue: Arc<Queue>,
    texture: Texture,
    view: TextureView,
    size: (u32, u32),
    /// RGBA staging copy of the last frame
    staging: Vec<[u8; 4]>,
}

impl DisplayTexture {
    /// Create a `width` x `height` display texture on an existing device.
    pub fn from_device(device: Arc<Device>, queue: Arc<Queue>, width: u32, height: u32) -> Self {
        let (texture, view) = create_texture(&device, width, height);
        Self {
            device,
            queue,
            texture,
            view,
            size: (width, height),
            staging: Vec::new(),
        }
    }

    /// Create a display texture on a device of its own (no surface).
    pub async fn headless(width: u32, height: u32) -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("Failed to find suitable GPU adapter"))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Orrery Present Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        log::debug!("Headless display device on {:?}", adapter.get_info().backend);
        Ok(Self::from_device(
            Arc::new(device),
            Arc::new(queue),
            width,
            height,
        ))
    }

    /// Blocking wrapper around [`DisplayTexture::headless`].
    pub fn headless_blocking(width: u32, height: u32) -> Result<Self> {
        pollster::block_on(Self::headless(width, height))
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    /// View for binding in the caller's display pass.
    pub fn view(&self) -> &TextureView {
        &self.view
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }
}

impl FramePresenter for DisplayTexture {
    fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == self.size {
            return;
        }
        let (texture, view) = create_texture(&self.device, width, height);
        self.texture = texture;
        self.view = view;
        self.size = (width, height);
        log::debug!("Display texture recreated at {}x{}", width, height);
    }

    fn present(&mut self, frame: &FrameBuffer) {
        if (frame.width(), frame.height()) != self.size {
            log::warn!(
                "Skipping {}x{} frame, display texture is {}x{}",
                frame.width(),
                frame.height(),
                self.size.0,
                self.size.1
            );
            return;
        }

        expand_rgb(frame.as_bytes(), &mut self.staging);
        let (width, height) = self.size;

        self.queue.write_texture(
            ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: Origin3d::ZERO,
                aspect: TextureAspect::All,
            },
            bytemuck::cast_slice(&self.staging),
            ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            self.texture.size(),
        );
    }
}

fn create_texture(device: &Device, width: u32, height: u32) -> (Texture, TextureView) {
    let texture = device.create_texture(&TextureDescriptor {
        label: Some("Orrery Display Texture"),
        size: Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: DISPLAY_FORMAT,
        usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
        view_formats: &[],
    });
    let view = texture.create_view(&TextureViewDescriptor::default());
    (texture, view)
}

/// Expand packed RGB bytes into opaque RGBA texels, reusing `out`.
fn expand_rgb(rgb: &[u8], out: &mut Vec<[u8; 4]>) {
    out.clear();
    out.extend(rgb.chunks_exact(3).map(|p| [p[0], p[1], p[2], 255]));
}
