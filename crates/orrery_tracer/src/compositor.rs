//! Frame compositor: owns the output buffer and runs the per-pixel sweep.

use std::sync::Arc;
use std::time::Instant;

use orrery_core::{Scene, TextureData};
use orrery_math::{CameraState, Vec3};
use rayon::prelude::*;

use crate::camera::RayGenerator;
use crate::config::TracerConfig;
use crate::environment::Environment;
use crate::error::TracerError;
use crate::shading::Tracer;

/// Bytes per pixel in a `FrameBuffer`.
const CHANNELS: usize = 3;

/// Receives finished frames for display.
///
/// `resize` is always called before the first `present` at a new size.
pub trait FramePresenter: Send {
    fn resize(&mut self, width: u32, height: u32);
    fn present(&mut self, frame: &FrameBuffer);
}

/// Convert a linear color to 8-bit RGB.
///
/// Components are clamped to [0, 1] and rounded to the nearest byte.
#[inline]
pub fn color_to_rgb(color: Vec3) -> [u8; 3] {
    let c = color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0;
    [c.x.round() as u8, c.y.round() as u8, c.z.round() as u8]
}

/// Packed RGB8 frame, row-major, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl FrameBuffer {
    /// A black frame of the given size.
    pub fn new(width: u32, height: u32) -> Result<Self, TracerError> {
        if width == 0 || height == 0 {
            return Err(TracerError::InvalidDimensions { width, height });
        }

        Ok(Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * CHANNELS],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw bytes, `width * height * 3` long.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// RGB of pixel (x, y).
    ///
    /// # Panics
    /// If (x, y) is outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let offset = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [
            self.pixels[offset],
            self.pixels[offset + 1],
            self.pixels[offset + 2],
        ]
    }

    /// Copy into an `image` buffer (for saving to disk).
    pub fn to_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| image::Rgb(self.pixel(x, y)))
    }
}

/// Renders scene snapshots into a frame buffer and hands them to a presenter.
pub struct FrameCompositor {
    frame: FrameBuffer,
    config: TracerConfig,
    environment: Environment,
    presenter: Option<Box<dyn FramePresenter>>,
}

impl FrameCompositor {
    /// Create a compositor with a `width` x `height` frame and no presenter.
    pub fn new(width: u32, height: u32, config: TracerConfig) -> Result<Self, TracerError> {
        Ok(Self {
            frame: FrameBuffer::new(width, height)?,
            environment: Environment::new(config.environment_intensity),
            config,
            presenter: None,
        })
    }

    /// Attach a presenter, sized to the current frame.
    pub fn with_presenter(mut self, mut presenter: Box<dyn FramePresenter>) -> Self {
        presenter.resize(self.frame.width, self.frame.height);
        self.presenter = Some(presenter);
        self
    }

    pub fn config(&self) -> &TracerConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: TracerConfig) {
        self.environment.intensity = config.environment_intensity;
        self.config = config;
    }

    /// Use `texture` as the environment map for rays that miss.
    pub fn set_environment(&mut self, texture: Arc<TextureData>) {
        self.environment.set_texture(texture);
    }

    pub fn clear_environment(&mut self) {
        self.environment.clear();
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// The most recently rendered frame.
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Reallocate the frame buffer (and the presenter's target).
    ///
    /// Resizing to the current size does nothing.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), TracerError> {
        if width == self.frame.width && height == self.frame.height {
            return Ok(());
        }

        self.frame = FrameBuffer::new(width, height)?;
        if let Some(presenter) = self.presenter.as_mut() {
            presenter.resize(width, height);
        }
        log::debug!("Frame resized to {}x{}", width, height);
        Ok(())
    }

    /// Trace every pixel of `scene` as seen from `camera`.
    pub fn render(
        &mut self,
        scene: &Scene,
        camera: &CameraState,
    ) -> Result<&FrameBuffer, TracerError> {
        if let Err(e) = scene.validate() {
            log::warn!("Rendering inconsistent scene: {}", e);
        }

        let width = self.frame.width;
        let height = self.frame.height;
        let rays = RayGenerator::new(camera, width, height)?;
        let tracer = Tracer::new(scene, &self.environment);
        let max_depth = self.config.max_depth;

        let start = Instant::now();
        let row_len = width as usize * CHANNELS;

        self.frame
            .pixels
            .par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.chunks_exact_mut(CHANNELS).enumerate() {
                    let ray = rays.primary_ray(x as u32, y as u32);
                    let color = tracer.trace(&ray, max_depth);
                    pixel.copy_from_slice(&color_to_rgb(color));
                }
            });

        log::debug!(
            "Traced {}x{} frame ({} spheres) in {:.2?}",
            width,
            height,
            scene.len(),
            start.elapsed()
        );

        if let Some(presenter) = self.presenter.as_mut() {
            presenter.present(&self.frame);
        }

        Ok(&self.frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_core::Material;
    use orrery_math::Mat4;
    use std::sync::Mutex;

    #[derive(Debug, PartialEq)]
    enum Event {
        Resize(u32, u32),
        Present(u32, u32, usize),
    }

    struct RecordingPresenter {
        events: Arc<Mutex<Vec<Event>>>,
    }

    impl FramePresenter for RecordingPresenter {
        fn resize(&mut self, width: u32, height: u32) {
            self.events.lock().unwrap().push(Event::Resize(width, height));
        }

        fn present(&mut self, frame: &FrameBuffer) {
            self.events.lock().unwrap().push(Event::Present(
                frame.width(),
                frame.height(),
                frame.as_bytes().len(),
            ));
        }
    }

    fn emissive_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add_sphere(
            Vec3::ZERO,
            1.0,
            Material::emissive(Vec3::new(1.0, 0.5, 0.25), Vec3::ONE),
            Arc::new(TextureData::empty()),
        );
        scene
    }

    fn camera(aspect: f32) -> CameraState {
        CameraState::look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 45.0, aspect)
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            FrameCompositor::new(0, 4, TracerConfig::default()),
            Err(TracerError::InvalidDimensions { width: 0, height: 4 })
        ));

        let mut compositor = FrameCompositor::new(4, 4, TracerConfig::default()).unwrap();
        assert_eq!(
            compositor.resize(4, 0),
            Err(TracerError::InvalidDimensions { width: 4, height: 0 })
        );
        // Failed resize keeps the old buffer
        assert_eq!(compositor.frame().as_bytes().len(), 4 * 4 * 3);
    }

    #[test]
    fn test_resize_then_render() {
        let mut compositor = FrameCompositor::new(8, 8, TracerConfig::default()).unwrap();
        compositor.resize(17, 9).unwrap();

        let frame = compositor.render(&emissive_scene(), &camera(17.0 / 9.0)).unwrap();
        assert_eq!(frame.width(), 17);
        assert_eq!(frame.height(), 9);
        assert_eq!(frame.as_bytes().len(), 17 * 9 * 3);
    }

    #[test]
    fn test_presenter_follows_resize_and_render() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let presenter = RecordingPresenter {
            events: Arc::clone(&events),
        };

        let mut compositor = FrameCompositor::new(4, 2, TracerConfig::default())
            .unwrap()
            .with_presenter(Box::new(presenter));
        compositor.resize(4, 2).unwrap(); // same size, no-op
        compositor.resize(6, 3).unwrap();
        compositor.render(&emissive_scene(), &camera(2.0)).unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                Event::Resize(4, 2),
                Event::Resize(6, 3),
                Event::Present(6, 3, 6 * 3 * 3),
            ]
        );
    }

    #[test]
    fn test_render_emissive_sphere() {
        let mut compositor = FrameCompositor::new(8, 8, TracerConfig::default()).unwrap();
        let frame = compositor.render(&emissive_scene(), &camera(1.0)).unwrap();

        // Center pixel looks straight down -Z at the sphere
        assert_eq!(frame.pixel(4, 4), [255, 128, 64]);
        // Corner ray misses, no environment set
        assert_eq!(frame.pixel(0, 0), [0, 0, 0]);
    }

    #[test]
    fn test_color_to_rgb() {
        assert_eq!(color_to_rgb(Vec3::new(-1.0, 0.5, 2.0)), [0, 128, 255]);
        assert_eq!(color_to_rgb(Vec3::ZERO), [0, 0, 0]);
        assert_eq!(color_to_rgb(Vec3::ONE), [255, 255, 255]);
    }

    #[test]
    fn test_to_image() {
        let frame = FrameBuffer::new(5, 3).unwrap();
        let image = frame.to_image();
        assert_eq!(image.dimensions(), (5, 3));
        assert_eq!(image.as_raw().len(), frame.as_bytes().len());
    }

    #[test]
    fn test_singular_camera_rejected() {
        let mut compositor = FrameCompositor::new(4, 4, TracerConfig::default()).unwrap();
        let broken = CameraState::new(Vec3::ZERO, Mat4::ZERO, camera(1.0).projection);

        assert_eq!(
            compositor.render(&emissive_scene(), &broken).err(),
            Some(TracerError::SingularTransform("View"))
        );
    }

    #[test]
    fn test_set_config_updates_environment_intensity() {
        let mut compositor = FrameCompositor::new(2, 2, TracerConfig::default()).unwrap();
        compositor.set_config(TracerConfig {
            max_depth: 2,
            environment_intensity: 0.5,
        });

        assert_eq!(compositor.config().max_depth, 2);
        assert_eq!(compositor.environment().intensity, 0.5);
    }
}
