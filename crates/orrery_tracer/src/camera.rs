//! Primary ray generation from the camera's inverse transforms.

use orrery_math::{CameraState, Mat4, Ray, Vec3, Vec4};

use crate::TracerError;

/// Turns pixel coordinates into world-space primary rays.
///
/// The inverse view and projection are computed once per frame.
#[derive(Debug, Clone, Copy)]
pub struct RayGenerator {
    origin: Vec3,
    inverse_view: Mat4,
    inverse_projection: Mat4,
    width: u32,
    height: u32,
}

impl RayGenerator {
    /// Prepare ray generation for a `width` x `height` image.
    pub fn new(camera: &CameraState, width: u32, height: u32) -> Result<Self, TracerError> {
        if width == 0 || height == 0 {
            return Err(TracerError::InvalidDimensions { width, height });
        }

        Ok(Self {
            origin: camera.position,
            inverse_view: checked_inverse(camera.view, "View")?,
            inverse_projection: checked_inverse(camera.projection, "Projection")?,
            width,
            height,
        })
    }

    /// World-space unit direction through pixel (x, y).
    ///
    /// Row 0 is the top of the image.
    pub fn direction(&self, x: u32, y: u32) -> Vec3 {
        let ndc_x = 2.0 * x as f32 / self.width as f32 - 1.0;
        let ndc_y = 1.0 - 2.0 * y as f32 / self.height as f32;

        let eye = self.inverse_projection * Vec4::new(ndc_x, ndc_y, -1.0, 1.0);
        // Forward in eye space, w = 0 so the view translation is ignored
        let eye = Vec4::new(eye.x, eye.y, -1.0, 0.0);

        (self.inverse_view * eye).truncate().normalize()
    }

    /// Primary ray from the camera position through pixel (x, y).
    #[inline]
    pub fn primary_ray(&self, x: u32, y: u32) -> Ray {
        Ray::new(self.origin, self.direction(x, y))
    }
}

fn checked_inverse(matrix: Mat4, name: &'static str) -> Result<Mat4, TracerError> {
    let det = matrix.determinant();
    if det == 0.0 || !det.is_finite() {
        return Err(TracerError::SingularTransform(name));
    }

    let inverse = matrix.inverse();
    if !inverse.is_finite() {
        return Err(TracerError::SingularTransform(name));
    }
    Ok(inverse)
}
