use glam::{Mat4, Vec3};

/// Camera state handed to the tracer each frame.
///
/// The tracer only needs a world-space position and the view and
/// projection transforms; how the camera moves is up to the caller.
#[derive(Debug, Clone, Copy)]
pub struct CameraState {
    pub position: Vec3,
    pub view: Mat4,
    pub projection: Mat4,
}

impl CameraState {
    /// Create camera state from explicit transforms.
    pub fn new(position: Vec3, view: Mat4, projection: Mat4) -> Self {
        Self {
            position,
            view,
            projection,
        }
    }

    /// Build a right-handed perspective camera looking at `target`.
    ///
    /// `fov_y_degrees` is the vertical field of view; near and far planes
    /// are fixed at 0.1 and 100.
    pub fn look_at(position: Vec3, target: Vec3, fov_y_degrees: f32, aspect: f32) -> Self {
        let view = Mat4::look_at_rh(position, target, Vec3::Y);
        let projection = Mat4::perspective_rh_gl(fov_y_degrees.to_radians(), aspect, 0.1, 100.0);
        Self::new(position, view, projection)
    }

    /// Get the combined view-projection matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection * self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_look_at_creation() {
        let camera = CameraState::look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 45.0, 16.0 / 9.0);

        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 5.0));
        // View matrix should translate camera to origin
        assert!(camera.view.w_axis.z < 0.0);
    }

    #[test]
    fn test_projection_matrix() {
        let camera = CameraState::look_at(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 45.0, 16.0 / 9.0);

        // Projection matrix should have aspect ratio encoded
        assert!(camera.projection.x_axis.x != 0.0);
        assert!(camera.projection.x_axis.x < camera.projection.y_axis.y);
    }

    #[test]
    fn test_view_projection_maps_target_to_center() {
        let camera = CameraState::look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 45.0, 1.0);

        let clip = camera.view_projection_matrix() * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
    }
}
