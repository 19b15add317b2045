use crate::Vec3;

/// A ray in 3D space with an origin and a direction.
///
/// The direction does not have to be unit length; intersection code
/// accounts for `direction.length_squared()` where it matters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Create a ray that starts `bias` units away from `surface_point`
    /// along `offset_direction`.
    ///
    /// Used when spawning secondary rays so they do not immediately
    /// re-hit the surface they leave.
    pub fn offset(surface_point: Vec3, offset_direction: Vec3, bias: f32, direction: Vec3) -> Self {
        Self::new(surface_point + offset_direction * bias, direction)
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_creation() {
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let direction = Vec3::new(0.0, 1.0, 0.0);
        let ray = Ray::new(origin, direction);

        assert_eq!(ray.origin, origin);
        assert_eq!(ray.direction, direction);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_offset() {
        let ray = Ray::offset(Vec3::new(1.0, 0.0, 0.0), Vec3::X, 0.5, Vec3::Y);

        assert_eq!(ray.origin, Vec3::new(1.5, 0.0, 0.0));
        assert_eq!(ray.direction, Vec3::Y);
    }
}
