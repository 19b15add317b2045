//! Ray-sphere intersection and nearest-hit selection.
//!
//! The scene is small, so every query is a linear scan over all spheres.

use orrery_core::{Material, Sphere, TextureData};
use orrery_math::{Ray, Vec3};

/// Roots at or below this distance are ignored so secondary rays do not
/// hit the surface they start on.
pub const HIT_EPSILON: f32 = 0.001;

/// Record of the nearest ray-sphere intersection.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub point: Vec3,
    /// Outward unit normal at the intersection
    pub normal: Vec3,
    /// Index of the hit sphere in the scene
    pub sphere_index: usize,
    /// Material of the hit sphere
    pub material: &'a Material,
    /// Paired texture, empty when untextured
    pub texture: &'a TextureData,
}

/// Intersect a ray with a sphere.
///
/// Solves `a*t^2 + b*t + c = 0` and returns the smallest root greater
/// than `HIT_EPSILON`. The ray direction does not need to be normalized.
pub fn intersect_sphere(ray: &Ray, sphere: &Sphere) -> Option<f32> {
    let oc = ray.origin - sphere.center;
    let a = ray.direction.dot(ray.direction);
    let b = 2.0 * oc.dot(ray.direction);
    let c = oc.dot(oc) - sphere.radius * sphere.radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();
    let near = (-b - sqrtd) / (2.0 * a);
    if near > HIT_EPSILON {
        return Some(near);
    }

    let far = (-b + sqrtd) / (2.0 * a);
    (far > HIT_EPSILON).then_some(far)
}

/// Find the closest sphere hit by the ray.
///
/// Returns the sphere's index and the hit distance. On ties the sphere
/// that comes first wins.
pub fn nearest_hit<'s>(
    ray: &Ray,
    spheres: impl IntoIterator<Item = (usize, &'s Sphere)>,
) -> Option<(usize, f32)> {
    spheres
        .into_iter()
        .filter_map(|(index, sphere)| intersect_sphere(ray, sphere).map(|t| (index, t)))
        .fold(None, |closest, (index, t)| match closest {
            Some((_, best)) if best <= t => closest,
            _ => Some((index, t)),
        })
}

/// True if any of `spheres` is hit closer than `max_t`.
pub fn occluded<'s>(
    ray: &Ray,
    spheres: impl IntoIterator<Item = (usize, &'s Sphere)>,
    max_t: f32,
) -> bool {
    spheres
        .into_iter()
        .any(|(_, sphere)| intersect_sphere(ray, sphere).is_some_and(|t| t < max_t))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere(center: Vec3, radius: f32) -> Sphere {
        Sphere::new(center, radius, 0)
    }

    #[test]
    fn test_hit_distance_outside() {
        let unit = sphere(Vec3::ZERO, 2.0);

        // Start at distance 7 along +X, aim at the center
        let ray = Ray::new(Vec3::new(7.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        let t = intersect_sphere(&ray, &unit).unwrap();
        assert!((t - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_hit_distance_unnormalized_direction() {
        let unit = sphere(Vec3::ZERO, 1.0);

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -4.0));
        let t = intersect_sphere(&ray, &unit).unwrap();
        assert!((ray.at(t) - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_miss_pointing_away() {
        let unit = sphere(Vec3::ZERO, 1.0);

        let ray = Ray::new(Vec3::new(3.0, 0.0, 0.0), Vec3::X);
        assert!(intersect_sphere(&ray, &unit).is_none());

        let ray = Ray::new(Vec3::new(3.0, 0.0, 0.0), Vec3::Y);
        assert!(intersect_sphere(&ray, &unit).is_none());
    }

    #[test]
    fn test_inside_returns_far_root() {
        let unit = sphere(Vec3::ZERO, 1.0);

        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let t = intersect_sphere(&ray, &unit).unwrap();
        assert!((t - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_root_within_epsilon_rejected() {
        let unit = sphere(Vec3::ZERO, 1.0);

        // Starting on the surface, leaving outward: both roots <= epsilon
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::Z);
        assert!(intersect_sphere(&ray, &unit).is_none());
    }

    #[test]
    fn test_nearest_hit_regardless_of_order() {
        let near = sphere(Vec3::new(0.0, 0.0, -5.0), 1.0);
        let far = sphere(Vec3::new(0.0, 0.0, -10.0), 2.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        let spheres = [near, far];
        let (index, t) = nearest_hit(&ray, spheres.iter().enumerate()).unwrap();
        assert_eq!(index, 0);
        assert!((t - 4.0).abs() < 1e-5);

        let spheres = [far, near];
        let (index, t) = nearest_hit(&ray, spheres.iter().enumerate()).unwrap();
        assert_eq!(index, 1);
        assert!((t - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_nearest_hit_none() {
        let spheres = [sphere(Vec3::new(0.0, 0.0, -5.0), 1.0)];
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);

        assert!(nearest_hit(&ray, spheres.iter().enumerate()).is_none());
        assert!(nearest_hit(&ray, std::iter::empty::<(usize, &Sphere)>()).is_none());
    }

    #[test]
    fn test_occluded_respects_max_t() {
        let blocker = [sphere(Vec3::new(0.0, 5.0, 0.0), 1.0)];
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);

        assert!(occluded(&ray, blocker.iter().enumerate(), 10.0));
        // Light closer than the blocker
        assert!(!occluded(&ray, blocker.iter().enumerate(), 3.0));
    }
}
