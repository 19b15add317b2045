//! Recursive shading.
//!
//! Implements Whitted-style ray tracing with:
//! - Mirror and refractive bounces bounded by a depth counter
//! - Phong-like direct lighting from emissive spheres
//! - Binary shadows toward each light's center

use orrery_core::{MaterialKind, Scene, Sphere};
use orrery_math::{Ray, Vec3};

use crate::environment::{spherical_uv, Environment};
use crate::intersect::{nearest_hit, occluded, HitRecord, HIT_EPSILON};

/// Fraction of the albedo always visible, even in full shadow.
pub const AMBIENT_STRENGTH: f32 = 0.1;

/// Scale applied to the Lambert term of each light.
pub const DIFFUSE_STRENGTH: f32 = 0.5;

/// Scale applied to the white Phong highlight of each light.
pub const SPECULAR_STRENGTH: f32 = 0.5;

/// Phong exponent.
pub const SHININESS: f32 = 32.0;

/// Refracted directions shorter than this mean total internal reflection.
const MIN_REFRACTION_LENGTH: f32 = 1e-4;

/// Traces rays through one frame's scene.
///
/// Holds only shared references, so a single tracer can be used from
/// every rayon worker at once.
pub struct Tracer<'a> {
    scene: &'a Scene,
    environment: &'a Environment,
    /// Spheres whose material index resolves
    live: Vec<usize>,
}

impl<'a> Tracer<'a> {
    /// Create a tracer for `scene`.
    ///
    /// Spheres with an out-of-range material index are a caller bug:
    /// debug builds panic, release builds leave the sphere out.
    pub fn new(scene: &'a Scene, environment: &'a Environment) -> Self {
        let live = (0..scene.spheres.len())
            .filter(|&index| {
                let resolves = scene.surface(index).is_some();
                debug_assert!(
                    resolves,
                    "sphere {} has material index {} outside the material/texture arrays",
                    index, scene.spheres[index].material_index
                );
                resolves
            })
            .collect();

        Self {
            scene,
            environment,
            live,
        }
    }

    /// Compute the color seen along `ray`.
    ///
    /// `depth` is the number of mirror/refraction bounces still allowed.
    /// Once it reaches zero every surface is shaded with direct lighting.
    pub fn trace(&self, ray: &Ray, depth: u32) -> Vec3 {
        let Some(hit) = self.closest_hit(ray) else {
            return self.environment.sample(ray.direction);
        };

        let albedo = if hit.texture.is_empty() {
            hit.material.color
        } else {
            let (u, v) = spherical_uv(hit.normal);
            hit.texture.sample(u, v)
        };

        // Lights are self-lit and never shaded
        if hit.material.is_light() {
            return hit.material.emission * albedo;
        }

        match hit.material.kind {
            MaterialKind::Refractive { ior } if depth > 0 => {
                let direction = refract_direction(ray.direction, hit.normal, ior);
                let bounced = Ray::offset(hit.point, direction, HIT_EPSILON, direction);
                albedo * self.trace(&bounced, depth - 1)
            }
            MaterialKind::Specular if depth > 0 => {
                let direction = reflect(ray.direction, hit.normal);
                let bounced = Ray::offset(hit.point, hit.normal, HIT_EPSILON, direction);
                albedo * self.trace(&bounced, depth - 1)
            }
            _ => self.direct_lighting(ray, &hit, albedo),
        }
    }

    /// Find the nearest sphere along `ray`.
    pub fn closest_hit(&self, ray: &Ray) -> Option<HitRecord<'a>> {
        let (sphere_index, t) = nearest_hit(ray, self.spheres())?;
        let sphere = &self.scene.spheres[sphere_index];
        let (material, texture) = self.scene.surface(sphere_index)?;

        let point = ray.at(t);
        Some(HitRecord {
            t,
            point,
            normal: (point - sphere.center).normalize(),
            sphere_index,
            material,
            texture,
        })
    }

    /// Ambient plus diffuse and specular from every unshadowed light.
    fn direct_lighting(&self, ray: &Ray, hit: &HitRecord, albedo: Vec3) -> Vec3 {
        let view_dir = (-ray.direction).normalize();
        let shadow_origin = hit.point + hit.normal * HIT_EPSILON;

        let mut color = AMBIENT_STRENGTH * albedo;

        for (light_index, light_sphere) in self.spheres() {
            if light_index == hit.sphere_index {
                continue;
            }
            let Some((light, _)) = self.scene.surface(light_index) else {
                continue;
            };
            if !light.is_light() {
                continue;
            }

            let to_light = light_sphere.center - hit.point;
            let distance = to_light.length();
            let light_dir = to_light.normalize_or_zero();

            let shadow_ray = Ray::new(shadow_origin, light_dir);
            let blockers = self
                .spheres()
                .filter(|&(index, _)| index != hit.sphere_index && index != light_index);
            if occluded(&shadow_ray, blockers, distance) {
                continue;
            }

            let diffuse =
                hit.normal.dot(light_dir).max(0.0) * albedo * light.emission * DIFFUSE_STRENGTH;

            let reflect_dir = reflect(-light_dir, hit.normal);
            let spec = view_dir.dot(reflect_dir).max(0.0).powf(SHININESS);
            let specular = Vec3::splat(SPECULAR_STRENGTH * spec);

            color += diffuse + specular;
        }

        color.clamp(Vec3::ZERO, Vec3::ONE)
    }

    fn spheres(&self) -> impl Iterator<Item = (usize, &'a Sphere)> + '_ {
        let scene: &'a Scene = self.scene;
        self.live.iter().map(move |&index| (index, &scene.spheres[index]))
    }
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Direction of a ray refracted at a sphere surface.
///
/// `outward_normal` points out of the sphere. Entering uses
/// `eta = 1 / ior`; leaving flips the normal and uses `eta = ior`. When no
/// transmitted ray exists the mirror reflection about the (possibly
/// flipped) normal is returned. A non-positive `ior` is treated as 1.
pub fn refract_direction(incident: Vec3, outward_normal: Vec3, ior: f32) -> Vec3 {
    let ior = if ior > 0.0 { ior } else { 1.0 };
    let incident = incident.normalize();

    let (normal, eta) = if incident.dot(outward_normal) > 0.0 {
        (-outward_normal, ior)
    } else {
        (outward_normal, 1.0 / ior)
    };

    let refracted = refract(incident, normal, eta);
    if refracted.length() > MIN_REFRACTION_LENGTH {
        refracted
    } else {
        reflect(incident, normal)
    }
}

/// Snell refraction of unit `incident` through unit `normal`.
///
/// Returns zero on total internal reflection.
#[inline]
fn refract(incident: Vec3, normal: Vec3, eta: f32) -> Vec3 {
    let cos_i = normal.dot(incident);
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        Vec3::ZERO
    } else {
        eta * incident - (eta * cos_i + k.sqrt()) * normal
    }
}
