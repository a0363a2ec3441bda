//! Sphere primitive for ray tracing.

use std::fmt;

use crate::{
    error::{SceneError, SceneResult},
    hittable::{Hittable, Intersection, LocalSurface},
    plane::check_finite,
    Material,
};
use pathspace_math::{Float, Ray, Vec3f};

/// A sphere primitive.
#[derive(Clone, Debug)]
pub struct Sphere {
    center: Vec3f,
    radius: Float,
    material: Material,
}

impl Sphere {
    /// Create a new sphere. The radius must be positive and finite.
    pub fn new(center: Vec3f, radius: Float, material: Material) -> SceneResult<Self> {
        check_finite("sphere", "pos", center)?;
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(SceneError::InvalidRadius {
                shape: "sphere",
                radius,
            });
        }

        Ok(Self {
            center,
            radius,
            material,
        })
    }

    pub fn center(&self) -> Vec3f {
        self.center
    }

    pub fn radius(&self) -> Float {
        self.radius
    }

    pub fn material(&self) -> &Material {
        &self.material
    }
}

impl Hittable for Sphere {
    fn intersect(&self, ray: &Ray) -> Intersection<'_> {
        // Move sphere to origin. With a unit direction, |x + t d| = R gives
        // t^2 + 2pt + q = 0 where p = x.d, q = |x|^2 - R^2
        let x = ray.origin - self.center;
        let p = x.dot(ray.direction);
        let q = x.length_squared() - self.radius * self.radius;
        let discriminant = p * p - q;

        if discriminant < 0.0 {
            return Intersection::miss();
        }
        let sqrtd = discriminant.sqrt();

        if q >= 0.0 {
            // Outside: both roots share a sign, take the near one
            let t = -p - sqrtd;
            if t <= 0.0 {
                return Intersection::miss();
            }
            let y = x + t * ray.direction;
            Intersection::hit_at(
                t,
                LocalSurface {
                    pos: y + self.center,
                    normal: y.normalize(),
                    material: &self.material,
                },
            )
        } else {
            // Inside: the far root is always positive, exit through the shell
            let t = -p + sqrtd;
            let y = x + t * ray.direction;
            Intersection::hit_at(
                t,
                LocalSurface {
                    pos: y + self.center,
                    normal: -y.normalize(),
                    material: &self.material,
                },
            )
        }
    }
}

impl fmt::Display for Sphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sphere(pos: {}, rad: {})", self.center, self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sampler;

    fn sphere() -> Sphere {
        Sphere::new(
            Vec3f::new(0.0, 0.0, -1.0),
            0.5,
            Material::diffuse(Vec3f::splat(0.5)),
        )
        .unwrap()
    }

    #[test]
    fn test_sphere_hit() {
        let ray = Ray::new(Vec3f::ZERO, Vec3f::NEG_Z);
        let ball = sphere();
        let hit = ball.intersect(&ray);

        assert!(hit.hit());
        assert!((hit.dist - 0.5).abs() < 1e-12); // Should hit at t=0.5
        assert_eq!(hit.surface.unwrap().normal, Vec3f::Z);
    }

    #[test]
    fn test_sphere_miss() {
        // Ray pointing away from sphere
        let ray = Ray::new(Vec3f::ZERO, Vec3f::Y);
        assert!(!sphere().intersect(&ray).hit());

        // Sphere behind the origin
        let ray = Ray::new(Vec3f::ZERO, Vec3f::Z);
        assert!(!sphere().intersect(&ray).hit());
    }

    #[test]
    fn test_sphere_distance_from_outside() {
        let center = Vec3f::new(1.0, -2.0, 3.0);
        let radius = 0.75;
        let s = Sphere::new(center, radius, Material::default()).unwrap();
        let mut sampler = Sampler::new(31);

        for _ in 0..500 {
            // Origins strictly outside, aimed at the center
            let origin = center + sampler.sample_sphere() * sampler.range(1.0, 20.0);
            let ray = Ray::towards(origin, center).unwrap();
            let hit = s.intersect(&ray);

            assert!(hit.hit());
            let expected = (origin - center).length() - radius;
            assert!(
                (hit.dist - expected).abs() < 1e-9,
                "dist {} expected {}",
                hit.dist,
                expected
            );
        }
    }

    #[test]
    fn test_sphere_inside_always_hits_with_inward_normal() {
        let center = Vec3f::new(0.0, 1.0, 0.0);
        let s = Sphere::new(center, 2.0, Material::default()).unwrap();
        let mut sampler = Sampler::new(32);

        for _ in 0..2000 {
            let origin = center + sampler.sample_sphere() * sampler.range(0.0, 1.9);
            let ray = Ray::new(origin, sampler.sample_sphere());
            let hit = s.intersect(&ray);

            assert!(hit.hit());
            assert!(hit.dist > 0.0);
            let surface = hit.surface.unwrap();
            let outward = (surface.pos - center).normalize();
            assert!(surface.normal.dot(outward) < -0.999);
            assert!(((surface.pos - center).length() - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_sphere_invalid_radius() {
        let result = Sphere::new(Vec3f::ZERO, 0.0, Material::default());
        assert_eq!(
            result.unwrap_err(),
            SceneError::InvalidRadius {
                shape: "sphere",
                radius: 0.0
            }
        );
    }
}
