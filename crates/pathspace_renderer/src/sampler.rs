//! Random sampling for path tracing.
//!
//! Each render thread owns one `Sampler`; nothing here is shared.

use pathspace_math::{Float, Vec2f, Vec3f};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use std::f64::consts::PI;

/// Seeded source of uniform and normal samples.
#[derive(Clone, Debug)]
pub struct Sampler {
    rng: StdRng,
}

impl Sampler {
    /// Create a deterministic sampler from a seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a sampler seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Uniform sample in [0, 1).
    #[inline]
    pub fn unit(&mut self) -> Float {
        self.rng.gen()
    }

    /// Two independent uniform samples in [0, 1).
    #[inline]
    pub fn unit2d(&mut self) -> Vec2f {
        Vec2f::new(self.unit(), self.unit())
    }

    /// Uniform sample in [a, b).
    #[inline]
    pub fn range(&mut self, a: Float, b: Float) -> Float {
        a + self.unit() * (b - a)
    }

    /// Standard normal sample (mean 0, variance 1).
    #[inline]
    pub fn normal(&mut self) -> Float {
        self.rng.sample(StandardNormal)
    }

    /// Isotropic Gaussian vector. Its direction is uniform on the sphere.
    pub fn sample_ball(&mut self) -> Vec3f {
        Vec3f::new(self.normal(), self.normal(), self.normal())
    }

    /// Uniform point on the unit sphere.
    pub fn sample_sphere(&mut self) -> Vec3f {
        let u = self.unit2d();
        sphere_from_unit_square(u)
    }

    /// Uniform direction in the hemisphere around `normal`.
    pub fn sample_hemisphere(&mut self, normal: Vec3f) -> Vec3f {
        pathspace_math::facing(self.sample_sphere(), normal)
    }

    /// Cosine-weighted direction in the hemisphere around unit `normal`.
    ///
    /// Adding a uniform sphere point to the normal and normalizing yields a
    /// density proportional to the cosine with the normal.
    pub fn sample_cos_hemisphere(&mut self, normal: Vec3f) -> Vec3f {
        let v = self.sample_sphere() + normal;
        // Sphere point opposite the normal
        pathspace_math::try_unit(v).unwrap_or(normal)
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// Map a point of the unit square onto the unit sphere (equal-area).
pub fn sphere_from_unit_square(u: Vec2f) -> Vec3f {
    let z = 1.0 - 2.0 * u.x;
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * u.y;
    Vec3f::new(r * phi.cos(), r * phi.sin(), z)
}
