//! Surface materials and BSDF sampling.

use crate::{LocalSurface, Sampler};
use pathspace_core::MaterialDesc;
use pathspace_math::{reflect, Color, Float, Ray, Vec3f};

/// Offset applied along the normal when spawning a scattered ray.
///
/// Keeps the new ray from re-hitting the surface it left (shadow acne).
/// Larger values leak light through thin geometry and contact corners.
pub const SURFACE_EPSILON: Float = 1e-4;

/// Reflectance and emission of a surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    /// Diffuse reflectance
    pub diffuse: Color,
    /// Specular reflectance
    pub specular: Color,
    /// Radiance emitted regardless of incoming light
    pub emission: Color,
    /// Probability of the specular lobe. Not consulted by `sample_f`.
    pub prob_specular: Float,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse: Color::ONE,
            specular: Color::ZERO,
            emission: Color::ZERO,
            prob_specular: 0.0,
        }
    }
}

impl From<&MaterialDesc> for Material {
    fn from(desc: &MaterialDesc) -> Self {
        Self {
            diffuse: desc.diffuse,
            specular: desc.specular,
            emission: desc.emission,
            prob_specular: desc.prob_specular,
        }
    }
}

impl Material {
    /// Create a purely diffuse material.
    pub fn diffuse(diffuse: Color) -> Self {
        Self {
            diffuse,
            ..Default::default()
        }
    }

    /// Create an emitter that reflects nothing.
    pub fn emissive(emission: Color) -> Self {
        Self {
            diffuse: Color::ZERO,
            emission,
            ..Default::default()
        }
    }

    /// Set the specular reflectance and lobe probability.
    pub fn with_specular(mut self, specular: Color, prob_specular: Float) -> Self {
        self.specular = specular;
        self.prob_specular = prob_specular.clamp(0.0, 1.0);
        self
    }

    /// Sample an outgoing ray and its attenuation.
    ///
    /// Cosine-weighted diffuse sampling: the cosine factor cancels against
    /// the sampling density, so the attenuation is just the diffuse color.
    pub fn sample_f(&self, sampler: &mut Sampler, surface: &LocalSurface) -> (Ray, Color) {
        let origin = spawn_origin(surface);
        let direction = sampler.sample_cos_hemisphere(surface.normal);
        (Ray::new(origin, direction), self.diffuse)
    }

    /// Sample the specular lobe: mirror reflection of `incoming`.
    ///
    /// Not used by the integrator; callers that want a mixed BSDF choose
    /// between this and `sample_f` themselves.
    pub fn sample_specular(
        &self,
        _sampler: &mut Sampler,
        surface: &LocalSurface,
        incoming: &Ray,
    ) -> (Ray, Color) {
        let origin = spawn_origin(surface);
        let direction = reflect(incoming.direction, surface.normal);
        (Ray::new(origin, direction.normalize()), self.specular)
    }

    /// Check if this material emits light.
    pub fn is_emissive(&self) -> bool {
        self.emission.length_squared() > 0.0
    }
}

#[inline]
fn spawn_origin(surface: &LocalSurface) -> Vec3f {
    surface.pos + SURFACE_EPSILON * surface.normal
}
