//! Path tracing integrator.
//!
//! Naive forward path tracing: no light sampling, no Russian roulette.
//! Unbiased for diffuse-only scenes up to the bounce cap, but noisy.

use crate::{Hittable, Sampler, Scene};
use pathspace_math::{colors, Color, Ray};

/// Default maximum number of bounces per path.
pub const DEFAULT_MAX_BOUNCES: u32 = 10;

/// Traces paths through a borrowed scene.
#[derive(Clone, Copy)]
pub struct Integrator<'s> {
    scene: &'s Scene,
    max_bounces: u32,
}

impl<'s> Integrator<'s> {
    /// Create an integrator with the default bounce cap.
    pub fn new(scene: &'s Scene) -> Self {
        Self {
            scene,
            max_bounces: DEFAULT_MAX_BOUNCES,
        }
    }

    /// Set the maximum number of bounces.
    pub fn with_max_bounces(mut self, max_bounces: u32) -> Self {
        self.max_bounces = max_bounces;
        self
    }

    pub fn max_bounces(&self) -> u32 {
        self.max_bounces
    }

    /// Estimate the radiance arriving along `ray`.
    ///
    /// Accumulates emission weighted by the path throughput at each hit,
    /// and stops when the path escapes or the bounce cap is reached.
    pub fn pathtrace(&self, ray: Ray, sampler: &mut Sampler) -> Color {
        let mut radiance = colors::BLACK;
        let mut throughput = colors::WHITE;
        let mut ray = ray;

        for _ in 0..self.max_bounces {
            let hit = self.scene.intersect(&ray);
            let Some(surface) = hit.surface else {
                break;
            };

            let material = surface.material;
            let (new_ray, attenuation) = material.sample_f(sampler, &surface);

            radiance += throughput * material.emission;
            throughput *= attenuation;

            ray = new_ray;
        }

        radiance
    }
}
