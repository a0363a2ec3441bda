//! Hittable trait and intersection records.

use crate::Material;
use pathspace_math::{Float, Ray, Vec3f};

/// Local geometry at a ray hit.
#[derive(Clone, Copy, Debug)]
pub struct LocalSurface<'a> {
    /// Point of intersection
    pub pos: Vec3f,
    /// Unit surface normal, always pointing against the incoming ray
    pub normal: Vec3f,
    /// Material of the surface that was hit
    pub material: &'a Material,
}

/// Result of intersecting a ray with a shape.
///
/// A miss carries no surface, so its material can never be read.
#[derive(Clone, Copy, Debug)]
pub struct Intersection<'a> {
    /// Distance along the ray; +infinity for a miss
    pub dist: Float,
    /// Hit surface, present iff the ray hit
    pub surface: Option<LocalSurface<'a>>,
}

impl<'a> Intersection<'a> {
    /// A hit at distance `dist`.
    #[inline]
    pub fn hit_at(dist: Float, surface: LocalSurface<'a>) -> Self {
        Self {
            dist,
            surface: Some(surface),
        }
    }

    /// A miss at infinite distance.
    #[inline]
    pub fn miss() -> Self {
        Self {
            dist: Float::INFINITY,
            surface: None,
        }
    }

    /// Whether the ray hit anything.
    #[inline]
    pub fn hit(&self) -> bool {
        self.surface.is_some()
    }
}

impl Default for Intersection<'_> {
    fn default() -> Self {
        Self::miss()
    }
}

/// Trait for objects that can be hit by rays.
///
/// Implementations are pure functions of the shape and the ray, and are
/// called concurrently from every render thread.
pub trait Hittable: Send + Sync {
    /// Intersect `ray` with this object, returning the nearest hit with `t > 0`.
    fn intersect(&self, ray: &Ray) -> Intersection<'_>;
}
