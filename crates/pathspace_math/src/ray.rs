use crate::{Float, Vec3f};

/// A ray in 3D space with origin and unit direction.
///
/// The direction is expected to be unit length. Camera and scattering code
/// normalize before constructing a ray; intersection routines rely on it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3f,
    pub direction: Vec3f,
}

impl Ray {
    /// Create a new ray. `direction` must already be unit length.
    pub fn new(origin: Vec3f, direction: Vec3f) -> Self {
        debug_assert!(
            (direction.length_squared() - 1.0).abs() < 1e-6,
            "ray direction must be unit length, got {direction:?}"
        );
        Self { origin, direction }
    }

    /// Create a ray pointing from `origin` towards `target`.
    ///
    /// Returns `None` when the two points coincide.
    pub fn towards(origin: Vec3f, target: Vec3f) -> Option<Self> {
        crate::try_unit(target - origin).map(|direction| Self { origin, direction })
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: Float) -> Vec3f {
        self.origin + self.direction * t
    }
}
