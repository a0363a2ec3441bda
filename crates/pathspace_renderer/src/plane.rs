//! Infinite plane primitive.

use std::fmt;

use crate::{
    error::{SceneError, SceneResult},
    hittable::{Hittable, Intersection, LocalSurface},
    Material,
};
use pathspace_math::{try_unit, Float, Ray, Vec3f};

/// Solve the ray/plane equation.
///
/// Returns the distance `t > 0` and the component of the ray direction
/// along the normal, or `None` if the ray is parallel or the plane is
/// behind the origin.
#[inline]
pub(crate) fn intersect_plane(point: Vec3f, normal: Vec3f, ray: &Ray) -> Option<(Float, Float)> {
    // Component of ray along plane normal
    let ray_n = normal.dot(ray.direction);

    // Parallel to plane
    if ray_n == 0.0 {
        return None;
    }

    let t = normal.dot(point - ray.origin) / ray_n;
    if t <= 0.0 || t.is_nan() {
        return None;
    }

    Some((t, ray_n))
}

/// Normal oriented against the incoming ray.
#[inline]
pub(crate) fn front_facing(normal: Vec3f, ray_n: Float) -> Vec3f {
    if ray_n > 0.0 {
        -normal
    } else {
        normal
    }
}

pub(crate) fn check_finite(shape: &'static str, field: &'static str, v: Vec3f) -> SceneResult<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(SceneError::NonFinite { shape, field })
    }
}

pub(crate) fn check_direction(
    shape: &'static str,
    field: &'static str,
    v: Vec3f,
) -> SceneResult<Vec3f> {
    try_unit(v).ok_or(SceneError::DegenerateVector { shape, field })
}

/// An infinite plane through a point.
#[derive(Clone, Debug)]
pub struct Plane {
    pos: Vec3f,
    normal: Vec3f,
    material: Material,
}

impl Plane {
    /// Create a new plane. `normal` is normalized; it must be non-zero.
    pub fn new(pos: Vec3f, normal: Vec3f, material: Material) -> SceneResult<Self> {
        check_finite("plane", "pos", pos)?;
        let normal = check_direction("plane", "normal", normal)?;
        Ok(Self {
            pos,
            normal,
            material,
        })
    }

    /// Point on the plane.
    pub fn pos(&self) -> Vec3f {
        self.pos
    }

    /// Unit normal as constructed (not oriented to any ray).
    pub fn normal(&self) -> Vec3f {
        self.normal
    }

    pub fn material(&self) -> &Material {
        &self.material
    }
}

impl Hittable for Plane {
    fn intersect(&self, ray: &Ray) -> Intersection<'_> {
        let Some((t, ray_n)) = intersect_plane(self.pos, self.normal, ray) else {
            return Intersection::miss();
        };

        Intersection::hit_at(
            t,
            LocalSurface {
                pos: ray.at(t),
                normal: front_facing(self.normal, ray_n),
                material: &self.material,
            },
        )
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Plane(pos: {}, dir: {})", self.pos, self.normal)
    }
}
