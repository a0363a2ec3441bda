//! Flat disc primitive.

use std::fmt;

use crate::{
    error::{SceneError, SceneResult},
    hittable::{Hittable, Intersection, LocalSurface},
    plane::{check_direction, check_finite, front_facing, intersect_plane},
    Material,
};
use pathspace_math::{Float, Ray, Vec3f};

/// A disc: a plane clipped to `radius` around its center.
#[derive(Clone, Debug)]
pub struct Disc {
    pos: Vec3f,
    normal: Vec3f,
    radius: Float,
    material: Material,
}

impl Disc {
    /// Create a new disc. The radius must be positive and finite.
    pub fn new(pos: Vec3f, normal: Vec3f, radius: Float, material: Material) -> SceneResult<Self> {
        check_finite("disc", "pos", pos)?;
        let normal = check_direction("disc", "normal", normal)?;
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(SceneError::InvalidRadius {
                shape: "disc",
                radius,
            });
        }

        Ok(Self {
            pos,
            normal,
            radius,
            material,
        })
    }

    pub fn radius(&self) -> Float {
        self.radius
    }

    pub fn material(&self) -> &Material {
        &self.material
    }
}

impl Hittable for Disc {
    fn intersect(&self, ray: &Ray) -> Intersection<'_> {
        let Some((t, ray_n)) = intersect_plane(self.pos, self.normal, ray) else {
            return Intersection::miss();
        };

        let pos = ray.at(t);

        // Outside circle
        if (pos - self.pos).length_squared() > self.radius * self.radius {
            return Intersection::miss();
        }

        Intersection::hit_at(
            t,
            LocalSurface {
                pos,
                normal: front_facing(self.normal, ray_n),
                material: &self.material,
            },
        )
    }
}

impl fmt::Display for Disc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Disc(pos: {}, dir: {}, rad: {})",
            self.pos, self.normal, self.radius
        )
    }
}
