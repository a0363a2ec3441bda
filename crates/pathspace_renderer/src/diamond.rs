//! Parallelogram ("diamond") primitive.

use std::fmt;

use crate::{
    error::{SceneError, SceneResult},
    hittable::{Hittable, Intersection, LocalSurface},
    plane::{check_finite, front_facing, intersect_plane},
    Material,
};
use pathspace_math::{try_unit, Float, Ray, Vec3f};

/// A parallelogram centered on `pos`, spanned by half-edges `a` and `b`.
///
/// A hit is kept when its offset from `pos` projects onto each edge
/// direction with magnitude at most that edge's length.
#[derive(Clone, Debug)]
pub struct Diamond {
    pos: Vec3f,
    a: Vec3f,
    b: Vec3f,
    // Derived: unit edge directions, edge lengths, unit normal
    a_dir: Vec3f,
    b_dir: Vec3f,
    a_len: Float,
    b_len: Float,
    normal: Vec3f,
    material: Material,
}

impl Diamond {
    /// Create a new diamond. `a` and `b` must be non-zero and not parallel.
    pub fn new(pos: Vec3f, a: Vec3f, b: Vec3f, material: Material) -> SceneResult<Self> {
        check_finite("diamond", "pos", pos)?;
        let a_dir = try_unit(a).ok_or(SceneError::DegenerateVector {
            shape: "diamond",
            field: "a",
        })?;
        let b_dir = try_unit(b).ok_or(SceneError::DegenerateVector {
            shape: "diamond",
            field: "b",
        })?;
        let normal = try_unit(a_dir.cross(b_dir)).ok_or(SceneError::ParallelEdges)?;

        Ok(Self {
            pos,
            a,
            b,
            a_dir,
            b_dir,
            a_len: a.length(),
            b_len: b.length(),
            normal,
            material,
        })
    }

    /// Unit normal, `unit(cross(a, b))`.
    pub fn normal(&self) -> Vec3f {
        self.normal
    }

    pub fn material(&self) -> &Material {
        &self.material
    }
}

impl Hittable for Diamond {
    fn intersect(&self, ray: &Ray) -> Intersection<'_> {
        let Some((t, ray_n)) = intersect_plane(self.pos, self.normal, ray) else {
            return Intersection::miss();
        };

        let pos = ray.at(t);
        let local = pos - self.pos;

        let a_comp = local.dot(self.a_dir).abs();
        let b_comp = local.dot(self.b_dir).abs();

        // Outside diamond
        if a_comp > self.a_len || b_comp > self.b_len {
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

impl fmt::Display for Diamond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Diamond(pos: {}, a: {}, b: {})",
            self.pos, self.a, self.b
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sampler;

    /// Square of half-size 1 in the y = 2 plane.
    fn square() -> Diamond {
        Diamond::new(
            Vec3f::new(0.0, 2.0, 0.0),
            Vec3f::X,
            Vec3f::Z,
            Material::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_diamond_normal_from_edges() {
        // X cross Z = -Y
        assert_eq!(square().normal(), Vec3f::NEG_Y);
    }

    #[test]
    fn test_diamond_hit_and_clip() {
        let d = square();

        let inside = Ray::new(Vec3f::new(0.9, 0.0, -0.9), Vec3f::Y);
        let hit = d.intersect(&inside);
        assert!(hit.hit());
        assert!((hit.dist - 2.0).abs() < 1e-12);
        assert_eq!(hit.surface.unwrap().normal, Vec3f::NEG_Y);

        let outside_a = Ray::new(Vec3f::new(1.1, 0.0, 0.0), Vec3f::Y);
        assert!(!d.intersect(&outside_a).hit());

        let outside_b = Ray::new(Vec3f::new(0.0, 0.0, -1.1), Vec3f::Y);
        assert!(!d.intersect(&outside_b).hit());
    }

    #[test]
    fn test_diamond_clip_is_relative_to_center() {
        // Same square moved far from the origin still clips around its center
        let d = Diamond::new(
            Vec3f::new(10.0, 2.0, 10.0),
            Vec3f::X,
            Vec3f::Z,
            Material::default(),
        )
        .unwrap();

        let center = Ray::new(Vec3f::new(10.0, 0.0, 10.0), Vec3f::Y);
        assert!(d.intersect(&center).hit());

        let origin = Ray::new(Vec3f::new(0.0, 0.0, 0.0), Vec3f::Y);
        assert!(!d.intersect(&origin).hit());
    }

    #[test]
    fn test_diamond_front_facing_property() {
        let d = Diamond::new(
            Vec3f::ZERO,
            Vec3f::new(1.0, 0.5, 0.0),
            Vec3f::new(0.0, 0.3, 1.2),
            Material::default(),
        )
        .unwrap();
        let mut sampler = Sampler::new(23);
        let mut hits = 0;

        for _ in 0..4000 {
            let origin = Vec3f::new(
                sampler.range(-2.0, 2.0),
                sampler.range(-2.0, 2.0),
                sampler.range(-2.0, 2.0),
            );
            let ray = Ray::new(origin, sampler.sample_sphere());
            if let Some(s) = d.intersect(&ray).surface {
                hits += 1;
                assert!(s.normal.dot(ray.direction) <= 0.0);
            }
        }
        assert!(hits > 0);
    }

    #[test]
    fn test_diamond_degenerate_edges() {
        let m = Material::default();
        assert!(matches!(
            Diamond::new(Vec3f::ZERO, Vec3f::ZERO, Vec3f::Z, m),
            Err(SceneError::DegenerateVector { field: "a", .. })
        ));
        assert!(matches!(
            Diamond::new(Vec3f::ZERO, Vec3f::X, Vec3f::ZERO, m),
            Err(SceneError::DegenerateVector { field: "b", .. })
        ));
        assert_eq!(
            Diamond::new(Vec3f::ZERO, Vec3f::X, Vec3f::new(-2.0, 0.0, 0.0), m).unwrap_err(),
            SceneError::ParallelEdges
        );
    }
}
