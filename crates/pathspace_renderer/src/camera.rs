//! Camera for ray generation.

use crate::error::{SceneError, SceneResult};
use pathspace_core::CameraDesc;
use pathspace_math::{try_unit, Float, Ray, Vec2f, Vec3f};

/// Pinhole camera with a fixed eye position.
///
/// Maps image-space coordinates `uv` in [0, 1]^2 (v pointing down) to unit
/// rays through an aspect-corrected image plane.
#[derive(Clone, Debug)]
pub struct Camera {
    // Camera positioning
    eye: Vec3f,
    look_at: Vec3f,
    vup: Vec3f,

    // Lens settings
    vfov: Float, // Vertical field of view in degrees
    aspect: Float,

    // Cached basis, computed by build()
    forward: Vec3f,
    right: Vec3f,
    up: Vec3f,
    half_height: Float,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            eye: Vec3f::ZERO,
            look_at: Vec3f::NEG_Z,
            vup: Vec3f::Y,
            vfov: 90.0,
            aspect: 1.0,
            forward: Vec3f::NEG_Z,
            right: Vec3f::X,
            up: Vec3f::Y,
            half_height: 1.0,
        }
    }

    /// Set camera position.
    pub fn with_position(mut self, eye: Vec3f, look_at: Vec3f, vup: Vec3f) -> Self {
        self.eye = eye;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set the vertical field of view in degrees.
    pub fn with_fov(mut self, vfov: Float) -> Self {
        self.vfov = vfov;
        self
    }

    /// Set the image aspect ratio (width / height).
    pub fn with_aspect(mut self, aspect: Float) -> Self {
        self.aspect = aspect;
        self
    }

    /// Camera from a scene description and the render target's aspect ratio.
    pub fn from_desc(desc: &CameraDesc, aspect: Float) -> SceneResult<Self> {
        Self::new()
            .with_position(desc.eye, desc.look_at, desc.up)
            .with_fov(desc.vfov)
            .with_aspect(aspect)
            .build()
    }

    /// Validate settings and compute the camera basis.
    pub fn build(mut self) -> SceneResult<Self> {
        if !self.eye.is_finite() {
            return Err(SceneError::InvalidCamera("eye must be finite"));
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(SceneError::InvalidCamera("vfov must be in (0, 180) degrees"));
        }
        if !(self.aspect > 0.0 && self.aspect.is_finite()) {
            return Err(SceneError::InvalidCamera("aspect ratio must be positive"));
        }

        self.forward = try_unit(self.look_at - self.eye)
            .ok_or(SceneError::InvalidCamera("look_at must differ from eye"))?;
        self.right = try_unit(self.forward.cross(self.vup))
            .ok_or(SceneError::InvalidCamera("up must not be parallel to the view"))?;
        self.up = self.right.cross(self.forward);
        self.half_height = (self.vfov.to_radians() / 2.0).tan();

        Ok(self)
    }

    /// Generate the ray through image-space coordinate `uv`.
    pub fn ray(&self, uv: Vec2f) -> Ray {
        let sx = (2.0 * uv.x - 1.0) * self.half_height * self.aspect;
        let sy = (1.0 - 2.0 * uv.y) * self.half_height;
        let direction = (self.forward + sx * self.right + sy * self.up).normalize();
        Ray::new(self.eye, direction)
    }

    pub fn eye(&self) -> Vec3f {
        self.eye
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_ray_looks_at_target() {
        let camera = Camera::new()
            .with_position(Vec3f::new(0.0, 0.0, 5.0), Vec3f::ZERO, Vec3f::Y)
            .with_fov(40.0)
            .build()
            .unwrap();

        let ray = camera.ray(Vec2f::splat(0.5));
        assert_eq!(ray.origin, Vec3f::new(0.0, 0.0, 5.0));
        assert!((ray.direction - Vec3f::NEG_Z).length() < 1e-12);
    }

    #[test]
    fn test_image_orientation() {
        let camera = Camera::new().with_aspect(2.0).build().unwrap();

        // Top-left of the image points up and left
        let ray = camera.ray(Vec2f::ZERO);
        assert!(ray.direction.x < 0.0);
        assert!(ray.direction.y > 0.0);
        assert!((ray.direction.length() - 1.0).abs() < 1e-12);

        // 90 degree fov, aspect 2: corner is at (-2, 1, -1) before normalizing
        let expected = Vec3f::new(-2.0, 1.0, -1.0).normalize();
        assert!((ray.direction - expected).length() < 1e-12);
    }

    #[test]
    fn test_invalid_camera() {
        let same_point = Camera::new().with_position(Vec3f::ONE, Vec3f::ONE, Vec3f::Y).build();
        assert!(matches!(same_point, Err(SceneError::InvalidCamera(_))));

        let parallel_up = Camera::new()
            .with_position(Vec3f::ZERO, Vec3f::Y, Vec3f::Y)
            .build();
        assert!(parallel_up.is_err());

        assert!(Camera::new().with_fov(180.0).build().is_err());
        assert!(Camera::new().with_aspect(0.0).build().is_err());
    }

    #[test]
    fn test_from_desc() {
        let camera = Camera::from_desc(&CameraDesc::default(), 1.0).unwrap();
        assert_eq!(camera.eye(), CameraDesc::default().eye);
    }
}
