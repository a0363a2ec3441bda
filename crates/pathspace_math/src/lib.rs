// Re-export glam for convenience
pub use glam;

/// Scalar type used throughout the path tracer.
pub type Float = f64;

/// 2D vector (image-space coordinates, sample pairs).
pub type Vec2f = glam::DVec2;

/// 3D vector (positions, directions, normals).
pub type Vec3f = glam::DVec3;

/// Linear HDR color (r, g, b). Not clamped, emission may exceed 1.0.
pub type Color = Vec3f;

// PathSpace math types
mod ray;
mod vector;

pub use ray::Ray;
pub use vector::{facing, reflect, refract, try_unit, DEGENERATE_LENGTH_SQUARED};

/// Named colors.
pub mod colors {
    use super::Color;

    pub const BLACK: Color = Color::ZERO;
    pub const WHITE: Color = Color::ONE;
}
