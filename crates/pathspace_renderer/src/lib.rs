//! PathSpace Renderer - CPU Progressive Path Tracing
//!
//! A naive forward path tracer that accumulates jittered samples into a
//! shared frame while worker threads keep sweeping the image.

mod camera;
mod diamond;
mod disc;
mod error;
mod frame;
mod hittable;
mod integrator;
mod material;
mod plane;
mod renderer;
mod sampler;
mod scene;
mod shape;
mod sphere;

pub use camera::Camera;
pub use diamond::Diamond;
pub use disc::Disc;
pub use error::{SceneError, SceneResult};
pub use frame::Frame;
pub use hittable::{Hittable, Intersection, LocalSurface};
pub use integrator::{Integrator, DEFAULT_MAX_BOUNCES};
pub use material::{Material, SURFACE_EPSILON};
pub use plane::Plane;
pub use renderer::{
    clamp_01, color_to_rgba, linear_to_gamma, render_passes, render_sweep, ProgressiveRender,
};
pub use sampler::{sphere_from_unit_square, Sampler};
pub use scene::Scene;
pub use shape::{Shape, ShapeList};
pub use sphere::Sphere;

/// Re-export the math types used throughout the renderer
pub use pathspace_math::{Color, Float, Ray, Vec2f, Vec3f};
