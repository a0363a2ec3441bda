//! PathSpace Core - scene description and render settings.
//!
//! This crate provides:
//!
//! - **Scene description types**: `SceneDescription`, `ShapeDesc`, `MaterialDesc`, `CameraDesc`
//! - **Render settings**: `RenderSettings` with the accumulation mode
//! - **Loading**: JSON scene and settings files
//!
//! # Example
//!
//! ```ignore
//! use pathspace_core::{load_scene, SceneDescription};
//!
//! let scene = load_scene("scene.json")?;
//! println!("Loaded {} shapes", scene.shapes.len());
//! ```

pub mod loader;
pub mod scene;
pub mod settings;

// Re-export commonly used types
pub use loader::{load_scene, load_settings, scene_from_str, LoadError, LoadResult};
pub use scene::{CameraDesc, GeometryDesc, MaterialDesc, SceneDescription, ShapeDesc};
pub use settings::{AccumulationMode, ConfigError, ConfigResult, RenderSettings};
