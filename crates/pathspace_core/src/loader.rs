//! Loading scene descriptions and settings from JSON files.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::scene::SceneDescription;
use crate::settings::{ConfigError, RenderSettings};

/// Errors that can occur while loading scene or settings files.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid settings: {0}")]
    Config(#[from] ConfigError),

    #[error("Scene contains no shapes")]
    EmptyScene,
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

fn load_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> LoadResult<T> {
    let text = fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&text)?)
}

/// Parse a scene description from a JSON string.
pub fn scene_from_str(json: &str) -> LoadResult<SceneDescription> {
    let scene: SceneDescription = serde_json::from_str(json)?;
    if scene.shapes.is_empty() {
        return Err(LoadError::EmptyScene);
    }
    Ok(scene)
}

/// Load a scene description from a JSON file.
///
/// # Example
///
/// ```ignore
/// use pathspace_core::load_scene;
///
/// let scene = load_scene("box.json")?;
/// println!("Loaded {}", scene);
/// ```
pub fn load_scene<P: AsRef<Path>>(path: P) -> LoadResult<SceneDescription> {
    let path = path.as_ref();
    let scene: SceneDescription = load_json(path)?;
    if scene.shapes.is_empty() {
        return Err(LoadError::EmptyScene);
    }
    log::info!("Loaded scene {}: {}", path.display(), scene);
    Ok(scene)
}

/// Load and validate render settings from a JSON file.
///
/// Fields missing from the file keep their defaults.
pub fn load_settings<P: AsRef<Path>>(path: P) -> LoadResult<RenderSettings> {
    let path = path.as_ref();
    let settings: RenderSettings = load_json(path)?;
    settings.validate()?;
    log::info!("Loaded settings from {}", path.display());
    Ok(settings)
}
