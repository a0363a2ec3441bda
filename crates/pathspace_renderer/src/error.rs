//! Errors raised while building scenes and render state.

use pathspace_math::Float;
use thiserror::Error;

/// Errors that reject a scene before rendering starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("{shape}: {field} must be a non-zero, finite vector")]
    DegenerateVector {
        shape: &'static str,
        field: &'static str,
    },

    #[error("{shape}: {field} must be finite")]
    NonFinite {
        shape: &'static str,
        field: &'static str,
    },

    #[error("{shape}: radius must be positive and finite, got {radius}")]
    InvalidRadius { shape: &'static str, radius: Float },

    #[error("diamond: edge vectors a and b are parallel")]
    ParallelEdges,

    #[error("camera: {0}")]
    InvalidCamera(&'static str),

    #[error("frame: size {width}x{height} is empty")]
    EmptyFrame { width: u32, height: u32 },

    #[error("light index {index} out of range ({count} shapes)")]
    LightOutOfRange { index: usize, count: usize },
}

/// Result type for scene construction.
pub type SceneResult<T> = Result<T, SceneError>;
