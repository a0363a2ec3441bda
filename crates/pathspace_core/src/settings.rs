//! Startup configuration for a progressive render.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How concurrent writers update the frame accumulation buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccumulationMode {
    /// Lock-free load/compute/store per pixel. Concurrent updates of the
    /// same pixel may drop a contribution; readers may see torn pixels.
    #[default]
    Relaxed,

    /// Each pixel update and each snapshot read holds the pixel's lock.
    Strict,
}

/// Errors raised when validating settings.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be greater than zero")]
    Zero { name: &'static str },

    #[error("{name} is too large: {value}")]
    TooLarge { name: &'static str, value: u64 },
}

/// Result type for settings validation.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Render configuration exposed at startup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Frame buffer width in pixels
    pub render_width: u32,
    /// Frame buffer height in pixels
    pub render_height: u32,
    /// Presentation width in pixels
    pub window_width: u32,
    /// Presentation height in pixels
    pub window_height: u32,
    /// Number of render worker threads
    pub worker_count: usize,
    /// Jittered samples per sweep along each image axis
    pub samples_per_sweep_axis: u32,
    /// Maximum path length in bounces
    pub max_bounces: u32,
    /// Frame buffer update policy
    pub accumulation: AccumulationMode,
    /// Base seed for worker samplers; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            render_width: 512,
            render_height: 512,
            window_width: 1024,
            window_height: 1024,
            worker_count: 12,
            samples_per_sweep_axis: 256,
            max_bounces: 10,
            accumulation: AccumulationMode::Relaxed,
            seed: None,
        }
    }
}

/// Upper bound on any image dimension.
const MAX_DIMENSION: u32 = 16384;

impl RenderSettings {
    /// Check that every size and count is usable.
    pub fn validate(&self) -> ConfigResult<()> {
        let dimensions = [
            ("render_width", self.render_width),
            ("render_height", self.render_height),
            ("window_width", self.window_width),
            ("window_height", self.window_height),
        ];
        for (name, value) in dimensions {
            if value == 0 {
                return Err(ConfigError::Zero { name });
            }
            if value > MAX_DIMENSION {
                return Err(ConfigError::TooLarge {
                    name,
                    value: value as u64,
                });
            }
        }

        if self.worker_count == 0 {
            return Err(ConfigError::Zero {
                name: "worker_count",
            });
        }
        if self.samples_per_sweep_axis == 0 {
            return Err(ConfigError::Zero {
                name: "samples_per_sweep_axis",
            });
        }
        if self.max_bounces == 0 {
            return Err(ConfigError::Zero {
                name: "max_bounces",
            });
        }

        Ok(())
    }

    /// Width over height of the render target.
    pub fn aspect_ratio(&self) -> f64 {
        self.render_width as f64 / self.render_height as f64
    }

    /// Samples traced by one worker sweep.
    pub fn samples_per_sweep(&self) -> u64 {
        let axis = self.samples_per_sweep_axis as u64;
        axis * axis
    }
}
