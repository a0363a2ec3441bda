//! Presentation of the frame at window resolution.
//!
//! Each present converts the frame's display copy to gamma-2 RGBA, scales
//! it to the window size with nearest-neighbour filtering and writes it out.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use pathspace_core::RenderSettings;
use pathspace_renderer::{color_to_rgba, Frame};

pub struct Display {
    window_width: u32,
    window_height: u32,
    output: PathBuf,
    presented: u64,
}

impl Display {
    pub fn new(settings: &RenderSettings, output: impl Into<PathBuf>) -> Self {
        Self {
            window_width: settings.window_width,
            window_height: settings.window_height,
            output: output.into(),
            presented: 0,
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Frame contents at render resolution.
    pub fn frame_image(frame: &Frame) -> RgbaImage {
        let pixels = frame.display_pixels();
        let width = frame.width();
        RgbaImage::from_fn(width, frame.height(), |x, y| {
            Rgba(color_to_rgba(pixels[(y * width + x) as usize]))
        })
    }

    /// Frame contents scaled to the window.
    pub fn snapshot(&self, frame: &Frame) -> RgbaImage {
        let image = Self::frame_image(frame);
        if image.dimensions() == (self.window_width, self.window_height) {
            return image;
        }
        imageops::resize(
            &image,
            self.window_width,
            self.window_height,
            FilterType::Nearest,
        )
    }

    /// Write the current snapshot to the output file.
    pub fn present(&mut self, frame: &Frame) -> Result<()> {
        let image = self.snapshot(frame);
        image
            .save(&self.output)
            .with_context(|| format!("Failed to write {}", self.output.display()))?;
        self.presented += 1;
        log::debug!(
            "Snapshot {} written to {} (total weight {:.0})",
            self.presented,
            self.output.display(),
            frame.total_weight()
        );
        Ok(())
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }
}
