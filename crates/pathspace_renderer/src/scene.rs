//! Renderable scene built from a validated description.

use crate::{
    error::{SceneError, SceneResult},
    hittable::{Hittable, Intersection},
    Shape, ShapeList,
};
use pathspace_core::SceneDescription;
use pathspace_math::Ray;

/// Immutable scene shared by all render threads.
///
/// Owns every shape. Lights are indices into the shape list, kept for
/// future light sampling.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    shapes: ShapeList,
    lights: Vec<usize>,
}

impl Scene {
    /// Create a scene from already-built shapes.
    pub fn new(shapes: ShapeList) -> Self {
        Self {
            shapes,
            lights: Vec::new(),
        }
    }

    /// Build a scene from a description.
    ///
    /// Fails on the first invalid shape; nothing is skipped.
    pub fn from_description(desc: &SceneDescription) -> SceneResult<Self> {
        let mut shapes = ShapeList::new();
        let mut lights = Vec::new();

        for (index, shape_desc) in desc.shapes.iter().enumerate() {
            let shape = Shape::from_desc(shape_desc).inspect_err(|e| {
                log::error!("Shape {} ({}) rejected: {}", index, shape_desc.geometry.kind(), e);
            })?;
            shapes.push(shape);
            if shape_desc.light {
                lights.push(index);
            }
        }

        log::info!(
            "Built scene with {} shapes, {} lights",
            shapes.len(),
            lights.len()
        );
        log::debug!("Scene:\n{}", shapes);

        Ok(Self { shapes, lights })
    }

    /// Flag the shape at `index` as a light.
    pub fn with_light(mut self, index: usize) -> SceneResult<Self> {
        if index >= self.shapes.len() {
            return Err(SceneError::LightOutOfRange {
                index,
                count: self.shapes.len(),
            });
        }
        if !self.lights.contains(&index) {
            self.lights.push(index);
        }
        Ok(self)
    }

    pub fn shapes(&self) -> &ShapeList {
        &self.shapes
    }

    /// Shapes flagged as lights.
    pub fn lights(&self) -> impl Iterator<Item = &Shape> + '_ {
        self.lights.iter().filter_map(|&i| self.shapes.get(i))
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }
}

impl Hittable for Scene {
    #[inline]
    fn intersect(&self, ray: &Ray) -> Intersection<'_> {
        self.shapes.intersect(ray)
    }
}
