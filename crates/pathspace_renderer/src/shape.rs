//! Closed set of scene shapes and the composite shape list.

use std::fmt;

use crate::{
    error::SceneResult,
    hittable::{Hittable, Intersection},
    Diamond, Disc, Material, Plane, Sphere,
};
use pathspace_core::{GeometryDesc, ShapeDesc};
use pathspace_math::Ray;

/// Any shape the renderer can intersect.
#[derive(Clone, Debug)]
pub enum Shape {
    Plane(Plane),
    Disc(Disc),
    Sphere(Sphere),
    Diamond(Diamond),
    List(ShapeList),
}

impl Shape {
    /// Build and validate a shape from its description.
    pub fn from_desc(desc: &ShapeDesc) -> SceneResult<Self> {
        let material = Material::from(&desc.material);
        let shape = match desc.geometry {
            GeometryDesc::Plane { pos, normal } => Shape::Plane(Plane::new(pos, normal, material)?),
            GeometryDesc::Disc {
                pos,
                normal,
                radius,
            } => Shape::Disc(Disc::new(pos, normal, radius, material)?),
            GeometryDesc::Sphere { pos, radius } => {
                Shape::Sphere(Sphere::new(pos, radius, material)?)
            }
            GeometryDesc::Diamond { pos, a, b } => Shape::Diamond(Diamond::new(pos, a, b, material)?),
        };
        Ok(shape)
    }

    /// Material of a primitive; `None` for a list.
    pub fn material(&self) -> Option<&Material> {
        match self {
            Shape::Plane(s) => Some(s.material()),
            Shape::Disc(s) => Some(s.material()),
            Shape::Sphere(s) => Some(s.material()),
            Shape::Diamond(s) => Some(s.material()),
            Shape::List(_) => None,
        }
    }

    fn format(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        write_indent(f, indent)?;
        match self {
            Shape::Plane(s) => write!(f, "{}", s),
            Shape::Disc(s) => write!(f, "{}", s),
            Shape::Sphere(s) => write!(f, "{}", s),
            Shape::Diamond(s) => write!(f, "{}", s),
            Shape::List(list) => list.format(f, indent),
        }
    }
}

impl Hittable for Shape {
    #[inline]
    fn intersect(&self, ray: &Ray) -> Intersection<'_> {
        match self {
            Shape::Plane(s) => s.intersect(ray),
            Shape::Disc(s) => s.intersect(ray),
            Shape::Sphere(s) => s.intersect(ray),
            Shape::Diamond(s) => s.intersect(ray),
            Shape::List(s) => s.intersect(ray),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.format(f, 0)
    }
}

macro_rules! impl_from_primitive {
    ($($ty:ident),*) => {
        $(
            impl From<$ty> for Shape {
                fn from(shape: $ty) -> Self {
                    Shape::$ty(shape)
                }
            }
        )*
    };
}

impl_from_primitive!(Plane, Disc, Sphere, Diamond);

impl From<ShapeList> for Shape {
    fn from(list: ShapeList) -> Self {
        Shape::List(list)
    }
}

/// A flat list of shapes, intersected by brute force.
#[derive(Clone, Debug, Default)]
pub struct ShapeList {
    shapes: Vec<Shape>,
}

impl ShapeList {
    /// Create a new empty shape list.
    pub fn new() -> Self {
        Self { shapes: Vec::new() }
    }

    /// Add a shape to the list.
    pub fn push(&mut self, shape: impl Into<Shape>) {
        self.shapes.push(shape.into());
    }

    /// Get the number of shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Shape> {
        self.shapes.iter()
    }

    fn format(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        writeln!(f, "ShapeList[")?;
        for shape in &self.shapes {
            shape.format(f, indent + 1)?;
            writeln!(f)?;
        }
        write_indent(f, indent)?;
        write!(f, "]")
    }
}

impl FromIterator<Shape> for ShapeList {
    fn from_iter<I: IntoIterator<Item = Shape>>(iter: I) -> Self {
        Self {
            shapes: iter.into_iter().collect(),
        }
    }
}

impl Hittable for ShapeList {
    fn intersect(&self, ray: &Ray) -> Intersection<'_> {
        let mut nearest = Intersection::miss();

        for shape in &self.shapes {
            let current = shape.intersect(ray);
            // Strictly nearer: the first of equally distant hits wins
            if current.hit() && current.dist < nearest.dist {
                nearest = current;
            }
        }

        nearest
    }
}

impl fmt::Display for ShapeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.format(f, 0)
    }
}

fn write_indent(f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
    for _ in 0..indent {
        f.write_str("  ")?;
    }
    Ok(())
}
