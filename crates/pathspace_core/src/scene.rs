//! Scene description types for PathSpace.
//!
//! These types describe *what* to render and stay independent of the
//! renderer. The renderer validates them and builds its own immutable
//! shapes from them.

use std::fmt;

use pathspace_math::{Color, Float, Vec3f};
use serde::{Deserialize, Serialize};

/// Surface reflectance and emission of a shape.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialDesc {
    /// Diffuse reflectance (RGB)
    pub diffuse: Color,

    /// Specular reflectance (RGB)
    pub specular: Color,

    /// Emitted radiance (RGB, unbounded)
    pub emission: Color,

    /// Probability of choosing the specular lobe
    pub prob_specular: Float,
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self {
            diffuse: Color::ONE,
            specular: Color::ZERO,
            emission: Color::ZERO,
            prob_specular: 0.0,
        }
    }
}

impl MaterialDesc {
    /// A purely diffuse material.
    pub fn diffuse(diffuse: Color) -> Self {
        Self {
            diffuse,
            ..Default::default()
        }
    }

    /// A light source that absorbs everything it does not emit.
    pub fn emissive(emission: Color) -> Self {
        Self {
            diffuse: Color::ZERO,
            emission,
            ..Default::default()
        }
    }

    /// Check if this material emits light.
    pub fn is_emissive(&self) -> bool {
        self.emission.length_squared() > 0.0
    }
}

/// Geometry of one shape in the scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GeometryDesc {
    /// Infinite plane through `pos` with normal `normal`.
    Plane { pos: Vec3f, normal: Vec3f },

    /// Disc of `radius` around `pos` in the plane with normal `normal`.
    Disc {
        pos: Vec3f,
        normal: Vec3f,
        radius: Float,
    },

    /// Sphere of `radius` around `pos`.
    Sphere { pos: Vec3f, radius: Float },

    /// Parallelogram centered on `pos` with half-edge vectors `a` and `b`.
    Diamond { pos: Vec3f, a: Vec3f, b: Vec3f },
}

impl GeometryDesc {
    /// Short name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            GeometryDesc::Plane { .. } => "plane",
            GeometryDesc::Disc { .. } => "disc",
            GeometryDesc::Sphere { .. } => "sphere",
            GeometryDesc::Diamond { .. } => "diamond",
        }
    }
}

/// One entry of the scene's shape list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeDesc {
    #[serde(flatten)]
    pub geometry: GeometryDesc,

    #[serde(default)]
    pub material: MaterialDesc,

    /// Mark this shape as a light source.
    #[serde(default)]
    pub light: bool,
}

impl ShapeDesc {
    /// Create a shape entry that is not flagged as a light.
    pub fn new(geometry: GeometryDesc, material: MaterialDesc) -> Self {
        Self {
            geometry,
            material,
            light: false,
        }
    }

    /// Flag this shape as a light source.
    pub fn as_light(mut self) -> Self {
        self.light = true;
        self
    }
}

/// Pinhole camera placement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDesc {
    /// Eye position
    pub eye: Vec3f,

    /// Point the camera looks at
    pub look_at: Vec3f,

    /// Up direction
    pub up: Vec3f,

    /// Vertical field of view in degrees
    pub vfov: Float,
}

impl Default for CameraDesc {
    fn default() -> Self {
        Self {
            eye: Vec3f::new(0.0, 0.0, 3.5),
            look_at: Vec3f::ZERO,
            up: Vec3f::Y,
            vfov: 40.0,
        }
    }
}

/// A complete scene: camera plus an ordered list of shapes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub camera: CameraDesc,

    #[serde(default)]
    pub shapes: Vec<ShapeDesc>,
}

impl SceneDescription {
    /// Create an empty scene with the default camera.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape to the scene.
    pub fn add(&mut self, shape: ShapeDesc) -> &mut Self {
        self.shapes.push(shape);
        self
    }

    /// Number of shapes flagged as lights.
    pub fn light_count(&self) -> usize {
        self.shapes.iter().filter(|s| s.light).count()
    }

    /// Built-in demo scene.
    ///
    /// A box of planes open towards the camera, a square light in the
    /// ceiling, a sphere on the floor and a tilted disc.
    pub fn demo() -> Self {
        let white = MaterialDesc::diffuse(Color::splat(0.73));
        let red = MaterialDesc::diffuse(Color::new(0.65, 0.05, 0.05));
        let green = MaterialDesc::diffuse(Color::new(0.12, 0.45, 0.15));

        let mut scene = Self::new();

        // Floor, ceiling, back wall
        scene.add(ShapeDesc::new(
            GeometryDesc::Plane {
                pos: Vec3f::new(0.0, -1.0, 0.0),
                normal: Vec3f::Y,
            },
            white,
        ));
        scene.add(ShapeDesc::new(
            GeometryDesc::Plane {
                pos: Vec3f::new(0.0, 1.0, 0.0),
                normal: Vec3f::NEG_Y,
            },
            white,
        ));
        scene.add(ShapeDesc::new(
            GeometryDesc::Plane {
                pos: Vec3f::new(0.0, 0.0, -1.0),
                normal: Vec3f::Z,
            },
            white,
        ));

        // Side walls
        scene.add(ShapeDesc::new(
            GeometryDesc::Plane {
                pos: Vec3f::new(-1.0, 0.0, 0.0),
                normal: Vec3f::X,
            },
            red,
        ));
        scene.add(ShapeDesc::new(
            GeometryDesc::Plane {
                pos: Vec3f::new(1.0, 0.0, 0.0),
                normal: Vec3f::NEG_X,
            },
            green,
        ));

        // Ceiling light, slightly below the ceiling plane
        scene.add(
            ShapeDesc::new(
                GeometryDesc::Diamond {
                    pos: Vec3f::new(0.0, 0.999, 0.0),
                    a: Vec3f::new(0.3, 0.0, 0.0),
                    b: Vec3f::new(0.0, 0.0, 0.3),
                },
                MaterialDesc::emissive(Color::splat(12.0)),
            )
            .as_light(),
        );

        scene.add(ShapeDesc::new(
            GeometryDesc::Sphere {
                pos: Vec3f::new(-0.4, -0.6, -0.3),
                radius: 0.4,
            },
            white,
        ));
        scene.add(ShapeDesc::new(
            GeometryDesc::Disc {
                pos: Vec3f::new(0.5, -0.55, -0.5),
                normal: Vec3f::new(-1.0, 0.3, 1.0),
                radius: 0.35,
            },
            MaterialDesc::diffuse(Color::new(0.8, 0.7, 0.3)),
        ));

        scene
    }
}

impl fmt::Display for SceneDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} shapes ({} lights), eye {:?}",
            self.shapes.len(),
            self.light_count(),
            self.camera.eye
        )
    }
}
