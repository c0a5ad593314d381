//! Scene description wire types.
//!
//! These define the I/O boundary of the engine. Rotations travel in
//! degrees and are converted to radians at load; body indices refer to
//! the concatenated statics-then-dynamics order.

use marrow_types::Scalar;
use serde::{Deserialize, Serialize};

/// Complete description of a scene.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneDescription {
    /// Scene name for display and logs.
    #[serde(default)]
    pub name: String,

    /// Static bodies (density forced to zero at load).
    #[serde(default)]
    pub statics: Vec<BodyDesc>,

    /// Dynamic bodies.
    #[serde(default)]
    pub dynamics: Vec<BodyDesc>,

    /// Joint constraints.
    #[serde(default)]
    pub joints: Vec<JointDesc>,

    /// Spring constraints.
    #[serde(default)]
    pub springs: Vec<SpringDesc>,

    /// Optional procedural fixture appended after the listed bodies.
    #[serde(default)]
    pub fixture: Option<Fixture>,
}

/// One rectangular body on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyDesc {
    /// Center position.
    pub position: [Scalar; 2],

    /// Rotation at rest, in degrees.
    #[serde(default)]
    pub rotation: Scalar,

    /// Initial generalized velocity (ẋ, ẏ, θ̇).
    #[serde(default)]
    pub init_velocity: [Scalar; 3],

    /// Extents (w, h).
    pub scale: [Scalar; 2],

    /// Coulomb friction coefficient in [0, 1].
    #[serde(default = "default_friction")]
    pub friction: Scalar,

    /// Mass density; zero makes the body static.
    #[serde(default = "default_density")]
    pub density: Scalar,

    /// Display color as a hex string, e.g. "#4080ff".
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_friction() -> Scalar {
    0.5
}

fn default_density() -> Scalar {
    1.0
}

fn default_color() -> String {
    "#ffffff".to_string()
}

/// One joint on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JointDesc {
    /// Index of body A; `None` pins body B to the world anchor in
    /// `r_a`.
    pub body_a: Option<usize>,

    /// Index of body B.
    pub body_b: usize,

    /// Local anchor on A, or the world anchor when `body_a` is `None`.
    pub r_a: [Scalar; 2],

    /// Local anchor on B.
    pub r_b: [Scalar; 2],

    /// Row stiffness (linear x, linear y, angular). JSON cannot encode
    /// infinity, so omit the field for fully hard rows; finite values
    /// make penalty rows and zero disables a row (a hinge omits the
    /// angular stiffness by passing 0).
    #[serde(default = "default_joint_stiffness")]
    pub stiffness: [Scalar; 3],

    /// Fracture threshold on the angular row.
    #[serde(default)]
    pub fracture: Option<Scalar>,
}

fn default_joint_stiffness() -> [Scalar; 3] {
    [Scalar::INFINITY, Scalar::INFINITY, Scalar::INFINITY]
}

/// One spring on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpringDesc {
    /// Index of body A.
    pub body_a: usize,

    /// Index of body B.
    pub body_b: usize,

    /// Local anchor on A.
    pub r_a: [Scalar; 2],

    /// Local anchor on B.
    pub r_b: [Scalar; 2],

    /// Scalar spring stiffness.
    pub stiffness: Scalar,

    /// Rest length.
    pub rest_length: Scalar,
}

/// Procedural fixtures with reproducible output: identical parameters
/// yield identical worlds and therefore identical trajectories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fixture {
    /// A cols×rows cloth of Neo-Hookean triangles with the top row
    /// pinned.
    ClothGrid {
        cols: usize,
        rows: usize,
        spacing: Scalar,
        particle_mass: Scalar,
        young: Scalar,
        poisson: Scalar,
        origin: [Scalar; 2],
    },

    /// A hexagonal soft-body cell: one center particle, six ring
    /// particles, six Neo-Hookean triangles.
    HexCell {
        center: [Scalar; 2],
        radius: Scalar,
        particle_mass: Scalar,
        young: Scalar,
        poisson: Scalar,
    },

    /// A cols×rows cantilever of StVK triangles with the right column
    /// pinned by hard joints.
    CantileverBeam {
        cols: usize,
        rows: usize,
        spacing: Scalar,
        particle_mass: Scalar,
        mu: Scalar,
        lambda: Scalar,
        origin: [Scalar; 2],
    },
}

/// Parses a "#rrggbb" hex color into packed RGB.
pub fn parse_color(hex: &str) -> Option<u32> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}
