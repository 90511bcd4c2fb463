//! Resolved shape-tree handoff from the external geometry pipeline.
//!
//! Parsing the building-model file, resolving entity relationships, and
//! evaluating solid geometry all happen outside this crate. The geometry
//! pipeline hands over one [`ShapeNode`] per object, carrying display-name
//! candidates, a coarse type label, a local-to-global transform, polygon
//! meshes with per-face normals, appearance colors, and child objects.

mod reader;

pub use reader::{parse_scene, read_scene};

use glam::Mat4;
use serde::{Deserialize, Serialize};

/// A resolved scene: the root shape nodes of one building model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedScene {
    /// Top-level shape objects, in model order.
    pub nodes: Vec<ShapeNode>,
}

/// One shape-data object in the resolved tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeNode {
    /// Explicit display name, when the source object carries one.
    #[serde(default)]
    pub name: Option<String>,
    /// Globally unique identifier, used as a name fallback.
    #[serde(default)]
    pub global_id: Option<String>,
    /// Coarse type label derived from the source object variant.
    #[serde(default)]
    pub type_label: Option<String>,
    /// Row-major local-to-global transform. Ancestor placement is already
    /// applied by the geometry pipeline; rows are never re-multiplied here.
    #[serde(default = "identity_transform")]
    pub transform: [[f32; 4]; 4],
    /// Closed (solid) polygon meshes.
    #[serde(default)]
    pub closed_meshes: Vec<ShapeMesh>,
    /// Open (shell/surface) polygon meshes.
    #[serde(default)]
    pub open_meshes: Vec<ShapeMesh>,
    /// Appearance colors attached to this object.
    #[serde(default)]
    pub appearances: Vec<Appearance>,
    /// Child shape objects.
    #[serde(default)]
    pub children: Vec<ShapeNode>,
}

impl Default for ShapeNode {
    fn default() -> Self {
        Self {
            name: None,
            global_id: None,
            type_label: None,
            transform: identity_transform(),
            closed_meshes: Vec::new(),
            open_meshes: Vec::new(),
            appearances: Vec::new(),
            children: Vec::new(),
        }
    }
}

impl ShapeNode {
    /// The node's transform as a [`Mat4`].
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        // Stored row-major; glam is column-major.
        Mat4::from_cols_array_2d(&self.transform).transpose()
    }

    /// True when this node carries at least one mesh of its own.
    #[must_use]
    pub fn has_meshes(&self) -> bool {
        !self.closed_meshes.is_empty() || !self.open_meshes.is_empty()
    }
}

/// A polygon mesh: a list of faces.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ShapeMesh {
    /// Faces of this mesh.
    pub faces: Vec<ShapeFace>,
}

/// One polygonal face: an ordered vertex loop plus a face normal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeFace {
    /// Ordered vertex loop in local coordinates. May be non-convex; loops
    /// with fewer than 3 vertices are degenerate and silently dropped.
    pub vertices: Vec<[f32; 3]>,
    /// Face normal, assigned to every corner of the derived triangles.
    pub normal: [f32; 3],
}

/// An appearance color. Usable only when at least 4 components (RGBA) are
/// present; shorter color vectors are skipped during material resolution.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Appearance {
    /// Color components, RGBA order.
    pub color_rgba: Vec<f32>,
}

fn identity_transform() -> [[f32; 4]; 4] {
    [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}
