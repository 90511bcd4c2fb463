//! # bimgltf
//!
//! Convert a resolved building-model scene graph into glTF 2.0 assets.
//!
//! The crate sits downstream of an IFC-parsing/geometry pipeline: that
//! collaborator resolves entities, evaluates solids, and hands over a tree
//! of [`shape::ShapeNode`]s carrying polygon meshes, transforms, and
//! appearance colors. This crate flattens the tree into a node/mesh list,
//! fan-triangulates the faces, deduplicates appearance records into a
//! material registry, and emits either a `.gltf` JSON document with a
//! sidecar `.bin` buffer or a single binary `.glb` container.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use bimgltf::convert::{convert_file, ConvertOptions, OutputFormat};
//!
//! let options = ConvertOptions {
//!     format: OutputFormat::Glb,
//!     ..ConvertOptions::default()
//! };
//! let summary = convert_file(Path::new("scene.json"), Path::new("model.glb"), &options)?;
//! println!("{} triangles exported", summary.triangles);
//! # Ok::<(), bimgltf::Error>(())
//! ```
//!
//! In-memory conversion, without touching disk:
//!
//! ```
//! use bimgltf::convert::{build_glb_bytes, ConvertOptions};
//! use bimgltf::shape::ShapeNode;
//!
//! let roots: Vec<ShapeNode> = Vec::new();
//! let glb = build_glb_bytes(&roots, &ConvertOptions::default())?;
//! assert_eq!(&glb[0..4], b"glTF");
//! # Ok::<(), bimgltf::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `bimgltf` command-line binary

pub mod convert;
pub mod error;
pub mod gltf;
pub mod scene;
pub mod shape;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::convert::{
        ConvertOptions, ConvertPhase, ConvertProgress, ConvertSummary, OutputFormat,
        build_glb_bytes, convert_file, convert_file_with_progress, convert_scene,
        convert_scene_with_progress,
    };
    pub use crate::error::{Error, Result};
    pub use crate::gltf::GltfBuilder;
    pub use crate::scene::{
        GeometryRecord, MaterialRecord, MaterialRegistry, SceneFlattener, SceneNode, SceneStats,
    };
    pub use crate::shape::{
        Appearance, ResolvedScene, ShapeFace, ShapeMesh, ShapeNode, parse_scene, read_scene,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
