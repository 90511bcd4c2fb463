//! Scene flattening: shape tree → flat node list with triangle-soup records.

mod flatten;
mod geometry;
mod materials;

pub use flatten::{SceneFlattener, SceneNode, SceneStats};
pub use geometry::GeometryRecord;
pub use materials::{DEFAULT_MATERIAL_KEY, MaterialRecord, MaterialRegistry};
