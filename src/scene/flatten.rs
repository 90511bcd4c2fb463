//! Scene flattening: depth-first walk of the shape tree into a flat node
//! list, merging each subtree's geometry into its top-level node.

use tracing::{debug, warn};

use super::geometry::GeometryRecord;
use super::materials::MaterialRegistry;
use crate::shape::ShapeNode;

/// One flattened scene object.
///
/// The synthetic root ("Scene") owns the surviving top-level nodes as
/// children; flattened nodes own their geometry records. Ownership is
/// strictly tree-shaped.
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Display name.
    pub name: String,
    /// Coarse type label of the source object.
    pub type_label: String,
    /// Child nodes (only the synthetic root has any).
    pub children: Vec<SceneNode>,
    /// Geometry records merged from this object's entire subtree.
    pub geometries: Vec<GeometryRecord>,
}

impl SceneNode {
    /// The synthetic scene root.
    #[must_use]
    pub fn scene_root() -> Self {
        Self {
            name: "Scene".to_string(),
            type_label: "Scene".to_string(),
            children: Vec::new(),
            geometries: Vec::new(),
        }
    }
}

/// Aggregate counters over the flattened scene.
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneStats {
    /// Nodes that survived pruning (own at least one non-empty record).
    pub objects: usize,
    /// Non-empty geometry records across all nodes.
    pub records: usize,
    /// Total vertices.
    pub vertices: usize,
    /// Total triangles.
    pub triangles: usize,
}

/// Flattens a shape tree into the synthetic scene root.
pub struct SceneFlattener<'a> {
    registry: &'a mut MaterialRegistry,
    scale: f32,
    stats: SceneStats,
}

impl<'a> SceneFlattener<'a> {
    /// Create a flattener writing materials into `registry`.
    pub fn new(registry: &'a mut MaterialRegistry, scale: f32) -> Self {
        Self {
            registry,
            scale,
            stats: SceneStats::default(),
        }
    }

    /// Flatten the root shape nodes.
    ///
    /// Phase 1 collects each top-level subtree's geometry into one record
    /// list; phase 2 appends a scene node only when that list is non-empty.
    /// Geometry-empty branches are pruned at the node level, but the walk
    /// still recurses through them to reach descendants.
    pub fn flatten(mut self, roots: &[ShapeNode]) -> (SceneNode, SceneStats) {
        let mut root = SceneNode::scene_root();

        for shape in roots {
            let mut records = Vec::new();
            self.collect(shape, &mut records);
            if records.is_empty() {
                continue;
            }

            self.stats.objects += 1;
            for record in &records {
                self.stats.records += 1;
                self.stats.vertices += record.vertex_count();
                self.stats.triangles += record.triangle_count();
            }

            root.children.push(SceneNode {
                name: display_name(shape),
                type_label: type_label(shape),
                children: Vec::new(),
                geometries: records,
            });
        }

        (root, self.stats)
    }

    fn collect(&mut self, shape: &ShapeNode, records: &mut Vec<GeometryRecord>) {
        let matrix = shape.matrix();
        if !matrix.is_finite() {
            warn!(
                "skipping subtree of {}: transform has non-finite components",
                display_name(shape)
            );
            return;
        }

        if shape.has_meshes() {
            let material_id = self.registry.resolve(&shape.appearances);
            let mut record = GeometryRecord::new(material_id);
            for mesh in shape.closed_meshes.iter().chain(&shape.open_meshes) {
                record.add_mesh(mesh, &matrix);
            }
            if !record.is_empty() {
                record.apply_scale(self.scale);
                record.compute_bounds();
                debug!(
                    vertices = record.vertex_count(),
                    triangles = record.triangle_count(),
                    material = %record.material_id,
                    "accumulated geometry record"
                );
                records.push(record);
            }
        }

        for child in &shape.children {
            self.collect(child, records);
        }
    }
}

fn display_name(shape: &ShapeNode) -> String {
    if let Some(name) = &shape.name {
        if !name.is_empty() {
            return name.clone();
        }
    }
    if let Some(id) = &shape.global_id {
        if !id.is_empty() {
            return id.clone();
        }
    }
    "Unnamed".to_string()
}

fn type_label(shape: &ShapeNode) -> String {
    shape
        .type_label
        .clone()
        .filter(|label| !label.is_empty())
        .unwrap_or_else(|| "Product".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{Appearance, ShapeFace, ShapeMesh};

    fn triangle_mesh() -> ShapeMesh {
        ShapeMesh {
            faces: vec![ShapeFace {
                vertices: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
                normal: [0.0, 0.0, 1.0],
            }],
        }
    }

    fn flatten(roots: &[ShapeNode]) -> (SceneNode, SceneStats) {
        let mut registry = MaterialRegistry::new();
        SceneFlattener::new(&mut registry, 1.0).flatten(roots)
    }

    #[test]
    fn subtree_geometry_merges_into_the_top_level_node() {
        let roots = [ShapeNode {
            name: Some("Wall".to_string()),
            closed_meshes: vec![triangle_mesh()],
            children: vec![ShapeNode {
                name: Some("Opening".to_string()),
                open_meshes: vec![triangle_mesh()],
                ..ShapeNode::default()
            }],
            ..ShapeNode::default()
        }];

        let (root, stats) = flatten(&roots);
        assert_eq!(root.children.len(), 1);
        let node = &root.children[0];
        assert_eq!(node.name, "Wall");
        // Parent record first, then the child's.
        assert_eq!(node.geometries.len(), 2);
        assert_eq!(stats.objects, 1);
        assert_eq!(stats.triangles, 2);
    }

    #[test]
    fn empty_branches_are_pruned_but_still_walked() {
        let roots = [
            ShapeNode {
                name: Some("EmptyGroup".to_string()),
                children: vec![ShapeNode {
                    name: Some("Slab".to_string()),
                    closed_meshes: vec![triangle_mesh()],
                    ..ShapeNode::default()
                }],
                ..ShapeNode::default()
            },
            ShapeNode {
                name: Some("NothingHere".to_string()),
                ..ShapeNode::default()
            },
        ];

        let (root, stats) = flatten(&roots);
        // The group survives through its descendant; the bare node does not.
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].name, "EmptyGroup");
        assert_eq!(stats.objects, 1);
    }

    #[test]
    fn name_falls_back_to_global_id_then_unnamed() {
        let roots = [
            ShapeNode {
                global_id: Some("2O2Fr$t4X7Zf8NOew3FLOH".to_string()),
                closed_meshes: vec![triangle_mesh()],
                ..ShapeNode::default()
            },
            ShapeNode {
                closed_meshes: vec![triangle_mesh()],
                ..ShapeNode::default()
            },
        ];

        let (root, _) = flatten(&roots);
        assert_eq!(root.children[0].name, "2O2Fr$t4X7Zf8NOew3FLOH");
        assert_eq!(root.children[1].name, "Unnamed");
        assert_eq!(root.children[1].type_label, "Product");
    }

    #[test]
    fn non_finite_transform_skips_the_subtree() {
        let mut bad = ShapeNode {
            name: Some("Broken".to_string()),
            closed_meshes: vec![triangle_mesh()],
            children: vec![ShapeNode {
                closed_meshes: vec![triangle_mesh()],
                ..ShapeNode::default()
            }],
            ..ShapeNode::default()
        };
        bad.transform[0][0] = f32::NAN;

        let (root, stats) = flatten(&[bad]);
        assert!(root.children.is_empty());
        assert_eq!(stats.objects, 0);
    }

    #[test]
    fn materials_resolve_per_object_with_geometry() {
        let roots = [ShapeNode {
            name: Some("Colored".to_string()),
            closed_meshes: vec![triangle_mesh()],
            appearances: vec![Appearance {
                color_rgba: vec![0.2, 0.4, 0.6, 1.0],
            }],
            ..ShapeNode::default()
        }];

        let mut registry = MaterialRegistry::new();
        let (root, _) = SceneFlattener::new(&mut registry, 1.0).flatten(&roots);
        assert_eq!(root.children[0].geometries[0].material_id, "Material_1");
        assert_eq!(registry.len(), 1);
    }
}
