//! glTF document builder.
//!
//! Accessor and buffer-view indices are derived from the builder's own array
//! positions, and byte offsets from the blob length at append time, so the
//! five interlinked arrays stay consistent by construction.

use super::types::{
    GltfAccessor, GltfAttributes, GltfBufferView, GltfMaterial, GltfMesh, GltfNode, GltfPrimitive,
};
use crate::scene::GeometryRecord;

pub(crate) const COMPONENT_F32: u32 = 5126;
pub(crate) const COMPONENT_U32: u32 = 5125;
pub(crate) const TARGET_ARRAY_BUFFER: u32 = 34962;
pub(crate) const TARGET_ELEMENT_ARRAY_BUFFER: u32 = 34963;

/// Builder for the node/mesh/accessor/bufferView graph and its backing blob.
pub struct GltfBuilder {
    pub(crate) buffer: Vec<u8>,
    pub(crate) nodes: Vec<GltfNode>,
    pub(crate) meshes: Vec<GltfMesh>,
    pub(crate) accessors: Vec<GltfAccessor>,
    pub(crate) buffer_views: Vec<GltfBufferView>,
    pub(crate) materials: Vec<GltfMaterial>,
}

impl GltfBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            nodes: Vec::new(),
            meshes: Vec::new(),
            accessors: Vec::new(),
            buffer_views: Vec::new(),
            materials: Vec::new(),
        }
    }

    /// Total bytes appended to the binary blob so far.
    #[must_use]
    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    /// Append one geometry record: its vertex, normal and index bytes, three
    /// buffer views and three accessors. Returns the primitive referencing
    /// the new accessors.
    ///
    /// The blob layout is vertices, then normals, then indices, back to
    /// back. Every element is 4 bytes wide, so offsets stay 4-byte aligned
    /// without padding between the sections.
    pub fn add_record(&mut self, record: &GeometryRecord, material: usize) -> GltfPrimitive {
        let position = self.add_positions(record);
        let normal = self.add_normals(record);
        let indices = self.add_indices(record);

        GltfPrimitive {
            attributes: GltfAttributes { position, normal },
            indices,
            material,
        }
    }

    /// Append a scene object as a node plus its mesh. Mesh index equals node
    /// index: every appended object carries geometry, and geometry-empty
    /// objects are never appended.
    pub fn add_object(&mut self, name: &str, primitives: Vec<GltfPrimitive>) -> usize {
        let mesh_idx = self.meshes.len();
        self.meshes.push(GltfMesh {
            name: format!("{name}_Mesh"),
            primitives,
        });

        let node_idx = self.nodes.len();
        debug_assert_eq!(node_idx, mesh_idx);
        self.nodes.push(GltfNode {
            name: name.to_string(),
            mesh: Some(mesh_idx),
        });
        node_idx
    }

    /// Set the document's material array.
    pub fn set_materials(&mut self, materials: Vec<GltfMaterial>) {
        self.materials = materials;
    }

    fn add_positions(&mut self, record: &GeometryRecord) -> usize {
        let byte_offset = self.buffer.len();
        for &v in &record.vertices {
            self.buffer.extend_from_slice(&v.to_le_bytes());
        }

        let bv_idx = self.buffer_views.len();
        self.buffer_views.push(GltfBufferView {
            buffer: 0,
            byte_offset,
            byte_length: record.vertices.len() * 4,
            target: TARGET_ARRAY_BUFFER,
        });

        let acc_idx = self.accessors.len();
        self.accessors.push(GltfAccessor {
            buffer_view: bv_idx,
            component_type: COMPONENT_F32,
            count: record.vertex_count(),
            accessor_type: "VEC3",
            min: Some(record.min_bounds),
            max: Some(record.max_bounds),
        });

        acc_idx
    }

    fn add_normals(&mut self, record: &GeometryRecord) -> usize {
        let byte_offset = self.buffer.len();
        for &v in &record.normals {
            self.buffer.extend_from_slice(&v.to_le_bytes());
        }

        let bv_idx = self.buffer_views.len();
        self.buffer_views.push(GltfBufferView {
            buffer: 0,
            byte_offset,
            byte_length: record.normals.len() * 4,
            target: TARGET_ARRAY_BUFFER,
        });

        let acc_idx = self.accessors.len();
        self.accessors.push(GltfAccessor {
            buffer_view: bv_idx,
            component_type: COMPONENT_F32,
            count: record.vertex_count(),
            accessor_type: "VEC3",
            min: None,
            max: None,
        });

        acc_idx
    }

    fn add_indices(&mut self, record: &GeometryRecord) -> usize {
        let byte_offset = self.buffer.len();
        for &idx in &record.indices {
            self.buffer.extend_from_slice(&idx.to_le_bytes());
        }

        let bv_idx = self.buffer_views.len();
        self.buffer_views.push(GltfBufferView {
            buffer: 0,
            byte_offset,
            byte_length: record.indices.len() * 4,
            target: TARGET_ELEMENT_ARRAY_BUFFER,
        });

        let acc_idx = self.accessors.len();
        self.accessors.push(GltfAccessor {
            buffer_view: bv_idx,
            component_type: COMPONENT_U32,
            count: record.indices.len(),
            accessor_type: "SCALAR",
            min: None,
            max: None,
        });

        acc_idx
    }
}

impl Default for GltfBuilder {
    fn default() -> Self {
        Self::new()
    }
}
