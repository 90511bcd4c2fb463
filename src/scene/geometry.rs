//! Geometry accumulation: fan triangulation, transform, scale, bounds.

use glam::{Mat4, Vec3};

use crate::shape::{ShapeFace, ShapeMesh};

/// Flat triangle soup for one scene object, ready for buffer emission.
///
/// Vertices are never shared between triangles: every corner is a fresh
/// entry, so the per-face normal stays per-corner (flat shading). Texture
/// coordinates are zero-filled placeholders and are not emitted.
#[derive(Debug, Clone, Default)]
pub struct GeometryRecord {
    /// Vertex coordinates, x/y/z triplets.
    pub vertices: Vec<f32>,
    /// Normal vectors, one triplet per vertex.
    pub normals: Vec<f32>,
    /// Texture coordinates, one u/v pair per vertex, always zero.
    pub tex_coords: Vec<f32>,
    /// Triangle indices into this record's own vertex array.
    pub indices: Vec<u32>,
    /// Key into the material registry.
    pub material_id: String,
    /// Component-wise minimum over all vertices, after scaling.
    pub min_bounds: [f32; 3],
    /// Component-wise maximum over all vertices, after scaling.
    pub max_bounds: [f32; 3],
}

impl GeometryRecord {
    /// Create an empty record bound to a material key.
    #[must_use]
    pub fn new(material_id: String) -> Self {
        Self {
            material_id,
            ..Self::default()
        }
    }

    /// Number of vertices in this record.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Number of triangles in this record.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// True when no triangle survived accumulation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Append every face of a mesh.
    pub fn add_mesh(&mut self, mesh: &ShapeMesh, transform: &Mat4) {
        for face in &mesh.faces {
            self.add_face(face, transform);
        }
    }

    /// Fan-triangulate one face loop and append the triangles, transformed
    /// to global coordinates.
    ///
    /// Loops with fewer than 3 vertices are dropped without error. The face
    /// normal is repeated on every corner. Correctness of the fan is only
    /// guaranteed for convex loops.
    pub fn add_face(&mut self, face: &ShapeFace, transform: &Mat4) {
        if face.vertices.len() < 3 {
            return;
        }
        let v0 = transform.transform_point3(Vec3::from(face.vertices[0]));
        for i in 1..face.vertices.len() - 1 {
            let v1 = transform.transform_point3(Vec3::from(face.vertices[i]));
            let v2 = transform.transform_point3(Vec3::from(face.vertices[i + 1]));
            self.push_triangle(v0, v1, v2, face.normal);
        }
    }

    fn push_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3, normal: [f32; 3]) {
        let base = (self.vertices.len() / 3) as u32;
        for p in [a, b, c] {
            self.vertices.extend_from_slice(&[p.x, p.y, p.z]);
            self.normals.extend_from_slice(&normal);
            self.tex_coords.extend_from_slice(&[0.0, 0.0]);
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    /// Multiply every vertex coordinate in place. Normals stay unit-length
    /// direction vectors and are not touched.
    pub fn apply_scale(&mut self, scale: f32) {
        if scale == 1.0 {
            return;
        }
        for v in &mut self.vertices {
            *v *= scale;
        }
    }

    /// Compute the bounding box as the component-wise min/max over all
    /// vertices. Zero-vertex records keep zeroed bounds.
    pub fn compute_bounds(&mut self) {
        if self.vertices.is_empty() {
            return;
        }
        let mut min = [self.vertices[0], self.vertices[1], self.vertices[2]];
        let mut max = min;
        for v in self.vertices.chunks_exact(3) {
            for j in 0..3 {
                min[j] = min[j].min(v[j]);
                max[j] = max[j].max(v[j]);
            }
        }
        self.min_bounds = min;
        self.max_bounds = max;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ShapeFace;

    fn quad() -> ShapeFace {
        ShapeFace {
            vertices: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            normal: [0.0, 0.0, 1.0],
        }
    }

    #[test]
    fn fan_triangulation_produces_n_minus_2_triangles() {
        let mut record = GeometryRecord::default();
        record.add_face(&quad(), &Mat4::IDENTITY);

        assert_eq!(record.triangle_count(), 2);
        assert_eq!(record.vertex_count(), 6);
        assert_eq!(record.indices, vec![0, 1, 2, 3, 4, 5]);
        // Both triangles share the loop's first vertex.
        assert_eq!(&record.vertices[0..3], &[0.0, 0.0, 0.0]);
        assert_eq!(&record.vertices[9..12], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn degenerate_faces_are_dropped() {
        let mut record = GeometryRecord::default();
        record.add_face(
            &ShapeFace {
                vertices: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
                normal: [0.0, 0.0, 1.0],
            },
            &Mat4::IDENTITY,
        );
        record.add_face(
            &ShapeFace {
                vertices: vec![],
                normal: [0.0, 0.0, 1.0],
            },
            &Mat4::IDENTITY,
        );
        assert!(record.is_empty());
        assert!(record.indices.is_empty());
    }

    #[test]
    fn face_normal_is_repeated_per_corner() {
        let mut record = GeometryRecord::default();
        record.add_face(&quad(), &Mat4::IDENTITY);
        for n in record.normals.chunks_exact(3) {
            assert_eq!(n, &[0.0, 0.0, 1.0]);
        }
        for uv in record.tex_coords.chunks_exact(2) {
            assert_eq!(uv, &[0.0, 0.0]);
        }
        assert_eq!(record.tex_coords.len() / 2, record.vertex_count());
    }

    #[test]
    fn transform_is_applied_per_vertex() {
        let mut record = GeometryRecord::default();
        let translate = Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0));
        record.add_face(&quad(), &translate);
        assert_eq!(&record.vertices[0..3], &[10.0, 0.0, 0.0]);
        assert_eq!(&record.vertices[3..6], &[11.0, 0.0, 0.0]);
    }

    #[test]
    fn scale_moves_vertices_not_normals() {
        let mut record = GeometryRecord::default();
        record.add_face(&quad(), &Mat4::IDENTITY);
        let normals_before = record.normals.clone();

        record.apply_scale(0.5);
        record.compute_bounds();

        assert_eq!(&record.vertices[3..6], &[0.5, 0.0, 0.0]);
        assert_eq!(record.normals, normals_before);
        assert_eq!(record.min_bounds, [0.0, 0.0, 0.0]);
        assert_eq!(record.max_bounds, [0.5, 0.5, 0.0]);
    }

    #[test]
    fn indices_stay_in_range_across_faces() {
        let mut record = GeometryRecord::default();
        record.add_face(&quad(), &Mat4::IDENTITY);
        record.add_face(&quad(), &Mat4::IDENTITY);

        assert_eq!(record.indices.len() % 3, 0);
        let vertex_count = record.vertex_count() as u32;
        assert!(record.indices.iter().all(|&i| i < vertex_count));
    }
}
