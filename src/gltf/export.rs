//! Export methods for [`GltfBuilder`]: document assembly, GLB container
//! framing, and sidecar `.gltf`/`.bin` writing.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

use super::builder::GltfBuilder;
use super::types::{GltfAsset, GltfBuffer, GltfDocument, GltfScene};
use crate::error::{Error, Result};

/// GLB header magic, "glTF" as a little-endian u32.
pub const GLB_MAGIC: u32 = 0x46546C67;
/// GLB container version.
pub const GLB_VERSION: u32 = 2;
/// JSON chunk type, "JSON".
pub const CHUNK_JSON: u32 = 0x4E4F534A;
/// Binary chunk type, "BIN\0".
pub const CHUNK_BIN: u32 = 0x004E4942;

fn align4(len: usize) -> usize {
    (len + 3) & !3
}

impl GltfBuilder {
    pub(crate) fn build_document(self, buffer_uri: Option<String>) -> (GltfDocument, Vec<u8>) {
        let scene_nodes: Vec<usize> = (0..self.nodes.len()).collect();

        let doc = GltfDocument {
            asset: GltfAsset {
                version: "2.0".to_string(),
                generator: Some(format!("bimgltf {}", env!("CARGO_PKG_VERSION"))),
            },
            scene: 0,
            scenes: vec![GltfScene {
                name: Some("Scene".to_string()),
                nodes: scene_nodes,
            }],
            nodes: self.nodes,
            meshes: self.meshes,
            accessors: self.accessors,
            buffer_views: self.buffer_views,
            buffers: vec![GltfBuffer {
                uri: buffer_uri,
                byte_length: self.buffer.len(),
            }],
            materials: self.materials,
        };

        (doc, self.buffer)
    }

    /// Build GLB data and return as bytes.
    ///
    /// # Errors
    /// Returns an error if JSON serialization fails.
    pub fn build_glb(self) -> Result<Vec<u8>> {
        let (doc, buffer) = self.build_document(None);
        let mut output = Vec::new();
        write_glb(&mut output, &doc, &buffer)?;
        Ok(output)
    }

    /// Export as a GLB file.
    ///
    /// # Errors
    /// Returns an error if serialization or file writing fails.
    pub fn export_glb(self, path: &Path) -> Result<()> {
        let (doc, buffer) = self.build_document(None);
        let mut writer = BufWriter::new(File::create(path)?);
        write_glb(&mut writer, &doc, &buffer)?;
        writer.flush()?;
        Ok(())
    }

    /// Export as separate `.gltf` (JSON) and `.bin` (binary buffer) files.
    ///
    /// The buffer URI is the output's base name with a `.bin` extension, as
    /// a bare filename with no path components.
    ///
    /// # Errors
    /// Returns an error if serialization or file writing fails.
    pub fn export_gltf(self, path: &Path) -> Result<()> {
        let bin_filename = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| format!("{s}.bin"))
            .ok_or_else(|| Error::InvalidOutputPath(path.display().to_string()))?;
        let bin_path = path.with_file_name(&bin_filename);

        let (doc, buffer) = self.build_document(Some(bin_filename));

        let json = to_json_text(&doc, true)?;
        let mut gltf_file = File::create(path)?;
        gltf_file.write_all(json.as_bytes())?;

        // The sidecar carries the raw concatenation, no framing.
        let mut bin_file = File::create(&bin_path)?;
        bin_file.write_all(&buffer)?;

        Ok(())
    }
}

fn to_json_text(doc: &GltfDocument, pretty: bool) -> Result<String> {
    let result = if pretty {
        serde_json::to_string_pretty(doc)
    } else {
        serde_json::to_string(doc)
    };
    result.map_err(|e| Error::SerializationFailed {
        message: e.to_string(),
    })
}

/// Write the GLB container: 12-byte header, space-padded JSON chunk, and a
/// zero-padded binary chunk. An empty blob omits the binary chunk and its
/// 8-byte chunk header entirely.
fn write_glb<W: Write>(writer: &mut W, doc: &GltfDocument, buffer: &[u8]) -> Result<()> {
    let json = to_json_text(doc, false)?;
    let json_bytes = json.as_bytes();
    let json_chunk_len = align4(json_bytes.len());
    let bin_chunk_len = align4(buffer.len());

    let total_len = 12
        + 8
        + json_chunk_len
        + if buffer.is_empty() { 0 } else { 8 + bin_chunk_len };

    writer.write_u32::<LittleEndian>(GLB_MAGIC)?;
    writer.write_u32::<LittleEndian>(GLB_VERSION)?;
    writer.write_u32::<LittleEndian>(total_len as u32)?;

    writer.write_u32::<LittleEndian>(json_chunk_len as u32)?;
    writer.write_u32::<LittleEndian>(CHUNK_JSON)?;
    writer.write_all(json_bytes)?;
    for _ in json_bytes.len()..json_chunk_len {
        writer.write_u8(b' ')?;
    }

    if !buffer.is_empty() {
        writer.write_u32::<LittleEndian>(bin_chunk_len as u32)?;
        writer.write_u32::<LittleEndian>(CHUNK_BIN)?;
        writer.write_all(buffer)?;
        for _ in buffer.len()..bin_chunk_len {
            writer.write_u8(0)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::GeometryRecord;
    use glam::Mat4;

    fn builder_with_triangle() -> GltfBuilder {
        let mut record = GeometryRecord::default();
        record.add_face(
            &crate::shape::ShapeFace {
                vertices: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
                normal: [0.0, 0.0, 1.0],
            },
            &Mat4::IDENTITY,
        );
        record.compute_bounds();

        let mut builder = GltfBuilder::new();
        let prim = builder.add_record(&record, 0);
        builder.add_object("Tri", vec![prim]);
        builder
    }

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn glb_header_and_chunk_framing() {
        let glb = builder_with_triangle().build_glb().unwrap();

        assert_eq!(u32_at(&glb, 0), GLB_MAGIC);
        assert_eq!(&glb[0..4], b"glTF");
        assert_eq!(u32_at(&glb, 4), GLB_VERSION);
        assert_eq!(u32_at(&glb, 8) as usize, glb.len());

        let json_len = u32_at(&glb, 12) as usize;
        assert_eq!(json_len % 4, 0);
        assert_eq!(u32_at(&glb, 16), CHUNK_JSON);

        let bin_header = 12 + 8 + json_len;
        let bin_len = u32_at(&glb, bin_header) as usize;
        assert_eq!(bin_len % 4, 0);
        assert_eq!(u32_at(&glb, bin_header + 4), CHUNK_BIN);
        assert_eq!(glb.len(), bin_header + 8 + bin_len);
    }

    #[test]
    fn json_chunk_is_padded_with_spaces() {
        let glb = builder_with_triangle().build_glb().unwrap();
        let json_len = u32_at(&glb, 12) as usize;
        let json_bytes = &glb[20..20 + json_len];

        // Padding, if any, is trailing ASCII spaces after the closing brace.
        let text = std::str::from_utf8(json_bytes).unwrap();
        assert_eq!(text.trim_end_matches(' ').as_bytes().last(), Some(&b'}'));
        serde_json::from_str::<serde_json::Value>(text).unwrap();
    }

    #[test]
    fn empty_blob_omits_the_binary_chunk() {
        let glb = GltfBuilder::new().build_glb().unwrap();
        let json_len = u32_at(&glb, 12) as usize;

        assert_eq!(glb.len(), 12 + 8 + json_len);
        assert_eq!(u32_at(&glb, 8) as usize, glb.len());
    }

    #[test]
    fn sidecar_document_names_the_bin_file() {
        let (doc, _) = builder_with_triangle().build_document(Some("model.bin".to_string()));
        assert_eq!(doc.buffers.len(), 1);
        assert_eq!(doc.buffers[0].uri.as_deref(), Some("model.bin"));
        assert_eq!(doc.buffers[0].byte_length, 84);
    }

    #[test]
    fn glb_document_has_no_buffer_uri() {
        let (doc, buffer) = builder_with_triangle().build_document(None);
        assert!(doc.buffers[0].uri.is_none());
        assert_eq!(doc.buffers[0].byte_length, buffer.len());
    }
}
