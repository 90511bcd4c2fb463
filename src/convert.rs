//! Conversion pipeline: resolved shape tree → glTF/GLB on disk.

use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::gltf::GltfBuilder;
use crate::gltf::types::{GltfMaterial, GltfPbrMetallicRoughness};
use crate::scene::{MaterialRecord, MaterialRegistry, SceneFlattener, SceneNode, SceneStats};
use crate::shape::{self, ShapeNode};

// ============================================================================
// Configuration
// ============================================================================

/// Output container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// JSON `.gltf` with a sidecar `.bin` buffer.
    #[default]
    Gltf,
    /// Single-file binary `.glb` container.
    Glb,
}

impl OutputFormat {
    /// Infer the format from an output path extension (`.glb` → GLB,
    /// anything else → glTF).
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("glb") => Self::Glb,
            _ => Self::Gltf,
        }
    }

    /// Human-readable format name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gltf => "glTF",
            Self::Glb => "GLB",
        }
    }
}

/// Conversion configuration.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Uniform scale applied to every vertex coordinate. Must be > 0.
    pub scale: f32,
    /// Output container format.
    pub format: OutputFormat,
    /// Emit one glTF material per registry entry and reference it from each
    /// primitive, instead of the single default material slot.
    pub per_object_materials: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            format: OutputFormat::default(),
            per_object_materials: false,
        }
    }
}

impl ConvertOptions {
    /// Check the configuration before conversion starts.
    ///
    /// # Errors
    /// Returns an error for a non-positive (or non-finite) scale factor.
    pub fn validate(&self) -> Result<()> {
        if !(self.scale > 0.0) || !self.scale.is_finite() {
            return Err(crate::error::Error::InvalidScale { scale: self.scale });
        }
        Ok(())
    }
}

// ============================================================================
// Progress
// ============================================================================

/// Progress callback type for conversion operations. The callback is a
/// write-only sink; it never influences control flow.
pub type ProgressCallback<'a> = &'a (dyn Fn(&ConvertProgress) + Sync + Send);

/// Progress information during a conversion.
#[derive(Debug, Clone)]
pub struct ConvertProgress {
    /// Current operation phase.
    pub phase: ConvertPhase,
    /// Current step number (1-indexed).
    pub current: usize,
    /// Total number of steps.
    pub total: usize,
    /// File or item being processed, if applicable.
    pub detail: Option<String>,
}

impl ConvertProgress {
    /// Create a new progress update.
    #[must_use]
    pub fn new(phase: ConvertPhase, current: usize, total: usize) -> Self {
        Self {
            phase,
            current,
            total,
            detail: None,
        }
    }

    /// Create a progress update carrying a file or item name.
    #[must_use]
    pub fn with_detail(
        phase: ConvertPhase,
        current: usize,
        total: usize,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            phase,
            current,
            total,
            detail: Some(detail.into()),
        }
    }

    /// Get the progress fraction (0.0 - 1.0).
    #[must_use]
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.current as f32 / self.total as f32
        }
    }
}

/// Phase of a conversion operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertPhase {
    /// Reading the resolved scene file.
    LoadingScene,
    /// Flattening the shape tree.
    FlatteningScene,
    /// Building the glTF document structure.
    BuildingDocument,
    /// Writing glTF/GLB output.
    WritingOutput,
    /// Operation complete.
    Complete,
}

impl ConvertPhase {
    /// Human-readable description of this phase.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LoadingScene => "Loading scene",
            Self::FlatteningScene => "Flattening scene",
            Self::BuildingDocument => "Building document",
            Self::WritingOutput => "Writing output",
            Self::Complete => "Complete",
        }
    }
}

/// Counters reported after a successful conversion.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertSummary {
    /// Scene nodes that survived pruning.
    pub nodes: usize,
    /// Geometry records across all nodes.
    pub records: usize,
    /// Total vertices.
    pub vertices: usize,
    /// Total triangles.
    pub triangles: usize,
    /// Total bytes in the binary buffer.
    pub buffer_bytes: usize,
}

impl ConvertSummary {
    fn from_stats(stats: SceneStats, buffer_bytes: usize) -> Self {
        Self {
            nodes: stats.objects,
            records: stats.records,
            vertices: stats.vertices,
            triangles: stats.triangles,
            buffer_bytes,
        }
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Convert a resolved scene file to glTF/GLB.
///
/// # Errors
/// Returns an error if loading, conversion, or writing fails.
pub fn convert_file(input: &Path, output: &Path, options: &ConvertOptions) -> Result<ConvertSummary> {
    convert_file_with_progress(input, output, options, &|_| {})
}

/// Convert a resolved scene file to glTF/GLB with a progress callback.
///
/// # Errors
/// Returns an error if loading, conversion, or writing fails.
pub fn convert_file_with_progress(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
    progress: ProgressCallback,
) -> Result<ConvertSummary> {
    options.validate()?;

    progress(&ConvertProgress::with_detail(
        ConvertPhase::LoadingScene,
        1,
        4,
        input.display().to_string(),
    ));
    let scene = shape::read_scene(input)?;
    info!("loaded {} root shape objects", scene.nodes.len());

    convert_scene_with_progress(&scene.nodes, output, options, progress)
}

/// Convert an in-memory shape tree to glTF/GLB.
///
/// # Errors
/// Returns an error if conversion or writing fails.
pub fn convert_scene(
    roots: &[ShapeNode],
    output: &Path,
    options: &ConvertOptions,
) -> Result<ConvertSummary> {
    convert_scene_with_progress(roots, output, options, &|_| {})
}

/// Convert an in-memory shape tree to glTF/GLB with a progress callback.
///
/// # Errors
/// Returns an error if conversion or writing fails.
pub fn convert_scene_with_progress(
    roots: &[ShapeNode],
    output: &Path,
    options: &ConvertOptions,
    progress: ProgressCallback,
) -> Result<ConvertSummary> {
    options.validate()?;

    progress(&ConvertProgress::new(ConvertPhase::FlatteningScene, 2, 4));
    let mut registry = MaterialRegistry::new();
    let (root, stats) = SceneFlattener::new(&mut registry, options.scale).flatten(roots);
    info!(
        "flattened {} objects: {} vertices, {} triangles",
        stats.objects, stats.vertices, stats.triangles
    );

    progress(&ConvertProgress::new(ConvertPhase::BuildingDocument, 3, 4));
    let builder = build_graph(&root, &registry, options);
    let summary = ConvertSummary::from_stats(stats, builder.buffer_len());

    progress(&ConvertProgress::with_detail(
        ConvertPhase::WritingOutput,
        4,
        4,
        output.display().to_string(),
    ));
    match options.format {
        OutputFormat::Glb => builder.export_glb(output)?,
        OutputFormat::Gltf => builder.export_gltf(output)?,
    }
    info!(
        "wrote {} output to {} ({} buffer bytes)",
        options.format.as_str(),
        output.display(),
        summary.buffer_bytes
    );

    progress(&ConvertProgress::new(ConvertPhase::Complete, 4, 4));
    Ok(summary)
}

/// Convert an in-memory shape tree to GLB bytes without touching disk.
///
/// # Errors
/// Returns an error if conversion or serialization fails.
pub fn build_glb_bytes(roots: &[ShapeNode], options: &ConvertOptions) -> Result<Vec<u8>> {
    options.validate()?;
    let mut registry = MaterialRegistry::new();
    let (root, _) = SceneFlattener::new(&mut registry, options.scale).flatten(roots);
    build_graph(&root, &registry, options).build_glb()
}

fn build_graph(root: &SceneNode, registry: &MaterialRegistry, options: &ConvertOptions) -> GltfBuilder {
    let mut builder = GltfBuilder::new();

    for node in &root.children {
        let primitives = node
            .geometries
            .iter()
            .map(|record| {
                let material = if options.per_object_materials {
                    registry.index_of(&record.material_id)
                } else {
                    0
                };
                builder.add_record(record, material)
            })
            .collect();
        builder.add_object(&node.name, primitives);
    }

    builder.set_materials(emit_materials(registry, options));
    builder
}

fn emit_materials(registry: &MaterialRegistry, options: &ConvertOptions) -> Vec<GltfMaterial> {
    if options.per_object_materials && !registry.is_empty() {
        registry.records().map(to_gltf_material).collect()
    } else {
        // One fixed default slot; every primitive references index 0.
        vec![to_gltf_material(&MaterialRecord::default_record())]
    }
}

fn to_gltf_material(record: &MaterialRecord) -> GltfMaterial {
    GltfMaterial {
        name: record.name.clone(),
        pbr_metallic_roughness: GltfPbrMetallicRoughness {
            base_color_factor: record.base_color_factor,
            metallic_factor: record.metallic_factor,
            roughness_factor: record.roughness_factor,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_must_be_positive_and_finite() {
        let mut options = ConvertOptions::default();
        assert!(options.validate().is_ok());

        options.scale = 0.0;
        assert!(options.validate().is_err());
        options.scale = -2.0;
        assert!(options.validate().is_err());
        options.scale = f32::NAN;
        assert!(options.validate().is_err());
    }

    #[test]
    fn format_is_inferred_from_the_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("out.glb")), OutputFormat::Glb);
        assert_eq!(OutputFormat::from_path(Path::new("out.GLB")), OutputFormat::Glb);
        assert_eq!(OutputFormat::from_path(Path::new("out.gltf")), OutputFormat::Gltf);
        assert_eq!(OutputFormat::from_path(Path::new("out")), OutputFormat::Gltf);
    }
}
